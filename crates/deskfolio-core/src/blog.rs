//! Read-only blog library behind the Blog window.
//!
//! Posts are fixed for the lifetime of the process. Selecting a post copies
//! its body into a draft that the window can edit; drafts are discarded on
//! the next selection and never written back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: u32,
    pub title: String,
    pub content: String,
    pub date: NaiveDate,
    pub tags: Vec<String>,
    pub read_time: String,
    pub views: u32,
}

impl BlogPost {
    /// "Oct 19, 2026"
    pub fn display_date(&self) -> String {
        self.date.format("%b %d, %Y").to_string()
    }

    fn matches(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle_lower))
    }
}

/// Sample posts, all dated `today`
pub fn sample_posts(today: NaiveDate) -> Vec<BlogPost> {
    vec![
        BlogPost {
            id: 1,
            title: "Building a Modern Portfolio with Astro".to_string(),
            content: "# Building a Modern Portfolio\n\n\
                      In this post, I'll share my experience building a portfolio site \
                      using Astro, React, and TailwindCSS..."
                .to_string(),
            date: today,
            tags: vec!["astro".into(), "react".into(), "portfolio".into()],
            read_time: "5 min".to_string(),
            views: 123,
        },
        BlogPost {
            id: 2,
            title: "Mastering Data Structures in Competitive Programming".to_string(),
            content: "# Data Structures in CP\n\n\
                      Let's dive into advanced data structures commonly used in \
                      competitive programming..."
                .to_string(),
            date: today,
            tags: vec!["cp".into(), "algorithms".into(), "coding".into()],
            read_time: "8 min".to_string(),
            views: 256,
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogView {
    Preview,
    Edit,
}

pub struct BlogLibrary {
    posts: Vec<BlogPost>,
    selected: Option<u32>,
    draft: String,
    view: BlogView,
}

impl BlogLibrary {
    pub fn new(posts: Vec<BlogPost>) -> Self {
        Self {
            posts,
            selected: None,
            draft: String::new(),
            view: BlogView::Preview,
        }
    }

    pub fn with_samples(today: NaiveDate) -> Self {
        Self::new(sample_posts(today))
    }

    pub fn posts(&self) -> &[BlogPost] {
        &self.posts
    }

    /// Posts whose title or any tag contains `query`, case-insensitively.
    /// A blank query returns everything.
    pub fn search(&self, query: &str) -> Vec<&BlogPost> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.posts.iter().collect();
        }
        self.posts.iter().filter(|p| p.matches(&needle)).collect()
    }

    pub fn selected(&self) -> Option<&BlogPost> {
        let id = self.selected?;
        self.posts.iter().find(|p| p.id == id)
    }

    /// Select a post, resetting the draft to its body and the view to preview
    pub fn select(&mut self, id: u32) -> bool {
        let Some(post) = self.posts.iter().find(|p| p.id == id) else {
            return false;
        };
        self.draft = post.content.clone();
        self.selected = Some(id);
        self.view = BlogView::Preview;
        true
    }

    pub fn view(&self) -> BlogView {
        self.view
    }

    /// Switch between edit and preview; does nothing without a selection
    pub fn toggle_view(&mut self) {
        if self.selected.is_none() {
            return;
        }
        self.view = match self.view {
            BlogView::Preview => BlogView::Edit,
            BlogView::Edit => BlogView::Preview,
        };
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Editable draft, only while in edit view
    pub fn draft_mut(&mut self) -> Option<&mut String> {
        match (self.selected, self.view) {
            (Some(_), BlogView::Edit) => Some(&mut self.draft),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> BlogLibrary {
        BlogLibrary::with_samples(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
    }

    #[test]
    fn test_search_title_and_tags() {
        let library = library();
        assert_eq!(library.search("").len(), 2);

        let by_title = library.search("ASTRO");
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].id, 1);

        let by_tag = library.search("algorithms");
        assert_eq!(by_tag.len(), 1);
        assert_eq!(by_tag[0].id, 2);

        // Body text isn't searched
        assert!(library.search("TailwindCSS").is_empty());
    }

    #[test]
    fn test_select_resets_draft_and_view() {
        let mut library = library();
        assert!(library.select(1));
        library.toggle_view();
        library.draft_mut().unwrap().push_str(" more");

        assert!(library.select(2));
        assert_eq!(library.view(), BlogView::Preview);
        assert_eq!(library.draft(), library.selected().unwrap().content);
    }

    #[test]
    fn test_draft_edits_never_touch_post() {
        let mut library = library();
        library.select(1);
        library.toggle_view();
        library.draft_mut().unwrap().clear();

        assert!(library.draft().is_empty());
        assert!(!library.posts()[0].content.is_empty());
    }

    #[test]
    fn test_draft_locked_in_preview_or_without_selection() {
        let mut library = library();
        library.toggle_view();
        assert_eq!(library.view(), BlogView::Preview);
        assert!(library.draft_mut().is_none());

        library.select(1);
        assert!(library.draft_mut().is_none());
    }

    #[test]
    fn test_unknown_post_not_selected() {
        let mut library = library();
        assert!(!library.select(99));
        assert!(library.selected().is_none());
    }

    #[test]
    fn test_display_date() {
        assert_eq!(library().posts()[0].display_date(), "Oct 19, 2026");
    }
}
