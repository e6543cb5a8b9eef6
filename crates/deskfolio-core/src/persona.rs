//! The first-person persona the chat terminal speaks as.
//!
//! Every piece of text the terminal or the gateway needs about the portfolio
//! owner is built here: the welcome banner, the per-request system prompt,
//! the persona block the gateway prepends upstream, and the fallback reply.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    pub name: String,
    pub role: String,
    pub location: String,
    pub email: String,
    pub github: String,
    pub calendar_url: String,
    pub playlist_url: String,
    /// Age used in the example answers; omitted from the prompt when unset
    pub age: Option<u8>,
    pub background: Vec<String>,
    pub expertise: Vec<String>,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: "Akhil Raghav".to_string(),
            role: "Full Stack Developer & CP Enthusiast".to_string(),
            location: "India".to_string(),
            email: "work@akhilraghav.com".to_string(),
            github: "github.com/AKhilRaghav0".to_string(),
            calendar_url: "https://calendly.com/akhilraghav/30min".to_string(),
            playlist_url: "https://open.spotify.com".to_string(),
            age: Some(23),
            background: vec![
                "Experienced iOS Developer in the past".to_string(),
                "Currently focused on Competitive Programming".to_string(),
                "Backend Developer with strong system design skills".to_string(),
                "Love solving algorithmic challenges".to_string(),
                "Tech stack includes various backend technologies".to_string(),
            ],
            expertise: vec![
                "Full Stack Development".to_string(),
                "iOS Development (Past Experience)".to_string(),
                "Competitive Programming".to_string(),
                "Backend Development & System Design".to_string(),
            ],
        }
    }
}

impl Persona {
    /// Banner shown as the terminal's first message
    pub fn welcome_message(&self) -> String {
        format!(
            "Welcome to My Portfolio\n\n\
             Name: {}\n\
             Role: {}\n\
             Location: {}\n\n\
             Contact: {}\n\
             GitHub: {}\n\n\
             Ask me anything!\n",
            self.name, self.role, self.location, self.email, self.github
        )
    }

    /// Reply appended when the gateway can't be reached or fails
    pub fn fallback_message(&self) -> String {
        format!(
            "I'm having trouble processing that. Please email me at {}",
            self.email
        )
    }

    /// Fixed biography the gateway prepends to every upstream prompt
    pub fn persona_block(&self) -> String {
        let mut block = format!("\nI am {}. Here's my background:\n", self.name);
        for line in &self.background {
            block.push_str("- ");
            block.push_str(line);
            block.push('\n');
        }
        block.push_str(
            "\nPlease keep this context in mind while responding. \
             Always speak as if you are representing me.\n",
        );
        block
    }

    /// System prompt sent first in every outbound request, dated `today`
    pub fn system_prompt(&self, today: NaiveDate) -> String {
        let mut prompt = format!(
            "IMPORTANT: You ARE {name}. You must always speak in first-person \
             (\"I\", \"my\", \"me\"). Never refer to \"{first}\" in third-person.\n\n\
             CURRENT DATE: {date} - Always use this exact date when discussing the current date/year.\n\n",
            name = self.name,
            first = self.first_name(),
            date = format_prompt_date(today),
        );

        prompt.push_str("Example responses:\n");
        prompt.push_str(&format!(
            "Q: \"Where do you live?\"\nA: \"I live in {}\"\n\n",
            self.location
        ));
        if let Some(age) = self.age {
            prompt.push_str(&format!(
                "Q: \"What's your age\"\nA: \"I'm {} years old\"\n\n",
                age
            ));
        }
        prompt.push_str(&format!(
            "Q: \"What's your email?\"\nA: \"My email is {}\"\n\n",
            self.email
        ));
        prompt.push_str(&format!(
            "Q: \"What's your GitHub?\"\nA: \"My GitHub is {}\"\n\n",
            self.github
        ));

        prompt.push_str("Core details about me:\n");
        prompt.push_str(&format!("- I'm a {}\n", self.role));
        prompt.push_str(&format!("- My email is {}\n", self.email));
        for line in &self.background {
            prompt.push_str(&format!("- {}\n", line));
        }

        prompt.push_str("\nMy technical expertise:\n");
        for skill in &self.expertise {
            prompt.push_str(&format!("- {}\n", skill));
        }

        prompt.push_str(&format!(
            "\nResponse rules:\n\
             1. ALWAYS use first-person (I, me, my)\n\
             2. Never say \"{first}\" or refer to myself in third-person\n\
             3. Keep responses concise and professional\n\
             4. Use markdown formatting when appropriate\n\
             5. Maintain a friendly, conversational tone\n\n\
             If a question is unrelated to my work or portfolio, say: \"That's outside my area \
             of expertise. Feel free to email me at {email} and we can discuss further!\"",
            first = self.first_name(),
            email = self.email,
        ));

        prompt
    }

    /// Rotating hints shown in the empty terminal input
    pub fn placeholders(&self) -> Vec<String> {
        [
            "Type your question...",
            "How old are you?",
            "What are your skills?",
            "Where are you located?",
            "What projects have you worked on?",
            "What is your email?",
            "What is your GitHub?",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// "October 19, 2026"
pub fn format_prompt_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_prompt_date_format() {
        assert_eq!(format_prompt_date(date(2026, 10, 19)), "October 19, 2026");
        assert_eq!(format_prompt_date(date(2025, 3, 4)), "March 4, 2025");
    }

    #[test]
    fn test_system_prompt_carries_current_date() {
        let persona = Persona::default();
        let prompt = persona.system_prompt(date(2026, 1, 2));
        assert!(prompt.contains("CURRENT DATE: January 2, 2026"));
        assert!(prompt.contains("Never refer to \"Akhil\" in third-person"));
        assert!(prompt.contains("I'm 23 years old"));
    }

    #[test]
    fn test_system_prompt_changes_with_date() {
        let persona = Persona::default();
        assert_ne!(
            persona.system_prompt(date(2026, 1, 2)),
            persona.system_prompt(date(2026, 1, 3))
        );
    }

    #[test]
    fn test_age_example_omitted_without_age() {
        let persona = Persona {
            age: None,
            ..Persona::default()
        };
        assert!(!persona.system_prompt(date(2026, 1, 2)).contains("years old"));
    }

    #[test]
    fn test_welcome_and_fallback_use_contact() {
        let persona = Persona {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            ..Persona::default()
        };
        assert!(persona.welcome_message().starts_with("Welcome to My Portfolio"));
        assert!(persona.welcome_message().contains("Name: Ada Lovelace"));
        assert_eq!(
            persona.fallback_message(),
            "I'm having trouble processing that. Please email me at ada@example.com"
        );
    }

    #[test]
    fn test_persona_block_lists_background() {
        let block = Persona::default().persona_block();
        assert!(block.contains("I am Akhil Raghav. Here's my background:"));
        assert!(block.contains("- Love solving algorithmic challenges\n"));
        assert!(block.trim_end().ends_with("Always speak as if you are representing me."));
    }
}
