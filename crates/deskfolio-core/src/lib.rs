pub mod ai;
pub mod blog;
pub mod chat;
pub mod config;
pub mod desktop;
pub mod error;
pub mod gateway;
pub mod notes;
pub mod persona;
pub mod placeholder;
pub mod provider;
pub mod state;
pub mod window;

// Re-export main types for convenience
pub use ai::{ClaudeClient, GeminiClient, OllamaClient, OpenAIClient, TextGenerator, UpstreamModel};
pub use blog::{BlogLibrary, BlogPost, BlogView};
pub use chat::ChatSession;
pub use config::Config;
pub use desktop::{DesktopContext, DockAction, DockItem};
pub use error::{GatewayError, StoreError};
pub use gateway::{ChatFailure, ChatReply, ChatRequest, CompletionGateway, HttpGateway, PersonaGateway};
pub use notes::{FileNoteStore, MemoryNoteStore, Note, NotePatch, NoteSession, NoteStore};
pub use persona::Persona;
pub use placeholder::PlaceholderCycle;
pub use provider::Provider;
pub use state::{ChatMessage, ChatRole};
pub use window::{Geometry, ManagedWindow, Placement, WindowKind, WindowManager, WindowPhase};
