//! Clipto dynamic template engine
//!
//! Parses placeholder text into fields, links references, carries answers
//! across re-parses, expands snippets and resolves templates into literal
//! text, asking an [`InputCollaborator`] for user input when needed.
//!
//! ```ignore
//! let engine = TemplateEngine::builder().build();
//! let config = ResolutionConfig::new(ActionType::Copy);
//! let text = engine.resolve("Today is {{ date }}", &config).await?;
//! ```

pub mod config;
pub mod continuity;
pub mod engine;
pub mod error;
pub mod input;
pub mod parser;
pub mod references;
mod snippets;
pub mod substitute;

pub use config::{ActionType, ResolutionConfig, TextKind};
pub use continuity::carry_over;
pub use engine::{Resolution, TemplateEngine, TemplateEngineBuilder};
pub use error::{EngineError, Result};
pub use input::{
    ChannelInputCollaborator, InputCollaborator, InputRequest, InputResponse, NoInput,
    PendingInput,
};
pub use parser::TemplateParser;
pub use references::link_references;
pub use substitute::{substitute, substitute_computed};
