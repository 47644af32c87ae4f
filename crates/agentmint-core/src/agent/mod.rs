//! Agent reply generation for AgentMint.
//!
//! - `SystemPromptBuilder`: assembles name, role, tools and document excerpt into an XML-tagged prompt
//! - `FallbackResponsePicker`: chooses a canned reply template when no completion is available
//! - `ResponseGenerator`: calls the completion provider and never fails

pub mod fallback;
pub mod prompt;
pub mod responder;
