//! Completion provider implementations.
//!
//! - `openai`: OpenAI-compatible chat completions via `async-openai`

pub mod openai;
