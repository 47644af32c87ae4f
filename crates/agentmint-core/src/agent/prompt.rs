//! System prompt builder for AgentMint agents.
//!
//! The prompt is a pure function of the agent record, so two calls for the
//! same agent always produce byte-identical output.

use agentmint_types::agent::Agent;

/// Maximum number of characters of the reference document included in the prompt.
pub const DOCUMENT_EXCERPT_CHARS: usize = 2000;

/// Builds a system prompt from an agent's profile.
///
/// Layout:
/// ```text
/// <identity>Name: ... Role: ...</identity>
/// <tools>Available tools: a, b</tools>
/// <reference_document name="...">{first 2000 chars}...</reference_document>
/// <instructions>You are {name}. ...</instructions>
/// ```
pub struct SystemPromptBuilder;

impl SystemPromptBuilder {
    pub fn build(agent: &Agent) -> String {
        let mut sections = Vec::with_capacity(4);

        sections.push(format!(
            "<identity>\nName: {}\nRole: {}\n</identity>",
            agent.name, agent.role
        ));

        let tools = if agent.tools.is_empty() {
            "none".to_string()
        } else {
            agent.tools.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
        };
        sections.push(format!("<tools>\nAvailable tools: {tools}\n</tools>"));

        if let Some(doc) = &agent.document {
            sections.push(format!(
                "<reference_document name=\"{}\">\n{}\n</reference_document>",
                doc.file_name,
                excerpt(&doc.content, DOCUMENT_EXCERPT_CHARS)
            ));
        }

        let document_hint = if agent.document.is_some() {
            " Use the reference document when it is relevant to the question."
        } else {
            ""
        };
        sections.push(format!(
            "<instructions>\nYou are {name}, an AI agent whose expertise is: {role}. \
             Answer the user helpfully and stay within your area of expertise.{document_hint} \
             Tools are listed for context only; describe how you would use them rather than \
             claiming to have run them.\n</instructions>",
            name = agent.name,
            role = agent.role,
        ));

        sections.join("\n\n")
    }
}

/// Cut `content` to its first `max_chars` characters, appending `...` when
/// anything was dropped. Counts `char`s, so multi-byte text is never split.
pub fn excerpt(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &content[..byte_idx]),
        None => content.to_string(),
    }
}
