//! Canned replies used when no completion is available.

use rand::Rng;

/// Reply templates. `{name}`, `{role}` and `{message}` are substituted.
const TEMPLATES: [&str; 5] = [
    "Hello! I'm {name}, an AI agent. I can help you with {role}. Let me guide you on \"{message}\".",
    "Understood. As {name}, I specialize in {role}. I'd be glad to help with \"{message}\".",
    "I can help with that. I'm {name}, an AI agent experienced in {role}. What would you like to know about \"{message}\"?",
    "Great question! I'm {name} and I work on {role}. I can give you detailed information about \"{message}\".",
    "I can guide you on this. I'm {name}, an AI agent specializing in {role}. Which details about \"{message}\" interest you most?",
];

/// Chooses which fallback template to use.
pub trait FallbackResponsePicker: Send + Sync {
    /// Return an index in `0..count`.
    fn pick(&self, count: usize) -> usize;
}

/// Uniformly random choice.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl FallbackResponsePicker for RandomPicker {
    fn pick(&self, count: usize) -> usize {
        rand::rng().random_range(0..count)
    }
}

/// Always the same template (wrapped into range).
#[derive(Debug, Clone, Copy)]
pub struct FixedPicker(pub usize);

impl FallbackResponsePicker for FixedPicker {
    fn pick(&self, count: usize) -> usize {
        self.0 % count
    }
}

/// Render a fallback reply naming the agent and echoing the user message.
pub fn render(picker: &dyn FallbackResponsePicker, name: &str, role: &str, message: &str) -> String {
    let template = TEMPLATES[picker.pick(TEMPLATES.len()) % TEMPLATES.len()];
    // Single pass over the template so substituted text is never rescanned.
    let mut out = String::with_capacity(template.len() + name.len() + role.len() + message.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let (value, len) = if tail.starts_with("{name}") {
            (name, "{name}".len())
        } else if tail.starts_with("{role}") {
            (role, "{role}".len())
        } else if tail.starts_with("{message}") {
            (message, "{message}".len())
        } else {
            ("{", 1)
        };
        out.push_str(value);
        rest = &tail[len..];
    }
    out.push_str(rest);
    out
}
