//! Response generation for agent chat turns.
//!
//! `ResponseGenerator` owns the optional completion provider. A missing
//! provider, a provider error, a timeout and an empty completion all resolve
//! to a templated fallback reply, so `generate` has no error path.

use std::time::Duration;

use agentmint_types::agent::Agent;
use agentmint_types::chat::ChatMessage;
use agentmint_types::config::CompletionConfig;
use agentmint_types::llm::{CompletionRequest, Message, MessageRole};
use tracing::{debug, warn};

use super::fallback::{self, FallbackResponsePicker, RandomPicker};
use super::prompt::SystemPromptBuilder;
use crate::llm::box_provider::BoxLlmProvider;

/// Produces assistant replies for chat turns.
pub struct ResponseGenerator {
    provider: Option<BoxLlmProvider>,
    picker: Box<dyn FallbackResponsePicker>,
    model: String,
    max_tokens: u32,
    temperature: f64,
    timeout: Duration,
}

impl ResponseGenerator {
    /// Create a generator. `provider` is `None` when no API key is configured.
    pub fn new(provider: Option<BoxLlmProvider>, config: &CompletionConfig) -> Self {
        Self {
            provider,
            picker: Box::new(RandomPicker),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Replace the fallback template picker.
    pub fn with_picker(mut self, picker: impl FallbackResponsePicker + 'static) -> Self {
        self.picker = Box::new(picker);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether a completion provider is configured.
    pub fn is_live(&self) -> bool {
        self.provider.is_some()
    }

    /// Build the completion request: system prompt, prior history, new message.
    pub fn build_request(
        &self,
        agent: &Agent,
        prior: &[ChatMessage],
        user_message: &str,
    ) -> CompletionRequest {
        let mut messages: Vec<Message> = prior
            .iter()
            .map(|m| Message {
                role: m.role,
                content: m.content.clone(),
            })
            .collect();
        messages.push(Message {
            role: MessageRole::User,
            content: user_message.to_string(),
        });

        CompletionRequest {
            model: self.model.clone(),
            messages,
            system: Some(SystemPromptBuilder::build(agent)),
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
        }
    }

    /// Generate the agent's reply to `user_message`.
    pub async fn generate(&self, agent: &Agent, prior: &[ChatMessage], user_message: &str) -> String {
        let Some(provider) = &self.provider else {
            debug!(agent_id = %agent.id, "no completion provider configured, using fallback");
            return self.fallback(agent, user_message);
        };

        let request = self.build_request(agent, prior, user_message);
        match tokio::time::timeout(self.timeout, provider.complete(&request)).await {
            Ok(Ok(response)) => {
                let text = response.content.trim();
                if text.is_empty() {
                    warn!(agent_id = %agent.id, provider = provider.name(), "empty completion, using fallback");
                    self.fallback(agent, user_message)
                } else {
                    debug!(
                        agent_id = %agent.id,
                        input_tokens = response.usage.input_tokens,
                        output_tokens = response.usage.output_tokens,
                        "completion received"
                    );
                    text.to_string()
                }
            }
            Ok(Err(e)) => {
                warn!(agent_id = %agent.id, provider = provider.name(), error = %e, "completion failed, using fallback");
                self.fallback(agent, user_message)
            }
            Err(_) => {
                warn!(
                    agent_id = %agent.id,
                    provider = provider.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "completion timed out, using fallback"
                );
                self.fallback(agent, user_message)
            }
        }
    }

    /// Templated reply naming the agent and echoing the user message.
    pub fn fallback(&self, agent: &Agent, user_message: &str) -> String {
        fallback::render(self.picker.as_ref(), &agent.name, &agent.role, user_message)
    }

    /// Greeting returned when an agent is created. Never calls the provider.
    pub fn greeting(agent: &Agent) -> String {
        let mut text = format!(
            "Hello! I'm {}, an AI agent. I can help you with {}.",
            agent.name, agent.role
        );
        if let Some(doc) = &agent.document {
            text.push_str(&format!(
                "\n\nI can also analyze the file \"{}\" you uploaded and answer questions about it.",
                doc.file_name
            ));
        }
        text.push_str("\n\nHow can I help you today?");
        text
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::agent::fallback::FixedPicker;
    use crate::llm::provider::LlmProvider;
    use agentmint_types::agent::{AgentId, AgentStatus, ReferenceDocument, normalize_tools};
    use agentmint_types::llm::{CompletionResponse, LlmError, StopReason, Usage};
    use chrono::Utc;

    fn test_agent() -> Agent {
        let now = Utc::now();
        Agent {
            id: AgentId::new(),
            name: "Atlas".to_string(),
            role: "travel planning".to_string(),
            tools: normalize_tools(["web_search"]),
            document: None,
            status: AgentStatus::Active,
            creator_address: None,
            created_at: now,
            updated_at: now,
            nft: None,
        }
    }

    enum Behavior {
        Reply(&'static str),
        Fail,
        Hang,
    }

    struct FakeProvider {
        behavior: Behavior,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl FakeProvider {
        fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl LlmProvider for std::sync::Arc<FakeProvider> {
        fn name(&self) -> &str {
            "fake"
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
            self.seen.lock().unwrap().push(request.clone());
            match self.behavior {
                Behavior::Reply(text) => Ok(CompletionResponse {
                    id: "resp-1".to_string(),
                    content: text.to_string(),
                    model: request.model.clone(),
                    stop_reason: StopReason::EndTurn,
                    usage: Usage::default(),
                }),
                Behavior::Fail => Err(LlmError::RateLimited),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Err(LlmError::Timeout(5))
                }
            }
        }
    }

    fn generator(behavior: Behavior) -> (ResponseGenerator, std::sync::Arc<FakeProvider>) {
        let fake = std::sync::Arc::new(FakeProvider::new(behavior));
        let generator = ResponseGenerator::new(
            Some(BoxLlmProvider::new(fake.clone())),
            &CompletionConfig::default(),
        )
        .with_picker(FixedPicker(0))
        .with_timeout(Duration::from_millis(50));
        (generator, fake)
    }

    #[tokio::test]
    async fn test_generate_trims_completion() {
        let (generator, fake) = generator(Behavior::Reply("  Kyoto in spring.\n"));
        let agent = test_agent();
        let prior = vec![
            ChatMessage::new(agent.id, MessageRole::User, "hi"),
            ChatMessage::new(agent.id, MessageRole::Assistant, "hello"),
        ];

        let reply = generator.generate(&agent, &prior, "Where should I go?").await;
        assert_eq!(reply, "Kyoto in spring.");

        let seen = fake.seen.lock().unwrap();
        let request = &seen[0];
        assert_eq!(request.model, "gpt-4");
        assert_eq!(request.max_tokens, 1000);
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[2].content, "Where should I go?");
        assert_eq!(request.messages[1].role, MessageRole::Assistant);
        assert!(request.system.as_deref().unwrap().contains("Name: Atlas"));
    }

    #[tokio::test]
    async fn test_generate_without_provider_falls_back() {
        let generator =
            ResponseGenerator::new(None, &CompletionConfig::default()).with_picker(FixedPicker(1));
        assert!(!generator.is_live());

        let reply = generator.generate(&test_agent(), &[], "Plan Kyoto").await;
        assert!(reply.contains("Atlas"));
        assert!(reply.contains("Plan Kyoto"));
    }

    #[tokio::test]
    async fn test_generate_provider_error_falls_back() {
        let (generator, _) = generator(Behavior::Fail);
        let reply = generator.generate(&test_agent(), &[], "Plan Kyoto").await;
        assert!(reply.contains("Atlas"));
        assert!(reply.contains("Plan Kyoto"));
    }

    #[tokio::test]
    async fn test_generate_empty_completion_falls_back() {
        let (generator, _) = generator(Behavior::Reply("   "));
        let reply = generator.generate(&test_agent(), &[], "Plan Kyoto").await;
        assert!(reply.contains("Plan Kyoto"));
    }

    #[tokio::test]
    async fn test_generate_timeout_falls_back() {
        let (generator, _) = generator(Behavior::Hang);
        let reply = generator.generate(&test_agent(), &[], "Plan Kyoto").await;
        assert!(reply.contains("Atlas"));
    }

    #[test]
    fn test_greeting_mentions_file() {
        let mut agent = test_agent();
        assert!(!ResponseGenerator::greeting(&agent).contains("uploaded"));

        agent.document = Some(ReferenceDocument {
            file_name: "itinerary.txt".to_string(),
            content: "day 1".to_string(),
        });
        let greeting = ResponseGenerator::greeting(&agent);
        assert!(greeting.contains("Atlas"));
        assert!(greeting.contains("travel planning"));
        assert!(greeting.contains("\"itinerary.txt\""));
    }
}
