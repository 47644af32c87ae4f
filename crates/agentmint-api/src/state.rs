//! Application state wiring all services together.
//!
//! Services are generic over repository/hasher/id traits; AppState pins them
//! to the backend selected in `config.toml`.

use std::path::PathBuf;
use std::sync::Arc;

use agentmint_core::agent::responder::ResponseGenerator;
use agentmint_core::chat::service::ChatService;
use agentmint_core::llm::box_provider::BoxLlmProvider;
use agentmint_core::service::agent::AgentService;
use agentmint_core::service::id::UuidV7Generator;
use agentmint_core::service::nft::NftLedger;
use agentmint_infra::config::{completion_api_key, load_global_config};
use agentmint_infra::crypto::hash::Sha256ContentHasher;
use agentmint_infra::filesystem::resolve_data_dir;
use agentmint_infra::llm::openai::OpenAiCompletionProvider;
use agentmint_infra::store::{CatalogStore, ChatStore, open_stores};
use agentmint_infra::wallet::SimulatedWalletGateway;
use agentmint_types::config::GlobalConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAgentService = AgentService<CatalogStore, ChatStore, UuidV7Generator>;

pub type ConcreteChatService = ChatService<ChatStore, CatalogStore>;

pub type ConcreteNftLedger =
    NftLedger<CatalogStore, CatalogStore, Sha256ContentHasher, UuidV7Generator>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub agent_service: Arc<ConcreteAgentService>,
    pub chat_service: Arc<ConcreteChatService>,
    pub nft_ledger: Arc<ConcreteNftLedger>,
    pub wallet: SimulatedWalletGateway,
    /// Kept for health checks and shutdown.
    pub catalog: CatalogStore,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Resolve the data directory, load config, open storage, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;
        let (catalog, chat) = open_stores(&config, &data_dir).await?;

        let provider = completion_api_key().map(|key| {
            BoxLlmProvider::new(OpenAiCompletionProvider::new(&key, &config.completion))
        });
        match &provider {
            Some(p) => tracing::info!(
                provider = p.name(),
                model = %config.completion.model,
                "completion provider configured"
            ),
            None => tracing::warn!("OPENAI_API_KEY not set, chat replies use fallback templates"),
        }
        let generator = ResponseGenerator::new(provider, &config.completion);

        Ok(Self::from_parts(catalog, chat, generator, &config, data_dir))
    }

    /// Wire services over already-opened stores.
    pub fn from_parts(
        catalog: CatalogStore,
        chat: ChatStore,
        generator: ResponseGenerator,
        config: &GlobalConfig,
        data_dir: PathBuf,
    ) -> Self {
        let agent_service = AgentService::new(catalog.clone(), chat.clone(), UuidV7Generator);
        let chat_service =
            ChatService::new(chat, catalog.clone(), generator, config.chat.history_window);
        let nft_ledger = NftLedger::new(
            catalog.clone(),
            catalog.clone(),
            Sha256ContentHasher,
            UuidV7Generator,
        );

        Self {
            agent_service: Arc::new(agent_service),
            chat_service: Arc::new(chat_service),
            nft_ledger: Arc::new(nft_ledger),
            wallet: SimulatedWalletGateway,
            catalog,
            data_dir,
        }
    }

    /// Whether chat replies come from the completion service.
    pub fn has_completion_key(&self) -> bool {
        self.chat_service.generator().is_live()
    }
}
