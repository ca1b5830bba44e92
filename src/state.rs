use crate::domain::error::TranslateError;
use crate::domain::traits::Translator;
use crate::infrastructure::config::Config;
use crate::infrastructure::network::gemini::GeminiClient;
use crate::infrastructure::network::http::create_client;
use crate::infrastructure::storage::cache::MemoryCache;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_rusqlite::Connection;

const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Connection>,
    pub cache: Arc<MemoryCache>,
    pub config: Arc<RwLock<Config>>,
    pub translator: Arc<dyn Translator>,
}

impl AppState {
    pub fn new(db: Connection, config: Config) -> Result<Self, TranslateError> {
        let http_client = create_client(CONNECT_TIMEOUT_SECS)?;
        let translator = Arc::new(GeminiClient::new(http_client, config.gemini.clone()));
        Ok(Self::with_translator(db, config, translator))
    }

    /// Build state around any translator implementation.
    pub fn with_translator(
        db: Connection,
        config: Config,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            db: Arc::new(db),
            cache: Arc::new(MemoryCache::new()),
            config: Arc::new(RwLock::new(config)),
            translator,
        }
    }
}
