use crate::rate_limit::ClientLimiter;
use crate::session::SessionKeys;
use claude_client::Completion;
use pmp_core::config::Config;
use std::sync::Arc;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<SessionKeys>,
    pub limiter: Arc<ClientLimiter>,
    pub completion: Arc<dyn Completion>,
}

impl AppState {
    pub fn new(config: Config, completion: Arc<dyn Completion>) -> Self {
        Self {
            sessions: Arc::new(SessionKeys::from_config(&config.auth)),
            limiter: Arc::new(ClientLimiter::new(&config.rate_limit)),
            config: Arc::new(config),
            completion,
        }
    }
}
