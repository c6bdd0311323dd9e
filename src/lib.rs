pub mod config;
pub mod error;
pub mod history;
pub mod llm;
pub mod routes;
pub mod session;
pub mod telemetry;
pub mod vocab;

pub use config::Config;

use std::sync::{Arc, Mutex};

use history::HistoryLedger;
use llm::LlmClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm_client: Arc<LlmClient>,
    pub history: Arc<Mutex<HistoryLedger>>,
}
