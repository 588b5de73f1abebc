//! # State Module
//!
//! Shared application state handed to every handler.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌────────────┐  ┌──────────────┐  │
//! │  │   Database   │  │  DraftState  │  │ JwtManager │  │  ApiConfig   │  │
//! │  │              │  │              │  │            │  │              │  │
//! │  │  SqlitePool  │  │  Arc<Mutex<  │  │  secret    │  │  markup,     │  │
//! │  │  (internal   │  │   HashMap<   │  │            │  │  invoice     │  │
//! │  │   pooling)   │  │  tenant,     │  │            │  │  layout      │  │
//! │  │              │  │  BillDraft>>>│  │            │  │              │  │
//! │  └──────────────┘  └──────────────┘  └────────────┘  └──────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Database: connection pool is thread-safe                            │
//! │  • DraftState: Arc<Mutex<T>>, lock held only for synchronous edits     │
//! │  • JwtManager / ApiConfig: read-only after startup                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod drafts;

use std::sync::Arc;

use bakehouse_db::Database;

use crate::auth::JwtManager;
use crate::config::ApiConfig;

pub use drafts::{CommitGuard, DraftState};

/// State shared by all handlers. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub drafts: DraftState,
    pub jwt: Arc<JwtManager>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    /// Wires the state from an open database and loaded configuration.
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState {
            db,
            drafts: DraftState::new(config.default_markup),
            jwt: Arc::new(JwtManager::new(
                config.jwt_secret.clone(),
                config.jwt_access_lifetime_secs,
            )),
            config: Arc::new(config),
        }
    }
}
