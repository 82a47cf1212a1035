//! # FashionHub Dashboard Library
//!
//! Application root of the FashionHub inventory dashboard: owns the store
//! client, the query cache and the auth session, and renders one view per
//! command.
//!
//! ## Module Organization
//! ```text
//! fashionhub_dashboard/
//! ├── lib.rs          ◄─── You are here (App setup, logging)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cache.rs    ◄─── Query cache (dedupe, invalidation)
//! │   └── session.rs  ◄─── Auth session state machine
//! ├── queries/
//! │   ├── mod.rs      ◄─── Catalog: cached reads + writes
//! │   ├── mutation.rs ◄─── Mutation<I, O>
//! │   └── observer.rs ◄─── Latest-read-wins for one view
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports, shared rendering
//! │   ├── auth.rs     ◄─── sign-in / sign-out / whoami
//! │   ├── product.rs  ◄─── Product list/detail/form/delete views
//! │   └── category.rs ◄─── Category list/form views
//! └── error.rs        ◄─── ApiError returned by every command
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter (stderr)                       │
//! │     • Default: info,fashionhub=debug, overridable with RUST_LOG         │
//! │                                                                         │
//! │  2. Load Configuration ───────────────────────────────────────────────► │
//! │     • defaults → fashionhub.toml → FASHIONHUB_* env → validate          │
//! │                                                                         │
//! │  3. Build App ────────────────────────────────────────────────────────► │
//! │     • Store over reqwest, credentials read per request                  │
//! │     • QueryCache (stale_after from config)                              │
//! │     • AuthSession over GoTrue + session file                            │
//! │                                                                         │
//! │  4. Restore Session ──────────────────────────────────────────────────► │
//! │     • Resolving → Authenticated | Anonymous                             │
//! │                                                                         │
//! │  5. Run Command ──────────────────────────────────────────────────────► │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod queries;
pub mod state;

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::ApiError;
use fashionhub_store::{AuthClient, DashboardConfig, GoTrueAuth, SessionFile, SharedConfig, Store};
use queries::{Catalog, QueryObserver};
use state::{AuthSession, QueryCache, SessionState};

/// Everything the views need, built once per process.
#[derive(Clone)]
pub struct App {
    pub config: SharedConfig,
    pub store: Store,
    pub catalog: Catalog,
    pub session: AuthSession,
    /// Current read of the product list view.
    pub product_list: QueryObserver,
    pub page_size: u32,
}

impl App {
    /// Builds the app over HTTP from a loaded configuration.
    pub fn new(config: DashboardConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let session_file = config.session_file().map(SessionFile::new);
        let shared = SharedConfig::new(config);
        let store = Store::new(shared.clone())?;
        let provider = GoTrueAuth::new(store.rest().clone());
        let auth = AuthClient::new(Arc::new(provider), session_file);
        Self::with_parts(shared, store, auth)
    }

    /// Builds the app from prepared parts (tests, alternate transports).
    pub fn with_parts(config: SharedConfig, store: Store, auth: AuthClient) -> Result<Self, ApiError> {
        let snapshot = config.snapshot()?;
        let cache = QueryCache::with_stale_after(snapshot.stale_after());
        Ok(App {
            catalog: Catalog::new(store.clone(), cache),
            session: AuthSession::new(Arc::new(auth)),
            product_list: QueryObserver::new(),
            page_size: snapshot.catalog.page_size,
            config,
            store,
        })
    }

    /// Resolves the saved session; views gate on the result.
    pub async fn start(&self) -> SessionState {
        let state = self.session.restore().await;
        info!(authenticated = state.user().is_some(), "Dashboard ready");
        state
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so that rendered views on stdout stay clean.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=fashionhub_store=trace` - Trace the REST client only
/// - Default: `info,fashionhub=debug`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fashionhub=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
