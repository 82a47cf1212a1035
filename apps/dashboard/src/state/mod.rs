//! # State Module
//!
//! Application state shared by every view of the dashboard.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐  ┌──────────────────────────────┐     │
//! │  │         QueryCache           │  │         AuthSession          │     │
//! │  │                              │  │                              │     │
//! │  │  Arc<Mutex<entries>>         │  │  watch::Sender<SessionState> │     │
//! │  │  key ─► data | in-flight     │  │  Resolving ─► Authenticated  │     │
//! │  │  invalidate(scope)           │  │            └► Anonymous      │     │
//! │  └──────────────────────────────┘  └──────────────────────────────┘     │
//! │                                                                         │
//! │  THREAD SAFETY:                                                         │
//! │  • QueryCache: lock held only between awaits, never across one          │
//! │  • AuthSession: watch channel, readers never block the writer           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cache;
mod session;

pub use cache::{QueryCache, QueryKey, QueryState};
pub use session::{AuthSession, Gate, SessionState};
