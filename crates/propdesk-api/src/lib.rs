// propdesk-api: Async Rust client for the property desk REST API

pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod session;
pub mod transport;

pub use client::ApiClient;
pub use endpoints::SettingsSection;
pub use error::Error;
pub use session::{MemorySessionStore, Session, SessionListener, SessionStore};
pub use transport::{RetryPolicy, TransportConfig};
