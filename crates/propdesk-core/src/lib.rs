//! Client-side logic between `propdesk-api` and the CLI / TUI.
//!
//! - **[`Desk`]**: the facade. Owns the API client and the auth context,
//!   validates forms before sending, and fetches multi-collection views
//!   (dashboard, reports, assignment data) jointly.
//!
//! - **[`AuthContext`]**: the single shared session, published through a
//!   `tokio::sync::watch` channel and torn down when the server rejects
//!   the token.
//!
//! - **[`EntityList<T>`]**: per-view list state with loading / error /
//!   success banners. Stale fetches are discarded via [`RequestSequencer`].
//!
//! - **[`report`]**: fallback filtering, the related-items index, and
//!   paginated text export.
//!
//! - **[`board`]**: the three-column kanban board.
//!
//! - **[`lookup`]**: hotel-chain and room-type label tables.

pub mod auth;
pub mod board;
pub mod desk;
pub mod error;
pub mod list;
pub mod lookup;
pub mod report;
pub mod sequence;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use auth::AuthContext;
pub use board::{Board, BoardCapabilities, Column, Drag, Move};
pub use desk::{AssignmentData, Dashboard, Desk};
pub use error::{CoreError, Operation};
pub use list::{EntityList, Identified};
pub use report::{Document, RelatedItems, ReportData, ReportFilter, ReportKind, ReportQuery};
pub use sequence::{LoadToken, RequestSequencer};
pub use validate::Validate;

// Wire types are part of this crate's API.
pub use propdesk_api::models;
pub use propdesk_api::{
    MemorySessionStore, RetryPolicy, Session, SessionStore, SettingsSection, TransportConfig,
};
