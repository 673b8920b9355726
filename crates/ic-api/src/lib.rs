//! # ic-api
//!
//! The web routing and orchestration layer for InnerCircle.
//! Handlers read the signed session, call one service, and answer with a
//! rendered page or a redirect carrying a flash message.

pub mod cookies;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
