//! canopy_client - Streaming client for the Canopy text-generation backend.
//!
//! Drives one request/response exchange at a time: validates the prompt
//! against the token budget, posts the payload for the configured protocol,
//! and re-renders the accumulated reply through a [`RenderSink`] as SSE-style
//! deltas arrive.

pub mod config;
pub mod feature_flags;
pub mod session;
pub mod sink;

pub use canopy_core::{BudgetStatus, Protocol, SimpleRoute, TokenBudget};
pub use config::Config;
pub use feature_flags::{fetch_feature_flags, FeatureFlags};
pub use session::{SessionOutcome, StreamingSession, TransportError};
pub use sink::RenderSink;
