//! canopy_core - Protocol logic for the Canopy streaming client.
//!
//! Pure, no-I/O building blocks shared by the client crate:
//! - `budget` - heuristic token budget estimation and classification
//! - `protocol` - backend protocol shapes and routes
//! - `payload` - outbound request payload construction
//! - `frame` - SSE-style stream frame parsing

pub mod budget;
pub mod frame;
pub mod payload;
pub mod protocol;

pub use budget::{estimate, BudgetStatus, TokenBudget, RESPONSE_RESERVE_TOKENS};
pub use frame::{
    parse_line, ChatDeltaSource, DeltaSource, FrameParseError, SimpleDeltaSource, StreamFrame,
    DATA_PREFIX, DONE_SENTINEL,
};
pub use payload::{ChatMessage, ChatPayload, OutboundPayload, PromptRequest, Role, SimplePayload};
pub use protocol::{Protocol, SimpleRoute};
