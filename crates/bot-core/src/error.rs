//! Fatal error taxonomy.
//!
//! Everything here terminates the process: the protocol is tick-synchronous,
//! so there is no retry path that would not desynchronize the reply sequence.
//! Per-bot execution failures are deliberately *not* represented here; they
//! are recovered inside the dispatcher and never escape it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    /// The engine sent a line that does not decode into a complete tick view.
    #[error("malformed tick view: {0}")]
    MalformedView(#[from] serde_json::Error),

    /// The spawn policy asked for a strategy kind outside the known set. This
    /// signals a broken submission, not a per-bot fault.
    #[error("spawn policy named unknown strategy kind `{0}`")]
    UnknownStrategy(String),

    /// The engine reports a bot alive but no strategy is bound to its id.
    /// State was lost and cannot be repaired mid-tick.
    #[error("bot {0} is alive but has no registered strategy")]
    MissingStrategy(u64),
}
