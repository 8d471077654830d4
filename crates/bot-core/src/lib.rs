//! Sandbox-side tick harness for reef-bot submissions.
//!
//! The engine owns the rules; submissions own the decisions. This crate is
//! the seam between them: it decodes one tick view per input line, runs the
//! submission's spawn policy, dispatches every alive bot's strategy behind a
//! per-bot fault boundary, and writes back exactly one reply line. The
//! lifecycle registry is the only state that outlives a tick; it keeps each
//! engine bot id bound to the same strategy instance for that bot's lifetime.

pub mod dispatch;
pub mod error;
pub mod harness;
pub mod registry;
pub mod spawn;
pub mod strategy;
pub mod transport;
pub mod view;
pub mod wire;

pub use error::HarnessError;
pub use harness::{tick, BotSession, HarnessConfig};
pub use registry::LifecycleRegistry;
pub use spawn::{BotIdAllocator, EconomyPolicy, SpawnPolicy, SpawnSpec};
pub use strategy::{BotContext, Strategy, StrategyKind};
pub use view::{decode_view, TickView};
pub use wire::{Action, TickReply, READY_SENTINEL};
