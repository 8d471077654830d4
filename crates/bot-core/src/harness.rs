//! One deterministic tick of the harness: spawn, act, clean up.
//!
//! The driver is intentionally small and owns no I/O or timers; the transport
//! loop feeds it decoded views and writes out its replies, and tests feed it
//! fabricated views directly.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::dispatch::run_action_phase;
use crate::error::HarnessError;
use crate::registry::LifecycleRegistry;
use crate::spawn::{run_spawn_phase, BotIdAllocator, SpawnPolicy};
use crate::view::TickView;
use crate::wire::TickReply;

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Watchdog for one bot's decision future; expiry degrades to "no action"
    /// through the ordinary fault boundary. `None` leaves decisions unbounded,
    /// which also means a runaway decision stalls the whole protocol.
    pub decision_timeout: Option<Duration>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            decision_timeout: Some(Duration::from_millis(250)),
        }
    }
}

/// Everything that outlives a tick: the policy object, the id counter, and
/// the strategy registry. Owned by the transport loop and threaded through
/// each phase by reference; nothing here is ambient or global.
#[derive(Debug)]
pub struct BotSession {
    policy: Box<dyn SpawnPolicy>,
    allocator: BotIdAllocator,
    registry: LifecycleRegistry,
}

impl BotSession {
    pub fn new(policy: Box<dyn SpawnPolicy>) -> BotSession {
        BotSession {
            policy,
            allocator: BotIdAllocator::new(),
            registry: LifecycleRegistry::new(),
        }
    }

    pub fn registry(&self) -> &LifecycleRegistry {
        &self.registry
    }

    /// Mutable registry access, for embedders that restore or inspect
    /// lifecycle state out of band.
    pub fn registry_mut(&mut self) -> &mut LifecycleRegistry {
        &mut self.registry
    }
}

/// Processes one decoded view into one reply.
///
/// Phase order is fixed: the spawn phase completes before any bot acts, and
/// cleanup runs after the action phase. A bot spawned this tick is never
/// retroactively added to the action phase; it acts once the engine lists it
/// alive.
pub async fn tick(
    session: &mut BotSession,
    view: &TickView,
    cfg: &HarnessConfig,
) -> Result<TickReply, HarnessError> {
    let spawns = run_spawn_phase(
        view,
        session.policy.as_mut(),
        &mut session.allocator,
        &mut session.registry,
    )?;

    let actions = run_action_phase(view, &mut session.registry, cfg).await?;

    // This tick's spawns cannot be in the alive set yet (the view predates the
    // reply), so they survive this sweep; a spawn the engine rejects is swept
    // next tick, when it is neither alive nor fresh.
    let mut survivors: BTreeSet<u64> = view.bots.keys().copied().collect();
    survivors.extend(spawns.keys().copied());
    for bot_id in session.registry.retain_alive(&survivors) {
        tracing::debug!(bot_id, "lifecycle.retired");
    }

    Ok(TickReply {
        tick: view.tick,
        spawns,
        actions,
    })
}
