//! Action phase: every alive bot gets one decision call behind a fault
//! boundary.
//!
//! One bot's failure (an error from its decision future, or the watchdog
//! firing) is logged to the diagnostics channel and degrades to "no action"
//! for that bot alone. It never blocks another bot, the spawn phase, or tick
//! completion. Only a missing registry entry aborts the tick: that means
//! state was lost and nothing downstream can be trusted.

use std::collections::BTreeMap;

use anyhow::anyhow;

use crate::error::HarnessError;
use crate::harness::HarnessConfig;
use crate::registry::LifecycleRegistry;
use crate::strategy::BotContext;
use crate::view::TickView;
use crate::wire::Action;

/// Runs every alive bot's strategy against the tick, in ascending id order.
/// Returns the reply's action map; bots without an action have no key.
pub async fn run_action_phase(
    view: &TickView,
    registry: &mut LifecycleRegistry,
    cfg: &HarnessConfig,
) -> Result<BTreeMap<u64, Action>, HarnessError> {
    let mut actions = BTreeMap::new();

    for (&bot_id, bot) in &view.bots {
        let strategy = registry
            .get_mut(bot_id)
            .ok_or(HarnessError::MissingStrategy(bot_id))?;
        let ctx = BotContext { view, bot };

        let decision = match cfg.decision_timeout {
            Some(limit) => match tokio::time::timeout(limit, strategy.act(ctx)).await {
                Ok(decision) => decision,
                Err(_) => Err(anyhow!("decision exceeded the {limit:?} watchdog")),
            },
            None => strategy.act(ctx).await,
        };

        match decision {
            Ok(Some(action)) => {
                actions.insert(bot_id, action);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::error!(bot_id, "dispatch.bot.error {err:#}");
            }
        }
    }

    Ok(actions)
}
