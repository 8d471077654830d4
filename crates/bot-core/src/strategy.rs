//! The decision seam: one fixed trait, a closed set of kinds behind it.
//!
//! A [`Strategy`] value is bound to exactly one bot id for that bot's whole
//! lifetime and owns whatever cross-tick state it wants. Each tick it gets a
//! fresh [`BotContext`] and returns at most one [`Action`]; returning an error
//! is a per-bot fault the dispatcher absorbs, never a process failure.
//!
//! [`StrategyKind`] is the validation surface for spawn policies: a spec names
//! a kind by tag, and only tags in this set construct. Conformance to the
//! decision interface holds by construction (every variant's `build` returns
//! a `Strategy`) rather than by any runtime type inspection.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::view::{Ability, BotRecord, PoisonStatus, TickView};
use crate::wire::{Action, Direction};

/// Per-tick execution context for one bot: the tick's view plus this bot's
/// own record. Rebuilt for every decision call, never stored.
#[derive(Debug, Clone, Copy)]
pub struct BotContext<'a> {
    pub view: &'a TickView,
    pub bot: &'a BotRecord,
}

pub type DecisionFuture<'a> =
    Pin<Box<dyn Future<Output = anyhow::Result<Option<Action>>> + Send + 'a>>;

pub trait Strategy: fmt::Debug + Send {
    fn kind(&self) -> &'static str;

    /// Decide this bot's action for the tick. `Ok(None)` means "no action".
    fn act<'a>(&'a mut self, ctx: BotContext<'a>) -> DecisionFuture<'a>;
}

/// The closed set of strategy kinds a spawn policy may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrategyKind {
    Harvester,
    Scout,
    Sentinel,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Harvester,
        StrategyKind::Scout,
        StrategyKind::Sentinel,
    ];

    pub fn from_tag(tag: &str) -> Option<StrategyKind> {
        match tag {
            "harvester" => Some(StrategyKind::Harvester),
            "scout" => Some(StrategyKind::Scout),
            "sentinel" => Some(StrategyKind::Sentinel),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            StrategyKind::Harvester => "harvester",
            StrategyKind::Scout => "scout",
            StrategyKind::Sentinel => "sentinel",
        }
    }

    /// Abilities this kind declares for every bot it controls.
    pub fn abilities(self) -> &'static [Ability] {
        match self {
            StrategyKind::Harvester => &[],
            StrategyKind::Scout => &[Ability::Scout],
            StrategyKind::Sentinel => &[Ability::Shield],
        }
    }

    pub fn build(self) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Harvester => Box::new(HarvesterStrategy),
            StrategyKind::Scout => Box::new(ScoutStrategy::default()),
            StrategyKind::Sentinel => Box::new(SentinelStrategy),
        }
    }
}

/// Walks toward the nearest algae not known to be poisoned and harvests once
/// adjacent. Holds still when nothing edible is visible.
#[derive(Debug, Default)]
pub struct HarvesterStrategy;

impl Strategy for HarvesterStrategy {
    fn kind(&self) -> &'static str {
        StrategyKind::Harvester.tag()
    }

    fn act<'a>(&'a mut self, ctx: BotContext<'a>) -> DecisionFuture<'a> {
        Box::pin(async move {
            let here = ctx.bot.location;
            let target = ctx
                .view
                .visible_entities
                .algae
                .iter()
                .filter(|a| a.is_poison != PoisonStatus::Poisoned)
                .min_by_key(|a| a.location.manhattan(here));
            let Some(target) = target else {
                return Ok(None);
            };

            // Harvest acts on an adjacent tile; standing on the tile itself
            // gives no direction to point at.
            let action = match Direction::toward(here, target.location) {
                Some(dir) if here.manhattan(target.location) == 1 => Some(Action::harvest(dir)),
                Some(dir) => Some(Action::step(dir)),
                None => None,
            };
            Ok(action)
        })
    }
}

/// Seeks out algae whose poison status is still unknown; when everything in
/// sight is classified, sweeps east-west across the board to uncover more.
#[derive(Debug)]
pub struct ScoutStrategy {
    sweep_east: bool,
}

impl Default for ScoutStrategy {
    fn default() -> Self {
        Self { sweep_east: true }
    }
}

impl Strategy for ScoutStrategy {
    fn kind(&self) -> &'static str {
        StrategyKind::Scout.tag()
    }

    fn act<'a>(&'a mut self, ctx: BotContext<'a>) -> DecisionFuture<'a> {
        Box::pin(async move {
            let here = ctx.bot.location;
            let unknown = ctx
                .view
                .visible_entities
                .algae
                .iter()
                .filter(|a| a.is_poison == PoisonStatus::Unknown)
                .min_by_key(|a| a.location.manhattan(here));
            if let Some(target) = unknown {
                return Ok(Direction::toward(here, target.location).map(Action::step));
            }

            // Sweep pattern; turn around at the board edges.
            let east_edge = here.x + 1 >= ctx.view.width as i32;
            let west_edge = here.x <= 0;
            if self.sweep_east && east_edge {
                self.sweep_east = false;
            } else if !self.sweep_east && west_edge {
                self.sweep_east = true;
            }
            let dir = if self.sweep_east {
                Direction::East
            } else {
                Direction::West
            };
            Ok(Some(Action::step(dir)))
        })
    }
}

/// Closes on the nearest visible enemy and self-destructs when in range.
/// Holds position while nothing hostile is in sight.
#[derive(Debug, Default)]
pub struct SentinelStrategy;

impl Strategy for SentinelStrategy {
    fn kind(&self) -> &'static str {
        StrategyKind::Sentinel.tag()
    }

    fn act<'a>(&'a mut self, ctx: BotContext<'a>) -> DecisionFuture<'a> {
        Box::pin(async move {
            let here = ctx.bot.location;
            let target = ctx
                .view
                .visible_entities
                .enemies
                .iter()
                .min_by_key(|e| e.location.manhattan(here));
            let Some(target) = target else {
                return Ok(None);
            };

            if here.manhattan(target.location) <= 1 {
                return Ok(Some(Action::self_destruct()));
            }
            Ok(Direction::toward(here, target.location).map(Action::step))
        })
    }
}
