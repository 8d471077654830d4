//! Decoded per-tick game state.
//!
//! One input line from the engine decodes into one [`TickView`]. The view is
//! read-only for the rest of the tick and dropped when the reply has been
//! written. Every field is mandatory: a view the engine sent with a missing
//! field is a protocol violation, not something to paper over with defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// Grid coordinate. The engine's origin is the south-west corner; NORTH is +y.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn manhattan(self, other: Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Upgrade tags a strategy type can declare for its bots. The engine prices
/// each tag at spawn time and applies its effect for the bot's lifetime.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ability {
    Scout,
    Shield,
    Speedboost,
}

/// What a submission knows about an algae tile. Only scouted tiles resolve to
/// a definite answer; everything else stays `Unknown`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub enum PoisonStatus {
    #[serde(rename = "TRUE")]
    Poisoned,
    #[serde(rename = "FALSE")]
    Clean,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

/// Engine-reported fact about one of this submission's bots. Re-derived from
/// the wire every tick; never mutated in place.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct BotRecord {
    pub id: u64,
    pub location: Point,
    pub energy: f64,
    pub scraps: i64,
    pub abilities: Vec<Ability>,
    pub algae_held: i64,
    pub traversal_cost: f64,
    /// Kept raw; the engine's status vocabulary is not part of this contract.
    pub status: String,
    pub vision_radius: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct EnemyRecord {
    pub id: u64,
    pub location: Point,
    pub scraps: i64,
    pub abilities: Vec<Ability>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AlgaeRecord {
    pub location: Point,
    pub is_poison: PoisonStatus,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct BankRecord {
    pub id: u64,
    pub location: Point,
    #[serde(rename = "deposit_occuring")]
    pub deposit_occurring: bool,
    pub deposit_amount: i64,
    pub is_deposit_owner: bool,
    pub is_bank_owner: bool,
    pub deposit_ticks_left: i64,
    #[serde(rename = "lockpick_occuring")]
    pub lockpick_occurring: bool,
    pub lockpick_ticks_left: i64,
    #[serde(rename = "lockpick_botid")]
    pub lockpick_bot_id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PadRecord {
    pub id: u64,
    pub location: Point,
    pub available: bool,
    pub ticks_left: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct VisibleEntities {
    pub enemies: Vec<EnemyRecord>,
    pub algae: Vec<AlgaeRecord>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PermanentEntities {
    pub banks: BTreeMap<u64, BankRecord>,
    pub energy_pads: BTreeMap<u64, PadRecord>,
    pub walls: Vec<Point>,
}

/// Immutable snapshot of everything this submission is allowed to see for one
/// tick.
///
/// `bots` holds only this submission's bots; enemy bots appear under
/// `visible_entities`. Map-shaped collections iterate in ascending id order,
/// list-shaped ones preserve wire order.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TickView {
    pub tick: u64,
    pub scraps: i64,
    pub algae: i64,
    /// First id of the disjoint range the engine reserved for this submission.
    pub bot_id_seed: u64,
    /// Board-wide bot count at the instant the view was serialized.
    pub bot_count: u32,
    pub max_bots: u32,
    pub width: u32,
    pub height: u32,
    pub bots: BTreeMap<u64, BotRecord>,
    pub visible_entities: VisibleEntities,
    pub permanent_entities: PermanentEntities,
}

impl TickView {
    /// This submission's contiguous turn number.
    ///
    /// The engine alternates the two submissions on consecutive engine ticks,
    /// so one side sees ticks 1,3,5,… and the other 2,4,6,…. Policy code that
    /// wants "every Nth turn" logic should use this instead of the raw tick.
    pub fn turn(&self) -> u64 {
        self.tick.div_ceil(2)
    }

    /// True when the board is already at the spawn cap in this snapshot.
    pub fn at_capacity(&self) -> bool {
        self.bot_count >= self.max_bots
    }
}

/// Decodes one input line into a [`TickView`].
///
/// Total over well-formed views; any malformed or incomplete line is a fatal
/// protocol error for the caller to surface, never a partial view.
pub fn decode_view(line: &str) -> Result<TickView, HarnessError> {
    serde_json::from_str(line).map_err(HarnessError::MalformedView)
}
