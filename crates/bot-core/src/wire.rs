//! Outbound wire types: the tick reply and everything serialized into it.
//!
//! Contract per tick:
//! - exactly one reply object `{ "tick", "spawns", "actions" }` per input line
//! - `spawns`/`actions` are objects keyed by decimal bot id
//! - a bot that produced no action has no key in `actions` (no null fillers)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::view::{Ability, Point};

/// Handshake sentinel, emitted as a JSON string line before any input is read.
pub const READY_SENTINEL: &str = "__READY_V1__";

/// The sentinel in its on-wire form (the engine trims and compares the line).
pub fn ready_line() -> String {
    format!("\"{READY_SENTINEL}\"")
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// One greedy step from `from` toward `to`, reducing the dominant axis
    /// first. `None` when the points coincide.
    pub fn toward(from: Point, to: Point) -> Option<Direction> {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if dx == 0 && dy == 0 {
            return None;
        }
        Some(if dx.abs() >= dy.abs() {
            if dx > 0 {
                Direction::East
            } else {
                Direction::West
            }
        } else if dy > 0 {
            Direction::North
        } else {
            Direction::South
        })
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    Move,
    Harvest,
    Poison,
    #[serde(rename = "SELFDESTRUCT")]
    SelfDestruct,
    Lockpick,
}

/// One bot's decision for one tick.
///
/// `direction` doubles as movement: the engine steps the bot first when a
/// direction is present, then applies the action kind. Directionless kinds
/// omit the field entirely.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct Action {
    #[serde(rename = "action")]
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl Action {
    pub fn step(direction: Direction) -> Action {
        Action {
            kind: ActionKind::Move,
            direction: Some(direction),
        }
    }

    pub fn harvest(direction: Direction) -> Action {
        Action {
            kind: ActionKind::Harvest,
            direction: Some(direction),
        }
    }

    pub fn poison(direction: Direction) -> Action {
        Action {
            kind: ActionKind::Poison,
            direction: Some(direction),
        }
    }

    pub fn self_destruct() -> Action {
        Action {
            kind: ActionKind::SelfDestruct,
            direction: None,
        }
    }

    pub fn lockpick() -> Action {
        Action {
            kind: ActionKind::Lockpick,
            direction: None,
        }
    }
}

/// Spawn request as the engine consumes it: the full capability set (declared
/// by the strategy kind plus any extras, first-seen order) and the requested
/// tile.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SpawnRequest {
    pub abilities: Vec<Ability>,
    pub location: Point,
}

/// The assembled reply for one tick. Serialized as a single line.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TickReply {
    pub tick: u64,
    pub spawns: BTreeMap<u64, SpawnRequest>,
    pub actions: BTreeMap<u64, Action>,
}
