//! Spawn phase: user policy in, registered strategies and spawn requests out.
//!
//! Runs once per tick, before any bot acts. Requests are processed in the
//! order the policy yielded them; each one is validated against the closed
//! strategy set, priced into a capability set, gated on the tick-start
//! capacity snapshot, and finally given an id and a registry entry.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::HarnessError;
use crate::registry::LifecycleRegistry;
use crate::strategy::StrategyKind;
use crate::view::{Ability, Point, TickView};
use crate::wire::SpawnRequest;

/// One spawn request as the user policy expresses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnSpec {
    /// Tag of the strategy kind to bind; must name a member of the closed set.
    pub strategy: String,
    pub location: Point,
    /// Abilities beyond what the strategy kind already declares.
    pub extra_abilities: Vec<Ability>,
}

impl SpawnSpec {
    pub fn new(strategy: impl Into<String>, location: Point) -> SpawnSpec {
        SpawnSpec {
            strategy: strategy.into(),
            location,
            extra_abilities: Vec::new(),
        }
    }

    pub fn with_ability(mut self, ability: Ability) -> SpawnSpec {
        self.extra_abilities.push(ability);
        self
    }
}

/// User-supplied spawn policy: zero or more specs per tick, in order.
pub trait SpawnPolicy: fmt::Debug + Send {
    fn plan(&mut self, view: &TickView) -> Vec<SpawnSpec>;
}

/// Hands out bot ids for the process's lifetime.
///
/// Seeded exactly once, from the first consumed view's `bot_id_seed` (the
/// engine reserves a disjoint range per submission), then strictly
/// incrementing. An id is therefore never reused, across ticks or within one.
#[derive(Debug, Default)]
pub struct BotIdAllocator {
    next: Option<u64>,
}

impl BotIdAllocator {
    pub fn new() -> BotIdAllocator {
        BotIdAllocator::default()
    }

    pub fn allocate(&mut self, view: &TickView) -> u64 {
        let next = self.next.get_or_insert(view.bot_id_seed);
        let id = *next;
        *next += 1;
        id
    }
}

/// Declared abilities unioned with the spec's extras, duplicates removed,
/// first-seen order kept.
fn merge_abilities(declared: &[Ability], extra: &[Ability]) -> Vec<Ability> {
    let mut out: Vec<Ability> = Vec::with_capacity(declared.len() + extra.len());
    for &ability in declared.iter().chain(extra) {
        if !out.contains(&ability) {
            out.push(ability);
        }
    }
    out
}

/// Runs the user policy and turns its specs into spawn requests plus registry
/// entries. Returns the request map the reply will carry.
pub fn run_spawn_phase(
    view: &TickView,
    policy: &mut dyn SpawnPolicy,
    allocator: &mut BotIdAllocator,
    registry: &mut LifecycleRegistry,
) -> Result<BTreeMap<u64, SpawnRequest>, HarnessError> {
    let mut spawns = BTreeMap::new();

    for spec in policy.plan(view) {
        let kind = StrategyKind::from_tag(&spec.strategy)
            .ok_or_else(|| HarnessError::UnknownStrategy(spec.strategy.clone()))?;

        let abilities = merge_abilities(kind.abilities(), &spec.extra_abilities);

        // Snapshot-only gate: requests queued earlier in this same batch are
        // not counted. The engine stays the capacity authority either way.
        if view.at_capacity() {
            tracing::debug!(strategy = kind.tag(), "spawn.skip capacity reached");
            continue;
        }

        let bot_id = allocator.allocate(view);
        registry.register(bot_id, kind.build());
        spawns.insert(
            bot_id,
            SpawnRequest {
                abilities,
                location: spec.location,
            },
        );
    }

    Ok(spawns)
}

/// Default submission policy: keep a small harvester line running, then add a
/// single scout once the economy can fund upgrades.
#[derive(Debug, Clone)]
pub struct EconomyPolicy {
    pub target_harvesters: usize,
    pub scout_scrap_floor: i64,
}

impl Default for EconomyPolicy {
    fn default() -> Self {
        Self {
            target_harvesters: 3,
            scout_scrap_floor: 30,
        }
    }
}

impl SpawnPolicy for EconomyPolicy {
    fn plan(&mut self, view: &TickView) -> Vec<SpawnSpec> {
        let mut specs = Vec::new();
        let mine = view.bots.len();

        if mine < self.target_harvesters {
            // Stagger spawn rows so rejected-for-occupancy requests don't pile
            // onto one tile turn after turn.
            let row = (view.turn() % u64::from(view.height.max(1))) as i32;
            specs.push(SpawnSpec::new(
                StrategyKind::Harvester.tag(),
                Point { x: 0, y: row },
            ));
        }

        let have_scout = view
            .bots
            .values()
            .any(|b| b.abilities.contains(&Ability::Scout));
        if !have_scout && mine >= self.target_harvesters && view.scraps >= self.scout_scrap_floor {
            specs.push(SpawnSpec::new(StrategyKind::Scout.tag(), Point { x: 0, y: 0 }));
        }

        specs
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::view::{BotRecord, PermanentEntities, VisibleEntities};

    #[derive(Debug)]
    struct ScriptedPolicy {
        batches: VecDeque<Vec<SpawnSpec>>,
    }

    impl ScriptedPolicy {
        fn one_batch(specs: Vec<SpawnSpec>) -> ScriptedPolicy {
            ScriptedPolicy {
                batches: VecDeque::from([specs]),
            }
        }
    }

    impl SpawnPolicy for ScriptedPolicy {
        fn plan(&mut self, _view: &TickView) -> Vec<SpawnSpec> {
            self.batches.pop_front().unwrap_or_default()
        }
    }

    fn base_view(tick: u64) -> TickView {
        TickView {
            tick,
            scraps: 40,
            algae: 0,
            bot_id_seed: 100,
            bot_count: 0,
            max_bots: 8,
            width: 20,
            height: 20,
            bots: BTreeMap::new(),
            visible_entities: VisibleEntities {
                enemies: vec![],
                algae: vec![],
            },
            permanent_entities: PermanentEntities {
                banks: BTreeMap::new(),
                energy_pads: BTreeMap::new(),
                walls: vec![],
            },
        }
    }

    fn bot_at(id: u64, x: i32, y: i32) -> BotRecord {
        BotRecord {
            id,
            location: Point { x, y },
            energy: 50.0,
            scraps: 0,
            abilities: vec![],
            algae_held: 0,
            traversal_cost: 2.0,
            status: "IDLE".to_string(),
            vision_radius: 4,
        }
    }

    fn spawn_at(strategy: &str, y: i32) -> SpawnSpec {
        SpawnSpec::new(strategy, Point { x: 0, y })
    }

    #[test]
    fn unknown_strategy_tag_is_fatal() {
        let view = base_view(1);
        let mut policy = ScriptedPolicy::one_batch(vec![spawn_at("warlock", 0)]);
        let mut allocator = BotIdAllocator::new();
        let mut registry = LifecycleRegistry::new();

        let err = run_spawn_phase(&view, &mut policy, &mut allocator, &mut registry).unwrap_err();
        assert!(matches!(err, HarnessError::UnknownStrategy(name) if name == "warlock"));
        assert!(registry.is_empty());
    }

    #[test]
    fn abilities_union_declared_and_extra_in_first_seen_order() {
        let view = base_view(1);
        let spec = spawn_at("scout", 0)
            .with_ability(Ability::Shield)
            .with_ability(Ability::Scout);
        let mut policy = ScriptedPolicy::one_batch(vec![spec]);
        let mut allocator = BotIdAllocator::new();
        let mut registry = LifecycleRegistry::new();

        let spawns =
            run_spawn_phase(&view, &mut policy, &mut allocator, &mut registry).unwrap();
        let request = spawns.get(&100).unwrap();
        assert_eq!(request.abilities, vec![Ability::Scout, Ability::Shield]);
    }

    #[test]
    fn requests_at_capacity_are_dropped_silently() {
        let mut view = base_view(1);
        view.bot_count = 2;
        view.max_bots = 2;
        let mut policy = ScriptedPolicy::one_batch(vec![spawn_at("harvester", 0)]);
        let mut allocator = BotIdAllocator::new();
        let mut registry = LifecycleRegistry::new();

        let spawns =
            run_spawn_phase(&view, &mut policy, &mut allocator, &mut registry).unwrap();
        assert!(spawns.is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn capacity_gate_uses_the_snapshot_not_a_running_count() {
        let mut view = base_view(1);
        view.bot_count = 1;
        view.max_bots = 2;
        let mut policy = ScriptedPolicy::one_batch(vec![
            spawn_at("harvester", 0),
            spawn_at("harvester", 1),
        ]);
        let mut allocator = BotIdAllocator::new();
        let mut registry = LifecycleRegistry::new();

        let spawns =
            run_spawn_phase(&view, &mut policy, &mut allocator, &mut registry).unwrap();
        // Both requests compare against the same snapshot and both pass.
        assert_eq!(spawns.keys().copied().collect::<Vec<_>>(), vec![100, 101]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn validation_precedes_the_capacity_gate() {
        let mut view = base_view(1);
        view.bot_count = 2;
        view.max_bots = 2;
        let mut policy = ScriptedPolicy::one_batch(vec![spawn_at("warlock", 0)]);
        let mut allocator = BotIdAllocator::new();
        let mut registry = LifecycleRegistry::new();

        // A bogus kind is a broken submission even when the request would have
        // been dropped for capacity anyway.
        assert!(run_spawn_phase(&view, &mut policy, &mut allocator, &mut registry).is_err());
    }

    #[test]
    fn allocator_seeds_once_then_increments_across_ticks() {
        let mut allocator = BotIdAllocator::new();
        let first = base_view(1);
        assert_eq!(allocator.allocate(&first), 100);
        assert_eq!(allocator.allocate(&first), 101);

        // A later view cannot re-seed the counter.
        let mut second = base_view(3);
        second.bot_id_seed = 500;
        assert_eq!(allocator.allocate(&second), 102);
    }

    #[test]
    fn spawned_ids_get_a_registry_entry_bound_to_the_kind() {
        let view = base_view(1);
        let mut policy =
            ScriptedPolicy::one_batch(vec![spawn_at("sentinel", 0), spawn_at("harvester", 1)]);
        let mut allocator = BotIdAllocator::new();
        let mut registry = LifecycleRegistry::new();

        run_spawn_phase(&view, &mut policy, &mut allocator, &mut registry).unwrap();
        assert_eq!(registry.get_mut(100).unwrap().kind(), "sentinel");
        assert_eq!(registry.get_mut(101).unwrap().kind(), "harvester");
    }

    #[test]
    fn economy_policy_rebuilds_the_harvester_line() {
        let mut policy = EconomyPolicy::default();
        let view = base_view(2);

        let specs = policy.plan(&view);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].strategy, "harvester");
        assert_eq!(specs[0].location.x, 0);
    }

    #[test]
    fn economy_policy_adds_one_scout_when_funded() {
        let mut policy = EconomyPolicy {
            target_harvesters: 1,
            scout_scrap_floor: 30,
        };
        let mut view = base_view(2);
        view.bots.insert(100, bot_at(100, 0, 0));
        view.scraps = 35;

        let specs = policy.plan(&view);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].strategy, "scout");

        // Once a scout is alive the policy stops asking for more.
        let mut scout = bot_at(101, 0, 1);
        scout.abilities.push(Ability::Scout);
        view.bots.insert(101, scout);
        assert!(policy.plan(&view).is_empty());
    }
}
