//! Scenario selection logic
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use std::collections::HashSet;

use crate::catalog::ScenarioCatalog;
use crate::context::ScenarioContext;
use crate::data::{ScenarioTag, Scenario};
use crate::numbers::{floor_f64_to_usize, usize_to_f64};
use crate::seed::SeededRandom;

const UNIT_SCALE: f64 = 4_294_967_296.0;

/// Scale a value in `[0, 1)` to an index in `[0, len)`.
#[must_use]
pub fn unit_to_index(unit: f64, len: usize) -> usize {
    floor_f64_to_usize(unit * usize_to_f64(len)).min(len.saturating_sub(1))
}

fn pick_uniform<'a, R>(items: &[&'a Scenario], rng: &mut R) -> Option<&'a Scenario>
where
    R: RngCore + ?Sized,
{
    if items.is_empty() {
        return None;
    }
    let unit = f64::from(rng.next_u32()) / UNIT_SCALE;
    items.get(unit_to_index(unit, items.len())).copied()
}

/// Pick one scenario for the context's tier, preferring scenarios that share
/// no tag with the recently seen ones.
///
/// Returns `None` only when the tier has no scenarios at all; when every
/// scenario overlaps the recent tags the whole tier is used instead.
pub fn select_scenario<'a, R>(
    context: &ScenarioContext,
    catalog: &'a ScenarioCatalog,
    rng: &mut R,
) -> Option<&'a Scenario>
where
    R: RngCore + ?Sized,
{
    let pool = catalog.tier(context.difficulty_level);
    if pool.is_empty() {
        log::debug!(
            "Scenario selection | tier:{} empty pool",
            context.difficulty_level
        );
        return None;
    }

    let avoid: HashSet<ScenarioTag> = context.recent_choices.iter().copied().collect();
    let preferred: Vec<&Scenario> = pool
        .iter()
        .filter(|scenario| !scenario.has_any_tag(&avoid))
        .collect();

    let fallback = preferred.is_empty();
    let candidates: Vec<&Scenario> = if fallback {
        pool.iter().collect()
    } else {
        preferred
    };

    let picked = pick_uniform(&candidates, rng);
    if let Some(scenario) = picked {
        log::debug!(
            "Scenario selection | turn:{} tier:{} candidates:{} fallback:{} picked:{}",
            context.turn,
            context.difficulty_level,
            candidates.len(),
            fallback,
            scenario.id
        );
    }
    picked
}

/// Random source used for scenario draws.
#[derive(Debug, Clone)]
pub enum SelectionRng {
    /// Reproducible draws keyed by a seed string.
    Seeded(SeededRandom),
    /// Unseeded draws from OS entropy.
    Entropy(SmallRng),
}

impl SelectionRng {
    #[must_use]
    pub fn seeded(seed: &str) -> Self {
        Self::Seeded(SeededRandom::new(seed))
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self::Entropy(SmallRng::from_entropy())
    }

    /// Seeded when a seed is present, entropy-backed otherwise.
    #[must_use]
    pub fn from_seed(seed: Option<&str>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }

    #[must_use]
    pub const fn is_seeded(&self) -> bool {
        matches!(self, Self::Seeded(_))
    }
}

impl RngCore for SelectionRng {
    fn next_u32(&mut self) -> u32 {
        match self {
            Self::Seeded(rng) => rng.next_u32(),
            Self::Entropy(rng) => rng.next_u32(),
        }
    }

    fn next_u64(&mut self) -> u64 {
        match self {
            Self::Seeded(rng) => rng.next_u64(),
            Self::Entropy(rng) => rng.next_u64(),
        }
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        match self {
            Self::Seeded(rng) => rng.fill_bytes(dest),
            Self::Entropy(rng) => rng.fill_bytes(dest),
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        match self {
            Self::Seeded(rng) => rng.try_fill_bytes(dest),
            Self::Entropy(rng) => rng.try_fill_bytes(dest),
        }
    }
}

/// One-shot generator for a single context: keyed by seed and turn when the
/// context carries a seed, entropy-backed otherwise.
#[must_use]
pub fn rng_for_context(context: &ScenarioContext) -> SelectionRng {
    match context.random_seed.as_deref() {
        Some(seed) => SelectionRng::Seeded(SeededRandom::for_turn(seed, context.turn)),
        None => SelectionRng::from_entropy(),
    }
}

/// Select using a generator derived from the context alone.
#[must_use]
pub fn select_for_context<'a>(
    context: &ScenarioContext,
    catalog: &'a ScenarioCatalog,
) -> Option<&'a Scenario> {
    let mut rng = rng_for_context(context);
    select_scenario(context, catalog, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Choice, CreatedBy, Difficulty};
    use crate::resources::{ResourceEffects, Resources};
    use rand::rngs::mock::StepRng;
    use smallvec::SmallVec;

    fn scenario(id: &str, difficulty: Difficulty, tags: &[ScenarioTag]) -> Scenario {
        Scenario {
            id: id.to_string(),
            title: format!("Scenario {id}"),
            text: "Something happens at the truck today.".to_string(),
            choices: vec![
                Choice {
                    id: "left".to_string(),
                    label: "Go left".to_string(),
                    effects: ResourceEffects::new(1, 0, -1),
                    risk_level: None,
                },
                Choice {
                    id: "right".to_string(),
                    label: "Go right".to_string(),
                    effects: ResourceEffects::new(-1, 1, 0),
                    risk_level: None,
                },
            ],
            tags: SmallVec::from_slice(tags),
            difficulty,
            created_by: CreatedBy::Static,
            created_at: None,
        }
    }

    fn context(difficulty: Difficulty, recent: &[ScenarioTag]) -> ScenarioContext {
        ScenarioContext {
            current_resources: Resources::starting(),
            turn: 1,
            difficulty_level: difficulty,
            recent_choices: recent.to_vec(),
            available_tags: ScenarioTag::ALL.to_vec(),
            random_seed: None,
        }
    }

    fn catalog() -> ScenarioCatalog {
        ScenarioCatalog::from_tiers(
            vec![
                scenario("rush", Difficulty::Early, &[ScenarioTag::CustomerService]),
                scenario("supplier", Difficulty::Early, &[ScenarioTag::SupplyManagement]),
                scenario(
                    "fryer",
                    Difficulty::Early,
                    &[ScenarioTag::Equipment, ScenarioTag::Crisis],
                ),
            ],
            vec![scenario("only-mid", Difficulty::Mid, &[ScenarioTag::Permits])],
            Vec::new(),
        )
    }

    #[test]
    fn empty_tier_yields_none() {
        let catalog = catalog();
        let mut rng = StepRng::new(0, 1);
        assert!(select_scenario(&context(Difficulty::Late, &[]), &catalog, &mut rng).is_none());
    }

    #[test]
    fn recent_tags_are_avoided() {
        let catalog = catalog();
        let recent = [ScenarioTag::CustomerService, ScenarioTag::Crisis];
        let ctx = context(Difficulty::Early, &recent);
        let mut rng = SeededRandom::new("avoid");
        for _ in 0..50 {
            let picked = select_scenario(&ctx, &catalog, &mut rng).unwrap();
            assert_eq!(picked.id, "supplier");
        }
    }

    #[test]
    fn falls_back_to_whole_tier_when_everything_is_recent() {
        let catalog = catalog();
        let ctx = context(Difficulty::Mid, &[ScenarioTag::Permits]);
        let mut rng = SeededRandom::new("fallback");
        let picked = select_scenario(&ctx, &catalog, &mut rng).unwrap();
        assert_eq!(picked.id, "only-mid");
    }

    #[test]
    fn untagged_scenarios_are_always_preferred() {
        let catalog = ScenarioCatalog::from_tiers(
            vec![
                scenario("untagged", Difficulty::Early, &[]),
                scenario("tagged", Difficulty::Early, &[ScenarioTag::Weather]),
            ],
            Vec::new(),
            Vec::new(),
        );
        let ctx = context(Difficulty::Early, &[ScenarioTag::Weather]);
        let mut rng = SeededRandom::new("untagged");
        for _ in 0..20 {
            assert_eq!(
                select_scenario(&ctx, &catalog, &mut rng).map(|s| s.id.as_str()),
                Some("untagged")
            );
        }
    }

    #[test]
    fn seeded_selection_is_reproducible() {
        let catalog = catalog();
        let ctx = context(Difficulty::Early, &[]);
        let mut a = SelectionRng::seeded("replay");
        let mut b = SelectionRng::seeded("replay");
        let ids_a: Vec<&str> = (0..10)
            .filter_map(|_| select_scenario(&ctx, &catalog, &mut a))
            .map(|s| s.id.as_str())
            .collect();
        let ids_b: Vec<&str> = (0..10)
            .filter_map(|_| select_scenario(&ctx, &catalog, &mut b))
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids_a, ids_b);
        assert!(a.is_seeded());
    }

    #[test]
    fn context_seed_keys_one_shot_selection() {
        let catalog = catalog();
        let mut ctx = context(Difficulty::Early, &[]);
        ctx.random_seed = Some("context-seed".to_string());
        let first = select_for_context(&ctx, &catalog).map(|s| s.id.clone());
        let second = select_for_context(&ctx, &catalog).map(|s| s.id.clone());
        assert_eq!(first, second);
        assert!(rng_for_context(&ctx).is_seeded());
    }

    #[test]
    fn unseeded_selection_still_returns_from_pool() {
        let catalog = catalog();
        let ctx = context(Difficulty::Early, &[]);
        let picked = select_for_context(&ctx, &catalog).unwrap();
        assert!(catalog.tier(Difficulty::Early).contains(picked));
    }

    #[test]
    fn unit_scaling_stays_in_range() {
        assert_eq!(unit_to_index(0.0, 3), 0);
        assert_eq!(unit_to_index(0.999_999, 3), 2);
        assert_eq!(unit_to_index(1.0, 3), 2);
        assert_eq!(unit_to_index(0.5, 0), 0);
    }
}
