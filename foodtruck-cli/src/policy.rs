use std::fmt;

use clap::ValueEnum;
use foodtruck_game::{Choice, GameState, RiskLevel, Scenario};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

/// Decision returned by a [`PlayerPolicy`]. `choice_index` is 0-based.
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub choice_index: usize,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub fn new(choice_index: usize, rationale: Option<String>) -> Self {
        Self {
            choice_index,
            rationale,
        }
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Select a choice for the scenario on offer.
    fn pick_choice(&mut self, state: &GameState, scenario: &Scenario) -> PolicyDecision;
}

/// Built-in gameplay strategies for simulated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameplayStrategy {
    Cautious,
    Greedy,
    Balanced,
    Random,
}

impl GameplayStrategy {
    pub const ALL: [Self; 4] = [Self::Cautious, Self::Greedy, Self::Balanced, Self::Random];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GameplayStrategy::Cautious => "Cautious",
            GameplayStrategy::Greedy => "Greedy",
            GameplayStrategy::Balanced => "Balanced",
            GameplayStrategy::Random => "Random",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            GameplayStrategy::Cautious => "avoids losses, prefers rest and low-risk options",
            GameplayStrategy::Greedy => "chases money first, reputation second",
            GameplayStrategy::Balanced => "keeps the weakest resource as high as possible",
            GameplayStrategy::Random => "uniform pick from a seeded ChaCha20 stream",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            GameplayStrategy::Cautious => Box::new(CautiousPolicy),
            GameplayStrategy::Greedy => Box::new(GreedyPolicy),
            GameplayStrategy::Balanced => Box::new(BalancedPolicy),
            GameplayStrategy::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct CautiousPolicy;
struct GreedyPolicy;
struct BalancedPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerPolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "Cautious"
    }

    fn pick_choice(&mut self, state: &GameState, scenario: &Scenario) -> PolicyDecision {
        let (idx, risk) = scenario
            .choices
            .iter()
            .enumerate()
            .map(|(idx, choice)| (idx, cautious_risk(state, choice)))
            .min_by_key(|(_, risk)| *risk)
            .unwrap_or((0, 0));

        PolicyDecision::new(idx, Some(format!("risk {risk}")))
    }
}

impl PlayerPolicy for GreedyPolicy {
    fn name(&self) -> &'static str {
        "Greedy"
    }

    fn pick_choice(&mut self, _state: &GameState, scenario: &Scenario) -> PolicyDecision {
        let (idx, reward) = scenario
            .choices
            .iter()
            .enumerate()
            .map(|(idx, choice)| (idx, greedy_reward(choice)))
            .max_by_key(|(_, reward)| *reward)
            .unwrap_or((0, 0));

        PolicyDecision::new(idx, Some(format!("reward {reward}")))
    }
}

impl PlayerPolicy for BalancedPolicy {
    fn name(&self) -> &'static str {
        "Balanced"
    }

    fn pick_choice(&mut self, state: &GameState, scenario: &Scenario) -> PolicyDecision {
        let (idx, floor) = scenario
            .choices
            .iter()
            .enumerate()
            .map(|(idx, choice)| (idx, projected_floor(state, choice)))
            .max_by_key(|(_, floor)| *floor)
            .unwrap_or((0, 0));

        PolicyDecision::new(idx, Some(format!("floor {floor}")))
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn pick_choice(&mut self, _state: &GameState, scenario: &Scenario) -> PolicyDecision {
        if scenario.choices.is_empty() {
            return PolicyDecision::new(0, Some("no choices".to_string()));
        }
        let idx = self.rng.gen_range(0..scenario.choices.len());
        PolicyDecision::new(idx, None)
    }
}

fn risk_weight(choice: &Choice) -> i32 {
    match choice.risk_level {
        Some(RiskLevel::Risky) => 10,
        Some(RiskLevel::Moderate) => 4,
        Some(RiskLevel::Safe) | None => 0,
    }
}

/// Losses weigh heavier on whichever resource is already low.
fn cautious_risk(state: &GameState, choice: &Choice) -> i32 {
    let eff = &choice.effects;
    let urgency = |current: i32| if current < 30 { 3 } else { 1 };
    let mut risk = risk_weight(choice);
    risk += (-eff.money_delta()).max(0) * urgency(state.resources.money);
    risk += (-eff.reputation_delta()).max(0) * 2 * urgency(state.resources.reputation);
    risk += (-eff.energy_delta()).max(0) * 2 * urgency(state.resources.energy);
    risk - eff.energy_delta().max(0)
}

fn greedy_reward(choice: &Choice) -> i32 {
    let eff = &choice.effects;
    eff.money_delta() * 3 + eff.reputation_delta()
}

fn projected_floor(state: &GameState, choice: &Choice) -> i32 {
    state.resources.apply(&choice.effects).min_value()
}
