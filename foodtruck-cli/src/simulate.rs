use std::collections::BTreeMap;

use serde::Serialize;

use foodtruck_game::constants::MAX_TURNS;
use foodtruck_game::{
    EndReason, GameSession, Resources, ScenarioCatalog, get_current_difficulty, hash_seed,
};

use crate::policy::GameplayStrategy;

/// Outcome of one automated game.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub strategy: GameplayStrategy,
    pub seed: String,
    pub turns: u32,
    pub end_reason: Option<EndReason>,
    pub score: Option<i32>,
    pub final_resources: Resources,
    pub scenarios: Vec<String>,
    pub achievements: Vec<String>,
    pub failures: Vec<String>,
    pub passed: bool,
}

/// Per-strategy roll-up across runs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyAggregate {
    pub strategy: GameplayStrategy,
    pub runs: usize,
    pub victories: usize,
    pub win_rate: f64,
    pub average_score: f64,
    pub average_turns: f64,
    pub end_reasons: BTreeMap<String, usize>,
    pub failed_runs: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub runs: Vec<RunSummary>,
    pub aggregates: Vec<StrategyAggregate>,
}

impl SimulationReport {
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.runs.iter().all(|run| run.passed)
    }
}

/// Seed for the `iteration`-th run of a batch.
#[must_use]
pub fn run_seed(base: &str, iteration: usize) -> String {
    format!("{base}-{iteration}")
}

/// Play one seeded game with `strategy`, checking engine invariants after
/// every turn.
#[must_use]
pub fn run_once(catalog: &ScenarioCatalog, strategy: GameplayStrategy, seed: &str) -> RunSummary {
    let mut session = GameSession::new(catalog, None, Some(seed.to_string()));
    let mut policy = strategy.create_policy(hash_seed(seed));
    let mut failures = Vec::new();
    let mut scenarios = Vec::new();

    while !session.is_over() {
        let turn = session.state().turn + 1;
        if turn > MAX_TURNS {
            failures.push(format!("game still running after turn {MAX_TURNS}"));
            break;
        }
        let scenario = match session.next_scenario() {
            Ok(scenario) => scenario,
            Err(err) => {
                failures.push(format!("turn {turn}: {err}"));
                break;
            }
        };
        if scenario.difficulty != get_current_difficulty(turn) {
            failures.push(format!(
                "turn {turn}: drew {} scenario {}",
                scenario.difficulty, scenario.id
            ));
        }
        scenarios.push(scenario.id.clone());

        let decision = policy.pick_choice(session.state(), scenario);
        log::debug!(
            "{} | seed:{seed} turn:{turn} scenario:{} choice:{} {}",
            policy.name(),
            scenario.id,
            decision.choice_index + 1,
            decision.rationale.as_deref().unwrap_or_default()
        );
        let state = match session.choose(decision.choice_index + 1) {
            Ok(state) => state,
            Err(err) => {
                failures.push(format!("turn {turn}: {err}"));
                break;
            }
        };

        if state.turn != turn {
            failures.push(format!("turn counter at {} after turn {turn}", state.turn));
        }
        if !state.resources.within_bounds() {
            failures.push(format!(
                "turn {turn}: resources out of bounds {:?}",
                state.resources
            ));
        }
        if usize::try_from(state.turn).ok() != Some(state.choice_history.len()) {
            failures.push(format!(
                "turn {turn}: history holds {} records",
                state.choice_history.len()
            ));
        }
        if state.game_over != state.end_reason.is_some() || state.game_over != state.score.is_some()
        {
            failures.push(format!("turn {turn}: inconsistent end-of-game fields"));
        }
    }

    let state = session.state();
    let passed = failures.is_empty();
    if !passed {
        log::warn!(
            "{strategy} run with seed {seed} failed {} check(s)",
            failures.len()
        );
    }
    RunSummary {
        strategy,
        seed: seed.to_string(),
        turns: state.turn,
        end_reason: state.end_reason,
        score: state.score,
        final_resources: state.resources,
        scenarios,
        achievements: state.achievements.iter().map(|a| a.id.clone()).collect(),
        failures,
        passed,
    }
}

/// Run `iterations` games per strategy. Seeds are shared across strategies
/// so each one faces the same opening scenario.
#[must_use]
pub fn run_batch(
    catalog: &ScenarioCatalog,
    strategies: &[GameplayStrategy],
    iterations: usize,
    base_seed: &str,
) -> SimulationReport {
    let mut runs = Vec::with_capacity(strategies.len() * iterations);
    for &strategy in strategies {
        for iteration in 0..iterations {
            runs.push(run_once(catalog, strategy, &run_seed(base_seed, iteration)));
        }
        log::info!("{strategy}: {iterations} run(s) complete");
    }
    let aggregates = aggregate(&runs);
    SimulationReport { runs, aggregates }
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn aggregate(runs: &[RunSummary]) -> Vec<StrategyAggregate> {
    let mut grouped: BTreeMap<GameplayStrategy, Vec<&RunSummary>> = BTreeMap::new();
    for run in runs {
        grouped.entry(run.strategy).or_default().push(run);
    }

    grouped
        .into_iter()
        .map(|(strategy, runs)| {
            let count = runs.len();
            let victories = runs
                .iter()
                .filter(|run| run.end_reason.is_some_and(EndReason::is_victory))
                .count();
            let total_score: i64 = runs
                .iter()
                .map(|run| i64::from(run.score.unwrap_or_default()))
                .sum();
            let total_turns: u64 = runs.iter().map(|run| u64::from(run.turns)).sum();
            let mut end_reasons = BTreeMap::new();
            for run in &runs {
                let key = run.end_reason.map_or("unfinished", EndReason::as_str);
                *end_reasons.entry(key.to_string()).or_insert(0) += 1;
            }
            let denominator = count.max(1) as f64;
            StrategyAggregate {
                strategy,
                runs: count,
                victories,
                win_rate: victories as f64 / denominator,
                average_score: total_score as f64 / denominator,
                average_turns: total_turns as f64 / denominator,
                end_reasons,
                failed_runs: runs.iter().filter(|run| !run.passed).count(),
            }
        })
        .collect()
}
