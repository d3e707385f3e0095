//! Per-turn query handed to the scenario selector.
use serde::{Deserialize, Serialize};

use crate::catalog::ScenarioCatalog;
use crate::constants::RECENT_TAG_WINDOW;
use crate::data::{Difficulty, ScenarioTag};
use crate::resources::Resources;
use crate::state::{GameState, get_current_difficulty};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioContext {
    pub current_resources: Resources,
    /// The turn about to be played.
    pub turn: u32,
    pub difficulty_level: Difficulty,
    /// Tags of recently played scenarios.
    pub recent_choices: Vec<ScenarioTag>,
    pub available_tags: Vec<ScenarioTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<String>,
}

impl ScenarioContext {
    /// Context for the turn after `state`.
    ///
    /// Recent tags come from the last few records, oldest first and without
    /// repeats. Records that predate stored tags are looked up in `catalog`
    /// by scenario id.
    #[must_use]
    pub fn for_next_turn(state: &GameState, catalog: &ScenarioCatalog) -> Self {
        let turn = state.turn + 1;
        let window_start = state.choice_history.len().saturating_sub(RECENT_TAG_WINDOW);
        let mut recent_choices: Vec<ScenarioTag> = Vec::new();
        for record in &state.choice_history[window_start..] {
            let tags = if record.scenario_tags.is_empty() {
                catalog
                    .by_id(&record.scenario_id)
                    .map(|scenario| scenario.tags.as_slice())
                    .unwrap_or_default()
            } else {
                record.scenario_tags.as_slice()
            };
            for tag in tags {
                if !recent_choices.contains(tag) {
                    recent_choices.push(*tag);
                }
            }
        }

        Self {
            current_resources: state.resources,
            turn,
            difficulty_level: get_current_difficulty(turn),
            recent_choices,
            available_tags: ScenarioTag::ALL.to_vec(),
            random_seed: state.random_seed.clone(),
        }
    }
}
