//! Game state and the turn transition.
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::achievements::{self, Achievement};
use crate::constants::{BANKRUPTCY_THRESHOLD, EARLY_TIER_LAST_TURN, MAX_TURNS, MID_TIER_LAST_TURN};
use crate::data::{Choice, Difficulty, Scenario, TagList};
use crate::resources::{ResourceEffects, Resources};
use crate::score::calculate_score;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndReason {
    Victory,
    Burnout,
    ReputationDeath,
    Bankruptcy,
}

impl EndReason {
    pub const ALL: [Self; 4] = [
        Self::Victory,
        Self::Burnout,
        Self::ReputationDeath,
        Self::Bankruptcy,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Victory => "victory",
            Self::Burnout => "burnout",
            Self::ReputationDeath => "reputation-death",
            Self::Bankruptcy => "bankruptcy",
        }
    }

    /// Closing line shown on the game-over screen.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Victory => "🎉 Victory! You successfully managed your food truck for 15 days!",
            Self::Burnout => "😴 Game Over - You burned out from exhaustion.",
            Self::ReputationDeath => "💔 Game Over - Your reputation was completely ruined.",
            Self::Bankruptcy => "💸 Game Over - You went bankrupt and had to close.",
        }
    }

    #[must_use]
    pub const fn is_victory(self) -> bool {
        matches!(self, Self::Victory)
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndReason {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|reason| reason.as_str() == s)
            .ok_or(())
    }
}

/// One completed turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceRecord {
    pub turn: u32,
    pub scenario_id: String,
    pub choice_id: String,
    pub effects: ResourceEffects,
    pub resources_before: Resources,
    pub resources_after: Resources,
    /// Tags of the scenario the choice came from; empty in records written
    /// before tags were stored.
    #[serde(default)]
    pub scenario_tags: TagList,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub session_id: String,
    pub turn: u32,
    pub resources: Resources,
    pub game_over: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_reason: Option<EndReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<String>,
    #[serde(default)]
    pub choice_history: Vec<ChoiceRecord>,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

/// Fresh 16-character lowercase hex token.
#[must_use]
pub fn generate_session_id() -> String {
    format!("{:016x}", rand::thread_rng().r#gen::<u64>())
}

impl GameState {
    /// Start a new session at turn 0 with the opening resources.
    #[must_use]
    pub fn create_new(session_id: Option<String>, random_seed: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.unwrap_or_else(generate_session_id),
            turn: 0,
            resources: Resources::starting(),
            game_over: false,
            end_reason: None,
            score: None,
            created_at: now,
            updated_at: now,
            random_seed,
            choice_history: Vec::new(),
            achievements: Vec::new(),
        }
    }

    /// Resolve `choice` against this state and return the next state.
    ///
    /// `choice` must belong to `scenario` and the state must not be over;
    /// neither is rechecked here (see [`crate::data::is_valid_choice`]).
    #[must_use]
    pub fn apply_choice(&self, scenario: &Scenario, choice: &Choice) -> Self {
        let now = Utc::now();
        let resources_before = self.resources;
        let resources_after = resources_before.apply(&choice.effects);
        let turn = self.turn + 1;

        let record = ChoiceRecord {
            turn,
            scenario_id: scenario.id.clone(),
            choice_id: choice.id.clone(),
            effects: choice.effects,
            resources_before,
            resources_after,
            scenario_tags: scenario.tags.clone(),
            timestamp: now,
        };

        let mut choice_history = Vec::with_capacity(self.choice_history.len() + 1);
        choice_history.extend_from_slice(&self.choice_history);
        choice_history.push(record);

        let end_reason = check_end_conditions(&resources_after, turn);
        let score = end_reason.map(|_| calculate_score(&resources_after, turn));
        let mut achievements = self.achievements.clone();
        if let Some(reason) = end_reason {
            achievements.extend(achievements::evaluate(
                reason,
                &resources_after,
                &choice_history,
                now,
            ));
            log::debug!(
                "Session ended | session:{} turn:{turn} reason:{reason} score:{}",
                self.session_id,
                score.unwrap_or_default()
            );
        }

        Self {
            session_id: self.session_id.clone(),
            turn,
            resources: resources_after,
            game_over: end_reason.is_some(),
            end_reason,
            score,
            created_at: self.created_at,
            updated_at: now,
            random_seed: self.random_seed.clone(),
            choice_history,
            achievements,
        }
    }
}

/// First matching end condition for the resources after a turn, checked
/// in priority order: energy, reputation, money, then the turn limit.
#[must_use]
pub fn check_end_conditions(resources: &Resources, turn: u32) -> Option<EndReason> {
    if resources.energy <= 0 {
        Some(EndReason::Burnout)
    } else if resources.reputation <= 0 {
        Some(EndReason::ReputationDeath)
    } else if resources.money <= BANKRUPTCY_THRESHOLD {
        Some(EndReason::Bankruptcy)
    } else if turn >= MAX_TURNS {
        Some(EndReason::Victory)
    } else {
        None
    }
}

/// Difficulty tier for a turn number: early through 5, mid through 10,
/// late afterwards.
#[must_use]
pub const fn get_current_difficulty(turn: u32) -> Difficulty {
    if turn <= EARLY_TIER_LAST_TURN {
        Difficulty::Early
    } else if turn <= MID_TIER_LAST_TURN {
        Difficulty::Mid
    } else {
        Difficulty::Late
    }
}

/// One-line summary while playing, closing message plus score once over.
#[must_use]
pub fn game_status(state: &GameState) -> String {
    if let Some(reason) = state.end_reason.filter(|_| state.game_over) {
        return format!(
            "{}\nFinal Score: {}",
            reason.message(),
            state.score.unwrap_or_default()
        );
    }
    format!(
        "Turn {}/{} - Money: ${} | Reputation: {}% | Energy: {}%",
        state.turn,
        MAX_TURNS,
        state.resources.money,
        state.resources.reputation,
        state.resources.energy
    )
}
