use rand::RngCore;
use thiserror::Error;

use crate::catalog::ScenarioCatalog;
use crate::context::ScenarioContext;
use crate::data::{Choice, Difficulty, Scenario, is_valid_choice};
use crate::selector::{SelectionRng, select_scenario};
use crate::state::GameState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no {difficulty} scenario available for turn {turn}")]
    NoScenario { turn: u32, difficulty: Difficulty },
    #[error("the game is already over")]
    GameOver,
    #[error("no scenario has been drawn for this turn")]
    NoActiveScenario,
    #[error("choice {index} is out of range 1..={len}")]
    InvalidChoiceIndex { index: usize, len: usize },
    #[error("choice '{0}' does not belong to the current scenario")]
    UnknownChoice(String),
}

/// Turn loop driver binding a catalog, the evolving game state, and the
/// scenario currently on offer.
///
/// Seeded sessions draw from one generator advanced once per turn, so two
/// sessions with the same seed and the same choices see the same scenarios.
#[derive(Debug, Clone)]
pub struct GameSession<'c> {
    catalog: &'c ScenarioCatalog,
    state: GameState,
    current: Option<&'c Scenario>,
    rng: SelectionRng,
}

impl<'c> GameSession<'c> {
    #[must_use]
    pub fn new(
        catalog: &'c ScenarioCatalog,
        session_id: Option<String>,
        random_seed: Option<String>,
    ) -> Self {
        Self::from_state(catalog, GameState::create_new(session_id, random_seed))
    }

    /// Resume from a saved state. A seeded generator is fast-forwarded past
    /// the draws already spent on completed turns.
    #[must_use]
    pub fn from_state(catalog: &'c ScenarioCatalog, state: GameState) -> Self {
        let mut rng = SelectionRng::from_seed(state.random_seed.as_deref());
        if rng.is_seeded() {
            for _ in 0..state.turn {
                rng.next_u32();
            }
        }
        Self {
            catalog,
            state,
            current: None,
            rng,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    #[must_use]
    pub const fn catalog(&self) -> &'c ScenarioCatalog {
        self.catalog
    }

    #[must_use]
    pub const fn current_scenario(&self) -> Option<&'c Scenario> {
        self.current
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.state.game_over
    }

    /// Draw the scenario for the upcoming turn. Repeated calls before a
    /// choice is made return the same scenario.
    ///
    /// # Errors
    ///
    /// `GameOver` once the session has ended, `NoScenario` when the tier for
    /// the upcoming turn is empty.
    pub fn next_scenario(&mut self) -> Result<&'c Scenario, SessionError> {
        if self.state.game_over {
            return Err(SessionError::GameOver);
        }
        if let Some(scenario) = self.current {
            return Ok(scenario);
        }
        let context = ScenarioContext::for_next_turn(&self.state, self.catalog);
        let scenario = select_scenario(&context, self.catalog, &mut self.rng).ok_or(
            SessionError::NoScenario {
                turn: context.turn,
                difficulty: context.difficulty_level,
            },
        )?;
        self.current = Some(scenario);
        Ok(scenario)
    }

    /// Apply the choice at a 1-based position in the current scenario.
    ///
    /// # Errors
    ///
    /// `GameOver`, `NoActiveScenario`, or `InvalidChoiceIndex` when the
    /// position is outside the scenario's choices.
    pub fn choose(&mut self, index: usize) -> Result<&GameState, SessionError> {
        let scenario = self.active()?;
        let choice = index
            .checked_sub(1)
            .and_then(|idx| scenario.choices.get(idx))
            .ok_or(SessionError::InvalidChoiceIndex {
                index,
                len: scenario.choices.len(),
            })?;
        Ok(self.resolve(scenario, choice))
    }

    /// Apply a choice by id.
    ///
    /// # Errors
    ///
    /// `GameOver`, `NoActiveScenario`, or `UnknownChoice` when the id is not
    /// one of the current scenario's choices.
    pub fn choose_by_id(&mut self, choice_id: &str) -> Result<&GameState, SessionError> {
        let scenario = self.active()?;
        if !is_valid_choice(scenario, choice_id) {
            return Err(SessionError::UnknownChoice(choice_id.to_string()));
        }
        let choice = scenario
            .choice(choice_id)
            .ok_or_else(|| SessionError::UnknownChoice(choice_id.to_string()))?;
        Ok(self.resolve(scenario, choice))
    }

    fn active(&self) -> Result<&'c Scenario, SessionError> {
        if self.state.game_over {
            return Err(SessionError::GameOver);
        }
        self.current.ok_or(SessionError::NoActiveScenario)
    }

    fn resolve(&mut self, scenario: &'c Scenario, choice: &'c Choice) -> &GameState {
        self.state = self.state.apply_choice(scenario, choice);
        self.current = None;
        log::debug!(
            "Turn resolved | session:{} turn:{} scenario:{} choice:{}",
            self.state.session_id,
            self.state.turn,
            scenario.id,
            choice.id
        );
        &self.state
    }
}
