//! Bounded resource arithmetic.
use serde::{Deserialize, Serialize};

use crate::constants::{
    ENERGY_MAX, ENERGY_MIN, MONEY_MAX, MONEY_MIN, REPUTATION_MAX, REPUTATION_MIN, STARTING_ENERGY,
    STARTING_MONEY, STARTING_REPUTATION,
};

/// Bound `value` to `[min, max]`.
#[must_use]
pub fn clamp(value: i32, min: i32, max: i32) -> i32 {
    value.max(min).min(max)
}

/// The player's three vital metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resources {
    pub money: i32,
    pub reputation: i32,
    pub energy: i32,
}

impl Default for Resources {
    fn default() -> Self {
        Self::starting()
    }
}

impl Resources {
    /// Opening position for every new session.
    #[must_use]
    pub const fn starting() -> Self {
        Self {
            money: STARTING_MONEY,
            reputation: STARTING_REPUTATION,
            energy: STARTING_ENERGY,
        }
    }

    /// Clamp-add every delta in `effects`, returning the new resource levels.
    #[must_use]
    pub fn apply(&self, effects: &ResourceEffects) -> Self {
        Self {
            money: clamp(
                self.money.saturating_add(effects.money_delta()),
                MONEY_MIN,
                MONEY_MAX,
            ),
            reputation: clamp(
                self.reputation.saturating_add(effects.reputation_delta()),
                REPUTATION_MIN,
                REPUTATION_MAX,
            ),
            energy: clamp(
                self.energy.saturating_add(effects.energy_delta()),
                ENERGY_MIN,
                ENERGY_MAX,
            ),
        }
    }

    #[must_use]
    pub fn min_value(&self) -> i32 {
        self.money.min(self.reputation).min(self.energy)
    }

    #[must_use]
    pub fn within_bounds(&self) -> bool {
        (MONEY_MIN..=MONEY_MAX).contains(&self.money)
            && (REPUTATION_MIN..=REPUTATION_MAX).contains(&self.reputation)
            && (ENERGY_MIN..=ENERGY_MAX).contains(&self.energy)
    }
}

/// Sparse resource delta attached to a choice. Absent fields mean no change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct ResourceEffects {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub money: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reputation: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<i32>,
}

impl ResourceEffects {
    #[must_use]
    pub const fn new(money: i32, reputation: i32, energy: i32) -> Self {
        Self {
            money: Some(money),
            reputation: Some(reputation),
            energy: Some(energy),
        }
    }

    #[must_use]
    pub fn money_delta(&self) -> i32 {
        self.money.unwrap_or(0)
    }

    #[must_use]
    pub fn reputation_delta(&self) -> i32 {
        self.reputation.unwrap_or(0)
    }

    #[must_use]
    pub fn energy_delta(&self) -> i32 {
        self.energy.unwrap_or(0)
    }
}
