//! Final score calculation.
use crate::constants::{
    BALANCED_FLOOR, BALANCED_MULTIPLIER, EXCELLENCE_FLOOR, EXCELLENCE_MULTIPLIER,
    SCORE_POINTS_PER_TURN, SCORE_WEIGHT_ENERGY, SCORE_WEIGHT_MONEY, SCORE_WEIGHT_REPUTATION,
};
use crate::numbers::round_half_up_to_i32;
use crate::resources::Resources;

/// Multiplier earned by keeping every resource above a floor.
#[must_use]
pub fn balance_multiplier(resources: &Resources) -> f64 {
    let floor = resources.min_value();
    if floor >= EXCELLENCE_FLOOR {
        EXCELLENCE_MULTIPLIER
    } else if floor >= BALANCED_FLOOR {
        BALANCED_MULTIPLIER
    } else {
        1.0
    }
}

/// Score a finished run.
///
/// Weighted resources plus a per-turn bonus, scaled by the balance
/// multiplier and rounded half-up.
#[must_use]
pub fn calculate_score(resources: &Resources, turns_completed: u32) -> i32 {
    let base = f64::from(resources.money) * SCORE_WEIGHT_MONEY
        + f64::from(resources.reputation) * SCORE_WEIGHT_REPUTATION
        + f64::from(resources.energy) * SCORE_WEIGHT_ENERGY;
    let turn_bonus = f64::from(turns_completed) * f64::from(SCORE_POINTS_PER_TURN);
    round_half_up_to_i32((base + turn_bonus) * balance_multiplier(resources))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn res(money: i32, reputation: i32, energy: i32) -> Resources {
        Resources {
            money,
            reputation,
            energy,
        }
    }

    #[test]
    fn starting_resources_after_full_run() {
        // 40 + 40 + 48 = 128, +150 turn bonus, min 50 => x1.2
        assert_eq!(calculate_score(&res(100, 50, 80), 15), 334);
    }

    #[test]
    fn excellence_multiplier_applies_at_seventy() {
        // 28 + 56 + 42 = 126, +150 => 276 * 1.5
        assert_eq!(calculate_score(&res(70, 70, 70), 15), 414);
        assert!((balance_multiplier(&res(70, 70, 70)) - 1.5).abs() < f64::EPSILON);
        assert!((balance_multiplier(&res(69, 90, 90)) - 1.2).abs() < f64::EPSILON);
        assert!((balance_multiplier(&res(39, 90, 90)) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unbalanced_runs_get_no_multiplier() {
        // 0 + 8 + 0 = 8, +30
        assert_eq!(calculate_score(&res(0, 10, 0), 3), 38);
    }

    #[test]
    fn negative_money_drags_score_down() {
        // -40 + 0 + 6 = -34, +20 => -14
        assert_eq!(calculate_score(&res(-100, 0, 10), 2), -14);
    }

    #[test]
    fn ties_round_up() {
        // 28 + 56 + 45 = 129, x1.5 = 193.5
        assert_eq!(calculate_score(&res(70, 70, 75), 0), 194);
    }
}
