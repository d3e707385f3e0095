//! Centralized balance and tuning constants for the food truck engine.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

use std::time::Duration;

// Session shape ------------------------------------------------------------
pub const MAX_TURNS: u32 = 15;
pub const EARLY_TIER_LAST_TURN: u32 = 5;
pub const MID_TIER_LAST_TURN: u32 = 10;

// Resource bounds ----------------------------------------------------------
pub const MONEY_MIN: i32 = -999;
pub const MONEY_MAX: i32 = 999;
pub const REPUTATION_MIN: i32 = 0;
pub const REPUTATION_MAX: i32 = 100;
pub const ENERGY_MIN: i32 = 0;
pub const ENERGY_MAX: i32 = 100;

pub const STARTING_MONEY: i32 = 100;
pub const STARTING_REPUTATION: i32 = 50;
pub const STARTING_ENERGY: i32 = 80;

/// Money at or below this value closes the truck.
pub const BANKRUPTCY_THRESHOLD: i32 = 0;

// Authoring limits ---------------------------------------------------------
pub const EFFECT_MIN: i32 = -20;
pub const EFFECT_MAX: i32 = 20;
pub const MIN_CHOICES: usize = 2;
pub const MAX_CHOICES: usize = 4;
pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 80;
pub const TEXT_MIN_CHARS: usize = 10;
pub const TEXT_MAX_CHARS: usize = 500;
pub const LABEL_MIN_CHARS: usize = 1;
pub const LABEL_MAX_CHARS: usize = 100;
pub(crate) const CHOICE_ID_PATTERN: &str = "^[a-z0-9-]+$";

// Scoring ------------------------------------------------------------------
pub(crate) const SCORE_WEIGHT_MONEY: f64 = 0.4;
pub(crate) const SCORE_WEIGHT_REPUTATION: f64 = 0.8;
pub(crate) const SCORE_WEIGHT_ENERGY: f64 = 0.6;
pub(crate) const SCORE_POINTS_PER_TURN: i32 = 10;
pub(crate) const EXCELLENCE_FLOOR: i32 = 70;
pub(crate) const BALANCED_FLOOR: i32 = 40;
pub(crate) const EXCELLENCE_MULTIPLIER: f64 = 1.5;
pub(crate) const BALANCED_MULTIPLIER: f64 = 1.2;

// Achievements -------------------------------------------------------------
pub(crate) const STEADY_ENERGY_FLOOR: i32 = 20;
pub(crate) const VARIETY_TAG_TARGET: usize = 5;

// Selection ----------------------------------------------------------------
pub const RECENT_TAG_WINDOW: usize = 3;
pub const CATALOG_CACHE_TTL: Duration = Duration::from_secs(60);
