//! Food Truck Manager Game Engine
//!
//! Platform-agnostic core logic for Food Truck Manager: bounded resource
//! arithmetic, the scenario catalog, tag-aware scenario selection, and the
//! turn transition with end conditions and scoring.
//! This crate has no UI or platform-specific dependencies.

pub mod achievements;
pub mod catalog;
pub mod constants;
pub mod context;
pub mod data;
pub mod numbers;
pub mod resources;
pub mod score;
pub mod seed;
pub mod selector;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use achievements::{Achievement, AchievementCategory, AchievementDef};
pub use catalog::{
    CachedCatalog, CatalogError, EmbeddedSource, FileSource, LoadReport, RejectReason, Rejection,
    ScenarioCatalog, ScenarioSource, catalog,
};
pub use context::ScenarioContext;
pub use data::{
    Choice, CreatedBy, Difficulty, RiskLevel, Scenario, ScenarioError, ScenarioTag, TagList,
    is_valid_choice, validate_scenario,
};
pub use resources::{ResourceEffects, Resources, clamp};
pub use score::calculate_score;
pub use seed::{SeededRandom, hash_seed};
pub use selector::{SelectionRng, rng_for_context, select_for_context, select_scenario};
pub use session::{GameSession, SessionError};
pub use state::{
    ChoiceRecord, EndReason, GameState, check_end_conditions, game_status, get_current_difficulty,
};
