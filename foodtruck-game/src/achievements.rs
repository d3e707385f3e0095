//! Achievements unlocked when a run ends.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::constants::{BALANCED_FLOOR, EXCELLENCE_FLOOR, STEADY_ENERGY_FLOOR, VARIETY_TAG_TARGET};
use crate::data::ScenarioTag;
use crate::resources::Resources;
use crate::state::{ChoiceRecord, EndReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Survival,
    Excellence,
    Strategy,
    Collection,
}

impl AchievementCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Survival => "survival",
            Self::Excellence => "excellence",
            Self::Strategy => "strategy",
            Self::Collection => "collection",
        }
    }
}

impl fmt::Display for AchievementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
    pub category: AchievementCategory,
}

/// What the unlock rules look at when a run ends.
#[derive(Debug, Clone, Copy)]
pub struct RunOutcome<'a> {
    pub end: EndReason,
    pub resources: &'a Resources,
    pub history: &'a [ChoiceRecord],
}

/// Static description of an unlockable achievement.
#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    earned: fn(&RunOutcome<'_>) -> bool,
}

impl AchievementDef {
    #[must_use]
    pub fn unlock(&self, at: DateTime<Utc>) -> Achievement {
        Achievement {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            unlocked_at: Some(at),
            category: self.category,
        }
    }

    #[must_use]
    pub fn is_earned(&self, outcome: &RunOutcome<'_>) -> bool {
        (self.earned)(outcome)
    }
}

pub const FULL_SHIFT: AchievementDef = AchievementDef {
    id: "full-shift",
    name: "Full Shift",
    description: "Kept the truck running for all 15 days.",
    category: AchievementCategory::Survival,
    earned: survived_every_day,
};

pub const BALANCED_BOOKS: AchievementDef = AchievementDef {
    id: "balanced-books",
    name: "Balanced Books",
    description: "Finished with every resource at 40 or more.",
    category: AchievementCategory::Strategy,
    earned: stayed_balanced,
};

pub const FIVE_STAR_FINISH: AchievementDef = AchievementDef {
    id: "five-star-finish",
    name: "Five-Star Finish",
    description: "Finished with every resource at 70 or more.",
    category: AchievementCategory::Excellence,
    earned: stayed_excellent,
};

pub const NEVER_RUNNING_ON_EMPTY: AchievementDef = AchievementDef {
    id: "never-running-on-empty",
    name: "Never Running on Empty",
    description: "Survived all 15 days without energy dropping below 20.",
    category: AchievementCategory::Survival,
    earned: kept_energy_up,
};

pub const SEEN_IT_ALL: AchievementDef = AchievementDef {
    id: "seen-it-all",
    name: "Seen It All",
    description: "Faced scenarios covering at least five different themes.",
    category: AchievementCategory::Collection,
    earned: saw_enough_variety,
};

pub const ALL: [AchievementDef; 5] = [
    FULL_SHIFT,
    BALANCED_BOOKS,
    FIVE_STAR_FINISH,
    NEVER_RUNNING_ON_EMPTY,
    SEEN_IT_ALL,
];

/// Distinct scenario tags met across a run.
#[must_use]
pub fn distinct_tags(history: &[ChoiceRecord]) -> BTreeSet<ScenarioTag> {
    history
        .iter()
        .flat_map(|record| record.scenario_tags.iter().copied())
        .collect()
}

fn survived_every_day(outcome: &RunOutcome<'_>) -> bool {
    outcome.end == EndReason::Victory
}

fn stayed_balanced(outcome: &RunOutcome<'_>) -> bool {
    outcome.resources.min_value() >= BALANCED_FLOOR
}

fn stayed_excellent(outcome: &RunOutcome<'_>) -> bool {
    outcome.resources.min_value() >= EXCELLENCE_FLOOR
}

fn kept_energy_up(outcome: &RunOutcome<'_>) -> bool {
    survived_every_day(outcome)
        && outcome
            .history
            .iter()
            .all(|record| record.resources_after.energy >= STEADY_ENERGY_FLOOR)
}

fn saw_enough_variety(outcome: &RunOutcome<'_>) -> bool {
    distinct_tags(outcome.history).len() >= VARIETY_TAG_TARGET
}

/// Achievements earned by a run that just ended, in declaration order.
#[must_use]
pub fn evaluate(
    end: EndReason,
    resources: &Resources,
    history: &[ChoiceRecord],
    at: DateTime<Utc>,
) -> Vec<Achievement> {
    let outcome = RunOutcome {
        end,
        resources,
        history,
    };
    ALL.iter()
        .filter(|def| def.is_earned(&outcome))
        .map(|def| def.unlock(at))
        .collect()
}
