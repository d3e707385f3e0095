//! Scenario data model and schema validation.
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::{
    CHOICE_ID_PATTERN, EFFECT_MAX, EFFECT_MIN, LABEL_MAX_CHARS, LABEL_MIN_CHARS, MAX_CHOICES,
    MIN_CHOICES, TEXT_MAX_CHARS, TEXT_MIN_CHARS, TITLE_MAX_CHARS, TITLE_MIN_CHARS,
};
use crate::resources::ResourceEffects;

/// Scenario tags; the selector uses them to bias away from repeated themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioTag {
    CustomerService,
    SupplyManagement,
    Equipment,
    Permits,
    Competition,
    Weather,
    CommunityEvent,
    Crisis,
    Expansion,
}

impl ScenarioTag {
    pub const ALL: [Self; 9] = [
        Self::CustomerService,
        Self::SupplyManagement,
        Self::Equipment,
        Self::Permits,
        Self::Competition,
        Self::Weather,
        Self::CommunityEvent,
        Self::Crisis,
        Self::Expansion,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CustomerService => "customer-service",
            Self::SupplyManagement => "supply-management",
            Self::Equipment => "equipment",
            Self::Permits => "permits",
            Self::Competition => "competition",
            Self::Weather => "weather",
            Self::CommunityEvent => "community-event",
            Self::Crisis => "crisis",
            Self::Expansion => "expansion",
        }
    }
}

impl fmt::Display for ScenarioTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioTag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or(())
    }
}

/// Difficulty tier; partitions the catalog and scales stakes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Early,
    Mid,
    Late,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Early, Self::Mid, Self::Late];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Early => "early",
            Self::Mid => "mid",
            Self::Late => "late",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "early" => Ok(Self::Early),
            "mid" => Ok(Self::Mid),
            "late" => Ok(Self::Late),
            _ => Err(()),
        }
    }
}

/// Hint shown next to a choice about how predictable its outcome is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Moderate,
    Risky,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatedBy {
    Ai,
    Static,
}

/// A choice within a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub id: String,
    pub label: String,
    pub effects: ResourceEffects,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
}

pub type TagList = SmallVec<[ScenarioTag; 2]>;

/// A narrative prompt offering two to four choices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub title: String,
    pub text: String,
    pub choices: Vec<Choice>,
    pub tags: TagList,
    pub difficulty: Difficulty,
    pub created_by: CreatedBy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Scenario {
    #[must_use]
    pub fn choice(&self, choice_id: &str) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.id == choice_id)
    }

    #[must_use]
    pub fn has_any_tag(&self, tags: &HashSet<ScenarioTag>) -> bool {
        self.tags.iter().any(|tag| tags.contains(tag))
    }

    /// Check the authored scenario against the schema limits.
    ///
    /// # Errors
    ///
    /// Returns the first schema violation found.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        validate_scenario(self)
    }
}

/// Membership test used by callers before handing a choice to the engine.
#[must_use]
pub fn is_valid_choice(scenario: &Scenario, choice_id: &str) -> bool {
    scenario.choices.iter().any(|choice| choice.id == choice_id)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    #[error("scenario id is empty")]
    EmptyId,
    #[error("title must be 3-80 characters, found {0}")]
    TitleLength(usize),
    #[error("text must be 10-500 characters, found {0}")]
    TextLength(usize),
    #[error("scenario needs 2-4 choices, found {0}")]
    ChoiceCount(usize),
    #[error("choice id '{0}' is not kebab-case")]
    ChoiceId(String),
    #[error("choice id '{0}' appears more than once")]
    DuplicateChoice(String),
    #[error("choice '{id}' label must be 1-100 characters, found {len}")]
    LabelLength { id: String, len: usize },
    #[error("choice '{id}' {resource} effect {value} outside -20..=20")]
    EffectOutOfRange {
        id: String,
        resource: &'static str,
        value: i32,
    },
}

fn choice_id_is_kebab(id: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(CHOICE_ID_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(id))
}

/// Lengths are UTF-16 code units, the unit authored limits are written in.
fn check_len(text: &str, min: usize, max: usize) -> Result<(), usize> {
    let len = text.encode_utf16().count();
    if (min..=max).contains(&len) {
        Ok(())
    } else {
        Err(len)
    }
}

fn check_effect(id: &str, resource: &'static str, value: Option<i32>) -> Result<(), ScenarioError> {
    match value {
        Some(value) if !(EFFECT_MIN..=EFFECT_MAX).contains(&value) => {
            Err(ScenarioError::EffectOutOfRange {
                id: id.to_string(),
                resource,
                value,
            })
        }
        _ => Ok(()),
    }
}

fn validate_choice(choice: &Choice) -> Result<(), ScenarioError> {
    if !choice_id_is_kebab(&choice.id) {
        return Err(ScenarioError::ChoiceId(choice.id.clone()));
    }
    check_len(&choice.label, LABEL_MIN_CHARS, LABEL_MAX_CHARS).map_err(|len| {
        ScenarioError::LabelLength {
            id: choice.id.clone(),
            len,
        }
    })?;
    check_effect(&choice.id, "money", choice.effects.money)?;
    check_effect(&choice.id, "reputation", choice.effects.reputation)?;
    check_effect(&choice.id, "energy", choice.effects.energy)
}

/// Validate a scenario against the authoring schema.
///
/// # Errors
///
/// Returns the first schema violation found.
pub fn validate_scenario(scenario: &Scenario) -> Result<(), ScenarioError> {
    if scenario.id.trim().is_empty() {
        return Err(ScenarioError::EmptyId);
    }
    check_len(&scenario.title, TITLE_MIN_CHARS, TITLE_MAX_CHARS)
        .map_err(ScenarioError::TitleLength)?;
    check_len(&scenario.text, TEXT_MIN_CHARS, TEXT_MAX_CHARS).map_err(ScenarioError::TextLength)?;
    if !(MIN_CHOICES..=MAX_CHOICES).contains(&scenario.choices.len()) {
        return Err(ScenarioError::ChoiceCount(scenario.choices.len()));
    }
    let mut seen = HashSet::with_capacity(scenario.choices.len());
    for choice in &scenario.choices {
        validate_choice(choice)?;
        if !seen.insert(choice.id.as_str()) {
            return Err(ScenarioError::DuplicateChoice(choice.id.clone()));
        }
    }
    Ok(())
}
