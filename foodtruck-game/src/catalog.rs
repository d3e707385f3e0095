//! Scenario catalog: tiered storage, loading sources and a time-bounded cache.
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::constants::CATALOG_CACHE_TTL;
use crate::data::{Difficulty, Scenario, ScenarioError, ScenarioTag, validate_scenario};

const DEFAULT_SCENARIO_DATA: &str = include_str!("../assets/scenarios.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read scenario catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("scenario catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where raw catalog JSON comes from.
pub trait ScenarioSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the catalog document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read.
    fn load_scenarios(&self) -> Result<String, Self::Error>;

    /// Short label used in log lines.
    fn describe(&self) -> String {
        String::from("scenario source")
    }
}

/// The scenarios compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

impl ScenarioSource for EmbeddedSource {
    type Error = std::convert::Infallible;

    fn load_scenarios(&self) -> Result<String, Self::Error> {
        Ok(DEFAULT_SCENARIO_DATA.to_string())
    }

    fn describe(&self) -> String {
        String::from("embedded scenarios")
    }
}

/// A catalog document on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScenarioSource for FileSource {
    type Error = CatalogError;

    fn load_scenarios(&self) -> Result<String, Self::Error> {
        std::fs::read_to_string(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Why a catalog entry was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    Malformed(String),
    Invalid(ScenarioError),
    WrongTier { declared: Difficulty },
    DuplicateId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub tier: Difficulty,
    pub index: usize,
    pub id: Option<String>,
    pub reason: RejectReason,
}

/// Outcome of a catalog load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub accepted: usize,
    pub rejected: Vec<Rejection>,
}

impl LoadReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    early: Vec<Value>,
    #[serde(default)]
    mid: Vec<Value>,
    #[serde(default)]
    late: Vec<Value>,
}

/// Every authored scenario, partitioned by difficulty tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioCatalog {
    early: Vec<Scenario>,
    mid: Vec<Scenario>,
    late: Vec<Scenario>,
}

impl ScenarioCatalog {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from pre-validated tiers.
    #[must_use]
    pub fn from_tiers(early: Vec<Scenario>, mid: Vec<Scenario>, late: Vec<Scenario>) -> Self {
        Self { early, mid, late }
    }

    /// Parse a catalog document, dropping entries that fail the schema.
    ///
    /// # Errors
    ///
    /// Returns an error only when the document as a whole is not a JSON
    /// object of tier arrays.
    pub fn from_json(json: &str) -> Result<(Self, LoadReport), CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        let mut report = LoadReport::default();
        let mut seen_ids = HashSet::new();
        let early = accept_tier(Difficulty::Early, raw.early, &mut seen_ids, &mut report);
        let mid = accept_tier(Difficulty::Mid, raw.mid, &mut seen_ids, &mut report);
        let late = accept_tier(Difficulty::Late, raw.late, &mut seen_ids, &mut report);
        Ok((Self { early, mid, late }, report))
    }

    /// Load from `source`, falling back to an empty catalog when the source
    /// cannot be read or parsed.
    #[must_use]
    pub fn load<S>(source: &S) -> Self
    where
        S: ScenarioSource + ?Sized,
    {
        Self::load_with_report(source).0
    }

    #[must_use]
    pub fn load_with_report<S>(source: &S) -> (Self, LoadReport)
    where
        S: ScenarioSource + ?Sized,
    {
        let json = match source.load_scenarios() {
            Ok(json) => json,
            Err(err) => {
                log::error!("Catalog load failed | source:{} error:{err}", source.describe());
                return (Self::empty(), LoadReport::default());
            }
        };
        match Self::from_json(&json) {
            Ok((catalog, report)) => {
                log::debug!(
                    "Catalog loaded | source:{} accepted:{} rejected:{}",
                    source.describe(),
                    report.accepted,
                    report.rejected.len()
                );
                (catalog, report)
            }
            Err(err) => {
                log::error!("Catalog parse failed | source:{} error:{err}", source.describe());
                (Self::empty(), LoadReport::default())
            }
        }
    }

    #[must_use]
    pub fn load_from_static() -> Self {
        Self::load(&EmbeddedSource)
    }

    #[must_use]
    pub fn tier(&self, difficulty: Difficulty) -> &[Scenario] {
        match difficulty {
            Difficulty::Early => &self.early,
            Difficulty::Mid => &self.mid,
            Difficulty::Late => &self.late,
        }
    }

    #[must_use]
    pub fn by_tag(&self, tag: ScenarioTag) -> Vec<&Scenario> {
        self.iter()
            .filter(|scenario| scenario.tags.contains(&tag))
            .collect()
    }

    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&Scenario> {
        self.iter().find(|scenario| scenario.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.early.len() + self.mid.len() + self.late.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All scenarios, early tier first.
    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.early.iter().chain(&self.mid).chain(&self.late)
    }
}

fn accept_tier(
    tier: Difficulty,
    entries: Vec<Value>,
    seen_ids: &mut HashSet<String>,
    report: &mut LoadReport,
) -> Vec<Scenario> {
    let mut accepted = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let id = entry
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string);
        let reason = match serde_json::from_value::<Scenario>(entry) {
            Err(err) => Some(RejectReason::Malformed(err.to_string())),
            Ok(scenario) => match check_entry(tier, &scenario, seen_ids) {
                Ok(()) => {
                    seen_ids.insert(scenario.id.clone());
                    accepted.push(scenario);
                    None
                }
                Err(reason) => Some(reason),
            },
        };
        if let Some(reason) = reason {
            log::warn!(
                "Dropping scenario | tier:{tier} index:{index} id:{} reason:{reason:?}",
                id.as_deref().unwrap_or("?")
            );
            report.rejected.push(Rejection {
                tier,
                index,
                id,
                reason,
            });
        }
    }
    report.accepted += accepted.len();
    accepted
}

fn check_entry(
    tier: Difficulty,
    scenario: &Scenario,
    seen_ids: &HashSet<String>,
) -> Result<(), RejectReason> {
    validate_scenario(scenario).map_err(RejectReason::Invalid)?;
    if scenario.difficulty != tier {
        return Err(RejectReason::WrongTier {
            declared: scenario.difficulty,
        });
    }
    if seen_ids.contains(&scenario.id) {
        return Err(RejectReason::DuplicateId);
    }
    Ok(())
}

/// Process-wide catalog built from the embedded scenarios.
#[must_use]
pub fn catalog() -> &'static ScenarioCatalog {
    static CATALOG: OnceLock<ScenarioCatalog> = OnceLock::new();
    CATALOG.get_or_init(ScenarioCatalog::load_from_static)
}

/// Catalog handle that reloads from its source once the copy is older than
/// the TTL.
#[derive(Debug, Clone)]
pub struct CachedCatalog {
    ttl: Duration,
    entry: Option<(Arc<ScenarioCatalog>, Instant)>,
}

impl Default for CachedCatalog {
    fn default() -> Self {
        Self::new(CATALOG_CACHE_TTL)
    }
}

impl CachedCatalog {
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// True when a loaded copy exists and is younger than the TTL at `now`.
    #[must_use]
    pub fn is_fresh(&self, now: Instant) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|(_, loaded_at)| now.saturating_duration_since(*loaded_at) < self.ttl)
    }

    pub fn get<S>(&mut self, source: &S, now: Instant) -> Arc<ScenarioCatalog>
    where
        S: ScenarioSource + ?Sized,
    {
        if self.is_fresh(now)
            && let Some((catalog, _)) = &self.entry
        {
            return Arc::clone(catalog);
        }
        log::debug!("Catalog cache reload | source:{}", source.describe());
        let catalog = Arc::new(ScenarioCatalog::load(source));
        self.entry = Some((Arc::clone(&catalog), now));
        catalog
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CreatedBy;
    use std::cell::Cell;

    const SMALL: &str = r#"{
        "early": [
            {
                "id": "cold-burrito",
                "title": "Cold Burrito",
                "text": "A customer says their burrito was cold.",
                "choices": [
                    { "id": "refund", "label": "Refund", "effects": { "money": -10, "reputation": 5 } },
                    { "id": "shrug", "label": "Shrug", "effects": { "reputation": -5 } }
                ],
                "tags": ["customer-service"],
                "difficulty": "early",
                "createdBy": "static"
            }
        ],
        "late": [
            {
                "id": "storm",
                "title": "Storm Warning",
                "text": "Thunderstorms are coming this weekend.",
                "choices": [
                    { "id": "stay", "label": "Stay open", "effects": { "money": 15, "energy": -15 } },
                    { "id": "rest", "label": "Rest", "effects": { "energy": 15 } }
                ],
                "tags": ["weather"],
                "difficulty": "late",
                "createdBy": "ai"
            }
        ]
    }"#;

    struct CountingSource {
        json: &'static str,
        calls: Cell<u32>,
    }

    impl ScenarioSource for CountingSource {
        type Error = std::convert::Infallible;

        fn load_scenarios(&self) -> Result<String, Self::Error> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.json.to_string())
        }
    }

    #[test]
    fn parses_tiers_and_tolerates_missing_ones() {
        let (catalog, report) = ScenarioCatalog::from_json(SMALL).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.accepted, 2);
        assert_eq!(catalog.tier(Difficulty::Early).len(), 1);
        assert!(catalog.tier(Difficulty::Mid).is_empty());
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.by_tag(ScenarioTag::Weather)[0].id,
            "storm".to_string()
        );
        assert!(catalog.by_id("cold-burrito").is_some());
        assert!(catalog.by_id("missing").is_none());
    }

    #[test]
    fn malformed_entries_are_dropped_individually() {
        let json = r#"{
            "early": [
                { "id": "no-choices", "title": "Nothing", "text": "No choices at all here.", "choices": [],
                  "tags": [], "difficulty": "early", "createdBy": "static" },
                { "id": "bad-tag", "title": "Bad Tag", "text": "Tag is not in the list.", "choices": [],
                  "tags": ["taxes"], "difficulty": "early", "createdBy": "static" },
                { "id": "ok", "title": "Fine One", "text": "This one is perfectly fine.", "difficulty": "early",
                  "tags": [], "createdBy": "static",
                  "choices": [ { "id": "a", "label": "A", "effects": {} }, { "id": "b", "label": "B", "effects": { "energy": 5 } } ] },
                { "id": "ok", "title": "Fine Twin", "text": "Same id as the previous.", "difficulty": "early",
                  "tags": [], "createdBy": "static",
                  "choices": [ { "id": "a", "label": "A", "effects": {} }, { "id": "b", "label": "B", "effects": {} } ] },
                { "id": "misfiled", "title": "Misfiled", "text": "Declares the mid tier.", "difficulty": "mid",
                  "tags": [], "createdBy": "static",
                  "choices": [ { "id": "a", "label": "A", "effects": {} }, { "id": "b", "label": "B", "effects": {} } ] }
            ]
        }"#;
        let (catalog, report) = ScenarioCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(report.accepted, 1);
        assert_eq!(report.rejected.len(), 4);
        assert!(matches!(
            report.rejected[0].reason,
            RejectReason::Invalid(ScenarioError::ChoiceCount(0))
        ));
        assert!(matches!(report.rejected[1].reason, RejectReason::Malformed(_)));
        assert_eq!(report.rejected[2].reason, RejectReason::DuplicateId);
        assert_eq!(
            report.rejected[3].reason,
            RejectReason::WrongTier {
                declared: Difficulty::Mid
            }
        );
        assert_eq!(report.rejected[3].id.as_deref(), Some("misfiled"));
    }

    #[test]
    fn entries_missing_required_fields_are_malformed() {
        let json = r#"{
            "early": [
                { "id": "no-author", "title": "No Author", "text": "Missing the createdBy field.", "difficulty": "early",
                  "tags": [],
                  "choices": [ { "id": "a", "label": "A", "effects": {} }, { "id": "b", "label": "B", "effects": {} } ] },
                { "id": "no-tags", "title": "No Tags", "text": "Missing the tags field.", "difficulty": "early",
                  "createdBy": "static",
                  "choices": [ { "id": "a", "label": "A", "effects": {} }, { "id": "b", "label": "B", "effects": {} } ] },
                { "id": "no-effects", "title": "No Effects", "text": "A choice has no effects.", "difficulty": "early",
                  "tags": [], "createdBy": "static",
                  "choices": [ { "id": "a", "label": "A" }, { "id": "b", "label": "B", "effects": {} } ] },
                { "id": "complete", "title": "Complete", "text": "Every required field is here.", "difficulty": "early",
                  "tags": [], "createdBy": "ai",
                  "choices": [ { "id": "a", "label": "A", "effects": {} }, { "id": "b", "label": "B", "effects": {} } ] }
            ]
        }"#;
        let (catalog, report) = ScenarioCatalog::from_json(json).unwrap();
        assert_eq!(report.accepted, 1);
        assert_eq!(report.rejected.len(), 3);
        for (rejection, id) in report.rejected.iter().zip(["no-author", "no-tags", "no-effects"]) {
            assert_eq!(rejection.id.as_deref(), Some(id));
            assert!(matches!(rejection.reason, RejectReason::Malformed(_)));
        }
        assert_eq!(
            catalog.by_id("complete").map(|s| s.created_by),
            Some(CreatedBy::Ai)
        );
        assert!(catalog.by_id("no-author").is_none());
    }

    #[test]
    fn unreadable_source_yields_empty_catalog() {
        let source = FileSource::new("/definitely/not/here/scenarios.json");
        let catalog = ScenarioCatalog::load(&source);
        assert!(catalog.is_empty());
        assert!(matches!(
            source.load_scenarios(),
            Err(CatalogError::Io { .. })
        ));
    }

    #[test]
    fn unparsable_document_yields_empty_catalog() {
        let source = CountingSource {
            json: "[not a catalog",
            calls: Cell::new(0),
        };
        assert!(ScenarioCatalog::load(&source).is_empty());
        assert!(matches!(
            ScenarioCatalog::from_json("[1, 2]"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn embedded_catalog_is_shared() {
        let first = catalog();
        let second = catalog();
        assert!(std::ptr::eq(first, second));
        assert!(!first.is_empty());
    }

    #[test]
    fn cache_reloads_only_when_stale() {
        let source = CountingSource {
            json: SMALL,
            calls: Cell::new(0),
        };
        let mut cache = CachedCatalog::default();
        let start = Instant::now();

        let first = cache.get(&source, start);
        let again = cache.get(&source, start + Duration::from_secs(59));
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(source.calls.get(), 1);

        let reloaded = cache.get(&source, start + Duration::from_secs(60));
        assert_eq!(source.calls.get(), 2);
        assert_eq!(*reloaded, *first);

        cache.invalidate();
        assert!(!cache.is_fresh(start + Duration::from_secs(61)));
        let _ = cache.get(&source, start + Duration::from_secs(61));
        assert_eq!(source.calls.get(), 3);
    }
}
