use std::collections::{BTreeMap, HashSet};
use std::fs;

use foodtruck_game::constants::{EFFECT_MAX, EFFECT_MIN, MAX_CHOICES, MIN_CHOICES};
use foodtruck_game::{
    CachedCatalog, Difficulty, FileSource, RejectReason, ScenarioCatalog, ScenarioTag, catalog,
    validate_scenario,
};

#[test]
fn embedded_catalog_loads_cleanly() {
    let json = include_str!("../assets/scenarios.json");
    let (parsed, report) = ScenarioCatalog::from_json(json).unwrap();
    assert!(report.is_clean(), "rejected entries: {:?}", report.rejected);
    assert_eq!(report.accepted, parsed.len());
    assert_eq!(&parsed, catalog());
}

#[test]
fn every_tier_has_content() {
    for tier in Difficulty::ALL {
        let pool = catalog().tier(tier);
        assert!(pool.len() >= 3, "{tier} tier too small");
        assert!(pool.iter().all(|s| s.difficulty == tier));
    }
}

#[test]
fn embedded_scenarios_respect_schema() {
    let mut ids = HashSet::new();
    for scenario in catalog().iter() {
        validate_scenario(scenario).unwrap();
        assert!(ids.insert(scenario.id.as_str()), "duplicate {}", scenario.id);
        assert!((MIN_CHOICES..=MAX_CHOICES).contains(&scenario.choices.len()));
        for choice in &scenario.choices {
            for delta in [
                choice.effects.money_delta(),
                choice.effects.reputation_delta(),
                choice.effects.energy_delta(),
            ] {
                assert!((EFFECT_MIN..=EFFECT_MAX).contains(&delta));
            }
        }
    }
}

#[test]
fn every_tier_offers_an_energy_recovery_choice() {
    for tier in Difficulty::ALL {
        let restful = catalog()
            .tier(tier)
            .iter()
            .flat_map(|s| &s.choices)
            .filter(|c| c.effects.energy_delta() > 0)
            .count();
        assert!(restful >= 2, "{tier} tier has {restful} restful choices");
    }
}

#[test]
fn tag_coverage() {
    let mut counts: BTreeMap<ScenarioTag, usize> = BTreeMap::new();
    for scenario in catalog().iter() {
        for tag in &scenario.tags {
            *counts.entry(*tag).or_default() += 1;
        }
    }
    for tag in ScenarioTag::ALL {
        assert!(counts.contains_key(&tag), "no scenario tagged {tag}");
        assert_eq!(catalog().by_tag(tag).len(), counts[&tag]);
    }
}

#[test]
fn file_source_drops_bad_entries_and_keeps_good_ones() {
    let dir = std::env::temp_dir().join(format!("foodtruck-catalog-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("scenarios.json");
    fs::write(
        &path,
        r#"{
            "mid": [
                { "id": "too-strong", "title": "Too Strong", "text": "Effect far outside the range.", "difficulty": "mid",
                  "tags": [], "createdBy": "static",
                  "choices": [ { "id": "a", "label": "A", "effects": { "money": -50 } }, { "id": "b", "label": "B", "effects": {} } ] },
                { "id": "fine", "title": "Fine", "text": "A perfectly valid scenario.", "difficulty": "mid", "tags": ["permits"], "createdBy": "static",
                  "choices": [ { "id": "a", "label": "A", "effects": { "money": 5 } }, { "id": "b", "label": "B", "effects": {} } ] }
            ]
        }"#,
    )
    .unwrap();

    let source = FileSource::new(&path);
    let (loaded, report) = ScenarioCatalog::load_with_report(&source);
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.tier(Difficulty::Mid)[0].id, "fine");
    assert_eq!(report.rejected.len(), 1);
    assert!(matches!(report.rejected[0].reason, RejectReason::Invalid(_)));

    let mut cache = CachedCatalog::default();
    let cached = cache.get(&source, std::time::Instant::now());
    assert_eq!(*cached, loaded);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_file_soft_fails_to_empty_catalog() {
    let source = FileSource::new("/nonexistent/foodtruck/scenarios.json");
    let loaded = ScenarioCatalog::load(&source);
    assert!(loaded.is_empty());
    for tier in Difficulty::ALL {
        assert!(loaded.tier(tier).is_empty());
    }
}
