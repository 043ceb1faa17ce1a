//! Entity filtering and heuristic reranking.
//!
//! The similarity retriever knows nothing about domains or rooms; this
//! layer compensates. Both functions are pure transformations of their
//! inputs — same input, same output, no side effects — with all word
//! lists supplied by [`VocabularySettings`].

use hearth_core::Document;
use hearth_settings::VocabularySettings;

use crate::snapshot::EntitySnapshot;

/// Bonus step per preferred-domain rank: the first listed domain earns
/// `len * STEP`, the last earns `STEP`.
const DOMAIN_BONUS_STEP: i64 = 2;

/// Flat bonus when the query's location keyword appears in the candidate.
const LOCATION_BONUS: i64 = 10;

/// Flat penalty for sensor/automation-like domains.
const SENSOR_PENALTY: i64 = -5;

/// Drop entities that should never enter the retrieval index.
///
/// Removes excluded domains and numeric LED sub-controls (`number` domain
/// with "led" in the name). Idempotent: filtering an already-filtered set
/// removes nothing further.
pub fn filter_primary_entities(
    entities: &[EntitySnapshot],
    vocab: &VocabularySettings,
) -> Vec<EntitySnapshot> {
    entities
        .iter()
        .filter(|e| !is_irrelevant(e, vocab))
        .cloned()
        .collect()
}

fn is_irrelevant(entity: &EntitySnapshot, vocab: &VocabularySettings) -> bool {
    if vocab.excluded_domains.iter().any(|d| d == &entity.domain) {
        return true;
    }
    entity.domain == "number" && entity.name.to_lowercase().contains("led")
}

/// Find the first configured location keyword mentioned in the query.
pub fn detect_location<'a>(query_text: &str, keywords: &'a [String]) -> Option<&'a str> {
    let lowered = query_text.to_lowercase();
    keywords
        .iter()
        .find(|k| lowered.contains(&k.to_lowercase()))
        .map(String::as_str)
}

/// Re-score retrieval candidates by domain preference and location match.
///
/// For the candidate at rank `i` (most-similar first) in a list of `N`:
///
/// ```text
/// score = (N - i) + domain_bonus + location_bonus + sensor_penalty
/// ```
///
/// The re-sort is stable, so candidates with equal scores keep their
/// similarity order. The result is truncated to `keep_n`.
pub fn rerank(
    query_text: &str,
    docs: Vec<Document>,
    keep_n: usize,
    vocab: &VocabularySettings,
) -> Vec<Document> {
    let location = detect_location(query_text, &vocab.location_keywords);
    let total = docs.len() as i64;

    let mut scored: Vec<(i64, Document)> = docs
        .into_iter()
        .enumerate()
        .map(|(i, doc)| {
            let score = (total - i as i64) + score_adjustments(&doc, location, vocab);
            (score, doc)
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(keep_n);
    scored.into_iter().map(|(_, doc)| doc).collect()
}

fn score_adjustments(
    doc: &Document,
    location: Option<&str>,
    vocab: &VocabularySettings,
) -> i64 {
    let domain = doc.domain();

    let domain_bonus = vocab
        .preferred_domains
        .iter()
        .position(|d| d == domain)
        .map_or(0, |idx| {
            (vocab.preferred_domains.len() as i64 - idx as i64) * DOMAIN_BONUS_STEP
        });

    let location_bonus = match location {
        Some(room) if doc.content.to_lowercase().contains(&room.to_lowercase()) => LOCATION_BONUS,
        _ => 0,
    };

    let sensor_penalty = if vocab.penalized_domains.iter().any(|d| d == domain) {
        SENSOR_PENALTY
    } else {
        0
    };

    domain_bonus + location_bonus + sensor_penalty
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> VocabularySettings {
        VocabularySettings::default()
    }

    fn doc(entity_id: &str, extra: &str) -> Document {
        let domain = entity_id.split('.').next().unwrap();
        Document::new(
            format!("Entity: {entity_id}\nName: {extra}\n"),
            entity_id,
            domain,
        )
    }

    // ── filter ──────────────────────────────────────────────────────────

    #[test]
    fn filter_drops_excluded_domains() {
        let entities = vec![
            EntitySnapshot::new("light.a", "A", "light"),
            EntitySnapshot::new("sensor.temp", "Temp", "sensor"),
            EntitySnapshot::new("automation.night", "Night", "automation"),
        ];
        let kept = filter_primary_entities(&entities, &vocab());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].entity_id, "light.a");
    }

    #[test]
    fn filter_drops_numeric_led_controls() {
        let mut v = vocab();
        // The heuristic matters on its own when `number` is not excluded.
        v.excluded_domains.retain(|d| d != "number");
        let entities = vec![
            EntitySnapshot::new("number.soundbar_led_brightness", "LED Brightness", "number"),
            EntitySnapshot::new("number.target_humidity", "Target Humidity", "number"),
        ];
        let kept = filter_primary_entities(&entities, &v);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].entity_id, "number.target_humidity");
    }

    #[test]
    fn filter_is_idempotent() {
        let entities = vec![
            EntitySnapshot::new("light.a", "A", "light"),
            EntitySnapshot::new("sensor.temp", "Temp", "sensor"),
            EntitySnapshot::new("media_player.tv", "TV", "media_player"),
        ];
        let once = filter_primary_entities(&entities, &vocab());
        let twice = filter_primary_entities(&once, &vocab());
        assert_eq!(once, twice);
    }

    // ── detect_location ─────────────────────────────────────────────────

    #[test]
    fn detect_location_first_match() {
        let keywords = vocab().location_keywords;
        let found = detect_location("dim the Living Room lights please", &keywords);
        assert_eq!(found, Some("living room"));
    }

    #[test]
    fn detect_location_none() {
        let keywords = vocab().location_keywords;
        assert_eq!(detect_location("turn everything off", &keywords), None);
    }

    // ── rerank ──────────────────────────────────────────────────────────

    #[test]
    fn rerank_prefers_location_and_domain() {
        let docs = vec![
            doc("light.living_room", "Living Room Light"),
            doc("light.bedroom", "Bedroom Light"),
            doc("sensor.temperature", "Temperature"),
            doc("media_player.living_room", "Living Room Speaker"),
        ];
        let ranked = rerank("turn on the living room lights", docs, 2, &vocab());
        let ids: Vec<&str> = ranked.iter().map(|d| d.metadata.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["light.living_room", "media_player.living_room"]);
    }

    #[test]
    fn rerank_is_deterministic() {
        let docs = vec![
            doc("light.office", "Office Light"),
            doc("fan.office", "Office Fan"),
            doc("climate.office", "Office Thermostat"),
        ];
        let first = rerank("make the office cozy", docs.clone(), 3, &vocab());
        let second = rerank("make the office cozy", docs, 3, &vocab());
        assert_eq!(first, second);
    }

    #[test]
    fn rerank_keeps_similarity_order_without_signals() {
        // No domain/location signal on either doc: base rank decides.
        let docs = vec![doc("vacuum.upstairs", "Upstairs"), doc("lock.front", "Front")];
        let ranked = rerank("hello", docs, 2, &vocab());
        assert_eq!(ranked[0].metadata.entity_id, "vacuum.upstairs");
    }

    #[test]
    fn rerank_penalizes_sensors() {
        let docs = vec![
            doc("sensor.kitchen_temp", "Kitchen Temp"),
            doc("light.kitchen", "Kitchen Light"),
        ];
        let ranked = rerank("kitchen", docs, 2, &vocab());
        assert_eq!(ranked[0].metadata.entity_id, "light.kitchen");
    }

    #[test]
    fn rerank_truncates() {
        let docs = vec![
            doc("light.a", "A"),
            doc("light.b", "B"),
            doc("light.c", "C"),
        ];
        assert_eq!(rerank("lights", docs, 2, &vocab()).len(), 2);
    }

    #[test]
    fn rerank_empty_input() {
        assert!(rerank("anything", Vec::new(), 5, &vocab()).is_empty());
    }
}
