// src/core/scanner/moderation_scanner.rs

use chrono::Utc;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::{ModerationConfig, PercentRange, ScoreRange};
use crate::core::knowledge_base;
use crate::core::models::{ContentKind, Verdict, ViolationCategory};

/// Produces a synthetic moderation verdict for a piece of content.
///
/// No content is inspected. For every category that applies to `kind` an independent
/// Bernoulli draw is made with that category's probability. Any tripped category blocks
/// the content and contributes its reason; confidence and safety score come from the
/// configured "blocked" or "allowed" ranges.
///
/// # Arguments
/// * `rng` - Source of randomness. Seed it for reproducible verdicts.
/// * `kind` - The content category tag.
/// * `config` - Probability overrides and score ranges.
pub fn generate_verdict<R: Rng + ?Sized>(
    rng: &mut R,
    kind: ContentKind,
    config: &ModerationConfig,
) -> Verdict {
    info!(kind = %kind, "Starting moderation scan.");

    let mut category_flags = BTreeMap::new();
    for detail in knowledge_base::categories_for(kind) {
        let probability = config.probability_for(detail.category).clamp(0.0, 1.0);
        let tripped = rng.gen_bool(probability);
        debug!(category = %detail.category, probability, tripped, "Category drawn.");
        category_flags.insert(detail.category, tripped);
    }

    let reasons = collect_reasons(&category_flags);
    let allowed = reasons.is_empty();

    let (confidence, safety_score) = if allowed {
        (
            draw_percent(rng, config.allowed_confidence),
            draw_score(rng, config.allowed_safety),
        )
    } else {
        (
            draw_percent(rng, config.blocked_confidence),
            draw_score(rng, config.blocked_safety),
        )
    };

    info!(allowed, confidence, safety_score, reasons = reasons.len(), "Moderation scan finished.");

    Verdict {
        content_kind: kind,
        allowed,
        confidence,
        reasons,
        category_flags,
        safety_score,
        generated_at: Utc::now(),
    }
}

/// Reasons for every tripped category, in category order, without duplicates.
fn collect_reasons(flags: &BTreeMap<ViolationCategory, bool>) -> Vec<String> {
    let mut reasons: Vec<String> = Vec::new();
    for (category, tripped) in flags {
        if !tripped {
            continue;
        }
        if let Some(detail) = knowledge_base::get_category_detail(*category) {
            if !reasons.iter().any(|r| r == detail.reason) {
                reasons.push(detail.reason.to_string());
            }
        }
    }
    reasons
}

/// Uniform draw in the range, rounded to one decimal and clamped to `[0, 100]`.
fn draw_percent<R: Rng + ?Sized>(rng: &mut R, range: PercentRange) -> f64 {
    let value = if range.min >= range.max {
        range.min
    } else {
        rng.gen_range(range.min..=range.max)
    };
    ((value * 10.0).round() / 10.0).clamp(0.0, 100.0)
}

fn draw_score<R: Rng + ?Sized>(rng: &mut R, range: ScoreRange) -> u8 {
    let value = if range.min >= range.max {
        range.min
    } else {
        rng.gen_range(range.min..=range.max)
    };
    value.min(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use strum::IntoEnumIterator;

    fn always_trip(category: ViolationCategory) -> ModerationConfig {
        let mut config = ModerationConfig::default();
        for c in ViolationCategory::iter() {
            config.probabilities.insert(c, 0.0);
        }
        config.probabilities.insert(category, 1.0);
        config
    }

    #[test]
    fn verdict_invariants_hold_over_many_draws() {
        let mut config = ModerationConfig::default();
        // Raise the odds so both branches get exercised.
        for c in ViolationCategory::iter() {
            config.probabilities.insert(c, 0.2);
        }
        let mut rng = StdRng::seed_from_u64(2050);
        let (mut seen_allowed, mut seen_blocked) = (false, false);

        for i in 0..2_000 {
            let kind = ContentKind::iter().nth(i % 4).unwrap();
            let v = generate_verdict(&mut rng, kind, &config);

            assert!((0.0..=100.0).contains(&v.confidence));
            assert!(v.safety_score <= 100);

            let any_tripped = v.category_flags.values().any(|t| *t);
            if any_tripped {
                assert!(!v.allowed);
                assert!(!v.reasons.is_empty());
                assert!(v.confidence >= 95.0);
                seen_blocked = true;
            } else {
                assert!(v.allowed);
                assert!(v.reasons.is_empty());
                seen_allowed = true;
            }
        }
        assert!(seen_allowed && seen_blocked);
    }

    #[test]
    fn flags_cover_exactly_the_applicable_categories() {
        let mut rng = StdRng::seed_from_u64(7);
        let v = generate_verdict(&mut rng, ContentKind::Text, &ModerationConfig::default());
        let expected: Vec<_> = knowledge_base::categories_for(ContentKind::Text)
            .map(|d| d.category)
            .collect();
        let mut got: Vec<_> = v.category_flags.keys().copied().collect();
        got.sort();
        let mut expected_sorted = expected.clone();
        expected_sorted.sort();
        assert_eq!(got, expected_sorted);
        assert!(!v.category_flags.contains_key(&ViolationCategory::Nudity));
    }

    #[test]
    fn certain_category_blocks_with_its_reason() {
        let config = always_trip(ViolationCategory::Spam);
        let mut rng = StdRng::seed_from_u64(1);
        let v = generate_verdict(&mut rng, ContentKind::Text, &config);
        assert!(!v.allowed);
        assert_eq!(v.reasons, vec![
            knowledge_base::get_category_detail(ViolationCategory::Spam).unwrap().reason.to_string()
        ]);
        assert_eq!(v.tripped().collect::<Vec<_>>(), vec![ViolationCategory::Spam]);
    }

    #[test]
    fn zero_probabilities_always_allow() {
        let mut config = ModerationConfig::default();
        for c in ViolationCategory::iter() {
            config.probabilities.insert(c, 0.0);
        }
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let v = generate_verdict(&mut rng, ContentKind::Video, &config);
            assert!(v.allowed);
            assert!(v.safety_score >= 85);
            assert!((88.0..=99.0).contains(&v.confidence));
        }
    }

    #[test]
    fn degenerate_ranges_return_their_bound() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(draw_percent(&mut rng, PercentRange { min: 97.0, max: 97.0 }), 97.0);
        assert_eq!(draw_score(&mut rng, ScoreRange { min: 42, max: 42 }), 42);
    }
}
