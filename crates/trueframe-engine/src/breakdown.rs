//! Diagnostic breakdown generation.
//!
//! The breakdown is cosmetic: a fixed lookup keyed by verdict and confidence
//! band, presented in randomized order. It is derived from the confidence
//! score, not measured independently from the video.

use rand::seq::SliceRandom;
use rand::Rng;

use trueframe_models::{BreakdownCategory, BreakdownItem, BreakdownTag, Verdict};

/// Tags per confidence band, in canonical category order
/// (facial, temporal, compression, motion).
fn band_tags(verdict: Verdict, confidence: f64) -> [BreakdownTag; 4] {
    use BreakdownTag::{Detected, High, Natural, Suspicious};

    match verdict {
        Verdict::Fake if confidence > 95.0 => [High, Detected, Suspicious, Natural],
        Verdict::Fake if confidence > 75.0 => [Suspicious, Detected, Suspicious, Natural],
        Verdict::Fake => [Suspicious, Natural, Suspicious, Natural],
        Verdict::Real if confidence > 95.0 => [Natural, Natural, Natural, Natural],
        Verdict::Real => [Natural, Natural, Suspicious, Natural],
    }
}

/// Generate the four-item breakdown for a verdict and confidence score.
///
/// The name→tag mapping is fixed per band; only presentation order varies,
/// driven by the supplied `Rng` so tests can seed it.
pub fn generate_breakdown<R: Rng + ?Sized>(
    verdict: Verdict,
    confidence: f64,
    rng: &mut R,
) -> Vec<BreakdownItem> {
    let tags = band_tags(verdict, confidence);
    let mut items: Vec<BreakdownItem> = BreakdownCategory::ALL
        .iter()
        .zip(tags)
        .map(|(&name, tag)| BreakdownItem::new(name, tag))
        .collect();
    items.shuffle(rng);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn tag_by_category(items: &[BreakdownItem]) -> HashMap<BreakdownCategory, BreakdownTag> {
        items.iter().map(|item| (item.name, item.tag)).collect()
    }

    fn breakdown(verdict: Verdict, confidence: f64) -> Vec<BreakdownItem> {
        generate_breakdown(verdict, confidence, &mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_always_four_items_covering_every_category() {
        for (verdict, confidence) in [
            (Verdict::Fake, 99.0),
            (Verdict::Fake, 80.0),
            (Verdict::Fake, 60.0),
            (Verdict::Real, 99.0),
            (Verdict::Real, 70.0),
        ] {
            let items = breakdown(verdict, confidence);
            assert_eq!(items.len(), 4);
            let mut categories: Vec<BreakdownCategory> =
                items.iter().map(|item| item.name).collect();
            categories.sort_by_key(|c| c.as_str());
            let mut expected: Vec<BreakdownCategory> = BreakdownCategory::ALL.to_vec();
            expected.sort_by_key(|c| c.as_str());
            assert_eq!(categories, expected);
        }
    }

    #[test]
    fn test_fake_strongest_band() {
        let tags = tag_by_category(&breakdown(Verdict::Fake, 97.0));
        assert_eq!(tags[&BreakdownCategory::FacialInconsistencies], BreakdownTag::High);
        assert_eq!(tags[&BreakdownCategory::TemporalArtifacts], BreakdownTag::Detected);
        assert_eq!(tags[&BreakdownCategory::CompressionPatterns], BreakdownTag::Suspicious);
        assert_eq!(tags[&BreakdownCategory::MotionAnalysis], BreakdownTag::Natural);
    }

    #[test]
    fn test_fake_middle_band() {
        let tags = tag_by_category(&breakdown(Verdict::Fake, 80.0));
        assert_eq!(tags[&BreakdownCategory::FacialInconsistencies], BreakdownTag::Suspicious);
        assert_eq!(tags[&BreakdownCategory::TemporalArtifacts], BreakdownTag::Detected);
        assert_eq!(tags[&BreakdownCategory::CompressionPatterns], BreakdownTag::Suspicious);
        assert_eq!(tags[&BreakdownCategory::MotionAnalysis], BreakdownTag::Natural);
    }

    #[test]
    fn test_fake_weakest_band() {
        let tags = tag_by_category(&breakdown(Verdict::Fake, 60.0));
        assert_eq!(tags[&BreakdownCategory::TemporalArtifacts], BreakdownTag::Natural);
        assert_eq!(tags[&BreakdownCategory::CompressionPatterns], BreakdownTag::Suspicious);
    }

    #[test]
    fn test_real_bands() {
        let high = tag_by_category(&breakdown(Verdict::Real, 99.0));
        assert!(high.values().all(|&tag| tag == BreakdownTag::Natural));

        // At or below 95, compression alone reads suspicious
        let low = tag_by_category(&breakdown(Verdict::Real, 90.0));
        assert_eq!(low[&BreakdownCategory::CompressionPatterns], BreakdownTag::Suspicious);
        assert_eq!(low[&BreakdownCategory::FacialInconsistencies], BreakdownTag::Natural);
        assert_eq!(low[&BreakdownCategory::TemporalArtifacts], BreakdownTag::Natural);
        assert_eq!(low[&BreakdownCategory::MotionAnalysis], BreakdownTag::Natural);
    }

    #[test]
    fn test_band_boundary_at_95_falls_low() {
        let tags = tag_by_category(&breakdown(Verdict::Real, 95.0));
        assert_eq!(tags[&BreakdownCategory::CompressionPatterns], BreakdownTag::Suspicious);
    }

    #[test]
    fn test_only_order_varies_across_seeds() {
        let reference = tag_by_category(&breakdown(Verdict::Fake, 97.0));
        for seed in 0..20u64 {
            let items =
                generate_breakdown(Verdict::Fake, 97.0, &mut StdRng::seed_from_u64(seed));
            assert_eq!(tag_by_category(&items), reference);
        }
    }

    #[test]
    fn test_same_seed_same_order() {
        let a = generate_breakdown(Verdict::Real, 90.0, &mut StdRng::seed_from_u64(3));
        let b = generate_breakdown(Verdict::Real, 90.0, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
