//! Static table of the violation categories the moderation simulator knows about.
//!
//! Each entry carries the human-readable text shown in the report, the severity used
//! for coloring, the content kinds it applies to, and the fixed probability with which
//! the simulator trips it. Keeping this data-driven means the generator itself stays a
//! short loop over the table.

use crate::core::models::{ContentKind, Severity, ViolationCategory};

use ContentKind::{Audio, Image, Text, Video};

/// Everything the UI and the generator need to know about one violation category.
pub struct CategoryDetail {
    pub category: ViolationCategory,
    /// A short title for list rendering.
    pub title: &'static str,
    /// The reason string copied into a verdict when this category trips.
    pub reason: &'static str,
    /// What the category stands for in the demo.
    pub description: &'static str,
    pub severity: Severity,
    /// Default probability of tripping, in `[0, 1]`.
    pub probability: f64,
    /// Content kinds this category is drawn for.
    pub applies_to: &'static [ContentKind],
}

impl CategoryDetail {
    pub fn applies_to(&self, kind: ContentKind) -> bool {
        self.applies_to.contains(&kind)
    }
}

static CATEGORIES: &[CategoryDetail] = &[
    CategoryDetail {
        category: ViolationCategory::Violence,
        title: "Graphic Violence",
        reason: "Depicts graphic violence",
        description: "The simulated vision model flagged scenes of violence or gore. In the demo this is a 5% coin flip, no frames are analysed.",
        severity: Severity::Critical,
        probability: 0.05,
        applies_to: &[Image, Video],
    },
    CategoryDetail {
        category: ViolationCategory::Nudity,
        title: "Adult Content",
        reason: "Contains adult or explicit material",
        description: "Explicit imagery detection. Drawn with a fixed 3% probability for visual content.",
        severity: Severity::Critical,
        probability: 0.03,
        applies_to: &[Image, Video],
    },
    CategoryDetail {
        category: ViolationCategory::HateSpeech,
        title: "Hate Speech",
        reason: "Contains hateful language targeting a protected group",
        description: "Language attacking people based on protected attributes. Drawn for text and spoken content.",
        severity: Severity::Critical,
        probability: 0.04,
        applies_to: &[Text, Audio],
    },
    CategoryDetail {
        category: ViolationCategory::Harassment,
        title: "Harassment",
        reason: "Targets an individual with abusive language",
        description: "Bullying or abusive messages aimed at a specific person.",
        severity: Severity::Warning,
        probability: 0.03,
        applies_to: &[Text, Audio],
    },
    CategoryDetail {
        category: ViolationCategory::Spam,
        title: "Spam",
        reason: "Looks like unsolicited bulk or promotional content",
        description: "Repetitive or promotional content posted at volume.",
        severity: Severity::Warning,
        probability: 0.05,
        applies_to: &[Text, Image, Audio],
    },
    CategoryDetail {
        category: ViolationCategory::Misinformation,
        title: "Misinformation",
        reason: "Makes claims flagged as likely false",
        description: "Claims the simulated fact checker marked as unsupported.",
        severity: Severity::Warning,
        probability: 0.02,
        applies_to: &[Text, Video],
    },
    CategoryDetail {
        category: ViolationCategory::Copyright,
        title: "Copyright Match",
        reason: "Matches a registered copyrighted work",
        description: "Fingerprint match against the (imaginary) rights holder catalogue.",
        severity: Severity::Info,
        probability: 0.02,
        applies_to: &[Image, Video, Audio],
    },
    CategoryDetail {
        category: ViolationCategory::SelfHarm,
        title: "Self-Harm",
        reason: "References self-harm",
        description: "Content that references or encourages self-harm. Routed to the wellbeing team in a real deployment.",
        severity: Severity::Critical,
        probability: 0.01,
        applies_to: &[Text, Image, Video],
    },
];

/// Retrieves the detail for a category. Every category has exactly one entry.
pub fn get_category_detail(category: ViolationCategory) -> Option<&'static CategoryDetail> {
    CATEGORIES.iter().find(|c| c.category == category)
}

/// Iterates over the categories drawn for `kind`, in table order.
pub fn categories_for(kind: ContentKind) -> impl Iterator<Item = &'static CategoryDetail> {
    CATEGORIES.iter().filter(move |c| c.applies_to(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_category_has_a_detail() {
        for category in ViolationCategory::iter() {
            let detail = get_category_detail(category).expect("missing detail");
            assert!((0.0..=1.0).contains(&detail.probability));
            assert!(!detail.reason.is_empty());
        }
    }

    #[test]
    fn every_kind_has_at_least_one_category() {
        for kind in ContentKind::iter() {
            assert!(categories_for(kind).count() > 0, "{kind} has no categories");
        }
    }

    #[test]
    fn nudity_is_visual_only() {
        let detail = get_category_detail(ViolationCategory::Nudity).unwrap();
        assert!(detail.applies_to(ContentKind::Image));
        assert!(!detail.applies_to(ContentKind::Text));
    }
}
