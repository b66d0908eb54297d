// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, IntoEnumIterator};
use uuid::Uuid;

use crate::core::geo::Coordinates;

// --- Shared Types ---

/// Severity of a violation category, used to color findings in the UI.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

// --- Moderation Models ---

/// The kind of content submitted for moderation.
///
/// This is a tag only: the generator never looks at the content itself.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[default]
    Text,
    Image,
    Video,
    Audio,
}

impl ContentKind {
    /// Returns the next kind in declaration order, wrapping around.
    pub fn next(self) -> Self {
        cycle(self, 1)
    }

    /// Returns the previous kind in declaration order, wrapping around.
    pub fn previous(self) -> Self {
        cycle(self, -1)
    }
}

/// The fixed set of named violation categories the verdict generator draws for.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViolationCategory {
    Violence,
    Nudity,
    HateSpeech,
    Harassment,
    Spam,
    Misinformation,
    Copyright,
    SelfHarm,
}

/// A synthetic moderation decision.
///
/// Created fresh on every simulated scan and discarded when the next one starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub content_kind: ContentKind,
    pub allowed: bool,
    /// Percentage in `[0, 100]`.
    pub confidence: f64,
    /// Human-readable reasons, in category table order. Empty when allowed.
    pub reasons: Vec<String>,
    /// One entry per category that applies to `content_kind`.
    pub category_flags: BTreeMap<ViolationCategory, bool>,
    /// Percentage in `[0, 100]`.
    pub safety_score: u8,
    pub generated_at: DateTime<Utc>,
}

impl Verdict {
    /// Categories whose flag tripped, in category order.
    pub fn tripped(&self) -> impl Iterator<Item = ViolationCategory> + '_ {
        self.category_flags
            .iter()
            .filter(|(_, tripped)| **tripped)
            .map(|(category, _)| *category)
    }
}

// --- Check-in Models ---

/// How the subject performed the check-in.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum CheckInMethod {
    #[default]
    Biometric,
    #[strum(to_string = "QR Code")]
    QrCode,
    Geolocation,
    Manual,
}

impl CheckInMethod {
    pub fn next(self) -> Self {
        cycle(self, 1)
    }

    pub fn previous(self) -> Self {
        cycle(self, -1)
    }
}

/// Where a location estimate came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    /// The simulated device granted the location request.
    Device,
    /// The request was denied and the configured mock position was substituted.
    Fallback,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LocationEstimate {
    pub coordinates: Coordinates,
    pub accuracy_m: f64,
    pub source: LocationSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplianceFlags {
    pub within_geofence: bool,
    /// Name of the nearest configured geofence, if any exist.
    pub geofence: Option<String>,
    /// Distance to the nearest geofence center, in meters.
    pub distance_m: f64,
    pub identity_verified: bool,
    /// Only set for biometric check-ins.
    pub biometric_score: Option<u8>,
    pub on_schedule: bool,
}

impl ComplianceFlags {
    pub fn is_compliant(&self) -> bool {
        self.within_geofence && self.identity_verified && self.on_schedule
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRecord {
    pub id: Uuid,
    pub subject_id: String,
    pub timestamp: DateTime<Utc>,
    pub location: LocationEstimate,
    pub method: CheckInMethod,
    /// QR join code issued for `CheckInMethod::QrCode` check-ins.
    pub join_code: Option<String>,
    pub compliance: ComplianceFlags,
}

// --- Scan Pipeline ---

/// The finished product of a simulated scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanOutcome {
    Moderation(Verdict),
    CheckIn(CheckInRecord),
}

/// Messages sent from the scan task to the UI loop.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    Progress(u8),
    Completed(ScanOutcome),
}

fn cycle<T: IntoEnumIterator + PartialEq + Copy>(current: T, step: isize) -> T {
    let all: Vec<T> = T::iter().collect();
    let len = all.len() as isize;
    let idx = all.iter().position(|v| *v == current).unwrap_or(0) as isize;
    all[(idx + step).rem_euclid(len) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_kind_cycles_both_ways() {
        assert_eq!(ContentKind::Text.next(), ContentKind::Image);
        assert_eq!(ContentKind::Audio.next(), ContentKind::Text);
        assert_eq!(ContentKind::Text.previous(), ContentKind::Audio);
    }

    #[test]
    fn check_in_method_cycles() {
        assert_eq!(CheckInMethod::Manual.next(), CheckInMethod::Biometric);
        assert_eq!(CheckInMethod::Biometric.previous(), CheckInMethod::Manual);
        assert_eq!(CheckInMethod::QrCode.to_string(), "QR Code");
    }

    #[test]
    fn compliance_requires_every_check() {
        let mut flags = ComplianceFlags {
            within_geofence: true,
            geofence: Some("HQ".into()),
            distance_m: 12.0,
            identity_verified: true,
            biometric_score: Some(97),
            on_schedule: true,
        };
        assert!(flags.is_compliant());
        flags.on_schedule = false;
        assert!(!flags.is_compliant());
    }

    #[test]
    fn category_display_is_snake_case() {
        assert_eq!(ViolationCategory::HateSpeech.to_string(), "hate_speech");
    }
}
