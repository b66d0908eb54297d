// src/core/checkin_log.rs

use crate::core::models::CheckInRecord;

/// In-memory, append-only history of check-ins for the running session.
///
/// Records keep insertion order. Nothing is persisted unless explicitly exported.
#[derive(Debug, Clone, Default)]
pub struct CheckInLog {
    records: Vec<CheckInRecord>,
}

impl CheckInLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: CheckInRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[CheckInRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&CheckInRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn for_subject<'a>(&'a self, subject_id: &'a str) -> impl Iterator<Item = &'a CheckInRecord> {
        self.records.iter().filter(move |r| r.subject_id == subject_id)
    }

    pub fn compliant_count(&self) -> usize {
        self.records.iter().filter(|r| r.compliance.is_compliant()).count()
    }

    /// Share of compliant check-ins as a percentage, or `None` for an empty log.
    pub fn compliance_rate(&self) -> Option<u8> {
        if self.records.is_empty() {
            return None;
        }
        let rate = self.compliant_count() * 100 / self.records.len();
        Some(rate as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Coordinates;
    use crate::core::models::{CheckInMethod, ComplianceFlags, LocationEstimate, LocationSource};
    use chrono::Utc;
    use uuid::Uuid;

    fn record(subject: &str, compliant: bool) -> CheckInRecord {
        CheckInRecord {
            id: Uuid::new_v4(),
            subject_id: subject.to_string(),
            timestamp: Utc::now(),
            location: LocationEstimate {
                coordinates: Coordinates::new(0.0, 0.0),
                accuracy_m: 10.0,
                source: LocationSource::Device,
            },
            method: CheckInMethod::Manual,
            join_code: None,
            compliance: ComplianceFlags {
                within_geofence: true,
                geofence: None,
                distance_m: 0.0,
                identity_verified: compliant,
                biometric_score: None,
                on_schedule: true,
            },
        }
    }

    #[test]
    fn keeps_insertion_order() {
        let mut log = CheckInLog::new();
        log.append(record("a", true));
        log.append(record("b", false));
        log.append(record("c", true));
        let subjects: Vec<_> = log.records().iter().map(|r| r.subject_id.as_str()).collect();
        assert_eq!(subjects, ["a", "b", "c"]);
        assert_eq!(log.latest().unwrap().subject_id, "c");
    }

    #[test]
    fn compliance_rate() {
        let mut log = CheckInLog::new();
        assert_eq!(log.compliance_rate(), None);
        log.append(record("a", true));
        log.append(record("a", false));
        log.append(record("b", true));
        log.append(record("b", true));
        assert_eq!(log.compliance_rate(), Some(75));
        assert_eq!(log.compliant_count(), 3);
    }

    #[test]
    fn filters_by_subject() {
        let mut log = CheckInLog::new();
        log.append(record("a", true));
        log.append(record("b", true));
        log.append(record("a", false));
        assert_eq!(log.for_subject("a").count(), 2);
        assert_eq!(log.for_subject("c").count(), 0);
        assert!(!log.is_empty());
    }
}
