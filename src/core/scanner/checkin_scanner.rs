// src/core/scanner/checkin_scanner.rs

use chrono::{DateTime, Local, Timelike, Utc};
use rand::Rng;
use std::f64::consts::TAU;
use std::fmt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::CheckInConfig;
use crate::core::geo::nearest_geofence;
use crate::core::models::{
    CheckInMethod, CheckInRecord, ComplianceFlags, LocationEstimate, LocationSource,
};

/// Accuracy reported for the substituted mock position.
const FALLBACK_ACCURACY_M: f64 = 5_000.0;
/// Best accuracy the simulated receiver ever reports.
const MIN_ACCURACY_M: f64 = 5.0;

/// Why the simulated geolocation request did not produce a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    PermissionDenied,
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationError::PermissionDenied => write!(f, "location permission denied"),
        }
    }
}

impl std::error::Error for LocationError {}

/// Simulates asking the device for its position.
///
/// With `permission_denial_probability` the request is rejected. Otherwise the result
/// is the configured site displaced by up to `jitter_m` meters in a random direction.
pub fn request_location<R: Rng + ?Sized>(
    rng: &mut R,
    config: &CheckInConfig,
) -> Result<LocationEstimate, LocationError> {
    let denial = config.permission_denial_probability.clamp(0.0, 1.0);
    if rng.gen_bool(denial) {
        return Err(LocationError::PermissionDenied);
    }

    let (distance, bearing) = if config.jitter_m > 0.0 {
        (rng.gen_range(0.0..=config.jitter_m), rng.gen_range(0.0..TAU))
    } else {
        (0.0, 0.0)
    };
    let coordinates = config.site.offset_m(distance * bearing.cos(), distance * bearing.sin());
    let accuracy_m = (distance * 1.2).max(MIN_ACCURACY_M).round();
    debug!(distance, accuracy_m, "Simulated device location acquired.");

    Ok(LocationEstimate { coordinates, accuracy_m, source: LocationSource::Device })
}

/// Requests a location and substitutes the configured mock position on failure.
pub fn resolve_location<R: Rng + ?Sized>(rng: &mut R, config: &CheckInConfig) -> LocationEstimate {
    match request_location(rng, config) {
        Ok(estimate) => estimate,
        Err(e) => {
            warn!(error = %e, "Geolocation unavailable, falling back to mock position.");
            LocationEstimate {
                coordinates: config.fallback,
                accuracy_m: FALLBACK_ACCURACY_M,
                source: LocationSource::Fallback,
            }
        }
    }
}

/// Whether a local hour falls inside the configured `[start, end)` window.
pub fn is_on_schedule(hour: u32, config: &CheckInConfig) -> bool {
    (config.schedule_start_hour..config.schedule_end_hour).contains(&hour)
}

/// Produces a synthetic check-in record.
///
/// # Arguments
/// * `rng` - Source of randomness.
/// * `subject_id` - Who is checking in. Empty input falls back to the configured default.
/// * `method` - The check-in method chosen in the UI.
/// * `config` - Site, geofences, probabilities and schedule.
/// * `now` - Timestamp recorded on the check-in.
pub fn generate_check_in<R: Rng + ?Sized>(
    rng: &mut R,
    subject_id: &str,
    method: CheckInMethod,
    config: &CheckInConfig,
    now: DateTime<Utc>,
) -> CheckInRecord {
    let subject_id = match subject_id.trim() {
        "" => config.default_subject.clone(),
        s => s.to_string(),
    };
    info!(subject = %subject_id, method = %method, "Starting check-in.");

    let location = resolve_location(rng, config);

    let (geofence, distance_m, within_geofence) =
        match nearest_geofence(&config.geofences, location.coordinates) {
            Some((fence, distance)) => {
                (Some(fence.name.clone()), distance, fence.contains(location.coordinates))
            }
            None => (None, 0.0, false),
        };

    let mut biometric_score = None;
    let mut join_code = None;
    let identity_verified = match method {
        CheckInMethod::Biometric => {
            let score = draw_biometric_score(rng, config);
            biometric_score = Some(score);
            score >= config.biometric_threshold
        }
        CheckInMethod::QrCode => {
            join_code = Some(new_join_code());
            true
        }
        CheckInMethod::Geolocation => {
            within_geofence && location.source == LocationSource::Device
        }
        CheckInMethod::Manual => false,
    };

    let on_schedule = is_on_schedule(now.with_timezone(&Local).hour(), config);

    let compliance = ComplianceFlags {
        within_geofence,
        geofence,
        distance_m: distance_m.round(),
        identity_verified,
        biometric_score,
        on_schedule,
    };

    info!(
        subject = %subject_id,
        within_geofence,
        identity_verified,
        on_schedule,
        compliant = compliance.is_compliant(),
        "Check-in finished."
    );

    CheckInRecord {
        id: Uuid::new_v4(),
        subject_id,
        timestamp: now,
        location,
        method,
        join_code,
        compliance,
    }
}

fn draw_biometric_score<R: Rng + ?Sized>(rng: &mut R, config: &CheckInConfig) -> u8 {
    let failure = config.biometric_failure_probability.clamp(0.0, 1.0);
    let score = if rng.gen_bool(failure) {
        rng.gen_range(40..=79)
    } else {
        rng.gen_range(90..=100)
    };
    debug!(score, "Biometric match score drawn.");
    score
}

/// A short, human-typeable code shown as the QR payload.
fn new_join_code() -> String {
    let raw = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("HZN-{}-{}", &raw[..4], &raw[4..8])
}
