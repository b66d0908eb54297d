// src/core/mod.rs

// The `core` module holds everything that is not presentation: the data model,
// the category table, the simulators and the small helpers they rely on.

/// Data structures shared across the application, such as `Verdict`,
/// `CheckInRecord` and the scan events sent to the UI.
pub mod models;

/// The simulated scanners and the progress-then-result pipeline driving them.
pub mod scanner;

/// Static table of violation categories with their reasons and trip probabilities.
pub mod knowledge_base;

/// Coordinates, haversine distance and geofences.
pub mod geo;

pub mod progress;

/// Session-local history of check-ins.
pub mod checkin_log;

pub mod export;
