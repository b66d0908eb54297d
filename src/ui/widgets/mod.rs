// src/ui/widgets/mod.rs

// Module declarations for all UI widgets.
pub mod analysis_view; // Verdict / check-in result view, with the scan gauge.
pub mod disclaimer_popup;
pub mod footer;
pub mod input; // Screen tabs and the text input.
pub mod log_view;
pub mod summary;
