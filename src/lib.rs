/// Basic application code
pub mod app;
/// Controllers for the landing page endpoints
pub mod controller;
/// Domain objects
pub mod domain;
/// Error enums
pub mod error;
/// Submission acceptance rules
pub mod gatekeeper;
/// Repositories
pub mod repo;
/// Application settings
pub mod settings;
/// Application telemetry for tracing and logging
pub mod telemetry;
