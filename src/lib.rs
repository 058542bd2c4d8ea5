//
// lib.rs
// DocVerify-Tools-rs
//
// Exposes the scoring pipeline modules and re-exports the main entry points for binary and library consumers.
//
// Thales Matheus Mendonça Santos - November 2025

// Public surface of the library: each module is one pipeline stage or one CLI verb.
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod filters;
pub mod image;
pub mod intake;
pub mod logging;
pub mod models;
pub mod quarantine;
pub mod report;
pub mod signals;
pub mod stats;
pub mod storage;
pub mod validate;

pub use cli::{run as run_cli, Cli, Commands};
pub use config::ValidationThresholds;
pub use error::{DocumentError, ErrorKind};
pub use models::{QuarantineReason, SignalScores, ValidationVerdict};
pub use validate::{validate, validate_with_defaults, ValidationOutcome};
