//! Security posture scoring from a threat model and observed check results.
//!
//! [`loader::load_catalog`] turns a decoded threat model document into a
//! [`types::model::ThreatCatalog`]; [`engine::compute_score`] turns a catalog
//! and a [`types::scoring::Remediation`] into a [`types::scoring::ScoreReport`].

pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod report;
pub mod source;
pub mod types;
