//! Deterministic resume and interview-answer scoring
//!
//! The core is a set of pure text-analysis engines: format detection,
//! section extraction, role-weighted ATS scoring, ontology-driven skill
//! matching, and interview answer evaluation. Given identical inputs they
//! produce byte-identical reports.

pub mod cli;
pub mod config;
pub mod detect;
pub mod engine;
pub mod error;
pub mod extract;
pub mod input;
pub mod ontology;
pub mod output;
pub mod processing;
pub mod scoring;

pub use config::Config;
pub use engine::Engine;
pub use error::{PrepScoreError, Result};
