//! Text normalization primitives shared by every scoring engine

pub mod normalizer;

pub use normalizer::{NormalizedText, SectionKind, TextNormalizer};
