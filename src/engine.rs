//! Facade over the scoring core
//!
//! One entry point per recognized operation. Every method is a pure
//! function of its inputs plus the ontology snapshot the engine holds;
//! in-flight calls keep reading the snapshot they started with even if
//! the cell is swapped underneath them.

use crate::detect::{self, ResumeFormat};
use crate::error::Result;
use crate::extract::{Extractor, ParsedResume};
use crate::input;
use crate::ontology::{OntologyCell, SkillOntology};
use crate::processing::TextNormalizer;
use crate::scoring::answer::{AnswerEvaluation, AnswerEvaluator, InterviewType, Question};
use crate::scoring::ats::{AtsReport, AtsScorer};
use crate::scoring::skill_match::{SkillMatchReport, SkillMatcher};
use chrono::NaiveDate;
use std::sync::Arc;

pub struct Engine {
    ontology: OntologyCell,
    normalizer: TextNormalizer,
    evaluator: AnswerEvaluator,
    clock: Option<NaiveDate>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine backed by the built-in ontology.
    pub fn new() -> Self {
        Self::with_ontology(SkillOntology::builtin())
    }

    pub fn with_ontology(ontology: SkillOntology) -> Self {
        Self {
            ontology: OntologyCell::new(ontology),
            normalizer: TextNormalizer::new(),
            evaluator: AnswerEvaluator::new(),
            clock: None,
        }
    }

    /// Pin the clock open-ended date ranges resolve against.
    pub fn with_clock(mut self, clock: NaiveDate) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Atomically install a new ontology snapshot.
    pub fn replace_ontology(&self, ontology: SkillOntology) {
        self.ontology.replace(ontology);
    }

    pub fn ontology(&self) -> Arc<SkillOntology> {
        self.ontology.snapshot()
    }

    pub fn detect_format(&self, bytes: &[u8], mime: &str) -> Result<ResumeFormat> {
        let text = input::extract_text(bytes, mime)?;
        let normalized = self.normalizer.normalize(&text);
        Ok(detect::detect(bytes, &normalized))
    }

    /// Decode, detect, and run the format-dispatched extractor.
    pub fn extract(&self, bytes: &[u8], mime: &str) -> Result<ParsedResume> {
        let text = input::extract_text(bytes, mime)?;
        Ok(self.extract_from_text(&text, bytes))
    }

    /// Extraction over already-decoded text. The raw bytes feed the
    /// image-marker signals of format detection; pass an empty slice when
    /// they are unavailable.
    pub fn extract_from_text(&self, text: &str, bytes: &[u8]) -> ParsedResume {
        let normalized = self.normalizer.normalize(text);
        let format = detect::detect(bytes, &normalized);
        let mut extractor = Extractor::new(self.ontology.snapshot());
        if let Some(clock) = self.clock {
            extractor = extractor.with_clock(clock);
        }
        extractor.extract(&normalized, &format)
    }

    pub fn ats_score(
        &self,
        parsed: &ParsedResume,
        jd_text: &str,
        role_hint: Option<&str>,
    ) -> Result<AtsReport> {
        AtsScorer::new(self.ontology.snapshot()).score(parsed, jd_text, role_hint)
    }

    pub fn skill_match(
        &self,
        required: &[String],
        preferred: &[String],
        parsed: &ParsedResume,
        preferred_weight: Option<f64>,
    ) -> Result<SkillMatchReport> {
        let mut matcher = SkillMatcher::new(self.ontology.snapshot());
        if let Some(weight) = preferred_weight {
            matcher = matcher.with_preferred_weight(weight)?;
        }
        Ok(matcher.matches(required, preferred, &parsed.skills))
    }

    pub fn evaluate_answer(
        &self,
        question: &Question,
        answer: &str,
        interview_type: InterviewType,
    ) -> AnswerEvaluation {
        self.evaluator.evaluate(question, answer, interview_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::FormatKind;
    use crate::error::PrepScoreError;
    use crate::input::MIME_PDF;

    const RESUME: &str = "Jane Smith\njane.smith@example.com\n+1 (555) 123-4567\nAustin, Texas\n\nSummary\nBackend engineer who enjoys tidy systems and boring deploys.\n\nExperience\nSenior Engineer at Acme Corp | Jan 2020 - Jan 2024\n- Cut infrastructure spend by 30% reduction in cloud waste\n\nEducation\nB.S. Computer Science, State University, 2016\n\nSkills\nReact, Node.js, PostgreSQL, AWS";

    #[test]
    fn test_extract_from_text_end_to_end() {
        let engine = Engine::new();
        let parsed = engine.extract_from_text(RESUME, &[]);

        assert_eq!(parsed.format.kind, FormatKind::Western);
        assert_eq!(parsed.contact.email.as_deref(), Some("jane.smith@example.com"));
        assert_eq!(parsed.experience.len(), 1);
        assert!(parsed.skills.contains("PostgreSQL"));
    }

    #[test]
    fn test_full_pipeline_to_ats_report() {
        let engine = Engine::new();
        let parsed = engine.extract_from_text(RESUME, &[]);
        let report = engine
            .ats_score(
                &parsed,
                "We seek a Senior Software Engineer with React, Node.js, PostgreSQL, AWS.",
                None,
            )
            .unwrap();

        assert!(report.total > 0);
        assert_eq!(report.role.name(), "software");
    }

    #[test]
    fn test_unsupported_mime_propagates() {
        let engine = Engine::new();
        let err = engine.extract(b"plain text", "text/plain").unwrap_err();
        assert!(matches!(err, PrepScoreError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_bad_pdf_bytes_propagate_decode_error() {
        let engine = Engine::new();
        let err = engine.extract(b"%PDF-garbage", MIME_PDF).unwrap_err();
        assert!(matches!(err, PrepScoreError::Decode(_)));
    }

    #[test]
    fn test_ontology_swap_is_visible_to_new_calls() {
        let engine = Engine::new();
        let before = engine.ontology();
        engine.replace_ontology(SkillOntology::builtin());
        let after = engine.ontology();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.version(), after.version());
    }
}
