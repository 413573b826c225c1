//! Interview answer evaluation
//!
//! Five dimension scores per answer, weighted by interview type. The
//! evaluator is stateless per call; cross-turn topic tracking lives in
//! [`Session`], which the caller owns and updates.

use crate::error::{PrepScoreError, Result};
use crate::processing::TextNormalizer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const FILLER_WORDS: &[&str] = &[
    "um", "uh", "umm", "uhh", "basically", "literally", "honestly", "kinda", "sorta",
];

const HEDGE_PHRASES: &[&str] = &[
    "maybe",
    "i think",
    "i guess",
    "probably",
    "not sure",
    "sort of",
    "kind of",
    "perhaps",
];

const EXAMPLE_MARKERS: &[&str] = &["for example", "for instance", "such as"];
const REASONING_MARKERS: &[&str] = &["because", "this is why"];
const INTRO_MARKERS: &[&str] = &["first", "to start", "let me start", "initially"];
const CONCLUSION_MARKERS: &[&str] = &[
    "in conclusion",
    "in summary",
    "to summarize",
    "finally",
    "overall",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterviewType {
    Technical,
    Behavioral,
    SystemDesign,
    Coding,
}

/// Dimension weights for one interview type. Every row sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnswerWeights {
    pub clarity: f64,
    pub accuracy: f64,
    pub depth: f64,
    pub structure: f64,
    pub relevance: f64,
}

impl InterviewType {
    pub const ALL: [InterviewType; 4] = [
        InterviewType::Technical,
        InterviewType::Behavioral,
        InterviewType::SystemDesign,
        InterviewType::Coding,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InterviewType::Technical => "technical",
            InterviewType::Behavioral => "behavioral",
            InterviewType::SystemDesign => "system-design",
            InterviewType::Coding => "coding",
        }
    }

    /// Parse a user-supplied interview type. Unknown tags are a
    /// configuration error at the call boundary.
    pub fn from_hint(hint: &str) -> Result<InterviewType> {
        let key = hint.trim().to_lowercase();
        InterviewType::ALL
            .iter()
            .copied()
            .find(|t| t.name() == key)
            .ok_or_else(|| {
                PrepScoreError::Config(format!(
                    "unrecognized interview type '{}'; expected one of: {}",
                    hint,
                    InterviewType::ALL
                        .iter()
                        .map(|t| t.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }

    pub fn weights(&self) -> AnswerWeights {
        match self {
            InterviewType::Technical => AnswerWeights {
                clarity: 0.25,
                accuracy: 0.30,
                depth: 0.20,
                structure: 0.15,
                relevance: 0.10,
            },
            InterviewType::Behavioral => AnswerWeights {
                clarity: 0.25,
                accuracy: 0.15,
                depth: 0.10,
                structure: 0.30,
                relevance: 0.20,
            },
            InterviewType::SystemDesign => AnswerWeights {
                clarity: 0.20,
                accuracy: 0.25,
                depth: 0.30,
                structure: 0.15,
                relevance: 0.10,
            },
            InterviewType::Coding => AnswerWeights {
                clarity: 0.15,
                accuracy: 0.35,
                depth: 0.25,
                structure: 0.15,
                relevance: 0.10,
            },
        }
    }

    /// Optimal word-count band for the clarity dimension.
    fn clarity_band(&self) -> (usize, usize) {
        match self {
            InterviewType::Behavioral => (50, 250),
            _ => (20, 200),
        }
    }
}

/// An interview question with its expected-coverage contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    /// Substrings or canonical terms a correct answer should cover.
    pub expected_key_points: Vec<String>,
    #[serde(default)]
    pub is_follow_up: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEvaluation {
    pub clarity: u8,
    pub accuracy: u8,
    pub depth: u8,
    pub structure: u8,
    /// Relevance to the question, or confidence for behavioral interviews.
    pub relevance: u8,
    pub interview_type: InterviewType,
    pub weights: AnswerWeights,
    /// Weighted turn score in [0, 100].
    pub turn_score: u8,
    pub needs_follow_up: bool,
    pub follow_up_reason: Option<String>,
    pub covered_points: Vec<String>,
    pub missed_points: Vec<String>,
    pub notes: Vec<String>,
}

pub struct AnswerEvaluator {
    normalizer: TextNormalizer,
}

impl Default for AnswerEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl AnswerEvaluator {
    pub fn new() -> Self {
        Self {
            normalizer: TextNormalizer::new(),
        }
    }

    pub fn evaluate(
        &self,
        question: &Question,
        answer: &str,
        interview_type: InterviewType,
    ) -> AnswerEvaluation {
        let normalized = self.normalizer.normalize(answer);
        let lower = normalized.text.to_lowercase();
        let word_count = normalized.word_count;
        let answer_tokens: BTreeSet<&str> =
            normalized.tokens.iter().map(String::as_str).collect();

        let mut notes = Vec::new();

        let clarity = self.clarity(&lower, word_count, interview_type, &mut notes);
        let (accuracy, covered_points, missed_points) =
            self.accuracy(question, &lower, &answer_tokens);
        let depth = self.depth(&lower, word_count);
        let structure = self.structure(&normalized.text, &lower);
        let relevance = match interview_type {
            InterviewType::Behavioral => confidence(&lower),
            _ => self.relevance(&question.text, &answer_tokens),
        };

        let weights = interview_type.weights();
        let turn_score = (clarity as f64 * weights.clarity
            + accuracy as f64 * weights.accuracy
            + depth as f64 * weights.depth
            + structure as f64 * weights.structure
            + relevance as f64 * weights.relevance)
            .round() as u8;

        let (needs_follow_up, follow_up_reason) = if accuracy < 50 {
            (
                true,
                Some(format!(
                    "accuracy {} is below 50; key points were missed",
                    accuracy
                )),
            )
        } else if depth < 60 && !question.is_follow_up {
            (
                true,
                Some(format!("depth {} is below 60; probe for detail", depth)),
            )
        } else {
            (false, None)
        };

        AnswerEvaluation {
            clarity,
            accuracy,
            depth,
            structure,
            relevance,
            interview_type,
            weights,
            turn_score,
            needs_follow_up,
            follow_up_reason,
            covered_points,
            missed_points,
            notes,
        }
    }

    fn clarity(
        &self,
        lower: &str,
        word_count: usize,
        interview_type: InterviewType,
        notes: &mut Vec<String>,
    ) -> u8 {
        let (min, max) = interview_type.clarity_band();
        let base: i32 = if word_count < min {
            40
        } else if word_count > max {
            notes.push(format!(
                "answer is verbose ({} words; optimal is {}-{})",
                word_count, min, max
            ));
            60
        } else {
            85
        };

        let filler_hits: i32 = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| FILLER_WORDS.contains(word))
            .count() as i32;
        (base - 15 * filler_hits).max(0) as u8
    }

    /// Coverage of expected key points over the normalized answer. A point
    /// counts as covered when all of its tokens appear in the answer, or
    /// when the point appears verbatim in the lowercased text.
    fn accuracy(
        &self,
        question: &Question,
        lower: &str,
        answer_tokens: &BTreeSet<&str>,
    ) -> (u8, Vec<String>, Vec<String>) {
        if question.expected_key_points.is_empty() {
            return (70, Vec::new(), Vec::new());
        }

        let mut covered = Vec::new();
        let mut missed = Vec::new();
        for point in &question.expected_key_points {
            let point_tokens = self.normalizer.tokenize(point);
            let hit = if point_tokens.is_empty() {
                lower.contains(&point.to_lowercase())
            } else {
                point_tokens
                    .iter()
                    .all(|t| answer_tokens.contains(t.as_str()))
                    || lower.contains(&point.to_lowercase())
            };
            if hit {
                covered.push(point.clone());
            } else {
                missed.push(point.clone());
            }
        }

        let score = ((covered.len() as f64 / question.expected_key_points.len() as f64) * 100.0)
            .round() as u8;
        (score, covered, missed)
    }

    fn depth(&self, lower: &str, word_count: usize) -> u8 {
        let mut score: u32 = 50;
        if EXAMPLE_MARKERS.iter().any(|m| lower.contains(m)) {
            score += 20;
        }
        if REASONING_MARKERS.iter().any(|m| lower.contains(m)) {
            score += 20;
        }
        if word_count > 50 {
            score += 10;
        }
        score.min(100) as u8
    }

    fn structure(&self, text: &str, lower: &str) -> u8 {
        let sentences = text
            .split(['.', '!', '?'])
            .filter(|s| !s.trim().is_empty())
            .count();
        let mut score: u32 = 50;
        if sentences >= 3 {
            score += 25;
        }
        if INTRO_MARKERS.iter().any(|m| lower.contains(m)) {
            score += 12;
        }
        if CONCLUSION_MARKERS.iter().any(|m| lower.contains(m)) {
            score += 13;
        }
        score.min(100) as u8
    }

    /// Cosine-style overlap of the question and answer token sets.
    fn relevance(&self, question_text: &str, answer_tokens: &BTreeSet<&str>) -> u8 {
        let question_tokens: BTreeSet<String> =
            self.normalizer.tokenize(question_text).into_iter().collect();
        if question_tokens.is_empty() || answer_tokens.is_empty() {
            return 0;
        }
        let shared = question_tokens
            .iter()
            .filter(|t| answer_tokens.contains(t.as_str()))
            .count() as f64;
        let denom = ((question_tokens.len() * answer_tokens.len()) as f64).sqrt();
        ((shared / denom) * 100.0).min(100.0).round() as u8
    }
}

/// Confidence for behavioral answers: hedging language subtracts credit.
fn confidence(lower: &str) -> u8 {
    let hedges: u32 = HEDGE_PHRASES
        .iter()
        .map(|phrase| lower.matches(phrase).count() as u32)
        .sum();
    (100_i32 - 15 * hedges as i32).max(0) as u8
}

/// Cross-turn interview state owned by the caller. The evaluator never
/// touches it; the shell records each turn after evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Turn scores in evaluation order.
    pub trend: Vec<u8>,
    pub struggling_topics: BTreeSet<String>,
    pub strong_topics: BTreeSet<String>,
    /// Last turn score per topic.
    pub topic_scores: BTreeMap<String, u8>,
}

impl Session {
    const STRUGGLING_BELOW: u8 = 60;
    const STRONG_AT_LEAST: u8 = 80;

    pub fn record(&mut self, topic: &str, evaluation: &AnswerEvaluation) {
        let score = evaluation.turn_score;
        self.trend.push(score);
        self.topic_scores.insert(topic.to_string(), score);

        if score < Self::STRUGGLING_BELOW {
            self.struggling_topics.insert(topic.to_string());
            self.strong_topics.remove(topic);
        } else if score >= Self::STRONG_AT_LEAST {
            self.strong_topics.insert(topic.to_string());
            self.struggling_topics.remove(topic);
        }
    }

    pub fn turns(&self) -> usize {
        self.trend.len()
    }

    pub fn average(&self) -> Option<u8> {
        if self.trend.is_empty() {
            return None;
        }
        let sum: u32 = self.trend.iter().map(|&s| s as u32).sum();
        Some((sum as f64 / self.trend.len() as f64).round() as u8)
    }
}
