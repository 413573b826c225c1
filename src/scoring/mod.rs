//! Deterministic scoring engines: ATS, skill matching, answer evaluation

pub mod answer;
pub mod ats;
pub mod jd;
pub mod skill_match;

pub use answer::{AnswerEvaluation, AnswerEvaluator, InterviewType, Question, Session};
pub use ats::{AtsReport, AtsScorer, ComponentScores};
pub use jd::{JobDescription, RoleTag, RoleWeights};
pub use skill_match::{SkillMatchReport, SkillMatcher, SkillVerdict};
