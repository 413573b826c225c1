//! Text normalization and tokenization
//!
//! Produces the `NormalizedText` view every downstream engine consumes:
//! NFKC-normalized text with a line index, plus a lowercased, stopword-filtered,
//! lightly lemmatized token stream. Normalization is idempotent, so
//! `normalize(normalize(t).text)` equals `normalize(t)`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Recognized resume section kinds, in canonical resume order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
}

impl SectionKind {
    /// Index into the canonical section order, used by the ordering penalty.
    pub fn canonical_index(&self) -> usize {
        match self {
            SectionKind::Summary => 0,
            SectionKind::Experience => 1,
            SectionKind::Education => 2,
            SectionKind::Skills => 3,
            SectionKind::Projects => 4,
            SectionKind::Certifications => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SectionKind::Summary => "summary",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Projects => "projects",
            SectionKind::Certifications => "certifications",
        }
    }
}

/// Immutable normalized projection of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedText {
    /// NFKC text with per-line whitespace collapsed; blank lines preserved
    /// as paragraph separators.
    pub text: String,
    /// Line-indexed view of `text`. Line indices recorded by extractors
    /// always resolve in this vector.
    pub lines: Vec<String>,
    /// Lowercased, stopword-filtered, lemmatized token stream.
    pub tokens: Vec<String>,
    /// Raw word count before stopword filtering.
    pub word_count: usize,
}

impl NormalizedText {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Header lines recognized anywhere in the document, as
    /// (line index, section kind) pairs in document order.
    pub fn section_headers(&self) -> Vec<(usize, SectionKind)> {
        let mut found = Vec::new();
        for (idx, line) in self.lines.iter().enumerate() {
            if let Some(kind) = classify_header(line) {
                found.push((idx, kind));
            }
        }
        found
    }

    /// Text between the first line matching one of `headers` and the next
    /// recognized section header (or end of document). Returns `None` when
    /// no header matches.
    pub fn slice(&self, headers: &[Regex]) -> Option<String> {
        let start = self
            .lines
            .iter()
            .position(|line| headers.iter().any(|re| re.is_match(line)))?;

        let mut body = Vec::new();
        for line in &self.lines[start + 1..] {
            if classify_header(line).is_some() {
                break;
            }
            body.push(line.as_str());
        }
        Some(body.join("\n"))
    }

    /// Convenience slice for a known section kind.
    pub fn section(&self, kind: SectionKind) -> Option<String> {
        let headers = self.section_headers();
        let start = headers.iter().find(|(_, k)| *k == kind)?.0;

        let mut body = Vec::new();
        for line in &self.lines[start + 1..] {
            if classify_header(line).is_some() {
                break;
            }
            body.push(line.as_str());
        }
        Some(body.join("\n"))
    }
}

/// Classify a line as a section header, if it is one.
///
/// A header line is short (at most six words), carries no sentence
/// punctuation beyond a trailing colon, and starts with or equals a
/// recognized header keyword.
pub fn classify_header(line: &str) -> Option<SectionKind> {
    let trimmed = line.trim().trim_end_matches(':').trim();
    if trimmed.is_empty() || trimmed.split_whitespace().count() > 6 {
        return None;
    }
    let lower = trimmed.to_lowercase();

    let table: &[(&str, SectionKind)] = &[
        ("summary", SectionKind::Summary),
        ("professional summary", SectionKind::Summary),
        ("profile", SectionKind::Summary),
        ("objective", SectionKind::Summary),
        ("career objective", SectionKind::Summary),
        ("about", SectionKind::Summary),
        ("experience", SectionKind::Experience),
        ("work experience", SectionKind::Experience),
        ("professional experience", SectionKind::Experience),
        ("employment", SectionKind::Experience),
        ("employment history", SectionKind::Experience),
        ("work history", SectionKind::Experience),
        ("education", SectionKind::Education),
        ("education and training", SectionKind::Education),
        ("academic background", SectionKind::Education),
        ("qualifications", SectionKind::Education),
        ("skills", SectionKind::Skills),
        ("technical skills", SectionKind::Skills),
        ("core competencies", SectionKind::Skills),
        ("expertise", SectionKind::Skills),
        ("projects", SectionKind::Projects),
        ("personal projects", SectionKind::Projects),
        ("notable projects", SectionKind::Projects),
        ("portfolio", SectionKind::Projects),
        ("certifications", SectionKind::Certifications),
        ("certificates", SectionKind::Certifications),
        ("licenses", SectionKind::Certifications),
    ];

    // Exact match first, then prefix match ("work experience (5 years)").
    for (pattern, kind) in table {
        if lower == *pattern {
            return Some(*kind);
        }
    }
    for (pattern, kind) in table {
        if lower.starts_with(pattern)
            && lower[pattern.len()..]
                .chars()
                .next()
                .map(|c| !c.is_alphanumeric())
                .unwrap_or(true)
        {
            return Some(*kind);
        }
    }
    None
}

pub struct TextNormalizer {
    stop_words: HashSet<&'static str>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    /// Normalize decoded document text.
    ///
    /// Never fails: empty input yields an empty `NormalizedText` whose
    /// consumers produce zero scores with warnings.
    pub fn normalize(&self, text: &str) -> NormalizedText {
        let mut lines: Vec<String> = Vec::new();
        for raw_line in text.lines() {
            let nfkc: String = raw_line.nfkc().collect();
            let collapsed = nfkc.split_whitespace().collect::<Vec<_>>().join(" ");
            lines.push(collapsed);
        }
        // Trim leading/trailing blank lines so the line index is stable
        // across re-normalization.
        while lines.first().map(|l| l.is_empty()).unwrap_or(false) {
            lines.remove(0);
        }
        while lines.last().map(|l| l.is_empty()).unwrap_or(false) {
            lines.pop();
        }

        let text = lines.join("\n");
        let word_count = text.unicode_words().count();
        let tokens = self.tokenize(&text);

        NormalizedText {
            text,
            lines,
            tokens,
            word_count,
        }
    }

    /// Tokenize into the filtered stream: split on non-letter/digit
    /// boundaries, lowercase, drop stopwords, lemmatize-lite. Numbers and
    /// percent signs survive as their own tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();

        for ch in text.chars() {
            if ch.is_alphanumeric() {
                current.extend(ch.to_lowercase());
            } else {
                if !current.is_empty() {
                    self.push_token(&mut tokens, std::mem::take(&mut current));
                }
                if ch == '%' {
                    tokens.push("%".to_string());
                }
            }
        }
        if !current.is_empty() {
            self.push_token(&mut tokens, current);
        }
        tokens
    }

    fn push_token(&self, tokens: &mut Vec<String>, token: String) {
        if self.stop_words.contains(token.as_str()) {
            return;
        }
        tokens.push(lemmatize(&token));
    }
}

/// Small lemmatizer: plural -s, past tense -ed, and -ing, applied to
/// alphabetic words of at least four characters.
pub fn lemmatize(word: &str) -> String {
    if word.len() < 4 || !word.chars().all(|c| c.is_alphabetic()) {
        return word.to_string();
    }
    if word.len() >= 6 {
        if let Some(stem) = word.strip_suffix("ing") {
            return stem.to_string();
        }
    }
    if word.len() >= 5 {
        if let Some(stem) = word.strip_suffix("ed") {
            return stem.to_string();
        }
    }
    if !word.ends_with("ss") {
        if let Some(stem) = word.strip_suffix('s') {
            return stem.to_string();
        }
    }
    word.to_string()
}

/// Closed stopword list (~120 entries).
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any", "are", "as",
    "at", "be", "because", "been", "being", "below", "between", "both", "but", "by", "can", "could",
    "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from", "further", "had",
    "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how", "i", "if", "in",
    "into", "is", "it", "its", "just", "me", "more", "most", "my", "no", "nor", "not", "now", "of",
    "off", "on", "once", "only", "or", "other", "our", "ours", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
    "will", "with", "would", "you", "your", "yours",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_collapses_whitespace() {
        let normalizer = TextNormalizer::new();
        let result = normalizer.normalize("John   Doe\n\nSoftware\tEngineer");

        assert_eq!(result.lines[0], "John Doe");
        assert_eq!(result.lines[1], "");
        assert_eq!(result.lines[2], "Software Engineer");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let normalizer = TextNormalizer::new();
        let text = "  Skills:  \n\n\nPython,   Rust\u{2019}s tooling — 40% faster\n";
        let once = normalizer.normalize(text);
        let twice = normalizer.normalize(&once.text);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_input_does_not_fail() {
        let normalizer = TextNormalizer::new();
        let result = normalizer.normalize("");

        assert!(result.is_empty());
        assert_eq!(result.word_count, 0);
    }

    #[test]
    fn test_tokenizer_preserves_numbers_and_percent() {
        let normalizer = TextNormalizer::new();
        let tokens = normalizer.tokenize("Improved throughput by 40% in 2023");

        assert!(tokens.contains(&"40".to_string()));
        assert!(tokens.contains(&"%".to_string()));
        assert!(tokens.contains(&"2023".to_string()));
        // Stopwords removed
        assert!(!tokens.contains(&"by".to_string()));
        assert!(!tokens.contains(&"in".to_string()));
    }

    #[test]
    fn test_lemmatizer() {
        assert_eq!(lemmatize("skills"), "skill");
        assert_eq!(lemmatize("designed"), "design");
        assert_eq!(lemmatize("building"), "build");
        // Too short to touch
        assert_eq!(lemmatize("aws"), "aws");
        // Double-s words keep their suffix
        assert_eq!(lemmatize("business"), "business");
    }

    #[test]
    fn test_section_slice() {
        let normalizer = TextNormalizer::new();
        let text = "John Doe\n\nSkills:\nPython, Rust\nDocker\n\nEducation:\nB.S. Computer Science";
        let normalized = normalizer.normalize(text);

        let skills = normalized.section(SectionKind::Skills).unwrap();
        assert!(skills.contains("Python, Rust"));
        assert!(skills.contains("Docker"));
        assert!(!skills.contains("B.S."));

        let headers: Vec<regex::Regex> = vec![regex::Regex::new(r"(?i)^skills:?$").unwrap()];
        assert!(normalized.slice(&headers).is_some());
    }

    #[test]
    fn test_header_classification() {
        assert_eq!(classify_header("Work Experience"), Some(SectionKind::Experience));
        assert_eq!(classify_header("SKILLS:"), Some(SectionKind::Skills));
        assert_eq!(
            classify_header("Education and Training"),
            Some(SectionKind::Education)
        );
        // Prose lines mentioning a keyword are not headers
        assert_eq!(
            classify_header("I have ten years of experience working with teams on projects"),
            None
        );
    }
}
