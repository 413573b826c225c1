//! Resume format detection
//!
//! Classifies a document into one of the five resume families from heuristic
//! signals over the raw bytes and the normalized text. Purely additive
//! scoring per family; the winner must clear a threshold or the document is
//! classified `Unknown`. Ties break by a fixed priority so detection is
//! deterministic.

use crate::processing::{NormalizedText, SectionKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum winning score; anything at or below falls through to `Unknown`.
const SCORE_THRESHOLD: i32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Western,
    Europass,
    Indian,
    Template,
    Unknown,
}

impl FormatKind {
    /// Tie-break priority: lower wins.
    fn priority(&self) -> u8 {
        match self {
            FormatKind::Western => 0,
            FormatKind::Europass => 1,
            FormatKind::Indian => 2,
            FormatKind::Template => 3,
            FormatKind::Unknown => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FormatKind::Western => "western",
            FormatKind::Europass => "europass",
            FormatKind::Indian => "indian",
            FormatKind::Template => "template",
            FormatKind::Unknown => "unknown",
        }
    }
}

/// Language whose section-header vocabulary matched the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderLanguage {
    English,
    Spanish,
    French,
    German,
    Hindi,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatIndicators {
    pub has_photo: bool,
    pub language: HeaderLanguage,
    /// Recognized section headers in document order.
    pub headers: Vec<SectionKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeFormat {
    pub kind: FormatKind,
    /// Confidence in [0, 100].
    pub confidence: u8,
    pub indicators: FormatIndicators,
}

/// Regex-free marker for the declaration tail common on Indian resumes.
pub fn declaration_line_index(normalized: &NormalizedText) -> Option<usize> {
    normalized.lines.iter().position(|line| {
        let lower = line.to_lowercase();
        lower.contains("i hereby declare") || lower.contains("hereby declare that")
    })
}

pub fn detect(bytes: &[u8], normalized: &NormalizedText) -> ResumeFormat {
    let mut scores: BTreeMap<FormatKind, i32> = BTreeMap::new();
    for kind in [
        FormatKind::Western,
        FormatKind::Europass,
        FormatKind::Indian,
        FormatKind::Template,
    ] {
        scores.insert(kind, 0);
    }

    let lower = normalized.text.to_lowercase();
    let headers = normalized.section_headers();
    let header_kinds: Vec<SectionKind> = headers.iter().map(|(_, k)| *k).collect();

    // Embedded image markers: photos are typical of Europass and Indian
    // resumes and rare on Western ones.
    let has_photo = contains_image_marker(bytes);
    if has_photo {
        *scores.get_mut(&FormatKind::Europass).unwrap() += 25;
        *scores.get_mut(&FormatKind::Indian).unwrap() += 25;
        *scores.get_mut(&FormatKind::Western).unwrap() -= 10;
    }

    // Section-header language detection.
    let (language, non_english_hits) = detect_header_language(normalized);
    if non_english_hits > 0 {
        *scores.get_mut(&FormatKind::Europass).unwrap() += 10 * non_english_hits;
        *scores.get_mut(&FormatKind::Indian).unwrap() += 10 * non_english_hits;
    }

    // A summary-style section in the first 20% of the document.
    if let Some((line_idx, _)) = headers
        .iter()
        .find(|(_, kind)| *kind == SectionKind::Summary)
    {
        let total = normalized.lines.len().max(1);
        if *line_idx * 5 < total {
            *scores.get_mut(&FormatKind::Western).unwrap() += 20;
        }
    }

    // Three or more recognized headers in canonical order is the strongest
    // structural signal for a conventional Western resume.
    if headers_in_canonical_order(&header_kinds) {
        *scores.get_mut(&FormatKind::Western).unwrap() += 25;
    }

    // Declaration-style tail.
    if declaration_line_index(normalized).is_some() {
        *scores.get_mut(&FormatKind::Indian).unwrap() += 30;
    }

    // Europass markers.
    for marker in [
        "curriculum vitae",
        "personal information",
        "date of birth",
        "nationality",
    ] {
        if lower.contains(marker) {
            *scores.get_mut(&FormatKind::Europass).unwrap() += 20;
        }
    }

    // Indian markers.
    for marker in [
        "father's name",
        "fathers name",
        "marital status",
        "permanent address",
        "languages known",
    ] {
        if lower.contains(marker) {
            *scores.get_mut(&FormatKind::Indian).unwrap() += 15;
        }
    }

    // Template spacing: wide blank gaps plus uniform bullet glyphs.
    if has_template_spacing(normalized) {
        *scores.get_mut(&FormatKind::Template).unwrap() += 20;
    }

    // Resolution: highest score above threshold wins; ties break by the
    // fixed priority western > europass > indian > template.
    let (winner, score) = scores
        .iter()
        .map(|(k, v)| (*k, *v))
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.priority().cmp(&a.0.priority())))
        .unwrap_or((FormatKind::Unknown, 0));

    let (kind, confidence) = if score > SCORE_THRESHOLD {
        (winner, score.clamp(0, 100) as u8)
    } else {
        (FormatKind::Unknown, score.clamp(0, 100) as u8)
    };

    ResumeFormat {
        kind,
        confidence,
        indicators: FormatIndicators {
            has_photo,
            language,
            headers: header_kinds,
        },
    }
}

fn headers_in_canonical_order(header_kinds: &[SectionKind]) -> bool {
    let mut seen = Vec::new();
    for kind in header_kinds {
        if !seen.contains(kind) {
            seen.push(*kind);
        }
    }
    seen.len() >= 3
        && seen
            .windows(2)
            .all(|w| w[0].canonical_index() < w[1].canonical_index())
}

fn contains_image_marker(bytes: &[u8]) -> bool {
    const MARKERS: [&[u8]; 3] = [b"JFIF", b"\x89PNG", b"/Image"];
    MARKERS
        .iter()
        .any(|marker| bytes.windows(marker.len()).any(|w| w == *marker))
}

/// Count non-English section-header hits and pick the dominant language.
fn detect_header_language(normalized: &NormalizedText) -> (HeaderLanguage, i32) {
    let sets: [(HeaderLanguage, &[&str]); 4] = [
        (
            HeaderLanguage::Spanish,
            &["experiencia laboral", "formación académica", "habilidades", "educación"],
        ),
        (
            HeaderLanguage::French,
            &["expérience professionnelle", "compétences", "formation", "éducation"],
        ),
        (
            HeaderLanguage::German,
            &["berufserfahrung", "ausbildung", "kenntnisse", "fähigkeiten"],
        ),
        (
            HeaderLanguage::Hindi,
            &["कार्य अनुभव", "शिक्षा", "कौशल"],
        ),
    ];

    let lower = normalized.text.to_lowercase();
    let mut best = (HeaderLanguage::English, 0);
    let mut total_hits = 0;
    for (language, markers) in sets {
        let hits = markers.iter().filter(|m| lower.contains(*m)).count() as i32;
        total_hits += hits;
        if hits > best.1 {
            best = (language, hits);
        }
    }
    (best.0, total_hits)
}

fn has_template_spacing(normalized: &NormalizedText) -> bool {
    let mut max_blank_run = 0;
    let mut run = 0;
    for line in &normalized.lines {
        if line.is_empty() {
            run += 1;
            max_blank_run = max_blank_run.max(run);
        } else {
            run = 0;
        }
    }

    let bullet_glyphs = ['•', '●', '▪', '◦', '‣'];
    let mut counts: BTreeMap<char, usize> = BTreeMap::new();
    for line in &normalized.lines {
        if let Some(first) = line.chars().next() {
            if bullet_glyphs.contains(&first) {
                *counts.entry(first).or_insert(0) += 1;
            }
        }
    }
    let uniform_bullets = counts.values().any(|&c| c >= 5);

    max_blank_run >= 3 && uniform_bullets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::TextNormalizer;

    fn normalize(text: &str) -> NormalizedText {
        TextNormalizer::new().normalize(text)
    }

    #[test]
    fn test_western_resume_detected() {
        let text = "Jane Smith\njane@example.com\n\nSummary:\nSenior engineer with 8 years of experience.\n\nExperience:\nAcme Corp, Senior Engineer, 2018 - Present\nLed the platform team\nShipped the billing rewrite\n\nEducation:\nB.S. Computer Science, State University\n\nSkills:\nRust, Python, PostgreSQL, AWS";
        let normalized = normalize(text);
        let format = detect(text.as_bytes(), &normalized);

        assert_eq!(format.kind, FormatKind::Western);
        assert!(format.confidence > 0);
    }

    #[test]
    fn test_indian_declaration_tail_detected() {
        let text = "Raj Kumar\n\nExperience:\nDeveloper at TCS\n\nEducation:\nB.Tech\n\nFather's Name: Suresh Kumar\nMarital Status: Single\n\nI hereby declare that the above particulars are true to the best of my knowledge.\nSignature: Raj Kumar";
        let normalized = normalize(text);
        let format = detect(text.as_bytes(), &normalized);

        assert_eq!(format.kind, FormatKind::Indian);
        assert!(format.confidence >= 60);
    }

    #[test]
    fn test_europass_markers_detected() {
        let text = "Curriculum Vitae\n\nPersonal Information\nDate of Birth: 1990-01-01\nNationality: Spanish\n\nWork Experience:\nEngineer";
        let normalized = normalize(text);
        let format = detect(text.as_bytes(), &normalized);

        assert_eq!(format.kind, FormatKind::Europass);
        assert!(format.confidence >= 60);
    }

    #[test]
    fn test_low_signal_falls_through_to_unknown() {
        let text = "Some short note\nwith no resume structure at all";
        let normalized = normalize(text);
        let format = detect(text.as_bytes(), &normalized);

        assert_eq!(format.kind, FormatKind::Unknown);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let text = "Curriculum Vitae\n\nPersonal Information\nNationality: French";
        let normalized = normalize(text);
        let first = detect(text.as_bytes(), &normalized);
        let second = detect(text.as_bytes(), &normalized);
        assert_eq!(first, second);
    }

    #[test]
    fn test_photo_marker_biases_away_from_western() {
        let mut bytes = b"Summary:\nEngineer".to_vec();
        bytes.extend_from_slice(b"\x89PNG");
        let normalized = normalize("Summary:\nEngineer");
        let format = detect(&bytes, &normalized);
        assert!(format.indicators.has_photo);
    }
}
