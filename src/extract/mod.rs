//! Format-dispatched resume extraction
//!
//! All strategies share one contract: normalized text in, `ParsedResume`
//! with per-section quality out. Parsing problems become warnings and
//! failed-section entries on the result, never errors.

mod fields;
pub mod resume;

pub use fields::FieldExtractors;
pub use resume::{
    Contact, Education, Experience, ExtractionQuality, ParsedResume, Project, SkillSet,
};

use crate::detect::{self, FormatKind, ResumeFormat};
use crate::ontology::SkillOntology;
use crate::processing::{NormalizedText, SectionKind, TextNormalizer};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::Arc;

/// Token threshold below which the document counts as empty.
const EMPTY_TOKEN_THRESHOLD: usize = 20;
/// Per-section quality below this records a warning naming the section.
const LOW_QUALITY_THRESHOLD: u8 = 60;

pub struct Extractor {
    ontology: Arc<SkillOntology>,
    fields: FieldExtractors,
    normalizer: TextNormalizer,
    clock: NaiveDate,
}

impl Extractor {
    pub fn new(ontology: Arc<SkillOntology>) -> Self {
        Self {
            ontology,
            fields: FieldExtractors::new(),
            normalizer: TextNormalizer::new(),
            clock: chrono::Utc::now().date_naive(),
        }
    }

    /// Pin the clock "present" date ranges resolve against.
    pub fn with_clock(mut self, clock: NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn extract(&self, normalized: &NormalizedText, format: &ResumeFormat) -> ParsedResume {
        let mut warnings = Vec::new();
        let mut failed_sections = Vec::new();

        if normalized.tokens.len() < EMPTY_TOKEN_THRESHOLD {
            warnings.push(
                "document is empty or too short; all sections scored zero".to_string(),
            );
            return ParsedResume {
                contact: Contact::default(),
                education: Vec::new(),
                experience: Vec::new(),
                skills: SkillSet::default(),
                projects: Vec::new(),
                certifications: Vec::new(),
                quality: ExtractionQuality {
                    contact: Some(0),
                    education: Some(0),
                    experience: Some(0),
                    skills: Some(0),
                },
                section_order: Vec::new(),
                tokens: normalized.tokens.clone(),
                format: format.clone(),
                warnings,
                failed_sections,
            };
        }

        // Indian resumes get their declaration tail stripped before any
        // extraction so no field is ever read from it.
        let working;
        let view: &NormalizedText = if format.kind == FormatKind::Indian {
            match detect::declaration_line_index(normalized) {
                Some(idx) => {
                    working = self
                        .normalizer
                        .normalize(&normalized.lines[..idx].join("\n"));
                    &working
                }
                None => normalized,
            }
        } else {
            normalized
        };

        if format.kind == FormatKind::Unknown {
            warnings.push("format unknown; results may be incomplete".to_string());
        }

        let mut contact = if format.kind == FormatKind::Europass {
            self.europass_contact(view)
        } else {
            self.fields.extract_contact(&view.lines)
        };
        if format.kind == FormatKind::Indian {
            contact.fathers_name = extract_fathers_name(view);
        }

        let education_slice = self.section_slice(view, format, SectionKind::Education);
        let experience_slice = self.section_slice(view, format, SectionKind::Experience);
        let skills_slice = self.section_slice(view, format, SectionKind::Skills);
        let projects_slice = self.section_slice(view, format, SectionKind::Projects);
        let certifications_slice = self.section_slice(view, format, SectionKind::Certifications);

        let education = education_slice
            .as_deref()
            .map(|slice| self.fields.extract_education(slice))
            .unwrap_or_default();
        let experience = experience_slice
            .as_deref()
            .map(|slice| self.fields.extract_experience(slice, self.clock))
            .unwrap_or_default();

        // Skills come from the skills slice, or the whole text when the
        // resume has no dedicated section.
        let skills = match skills_slice.as_deref() {
            Some(slice) => self.fields.extract_skills(slice, &self.ontology),
            None => self.fields.extract_skills(&view.text, &self.ontology),
        };

        let projects = projects_slice
            .as_deref()
            .map(|slice| self.fields.extract_projects(slice))
            .unwrap_or_default();
        let certifications = certifications_slice
            .as_deref()
            .map(|slice| self.fields.extract_certifications(slice))
            .unwrap_or_default();

        // Europass and template layouts carry a section-quality prior.
        let quality_floor = match format.kind {
            FormatKind::Europass => 5,
            FormatKind::Template => 10,
            _ => 0,
        };
        let quality = ExtractionQuality {
            contact: Some(apply_floor(contact.populated_fields() * 25, quality_floor)),
            education: entry_section_quality(
                education_slice.is_some(),
                !education.is_empty(),
                education
                    .iter()
                    .any(|e| e.degree.is_some() && e.institution.is_some()),
                quality_floor,
            ),
            experience: entry_section_quality(
                experience_slice.is_some(),
                !experience.is_empty(),
                experience
                    .iter()
                    .any(|e| e.title.is_some() && e.company.is_some()),
                quality_floor,
            ),
            skills: Some(apply_floor(
                (15 * skills.distinct_count()).min(100) as u8,
                quality_floor,
            )),
        };

        for (name, value) in [
            ("contact", quality.contact),
            ("education", quality.education),
            ("experience", quality.experience),
            ("skills", quality.skills),
        ] {
            if let Some(q) = value {
                if q < LOW_QUALITY_THRESHOLD {
                    warnings.push(format!("low extraction quality for {}: {}", name, q));
                }
                if q == 0 {
                    failed_sections.push(name.to_string());
                }
            }
        }

        let section_order = distinct_in_order(view.section_headers());

        ParsedResume {
            contact,
            education,
            experience,
            skills,
            projects,
            certifications,
            quality,
            section_order,
            tokens: view.tokens.clone(),
            format: format.clone(),
            warnings,
            failed_sections,
        }
    }

    /// Europass resumes are sliced on their strict section headers first;
    /// everything else uses the shared header table.
    fn section_slice(
        &self,
        view: &NormalizedText,
        format: &ResumeFormat,
        kind: SectionKind,
    ) -> Option<String> {
        if format.kind == FormatKind::Europass {
            let pattern = match kind {
                SectionKind::Experience => Some(r"(?i)^work experience:?$"),
                SectionKind::Education => Some(r"(?i)^education and training:?$"),
                SectionKind::Skills => Some(r"(?i)^(personal )?skills:?$"),
                _ => None,
            };
            if let Some(pattern) = pattern {
                let headers = vec![Regex::new(pattern).expect("valid europass header regex")];
                if let Some(slice) = view.slice(&headers) {
                    return Some(slice);
                }
            }
        }
        view.section(kind)
    }

    /// Europass contact comes from the strict "Personal information" block
    /// when present; fields it does not carry fall back to the whole
    /// document.
    fn europass_contact(&self, view: &NormalizedText) -> Contact {
        let header =
            Regex::new(r"(?i)^personal information:?$").expect("valid europass header regex");
        let Some(slice) = view.slice(std::slice::from_ref(&header)) else {
            return self.fields.extract_contact(&view.lines);
        };
        let lines: Vec<String> = slice.lines().map(str::to_string).collect();
        let scoped = self.fields.extract_contact(&lines);
        let whole = self.fields.extract_contact(&view.lines);
        Contact {
            name: scoped.name.or(whole.name),
            email: scoped.email.or(whole.email),
            phone: scoped.phone.or(whole.phone),
            location: scoped.location.or(whole.location),
            linkedin: scoped.linkedin.or(whole.linkedin),
            github: scoped.github.or(whole.github),
            fathers_name: None,
        }
    }
}

fn apply_floor(quality: u8, floor_bonus: u8) -> u8 {
    if quality == 0 {
        0
    } else {
        (quality + floor_bonus).min(100)
    }
}

/// Shared 90 / 30 / 0 quality ladder for entry-based sections.
fn entry_section_quality(
    section_present: bool,
    any_entry: bool,
    complete_entry: bool,
    floor_bonus: u8,
) -> Option<u8> {
    if !section_present && !any_entry {
        return None;
    }
    let base = if complete_entry {
        90
    } else if any_entry {
        30
    } else {
        0
    };
    Some(apply_floor(base, floor_bonus))
}

fn extract_fathers_name(view: &NormalizedText) -> Option<String> {
    let re = Regex::new(r"(?i)father'?s name\s*:?\s*(.+)").expect("valid father's name regex");
    view.lines
        .iter()
        .find_map(|line| re.captures(line))
        .map(|cap| cap[1].trim().to_string())
}

fn distinct_in_order(headers: Vec<(usize, SectionKind)>) -> Vec<SectionKind> {
    let mut seen = Vec::new();
    for (_, kind) in headers {
        if !seen.contains(&kind) {
            seen.push(kind);
        }
    }
    seen
}
