//! CLI interface for the prep scorer

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "prepscore")]
#[command(about = "Deterministic resume and interview-answer scoring tool")]
#[command(
    long_about = "Parse resumes, score them against job descriptions with role-weighted ATS \
                  components, match skills through an ontology, and evaluate interview answers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect the resume format and extract structured sections
    Extract {
        /// Path to resume file (PDF, DOCX)
        #[arg(short, long)]
        resume: PathBuf,

        /// Output format: console, json
        #[arg(short, long, default_value = "console")]
        output: String,
    },

    /// Score a resume against a job description
    Ats {
        /// Path to resume file (PDF, DOCX)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (plain text)
        #[arg(short, long)]
        job: PathBuf,

        /// Role tag overriding role derivation from the job description
        #[arg(long)]
        role: Option<String>,

        /// Output format: console, json
        #[arg(short, long, default_value = "console")]
        output: String,
    },

    /// Match required and preferred skills against a resume
    Match {
        /// Path to resume file (PDF, DOCX)
        #[arg(short, long)]
        resume: PathBuf,

        /// Required skills (repeatable or comma-separated)
        #[arg(long, value_delimiter = ',')]
        required: Vec<String>,

        /// Preferred skills (repeatable or comma-separated)
        #[arg(long, value_delimiter = ',')]
        preferred: Vec<String>,

        /// Weight applied to preferred skills, in (0, 1]
        #[arg(long)]
        preferred_weight: Option<f64>,

        /// Output format: console, json
        #[arg(short, long, default_value = "console")]
        output: String,
    },

    /// Evaluate an interview answer against expected key points
    Evaluate {
        /// The interview question
        #[arg(short, long)]
        question: String,

        /// Path to a file holding the answer text
        #[arg(short, long)]
        answer: PathBuf,

        /// Expected key points (repeatable or comma-separated)
        #[arg(long, value_delimiter = ',')]
        expected: Vec<String>,

        /// Interview type: technical, behavioral, system-design, coding
        #[arg(short = 't', long, default_value = "technical")]
        interview_type: String,

        /// Mark the question as a follow-up
        #[arg(long)]
        follow_up: bool,

        /// Output format: console, json
        #[arg(short, long, default_value = "console")]
        output: String,
    },

    /// Ontology inspection commands
    Ontology {
        #[command(subcommand)]
        action: OntologyAction,
    },
}

#[derive(Subcommand)]
pub enum OntologyAction {
    /// Show the active ontology: skills per category and coefficients
    Show,

    /// Validate an ontology TOML file without installing it
    Validate {
        /// Path to the ontology file
        path: PathBuf,
    },
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("console").unwrap(), OutputFormat::Console);
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert!(parse_output_format("yaml").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("resume.pdf"), &["pdf", "docx"]).is_ok());
        assert!(validate_file_extension(Path::new("resume.PDF"), &["pdf", "docx"]).is_ok());
        assert!(validate_file_extension(Path::new("resume.txt"), &["pdf", "docx"]).is_err());
        assert!(validate_file_extension(Path::new("resume"), &["pdf", "docx"]).is_err());
    }

    #[test]
    fn test_cli_parses_match_command() {
        let cli = Cli::parse_from([
            "prepscore",
            "match",
            "--resume",
            "resume.pdf",
            "--required",
            "React,TypeScript",
            "--preferred",
            "Docker",
        ]);
        match cli.command {
            Commands::Match {
                required, preferred, ..
            } => {
                assert_eq!(required, vec!["React", "TypeScript"]);
                assert_eq!(preferred, vec!["Docker"]);
            }
            _ => panic!("expected match command"),
        }
    }
}
