//! prepscore: deterministic resume and interview-answer scoring tool

use clap::Parser;
use log::{error, info};
use prepscore::cli::{self, Cli, Commands, OntologyAction};
use prepscore::config::Config;
use prepscore::engine::Engine;
use prepscore::error::{PrepScoreError, Result};
use prepscore::input::InputManager;
use prepscore::ontology::SkillOntology;
use prepscore::output::Formatter;
use prepscore::scoring::answer::{InterviewType, Question};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn build_engine(config: &Config) -> Result<Engine> {
    let ontology = match &config.ontology.path {
        Some(path) if path.exists() => {
            info!("Loading ontology from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            SkillOntology::from_toml_str(&content)?
        }
        _ => SkillOntology::builtin(),
    };
    Ok(Engine::with_ontology(ontology))
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Extract { resume, output } => {
            cli::validate_file_extension(&resume, &["pdf", "docx"])
                .map_err(|e| PrepScoreError::Config(format!("Resume file: {}", e)))?;
            let format = cli::parse_output_format(&output).map_err(PrepScoreError::Config)?;

            let mut input_manager =
                InputManager::new().with_cache(config.processing.enable_caching);
            let document = input_manager.load(&resume).await?;

            let engine = build_engine(&config)?;
            let parsed = engine.extract_from_text(&document.text, &document.bytes);

            let formatter =
                Formatter::new(format, config.output.color_output, config.output.detailed);
            println!("{}", formatter.format_extraction(&parsed)?);
        }

        Commands::Ats {
            resume,
            job,
            role,
            output,
        } => {
            cli::validate_file_extension(&resume, &["pdf", "docx"])
                .map_err(|e| PrepScoreError::Config(format!("Resume file: {}", e)))?;
            let format = cli::parse_output_format(&output).map_err(PrepScoreError::Config)?;

            let mut input_manager =
                InputManager::new().with_cache(config.processing.enable_caching);
            let document = input_manager.load(&resume).await?;
            let jd_text = input_manager.load_text(&job).await?;

            let engine = build_engine(&config)?;
            let parsed = engine.extract_from_text(&document.text, &document.bytes);

            let role_hint = role.as_deref().or(config.scoring.default_role.as_deref());
            let report = engine.ats_score(&parsed, &jd_text, role_hint)?;

            let formatter =
                Formatter::new(format, config.output.color_output, config.output.detailed);
            println!("{}", formatter.format_ats(&report)?);
        }

        Commands::Match {
            resume,
            required,
            preferred,
            preferred_weight,
            output,
        } => {
            cli::validate_file_extension(&resume, &["pdf", "docx"])
                .map_err(|e| PrepScoreError::Config(format!("Resume file: {}", e)))?;
            let format = cli::parse_output_format(&output).map_err(PrepScoreError::Config)?;

            let mut input_manager =
                InputManager::new().with_cache(config.processing.enable_caching);
            let document = input_manager.load(&resume).await?;

            let engine = build_engine(&config)?;
            let parsed = engine.extract_from_text(&document.text, &document.bytes);

            let weight = preferred_weight.or(Some(config.scoring.preferred_weight));
            let report = engine.skill_match(&required, &preferred, &parsed, weight)?;

            let formatter =
                Formatter::new(format, config.output.color_output, config.output.detailed);
            println!("{}", formatter.format_skill_match(&report)?);
        }

        Commands::Evaluate {
            question,
            answer,
            expected,
            interview_type,
            follow_up,
            output,
        } => {
            let format = cli::parse_output_format(&output).map_err(PrepScoreError::Config)?;
            let interview_type = InterviewType::from_hint(&interview_type)?;

            let input_manager = InputManager::new();
            let answer_text = input_manager.load_text(&answer).await?;

            let engine = build_engine(&config)?;
            let question = Question {
                text: question,
                expected_key_points: expected,
                is_follow_up: follow_up,
            };
            let evaluation = engine.evaluate_answer(&question, &answer_text, interview_type);

            let formatter =
                Formatter::new(format, config.output.color_output, config.output.detailed);
            println!("{}", formatter.format_evaluation(&evaluation)?);
        }

        Commands::Ontology { action } => match action {
            OntologyAction::Show => {
                let engine = build_engine(&config)?;
                let ontology = engine.ontology();
                println!(
                    "Ontology version {} ({} skills)\n",
                    ontology.version(),
                    ontology.len()
                );
                for category in prepscore::ontology::SkillCategory::ALL {
                    let names: Vec<&str> = ontology
                        .canonical_names()
                        .into_iter()
                        .filter(|name| ontology.category(name) == Some(category))
                        .collect();
                    println!(
                        "{} (transfer {:.2}): {}",
                        category.name(),
                        ontology.category_coefficient(category),
                        names.join(", ")
                    );
                }
            }
            OntologyAction::Validate { path } => {
                let content = std::fs::read_to_string(&path)?;
                let ontology = SkillOntology::from_toml_str(&content)?;
                println!(
                    "OK: {} skills, version {}",
                    ontology.len(),
                    ontology.version()
                );
            }
        },
    }

    Ok(())
}
