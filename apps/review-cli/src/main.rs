//! Review forms CLI
//!
//! Drives the review form engine from a terminal:
//!
//! - `list` the built-in forms
//! - `template` exports a form definition as TOML
//! - `new` writes an empty draft to start from
//! - `check` reports whether a draft is ready to submit
//! - `submit` validates a draft and emits the submission record

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use review_core::{forms, DraftSnapshot, FormDefinition, ReviewFormEngine};
use tracing::{debug, info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod report;

use report::Readiness;

#[derive(Parser, Debug)]
#[command(name = "review-cli")]
#[command(about = "Review and submit well-abandonment monitoring forms")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List built-in forms
    List,
    /// Print a form definition as TOML
    Template {
        #[command(flatten)]
        form: FormSource,
    },
    /// Write an empty draft for a form
    New {
        #[command(flatten)]
        form: FormSource,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check whether a draft can be submitted
    Check {
        #[command(flatten)]
        form: FormSource,

        /// Draft JSON produced by the web form or `new`
        draft: PathBuf,
    },
    /// Validate a draft and write the submission record
    Submit {
        #[command(flatten)]
        form: FormSource,

        /// Draft JSON produced by the web form or `new`
        draft: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct FormSource {
    /// Built-in form name
    #[arg(long, default_value = forms::ENVIRONMENTAL_MONITORING)]
    form: String,

    /// TOML form definition, overrides --form
    #[arg(long)]
    form_file: Option<PathBuf>,
}

impl FormSource {
    fn load(&self) -> anyhow::Result<FormDefinition> {
        match &self.form_file {
            Some(path) => FormDefinition::from_file(path),
            None => forms::builtin(&self.form).with_context(|| {
                format!(
                    "Unknown form '{}' (available: {})",
                    self.form,
                    forms::BUILTIN_FORMS.join(", ")
                )
            }),
        }
    }
}

fn load_engine(form: &FormSource, draft_path: &Path) -> anyhow::Result<ReviewFormEngine> {
    let definition = form.load()?;
    let json = std::fs::read_to_string(draft_path)
        .with_context(|| format!("Failed to read draft: {}", draft_path.display()))?;
    let draft = DraftSnapshot::from_json(&json)
        .with_context(|| format!("Invalid draft JSON: {}", draft_path.display()))?;

    if draft.form != definition.name {
        bail!(
            "Draft belongs to form '{}', not '{}'",
            draft.form,
            definition.name
        );
    }
    debug!(form = %definition.name, saved_at = %draft.saved_at, "Loaded draft");

    ReviewFormEngine::from_draft(definition, &draft).context("Draft does not match the form")
}

fn emit(content: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::List => {
            for name in forms::BUILTIN_FORMS {
                if let Some(definition) = forms::builtin(name) {
                    println!("{:<28} {}", name, definition.title);
                }
            }
        }
        Command::Template { form } => {
            let definition = form.load()?;
            print!("{}", definition.to_toml_string()?);
        }
        Command::New { form, output } => {
            let engine = ReviewFormEngine::new(form.load()?)?;
            let json = engine.save_draft().to_json()?;
            emit(&json, output.as_deref())?;
        }
        Command::Check { form, draft } => {
            let engine = load_engine(&form, &draft)?;
            let readiness = Readiness::of(&engine);
            print!("{}", readiness);
            if !readiness.is_ready() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Submit {
            form,
            draft,
            output,
        } => {
            let mut engine = load_engine(&form, &draft)?;
            let record = match engine.submit() {
                Ok(record) => record,
                Err(err) => {
                    eprint!("{}", Readiness::of(&engine));
                    return Err(err).context("Submission rejected");
                }
            };
            emit(&record.to_json()?, output.as_deref())?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(cli)
}
