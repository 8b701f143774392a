use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use learncontext_core::memory::{ExplanationStyle, SkillLevel, TimeAvailability, TonePreference};
use learncontext_core::prompt::PromptMode;

mod commands;
mod formatter;
mod interactive_app;

use crate::commands::Context;
use crate::interactive_app::InteractiveApp;

#[derive(Parser, Debug)]
#[command(name = "learncontext")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "LearnContext - personalized AI tutoring from the terminal")]
struct Args {
    /// Learner whose memory is read and updated
    #[arg(long, global = true, default_value = "default")]
    user: String,

    /// Load settings from a specific file instead of ~/.learncontext/settings.toml
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show, edit, or reset the learner profile
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Edit topic lists
    #[command(subcommand)]
    Topic(TopicCommand),

    /// Edit learning goals
    #[command(subcommand)]
    Goal(GoalCommand),

    /// Preview the prompt that would be sent to the model
    Prompt {
        #[arg(long, default_value = "tutor")]
        mode: PromptMode,

        /// Message to place in the final user turn
        #[arg(long, default_value = "")]
        message: String,

        /// Extra context placed ahead of the message (grading question/rubric)
        #[arg(long)]
        context: Option<String>,

        /// Render without the learner profile
        #[arg(long)]
        no_memory: bool,

        /// Print the full message list as JSON instead of the system prompt
        #[arg(long)]
        json: bool,
    },

    /// Start an interactive tutoring session
    Tutor,

    /// Grade an answer and record the outcome in the learner's memory
    Grade {
        #[arg(long)]
        question: String,

        #[arg(long)]
        answer: String,

        #[arg(long)]
        rubric: Option<String>,

        /// Do not update weak/strong topics from the score
        #[arg(long)]
        no_record: bool,
    },

    /// Configure the model provider
    #[command(subcommand)]
    Provider(ProviderCommand),
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    Show {
        #[arg(long)]
        json: bool,
    },
    Set {
        #[arg(long)]
        skill: Option<SkillLevel>,
        #[arg(long)]
        style: Option<ExplanationStyle>,
        #[arg(long)]
        tone: Option<TonePreference>,
        #[arg(long)]
        time: Option<TimeAvailability>,
    },
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum TopicCommand {
    AddWeak { topic: String },
    RemoveWeak { topic: String },
    AddStrong { topic: String },
    AddRecent { topic: String },
    AddMistake { mistake: String },
}

#[derive(Subcommand, Debug)]
pub enum GoalCommand {
    Add { goal: String },
    Remove { goal: String },
}

#[derive(Subcommand, Debug)]
pub enum ProviderCommand {
    /// Use an OpenAI-compatible chat completions endpoint
    SetOpenai {
        #[arg(long)]
        api_key: String,
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Use the offline mock provider
    UseMock {
        /// Always reply with this text
        #[arg(long)]
        text: Option<String>,
    },
    /// Remove the active provider and fall back to demo mode
    Clear,
}

fn main() -> Result<()> {
    setup_tracing()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let args = Args::parse();

    info!(user = %args.user, settings = ?args.settings, "CLI startup");

    let context = Context::load(args.user, args.settings)?;

    match args.command {
        Command::Tutor => {
            let mut app = InteractiveApp::new(context);
            app.run().await
        }
        command => commands::execute(&context, command).await,
    }
}

fn setup_tracing() -> Result<()> {
    use std::fs;
    use tracing_subscriber::fmt;

    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
    let trace_dir = home.join(".learncontext").join("trace");
    fs::create_dir_all(&trace_dir)?;

    let log_file = trace_dir.join("learncontext.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();

    info!("Tracing initialized to {:?}", log_file);
    Ok(())
}
