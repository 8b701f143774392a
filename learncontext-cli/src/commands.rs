use anyhow::{bail, Context as _, Result};
use std::path::PathBuf;
use std::sync::Arc;

use learncontext_core::ai::mock::MockBehavior;
use learncontext_core::assistant::LearningAssistant;
use learncontext_core::grading::{record_grading_outcome, GradingRequest};
use learncontext_core::memory::store::MemoryStore;
use learncontext_core::memory::MemoryUpdate;
use learncontext_core::persistence::JsonFileStore;
use learncontext_core::prompt::PromptRequest;
use learncontext_core::settings::{ProviderConfig, SettingsManager};

use crate::formatter::Formatter;
use crate::{Command, GoalCommand, ProfileCommand, ProviderCommand, TopicCommand};

/// Everything a command needs: who the learner is and where state lives.
pub struct Context {
    pub user_id: String,
    pub settings: SettingsManager,
    pub store: MemoryStore,
    pub formatter: Formatter,
}

impl Context {
    pub fn load(user_id: String, settings_path: Option<PathBuf>) -> Result<Self> {
        let user_id = user_id.trim().to_string();
        if user_id.is_empty() {
            bail!("--user must not be empty");
        }

        let settings = match settings_path {
            Some(path) => SettingsManager::from_path(path)?,
            None => SettingsManager::new()?,
        };
        let data_dir = settings.settings().data_dir()?;
        let store = MemoryStore::new(Arc::new(JsonFileStore::new(data_dir)));

        Ok(Self {
            user_id,
            settings,
            store,
            formatter: Formatter::new(),
        })
    }

    pub fn assistant(&self) -> LearningAssistant {
        LearningAssistant::from_settings(&self.settings.settings())
    }
}

pub async fn execute(context: &Context, command: Command) -> Result<()> {
    match command {
        Command::Profile(command) => profile(context, command),
        Command::Topic(command) => topic(context, command),
        Command::Goal(command) => goal(context, command),
        Command::Prompt {
            mode,
            message,
            context: extra,
            no_memory,
            json,
        } => {
            let memory = (!no_memory).then(|| context.store.get(&context.user_id));
            let mut request = PromptRequest::new(mode, &message).with_memory(memory.as_ref());
            if let Some(extra) = extra.as_deref() {
                request = request.with_additional_context(extra);
            }

            let built = context.assistant().prompt_builder().build(request);
            if json {
                let rendered = serde_json::to_string_pretty(&built.messages)
                    .context("Failed to serialize prompt messages")?;
                println!("{rendered}");
            } else {
                println!("{}", built.system_prompt);
            }
            Ok(())
        }
        Command::Grade {
            question,
            answer,
            rubric,
            no_record,
        } => grade(context, question, answer, rubric, no_record).await,
        Command::Provider(command) => provider(context, command),
        Command::Tutor => bail!("The tutor command runs interactively"),
    }
}

fn profile(context: &Context, command: ProfileCommand) -> Result<()> {
    let store = &context.store;
    let user = context.user_id.as_str();

    let memory = match command {
        ProfileCommand::Show { json } => {
            let memory = store.get(user);
            if json {
                let rendered = serde_json::to_string_pretty(&memory)
                    .context("Failed to serialize learner memory")?;
                println!("{rendered}");
                return Ok(());
            }
            memory
        }
        ProfileCommand::Set {
            skill,
            style,
            tone,
            time,
        } => {
            let update = MemoryUpdate {
                skill_level: skill,
                explanation_style: style,
                tone_preference: tone,
                time_availability: time,
                ..Default::default()
            };
            if update.is_empty() {
                bail!("Nothing to set. Pass at least one of --skill, --style, --tone, --time");
            }
            store.update(user, update)
        }
        ProfileCommand::Reset => {
            let memory = store.reset(user);
            context.formatter.print_system("Profile reset to defaults");
            memory
        }
    };

    context.formatter.print_memory(&memory);
    Ok(())
}

fn topic(context: &Context, command: TopicCommand) -> Result<()> {
    let store = &context.store;
    let user = context.user_id.as_str();

    let memory = match command {
        TopicCommand::AddWeak { topic } => store.add_weak_topic(user, &topic),
        TopicCommand::RemoveWeak { topic } => store.remove_weak_topic(user, &topic),
        TopicCommand::AddStrong { topic } => store.add_strong_topic(user, &topic),
        TopicCommand::AddRecent { topic } => store.add_recent_topic(user, &topic),
        TopicCommand::AddMistake { mistake } => store.add_common_mistake(user, &mistake),
    };

    context.formatter.print_memory(&memory);
    Ok(())
}

fn goal(context: &Context, command: GoalCommand) -> Result<()> {
    let store = &context.store;
    let user = context.user_id.as_str();

    let memory = match command {
        GoalCommand::Add { goal } => {
            let memory = store.add_learning_goal(user, &goal);
            if !memory.learning_goals.iter().any(|g| g == goal.trim()) {
                context
                    .formatter
                    .print_system("Goal not added: the goal list is full or the goal is blank");
            }
            memory
        }
        GoalCommand::Remove { goal } => store.remove_learning_goal(user, &goal),
    };

    context.formatter.print_memory(&memory);
    Ok(())
}

async fn grade(
    context: &Context,
    question: String,
    answer: String,
    rubric: Option<String>,
    no_record: bool,
) -> Result<()> {
    let mut request = GradingRequest::new(question, answer);
    if let Some(rubric) = rubric {
        request = request.with_rubric(rubric);
    }

    let assistant = context.assistant();
    if assistant.backend().is_demo() {
        context
            .formatter
            .print_system("No AI provider configured; using demo grading");
    }

    let memory = context.store.get(&context.user_id);
    let feedback = assistant
        .grade(&request, Some(&memory))
        .await
        .context("Grading failed")?;
    context.formatter.print_feedback(&feedback);

    if !no_record {
        record_grading_outcome(&context.store, &context.user_id, &request.question, &feedback);
    }
    Ok(())
}

fn provider(context: &Context, command: ProviderCommand) -> Result<()> {
    let message = match command {
        ProviderCommand::SetOpenai { api_key, base_url } => {
            if api_key.trim().is_empty() {
                bail!("--api-key must not be empty");
            }
            context.settings.update_setting(|settings| {
                settings.add_provider(
                    "openai",
                    ProviderConfig::OpenAi {
                        api_key: api_key.trim().to_string(),
                        base_url,
                    },
                )
            });
            "OpenAI provider configured"
        }
        ProviderCommand::UseMock { text } => {
            let behavior = match text {
                Some(text) => MockBehavior::FixedText { text },
                None => MockBehavior::Success,
            };
            context.settings.update_setting(|settings| {
                settings.add_provider("mock", ProviderConfig::Mock { behavior })
            });
            "Mock provider configured"
        }
        ProviderCommand::Clear => {
            context
                .settings
                .update_setting(|settings| settings.clear_active_provider());
            "Provider cleared; tutoring and grading will run in demo mode"
        }
    };

    context.settings.save()?;
    context.formatter.print_system(&format!(
        "{message} ({})",
        context.settings.path().display()
    ));
    Ok(())
}

pub enum LocalCommandResult {
    Handled { msg: String },
    Exit,
    Unhandled,
}

const HELP: &str = "Commands:
  /profile  Show the learner profile the tutor is using
  /help     Show this message
  /quit     Leave the session (also /exit)";

/// Commands answered by the REPL itself without contacting the tutor.
pub fn handle_local_command(context: &Context, input: &str) -> LocalCommandResult {
    if !input.starts_with('/') {
        return LocalCommandResult::Unhandled;
    }

    match input.split_whitespace().next().unwrap_or_default() {
        "/quit" | "/exit" => LocalCommandResult::Exit,
        "/help" => LocalCommandResult::Handled {
            msg: HELP.to_string(),
        },
        "/profile" => LocalCommandResult::Handled {
            msg: context.store.get(&context.user_id).describe(),
        },
        other => LocalCommandResult::Handled {
            msg: format!("Unknown command {other}. Type /help for commands"),
        },
    }
}
