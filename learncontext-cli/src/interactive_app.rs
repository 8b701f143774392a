use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::sync::Arc;
use tracing::warn;

use learncontext_core::TutorSession;

use crate::commands::{handle_local_command, Context, LocalCommandResult};

pub struct InteractiveApp {
    context: Context,
    session: TutorSession,
}

impl InteractiveApp {
    pub fn new(context: Context) -> Self {
        let assistant = Arc::new(context.assistant());
        let demo = assistant.backend().is_demo();
        let session = TutorSession::new(assistant, context.store.clone(), &context.user_id);

        context.formatter.print_system(&format!(
            "💡 Tutoring {}. Type /help for commands, /profile to see what the tutor knows, /quit to exit",
            context.user_id
        ));
        if demo {
            context.formatter.print_system(
                "No AI provider configured; replies come from demo mode. Run `learncontext provider set-openai` to go live",
            );
        }

        Self { context, session }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;

        loop {
            let line = match rl.readline("\x1b[35m>\x1b[0m ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => continue,
                Err(_) => break,
            };

            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            match handle_local_command(&self.context, input) {
                LocalCommandResult::Handled { msg } => {
                    self.context.formatter.print_system(&msg);
                    continue;
                }
                LocalCommandResult::Exit => break,
                LocalCommandResult::Unhandled => (),
            }

            rl.add_history_entry(&line)?;
            self.send(input).await;
        }

        println!("\nGoodbye!");
        Ok(())
    }

    async fn send(&mut self, input: &str) {
        match self.session.send(input).await {
            Ok(Some(reply)) => {
                let tokens = reply.metadata.and_then(|metadata| metadata.tokens_used);
                self.context.formatter.print_tutor(&reply.content, tokens);
            }
            Ok(None) => (),
            Err(e) => {
                warn!(error = %e, "Tutor request failed");
                self.context
                    .formatter
                    .print_error(&format!("{e}. Send your message again to retry"));
            }
        }
    }
}
