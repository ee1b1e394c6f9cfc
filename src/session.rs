use crate::cli::{SessionCommand, SessionLine};
use crate::config::OutputFormat;
use crate::models::{Todo, TodoData, TodoError};
use crate::store::TodoStore;
use clap::error::ErrorKind;
use clap::Parser;
use log::{debug, info};
use serde_json::json;
use std::io::{BufRead, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{0}")]
    Parse(String),
    #[error(transparent)]
    Todo(#[from] TodoError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SessionError {
    pub fn status_code(&self) -> u16 {
        match self {
            SessionError::Parse(_) => 400,
            SessionError::Todo(e) => e.status_code(),
            SessionError::Serialization(_) => 500,
        }
    }
}

impl From<clap::Error> for SessionError {
    fn from(error: clap::Error) -> Self {
        let rendered = error.to_string();
        let message = rendered
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("error: ")
            .to_string();
        SessionError::Parse(message)
    }
}

/// Result of a single session line.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Output(String),
    Quit,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub commands: usize,
    pub failures: usize,
}

/// Drives one `TodoStore` from textual commands.
pub struct Session {
    store: TodoStore,
    output: OutputFormat,
}

impl Session {
    pub fn new(store: TodoStore, output: OutputFormat) -> Self {
        Self { store, output }
    }

    pub fn store(&self) -> &TodoStore {
        &self.store
    }

    pub fn execute(&mut self, line: &str) -> Result<Step, SessionError> {
        let parsed = match SessionLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => parsed,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                return Ok(Step::Output(e.to_string().trim_end().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        debug!("session command: {:?}", parsed.command);

        let output = match parsed.command {
            SessionCommand::Add(args) => {
                let id = self.store.add(TodoData::from(args))?;
                self.render_ack("added", "Added", id)?
            }
            SessionCommand::List => self.render_list(&self.store.find_all())?,
            SessionCommand::Show { id } => self.render_todo(self.store.find_by_id(id)?)?,
            SessionCommand::Update { id, todo } => {
                self.store.update(id, TodoData::from(todo))?;
                self.render_ack("updated", "Updated", id)?
            }
            SessionCommand::RenameTag { id, before, after } => {
                self.store.update_tag_by_id(id, &before, &after)?;
                self.render_todo(self.store.find_by_id(id)?)?
            }
            SessionCommand::RemoveTags { id, tags } => {
                self.store.delete_tag_by_id(id, &tags)?;
                self.render_todo(self.store.find_by_id(id)?)?
            }
            SessionCommand::ClearTags { id } => {
                self.store.delete_all_tags_by_id(id)?;
                self.render_ack("cleared_tags", "Cleared tags of", id)?
            }
            SessionCommand::Delete { id } => match self.store.delete_by_id(id)? {
                Some(_) => self.render_ack("deleted", "Deleted", id)?,
                None => self.render_message(&format!("No todo {} to delete", id))?,
            },
            SessionCommand::DeleteAll => {
                let removed = self.store.delete_all();
                match self.output {
                    OutputFormat::Text => format!("Deleted {} todo(s)", removed),
                    OutputFormat::Json => serde_json::to_string(&json!({ "deleted": removed }))?,
                }
            }
            SessionCommand::Quit => return Ok(Step::Quit),
        };
        Ok(Step::Output(output))
    }

    /// Runs commands from `input` until it ends or a `quit` line. Failed
    /// commands are reported on `errors` and the session keeps going.
    pub fn run<R, W, E>(
        &mut self,
        input: R,
        out: &mut W,
        errors: &mut E,
    ) -> std::io::Result<SessionSummary>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        let mut summary = SessionSummary::default();
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            summary.commands += 1;
            match self.execute(line) {
                Ok(Step::Output(text)) => writeln!(out, "{}", text)?,
                Ok(Step::Quit) => break,
                Err(e) => {
                    summary.failures += 1;
                    writeln!(errors, "{}", self.render_error(&e))?;
                }
            }
        }
        info!(
            "session finished: {} command(s), {} failure(s)",
            summary.commands, summary.failures
        );
        Ok(summary)
    }

    fn render_todo(&self, todo: &Todo) -> Result<String, SessionError> {
        Ok(match self.output {
            OutputFormat::Text => format_todo(todo),
            OutputFormat::Json => serde_json::to_string(todo)?,
        })
    }

    fn render_list(&self, todos: &[&Todo]) -> Result<String, SessionError> {
        Ok(match self.output {
            OutputFormat::Text if todos.is_empty() => "No todos".to_string(),
            OutputFormat::Text => todos
                .iter()
                .map(|todo| format_todo(todo))
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Json => serde_json::to_string(todos)?,
        })
    }

    fn render_ack(&self, action: &str, verb: &str, id: u64) -> Result<String, SessionError> {
        Ok(match self.output {
            OutputFormat::Text => format!("{} todo {}", verb, id),
            OutputFormat::Json => serde_json::to_string(&json!({ "action": action, "id": id }))?,
        })
    }

    fn render_message(&self, message: &str) -> Result<String, SessionError> {
        Ok(match self.output {
            OutputFormat::Text => message.to_string(),
            OutputFormat::Json => serde_json::to_string(&json!({ "message": message }))?,
        })
    }

    pub fn render_error(&self, error: &SessionError) -> String {
        match self.output {
            OutputFormat::Text => format!("error[{}]: {}", error.status_code(), error),
            OutputFormat::Json => {
                json!({ "error": error.to_string(), "code": error.status_code() }).to_string()
            }
        }
    }
}

fn format_todo(todo: &Todo) -> String {
    let mark = if todo.complete { "x" } else { " " };
    let mut line = format!("{}. [{}] {} ({})", todo.id, mark, todo.content, todo.category);
    if !todo.tags.is_empty() {
        let tags: Vec<&str> = todo.tags.iter().map(String::as_str).collect();
        line.push_str(&format!(" tags: {}", tags.join(", ")));
    }
    line
}
