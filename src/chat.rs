/*!
 * Interactive command-line chatbot.
 *
 * Every line the user types is translated into the current target language.
 * Lines starting with `/` are commands.
 */

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::errors::TranslationError;
use crate::extraction::TextSource;
use crate::translation::{TranslationOutcome, TranslationPipeline, TranslationRequest};

const HELP: &str = "Type text to translate it, or use a command:
  /url <address>    translate a web page
  /pdf <path>       translate a PDF file
  /target <code>    change the target language
  /languages        list supported target languages
  /help             show this help
  /quit             leave the chat";

/// What the session wants printed after a line
#[derive(Debug, Clone, PartialEq)]
pub enum ChatReply {
    Message(String),
    Nothing,
    Quit,
}

/// State of one chat session
pub struct ChatSession {
    pipeline: Arc<TranslationPipeline>,
    target: String,
}

impl ChatSession {
    pub fn new(pipeline: Arc<TranslationPipeline>) -> Self {
        let target = pipeline.config().default_target.clone();
        Self { pipeline, target }
    }

    /// Current target language code
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn greeting(&self) -> String {
        let name = self
            .pipeline
            .service()
            .supported_languages()
            .get(&self.target)
            .map(|entry| entry.name.clone())
            .unwrap_or_else(|| self.target.clone());
        format!("Translating to {} ({}). Type /help for commands.", name, self.target)
    }

    /// Handle one line of user input
    pub async fn handle_line(&mut self, line: &str) -> ChatReply {
        let line = line.trim();
        if line.is_empty() {
            return ChatReply::Nothing;
        }

        let Some(command_line) = line.strip_prefix('/') else {
            return self.translate(TextSource::raw_text(line)).await;
        };

        let (command, argument) = match command_line.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, argument.trim()),
            None => (command_line, ""),
        };

        match command.to_lowercase().as_str() {
            "quit" | "exit" | "q" => ChatReply::Quit,
            "help" | "h" => ChatReply::Message(HELP.to_string()),
            "languages" | "langs" => ChatReply::Message(self.list_languages()),
            "target" => self.set_target(argument),
            "url" => self.translate(TextSource::url(argument)).await,
            "pdf" => {
                if argument.is_empty() {
                    return ChatReply::Message("Usage: /pdf <path>".to_string());
                }
                self.translate(Ok(TextSource::PdfPath(PathBuf::from(argument)))).await
            }
            other => ChatReply::Message(format!("Unknown command /{}. Type /help for commands.", other)),
        }
    }

    fn list_languages(&self) -> String {
        self.pipeline
            .service()
            .supported_languages()
            .entries()
            .iter()
            .map(|entry| {
                let marker = if entry.code == self.target { "*" } else { " " };
                format!("{} {:<6} {}", marker, entry.code, entry.name)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn set_target(&mut self, code: &str) -> ChatReply {
        if code.is_empty() {
            return ChatReply::Message(format!("Current target: {}", self.target));
        }
        match self.pipeline.service().validate_target(code) {
            Ok(entry) => {
                self.target = entry.code.clone();
                ChatReply::Message(format!("Target set to {} ({})", entry.name, entry.code))
            }
            Err(e) => ChatReply::Message(e.to_string()),
        }
    }

    async fn translate(&self, source: Result<TextSource, TranslationError>) -> ChatReply {
        let result = match source {
            Ok(source) => {
                let request = TranslationRequest::new(source).with_target(self.target.clone());
                self.pipeline.translate(request).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(outcome) => ChatReply::Message(format_outcome(&outcome)),
            Err(e) => ChatReply::Message(format!("Error: {}", e)),
        }
    }
}

fn format_outcome(outcome: &TranslationOutcome) -> String {
    format!(
        "[{} -> {}] {}",
        outcome.detected_language_name, outcome.target_language_name, outcome.translated_text
    )
}

/// Run the read-translate-print loop until `/quit` or end of input
pub async fn run_chat<R, W>(mut session: ChatSession, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    writer.write_all(format!("{}\n> ", session.greeting()).as_bytes()).await?;
    writer.flush().await?;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        match session.handle_line(&line).await {
            ChatReply::Quit => break,
            ChatReply::Message(message) => {
                writer.write_all(message.as_bytes()).await?;
                writer.write_all(b"\n").await?;
            }
            ChatReply::Nothing => {}
        }
        writer.write_all(b"> ").await?;
        writer.flush().await?;
    }

    writer.write_all(b"\nBye!\n").await?;
    writer.flush().await?;
    Ok(())
}
