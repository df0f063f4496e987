//! External-command platform adapters
//!
//! `CommandShareTarget` hands a share payload to a user-configured program;
//! `CommandLauncher` opens URLs with a browser command or the platform opener.
//! Child output is captured so it never lands on the UI's terminal.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::domain::ports::{Launcher, SharePayload, ShareTarget};
use crate::error::PlatformError;

/// A program plus leading arguments, parsed from a config string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Split on whitespace; returns `None` for a blank string
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    fn failure(&self, output: &std::process::Output) -> PlatformError {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = match stderr.trim() {
            "" => output.status.to_string(),
            detail => format!("{}: {}", output.status, detail),
        };
        PlatformError::Command {
            program: self.program.clone(),
            message,
        }
    }
}

/// Platform default opener
pub fn default_opener() -> CommandLine {
    if cfg!(target_os = "macos") {
        CommandLine {
            program: "open".to_string(),
            args: vec![],
        }
    } else if cfg!(target_os = "windows") {
        CommandLine {
            program: "cmd".to_string(),
            args: vec!["/C".to_string(), "start".to_string(), String::new()],
        }
    } else {
        CommandLine {
            program: "xdg-open".to_string(),
            args: vec![],
        }
    }
}

/// Share by running a program.
///
/// The program receives the URL as its last argument, the payload as JSON
/// on stdin, and `WIKITOK_SHARE_TITLE` / `WIKITOK_SHARE_TEXT` /
/// `WIKITOK_SHARE_URL` in its environment. A non-zero exit is a failed or
/// cancelled share.
pub struct CommandShareTarget {
    command: CommandLine,
}

impl CommandShareTarget {
    pub fn new(command: CommandLine) -> Self {
        Self { command }
    }
}

#[async_trait]
impl ShareTarget for CommandShareTarget {
    async fn share(&self, payload: &SharePayload) -> Result<(), PlatformError> {
        let json = serde_json::to_vec(payload)
            .map_err(|e| PlatformError::Unavailable(format!("payload encoding: {}", e)))?;

        let mut child = self
            .command
            .command()
            .arg(&payload.url)
            .env("WIKITOK_SHARE_TITLE", &payload.title)
            .env("WIKITOK_SHARE_TEXT", &payload.text)
            .env("WIKITOK_SHARE_URL", &payload.url)
            .stdin(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // A program that ignores stdin may close it early
            if let Err(e) = stdin.write_all(&json).await {
                tracing::debug!("Share command did not read its payload: {}", e);
            }
        }

        let output = child.wait_with_output().await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(self.command.failure(&output))
        }
    }
}

pub struct CommandLauncher {
    command: CommandLine,
}

impl CommandLauncher {
    pub fn new(command: CommandLine) -> Self {
        Self { command }
    }

    /// Use the configured browser, or the platform opener when unset
    pub fn from_browser(browser: Option<&str>) -> Self {
        Self::new(browser.and_then(CommandLine::parse).unwrap_or_else(default_opener))
    }
}

#[async_trait]
impl Launcher for CommandLauncher {
    async fn open_url(&self, url: &str) -> Result<(), PlatformError> {
        let output = self
            .command
            .command()
            .arg(url)
            .stdin(Stdio::null())
            .output()
            .await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(self.command.failure(&output))
        }
    }
}
