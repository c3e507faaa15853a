/// Starting the monitor as an independent process

use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;

use crate::utils::APP_NAME;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("launcher terminal command is empty; set [launcher] terminal in the config")]
    EmptyCommand,

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Exit report for a spawned child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildExit {
    pub pid: u32,
    pub success: bool,
    pub description: String,
}

impl ChildExit {
    fn from_status(pid: u32, status: io::Result<ExitStatus>) -> Self {
        match status {
            Ok(status) => Self {
                pid,
                success: status.success(),
                description: status.to_string(),
            },
            Err(e) => Self {
                pid,
                success: false,
                description: format!("wait failed: {}", e),
            },
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait ProcessSpawner {
    /// Start the process and return its pid without waiting for it
    fn spawn(&mut self) -> Result<u32, LaunchError>;
}

/// Opens `<terminal...> <program> <args...>` in a new terminal window.
///
/// The terminal prefix is mandatory: the monitor needs a tty of its own.
pub struct TerminalSpawner {
    terminal: Vec<String>,
    program: PathBuf,
    args: Vec<String>,
    exits: Option<UnboundedSender<ChildExit>>,
}

impl TerminalSpawner {
    pub fn new(terminal: Vec<String>, program: PathBuf, args: Vec<String>) -> Self {
        Self { terminal, program, args, exits: None }
    }

    /// Spawner that re-runs the current executable with `monitor`
    pub fn for_monitor(terminal: Vec<String>) -> Self {
        let exe = std::env::current_exe().unwrap_or_else(|e| {
            tracing::warn!("cannot locate own executable ({}), relying on PATH", e);
            PathBuf::from(APP_NAME)
        });
        Self::new(terminal, exe, vec!["monitor".to_string()])
    }

    /// Report child exits on `tx`
    pub fn with_exit_reports(mut self, tx: UnboundedSender<ChildExit>) -> Self {
        self.exits = Some(tx);
        self
    }

    fn command_line(&self) -> Vec<String> {
        self.terminal
            .iter()
            .cloned()
            .chain(std::iter::once(self.program.to_string_lossy().to_string()))
            .chain(self.args.iter().cloned())
            .collect()
    }
}

impl ProcessSpawner for TerminalSpawner {
    fn spawn(&mut self) -> Result<u32, LaunchError> {
        // Without a terminal the child would share the launcher's tty
        if self.terminal.first().map_or(true, |t| t.trim().is_empty()) {
            return Err(LaunchError::EmptyCommand);
        }
        let line = self.command_line();
        let (program, args) = line.split_first().ok_or(LaunchError::EmptyCommand)?;

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        // Own process group: a hangup aimed at the launcher leaves monitors alone
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command
            .spawn()
            .map_err(|source| LaunchError::Spawn { program: program.clone(), source })?;

        let pid = child.id().unwrap_or_default();
        tracing::info!(pid, command = %line.join(" "), "spawned monitor");

        // Reap the child so it never lingers as a zombie
        let exits = self.exits.clone();
        tokio::spawn(async move {
            let exit = ChildExit::from_status(pid, child.wait().await);
            if exit.success {
                tracing::info!(pid, status = %exit.description, "monitor exited");
            } else {
                tracing::warn!(pid, status = %exit.description, "monitor exited abnormally");
            }
            if let Some(tx) = exits {
                let _ = tx.send(exit);
            }
        });

        Ok(pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_command_line() {
        let spawner = TerminalSpawner::new(
            vec!["xterm".to_string(), "-e".to_string()],
            PathBuf::from("/usr/bin/okr-monitor"),
            vec!["monitor".to_string()],
        );
        assert_eq!(spawner.command_line(), vec!["xterm", "-e", "/usr/bin/okr-monitor", "monitor"]);
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let mut spawner = TerminalSpawner::new(
            vec!["okr-no-such-terminal-emulator".to_string()],
            PathBuf::from("monitor"),
            vec![],
        );
        match spawner.spawn() {
            Err(LaunchError::Spawn { program, .. }) => assert_eq!(program, "okr-no-such-terminal-emulator"),
            other => panic!("expected spawn error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_terminal_prefix_is_empty_command() {
        let mut spawner = TerminalSpawner::new(vec![], PathBuf::from("okr-monitor"), vec!["monitor".to_string()]);
        assert!(matches!(spawner.spawn(), Err(LaunchError::EmptyCommand)));
    }

    #[tokio::test]
    async fn test_blank_program_is_empty_command() {
        let mut spawner = TerminalSpawner::new(vec![" ".to_string()], PathBuf::from("x"), vec![]);
        assert!(matches!(spawner.spawn(), Err(LaunchError::EmptyCommand)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_child_exit_is_reported() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut spawner = TerminalSpawner::new(
            vec!["sh".to_string(), "-c".to_string()],
            PathBuf::from("exit 3"),
            vec![],
        )
        .with_exit_reports(tx);

        let pid = spawner.spawn().unwrap();
        let exit = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(exit.pid, pid);
        assert!(!exit.success);
    }
}
