// ABOUTME: Runs docker CLI commands and captures their output.
// ABOUTME: Failed commands keep their exit status so the CLI can propagate it.

use std::collections::BTreeMap;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

/// Errors from running an external command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` {}: {}", describe_status(.status), .stderr.trim())]
    Failed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },
}

impl CommandError {
    /// Exit status of the failed command, if it ran and exited normally.
    pub fn exit_status(&self) -> Option<i32> {
        match self {
            CommandError::Failed { status, .. } => *status,
            CommandError::Spawn { .. } => None,
        }
    }

    /// Captured stderr of the failed command.
    pub fn stderr(&self) -> &str {
        match self {
            CommandError::Failed { stderr, .. } => stderr,
            CommandError::Spawn { .. } => "",
        }
    }
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exited with status {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

/// Captured output of a successful command.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Invokes the docker CLI (or a compatible binary such as podman).
#[derive(Debug, Clone)]
pub struct DockerProcess {
    program: String,
}

impl DockerProcess {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run `program args...` with extra environment variables.
    ///
    /// Environment values are never echoed into logs or error messages.
    pub async fn run(
        &self,
        args: &[String],
        envs: &BTreeMap<String, String>,
    ) -> Result<CommandOutput, CommandError> {
        let command = format!("{} {}", self.program, args.join(" "));
        tracing::debug!("Running: {}", command);

        let output = Command::new(&self.program)
            .args(args)
            .envs(envs)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| CommandError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                "{} exited with {:?}: {}",
                command,
                output.status.code(),
                stderr.trim()
            );
            return Err(CommandError::Failed {
                command,
                status: output.status.code(),
                stderr,
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_command_reports_status_and_trimmed_stderr() {
        let err = CommandError::Failed {
            command: "docker push repo:latest".to_string(),
            status: Some(125),
            stderr: "denied: access forbidden\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "`docker push repo:latest` exited with status 125: denied: access forbidden"
        );
        assert_eq!(err.exit_status(), Some(125));
    }

    #[test]
    fn signal_termination_has_no_status() {
        let err = CommandError::Failed {
            command: "docker pull x".to_string(),
            status: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("terminated by a signal"));
        assert_eq!(err.exit_status(), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let process = DockerProcess::new("/nonexistent/tagslot-docker");
        let err = process
            .run(&["version".to_string()], &BTreeMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn environment_reaches_the_child() {
        let process = DockerProcess::new("sh");
        let mut envs = BTreeMap::new();
        envs.insert("TAGSLOT_PROBE".to_string(), "present".to_string());
        let output = process
            .run(
                &["-c".to_string(), "printf %s \"$TAGSLOT_PROBE\"".to_string()],
                &envs,
            )
            .await
            .unwrap();
        assert_eq!(output.stdout, "present");
    }
}
