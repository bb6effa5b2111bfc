//! Process-backed compiler engine.
//!
//! The concrete engine the CLI wires in: the external asset compiler is a
//! separate executable that reads a [`CompileSpec`] as JSON on stdin and
//! writes its stats as JSON on stdout. Diagnostics belong in the stats; a
//! non-zero exit means the collaborator itself broke.

use crate::compiler::{CompileSpec, CompilerEngine, RawStats};
use crate::error::EngineError;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Engine that spawns the configured compiler command once per pass.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    command: String,
    args: Vec<String>,
}

impl ProcessEngine {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }
}

#[async_trait]
impl CompilerEngine for ProcessEngine {
    async fn compile(&self, spec: &CompileSpec) -> Result<RawStats, EngineError> {
        let payload =
            serde_json::to_vec(spec).map_err(|e| EngineError::Protocol(e.to_string()))?;

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&payload).await?;
            // Closing stdin signals end of spec to the compiler.
            drop(stdin);
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(EngineError::AbnormalExit {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| EngineError::Protocol(format!("invalid stats JSON: {e}")))
    }
}
