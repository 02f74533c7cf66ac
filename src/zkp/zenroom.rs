// src/zkp/zenroom.rs
//! Crypto Engine backed by the `zenroom` command line VM.
//!
//! Each call writes the rendered script and its non-empty inputs to a private
//! scratch directory, runs the binary and returns its trimmed standard output.
//! The hashing script always gets its data file, even for an empty value.
//! The scratch directory is removed whether or not the run succeeded.

use crate::zkp::engine::{CryptoEngine, EngineError, Script};
use async_trait::async_trait;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use uuid::Uuid;

/// Engine that shells out to a local `zenroom` executable.
#[derive(Debug, Clone)]
pub struct ZenroomCli {
    /// Path or name of the executable
    binary: PathBuf,
    /// Parent directory for per-call scratch directories
    scratch_root: PathBuf,
}

impl ZenroomCli {
    /// Creates an engine using `binary`, with scratch files under the system temp dir.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            scratch_root: std::env::temp_dir(),
        }
    }

    /// Overrides where per-call scratch directories are created.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = root.into();
        self
    }

    async fn run_in(
        &self,
        dir: &Path,
        script: &Script,
        source: &str,
        data: &str,
        keys: &str,
    ) -> Result<String, EngineError> {
        let script_path = dir.join(if script.is_zencode() { "script.zen" } else { "script.lua" });
        fs::write(&script_path, source).await?;

        let mut args: Vec<String> = Vec::new();
        if script.is_zencode() {
            args.push("-z".to_string());
        }
        if !data.is_empty() || *script == Script::Hashing {
            let path = dir.join("data.json");
            fs::write(&path, data).await?;
            args.push("-a".to_string());
            args.push(path.display().to_string());
        }
        if !keys.is_empty() {
            let path = dir.join("keys.json");
            fs::write(&path, keys).await?;
            args.push("-k".to_string());
            args.push(path.display().to_string());
        }
        args.push(script_path.display().to_string());

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(EngineError::Spawn)?;

        if !output.status.success() {
            return Err(EngineError::Execution {
                script: script.name(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|e| EngineError::Output {
            script: script.name(),
            reason: format!("not UTF-8: {}", e),
        })?;
        let result = stdout.trim();
        if result.is_empty() {
            return Err(EngineError::Output {
                script: script.name(),
                reason: "empty output".to_string(),
            });
        }
        Ok(result.to_string())
    }
}

#[async_trait]
impl CryptoEngine for ZenroomCli {
    async fn execute(&self, script: &Script, data: &str, keys: &str) -> Result<String, EngineError> {
        let source = script.render()?;
        let dir = self.scratch_root.join(format!("dddc-wallet-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).await?;
        debug!("running {} script in {}", script, dir.display());

        let result = self.run_in(&dir, script, &source, data, keys).await;

        if let Err(e) = fs::remove_dir_all(&dir).await {
            warn!("could not remove engine scratch dir {}: {}", dir.display(), e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionId;

    fn scratch_root() -> PathBuf {
        let root = std::env::temp_dir().join(format!("dddc-wallet-test-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&root).unwrap();
        root
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_spawn_error() {
        let root = scratch_root();
        let engine = ZenroomCli::new("/nonexistent/zenroom-binary").with_scratch_root(&root);

        let err = engine
            .execute(&Script::Keygen { session: SessionId::generate() }, "", "")
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Spawn(_)));
        // scratch directory is cleaned up even on failure
        assert_eq!(std::fs::read_dir(&root).unwrap().count(), 0);
        std::fs::remove_dir_all(root).unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_an_execution_error() {
        let root = scratch_root();
        let engine = ZenroomCli::new("false").with_scratch_root(&root);

        let err = engine.execute(&Script::Hashing, "42", "").await.unwrap_err();

        match err {
            EngineError::Execution { script, .. } => assert_eq!(script, "hashing"),
            other => panic!("unexpected error: {other}"),
        }
        std::fs::remove_dir_all(root).unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_empty_stdout_is_rejected() {
        let root = scratch_root();
        let engine = ZenroomCli::new("true").with_scratch_root(&root);

        let err = engine.execute(&Script::Hashing, "42", "").await.unwrap_err();

        assert!(matches!(err, EngineError::Output { .. }));
        std::fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn test_unquotable_issuer_fails_before_spawning() {
        let root = scratch_root();
        let engine = ZenroomCli::new("/nonexistent/zenroom-binary").with_scratch_root(&root);
        let script = Script::Aggregate {
            session: SessionId::generate(),
            issuer: "o'brien".to_string(),
        };

        let err = engine.execute(&script, "{}", "{}").await.unwrap_err();

        assert!(matches!(err, EngineError::Output { script: "aggregate", .. }));
        assert_eq!(std::fs::read_dir(&root).unwrap().count(), 0);
        std::fs::remove_dir_all(root).unwrap();
    }

    // `echo` prints the arguments it was given
    #[cfg(unix)]
    #[tokio::test]
    async fn test_hashing_empty_value_still_passes_data_file() {
        let root = scratch_root();
        let engine = ZenroomCli::new("echo").with_scratch_root(&root);

        let args = engine.execute(&Script::Hashing, "", "").await.unwrap();

        let args: Vec<&str> = args.split_whitespace().collect();
        assert_eq!(args.len(), 3, "unexpected arguments: {args:?}");
        assert_eq!(args[0], "-a");
        assert!(args[1].ends_with("data.json"));
        assert!(args[2].ends_with("script.lua"));
        std::fs::remove_dir_all(root).unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_keygen_without_inputs_passes_only_script() {
        let root = scratch_root();
        let engine = ZenroomCli::new("echo").with_scratch_root(&root);

        let args = engine
            .execute(&Script::Keygen { session: SessionId::generate() }, "", "")
            .await
            .unwrap();

        let args: Vec<&str> = args.split_whitespace().collect();
        assert_eq!(args.len(), 2, "unexpected arguments: {args:?}");
        assert_eq!(args[0], "-z");
        assert!(args[1].ends_with("script.zen"));
        std::fs::remove_dir_all(root).unwrap();
    }
}
