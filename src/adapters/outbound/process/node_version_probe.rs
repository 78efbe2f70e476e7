use crate::ports::outbound::NodeRuntimeProbe;
use crate::shared::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;

/// NodeVersionProbe runs `node --version`
pub struct NodeVersionProbe {
    program: String,
}

impl NodeVersionProbe {
    const TIMEOUT_SECONDS: u64 = 10;

    pub fn new() -> Self {
        Self::with_program("node")
    }

    /// Probes another executable, e.g. an absolute path to a specific Node.js install
    pub fn with_program(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }
}

impl Default for NodeVersionProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeRuntimeProbe for NodeVersionProbe {
    async fn node_version(&self) -> Result<String> {
        let output = tokio::time::timeout(
            Duration::from_secs(Self::TIMEOUT_SECONDS),
            Command::new(&self.program)
                .arg("--version")
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| anyhow::anyhow!("`{} --version` timed out", self.program))?
        .map_err(|e| anyhow::anyhow!("Failed to run `{} --version`: {}", self.program, e))?;

        if !output.status.success() {
            anyhow::bail!("`{} --version` exited with {}", self.program, output.status);
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if version.is_empty() {
            anyhow::bail!("`{} --version` printed nothing", self.program);
        }
        Ok(version)
    }
}
