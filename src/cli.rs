use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::adapters::outbound::filesystem::DEFAULT_APPROVAL_FILE;

/// Cache location relative to the project directory
const DEFAULT_CACHE_DIR: &str = "node_modules/.cache/lockgate";

/// Check an npm project's installed dependencies against a supply-chain policy
#[derive(Parser, Debug)]
#[command(name = "lockgate")]
#[command(version)]
#[command(
    about = "Check an npm project's installed dependencies against a supply-chain policy",
    long_about = None
)]
pub struct Args {
    /// Path to the project directory (defaults to current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Lockfile to check (defaults to package-lock.json, then npm-shrinkwrap.json)
    #[arg(short, long)]
    pub lockfile: Option<PathBuf>,

    /// Policy file (defaults to lockgate.config.yml/.yaml/.toml in the project)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for registry and popularity caches
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Approval file (defaults to .lockgate-approvals.yml in the project)
    #[arg(long, value_name = "FILE")]
    pub approvals: Option<PathBuf>,

    /// Never prompt; fail when there are new warnings
    #[arg(long)]
    pub ci: bool,

    /// Accept new warnings without prompting and update the approval file
    #[arg(short, long, conflicts_with = "ci")]
    pub yes: bool,

    /// Print diagnostic logs
    #[arg(short, long)]
    pub verbose: bool,
}

/// How new warnings are settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalMode {
    Interactive,
    Unattended,
    AutoApprove,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn project_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| self.project_path().join(DEFAULT_CACHE_DIR))
    }

    pub fn approvals_path(&self) -> PathBuf {
        self.approvals
            .clone()
            .unwrap_or_else(|| self.project_path().join(DEFAULT_APPROVAL_FILE))
    }

    /// `--yes` wins; otherwise `--ci`, a `CI` variable or a non-terminal stdin mean unattended
    pub fn approval_mode(&self) -> ApprovalMode {
        let ci_env = std::env::var_os("CI").is_some_and(|v| !v.is_empty() && v != "false");
        self.resolve_mode(ci_env, std::io::stdin().is_terminal())
    }

    fn resolve_mode(&self, ci_env: bool, stdin_is_terminal: bool) -> ApprovalMode {
        if self.yes {
            ApprovalMode::AutoApprove
        } else if self.ci || ci_env || !stdin_is_terminal {
            ApprovalMode::Unattended
        } else {
            ApprovalMode::Interactive
        }
    }
}
