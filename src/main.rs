use lockgate::adapters::outbound::console::{
    render_warning_summary, summarize_counts, AutoApprove, ConsoleApprovalPrompt,
    StderrProgressReporter, UnattendedApproval,
};
use lockgate::adapters::outbound::filesystem::{FileSystemReader, YamlApprovalStore};
use lockgate::adapters::outbound::network::{
    CachingRegistryRepository, NodeAdvisoryCache, NodeSecurityWgClient, NpmDownloadsClient,
    NpmRegistryClient, PopularityCache,
};
use lockgate::adapters::outbound::process::NodeVersionProbe;
use lockgate::application::dto::{CheckOutcome, CheckRequest, CheckResponse, RuntimeReport};
use lockgate::application::use_cases::{CheckDependenciesUseCase, CheckNodeRuntimeUseCase};
use lockgate::cli::{ApprovalMode, Args};
use lockgate::config::load_policy;
use lockgate::ports::outbound::ApprovalPrompt;
use lockgate::shared::error::{ExitCode, GateError};
use lockgate::shared::Result;
use std::io::IsTerminal;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse_args();
    init_tracing(args.verbose);

    let code = match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            ExitCode::ApplicationError
        }
    };

    process::exit(code.as_i32());
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the default level
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "lockgate=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn run(args: Args) -> Result<ExitCode> {
    let project_path = args.project_path();
    validate_project_path(&project_path)?;

    let policy = load_policy(&project_path, args.config.as_deref())?;
    let check_node_version = policy.check_node_version;

    let request = CheckRequest::new(project_path, args.lockfile.clone(), policy);
    let response = match args.approval_mode() {
        ApprovalMode::Interactive => {
            check_dependencies(&args, ConsoleApprovalPrompt::new(), request).await?
        }
        ApprovalMode::Unattended => check_dependencies(&args, UnattendedApproval, request).await?,
        ApprovalMode::AutoApprove => {
            check_dependencies(&args, AutoApprove::new(), request).await?
        }
    };

    print_outcome(&response, &args);

    // Runs after the lockfile check so a blocked package stops the run before any request
    let runtime_report = if check_node_version {
        check_node_runtime().await?
    } else {
        None
    };

    let mut code = response.exit_code();
    if runtime_report.as_ref().is_some_and(RuntimeReport::is_vulnerable) {
        code = ExitCode::UnapprovedWarnings;
    }
    Ok(code)
}

async fn check_node_runtime() -> Result<Option<RuntimeReport>> {
    let use_case = CheckNodeRuntimeUseCase::new(
        NodeVersionProbe::new(),
        NodeAdvisoryCache::new(NodeSecurityWgClient::new()?),
        StderrProgressReporter::new(),
    );

    let report = use_case.execute().await;
    if let Some(report) = report.as_ref() {
        if report.is_vulnerable() {
            eprintln!(
                "❌ Node.js {} is affected by {} security advisories:",
                report.node_version,
                report.advisories.len()
            );
            for advisory in &report.advisories {
                match advisory.patched.as_deref() {
                    Some(patched) => eprintln!("   - {} (fixed in {})", advisory.label(), patched),
                    None => eprintln!("   - {}", advisory.label()),
                }
            }
            eprintln!();
        } else {
            eprintln!("✅ Node.js {} has no known advisories", report.node_version);
        }
    }
    Ok(report)
}

async fn check_dependencies<AP: ApprovalPrompt>(
    args: &Args,
    prompt: AP,
    request: CheckRequest,
) -> Result<CheckResponse> {
    let cache_dir = args.cache_dir();

    // Create adapters (Dependency Injection)
    let use_case = CheckDependenciesUseCase::new(
        FileSystemReader::new(),
        CachingRegistryRepository::new(NpmRegistryClient::new()?, &cache_dir),
        PopularityCache::new(NpmDownloadsClient::new()?, &cache_dir),
        YamlApprovalStore::new(args.approvals_path()),
        prompt,
        StderrProgressReporter::new(),
    );

    use_case.execute(request).await
}

fn print_outcome(response: &CheckResponse, args: &Args) {
    match response.outcome {
        CheckOutcome::Passed => {
            eprintln!(
                "✅ No new warnings ({} dependencies, {} previously approved)",
                response.dependency_count,
                response.approved.len()
            );
        }
        CheckOutcome::Accepted => {
            eprintln!(
                "✅ Approved {} new warning(s); updated {}",
                response.unapproved.len(),
                args.approvals_path().display()
            );
        }
        CheckOutcome::Rejected => {
            eprintln!(
                "❌ {} new warning(s) were not approved ({})",
                response.unapproved.len(),
                summarize_counts(&response.unapproved)
            );
        }
        CheckOutcome::RejectedUnattended => {
            eprintln!();
            eprint!(
                "{}",
                render_warning_summary(&response.unapproved, std::io::stderr().is_terminal())
            );
            eprintln!(
                "❌ {} new warning(s) need approval ({})",
                response.unapproved.len(),
                summarize_counts(&response.unapproved)
            );
            eprintln!(
                "\n💡 Hint: Run lockgate interactively, or with --yes, to review and approve them."
            );
        }
    }
}

fn validate_project_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(GateError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Directory does not exist".to_string(),
        }
        .into());
    }

    // Security check: Reject symbolic links for project paths
    let metadata = std::fs::symlink_metadata(path).map_err(|e| GateError::InvalidProjectPath {
        path: path.to_path_buf(),
        reason: format!("Failed to read path metadata: {}", e),
    })?;

    if metadata.is_symlink() {
        return Err(GateError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Security: Project path is a symbolic link. For security reasons, symbolic links are not allowed.".to_string(),
        }
        .into());
    }

    if !path.is_dir() {
        return Err(GateError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Not a directory".to_string(),
        }
        .into());
    }

    Ok(())
}
