use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use brew_release_notes::config::{self, AppConfig};
use brew_release_notes::console::Reporter;
use brew_release_notes::ignore::IgnoreList;
use brew_release_notes::logging;
use brew_release_notes::orchestrator::{Orchestrator, RunSettings};
use brew_release_notes::package::Homebrew;
use brew_release_notes::release::host::ReleaseHosts;
use brew_release_notes::release::hosts::{GitHubHost, GitLabHost};
use brew_release_notes::repository::{HostPatterns, RepositoryResolver};
use brew_release_notes::select::{NoSelection, PackageSelector, TerminalSelector};

#[derive(Parser)]
#[command(name = "brew-release-notes")]
#[command(
    version,
    about = "Collect upstream release notes for outdated Homebrew packages"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Config file (default: $XDG_CONFIG_HOME/brew-release-notes/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory under which the timestamped report directory is created
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Ignore list file (default: $XDG_DATA_HOME/brew-release-notes/ignore.txt)
    #[arg(long, global = true)]
    ignore_file: Option<PathBuf>,

    /// Keep tags marked as prereleases
    #[arg(long)]
    include_prereleases: bool,

    /// Skip the interactive ignore selection
    #[arg(long)]
    no_select: bool,

    /// Only process these packages
    #[arg(long, value_name = "NAME", num_args = 1..)]
    only: Vec<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the ignored packages
    Ignored,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let reporter = Reporter::stdout();
    let config_path = cli.config.clone().unwrap_or_else(config::config_path);
    let config = AppConfig::load_or_default(&config_path, &reporter);
    let ignore_path = cli.ignore_file.clone().unwrap_or_else(config::ignore_path);

    match cli.command {
        Some(Command::Ignored) => {
            let ignore_list = IgnoreList::load(&ignore_path)?;
            for name in ignore_list.names() {
                println!("{}", name);
            }
            Ok(())
        }
        None => {
            let log_path = config::log_path();
            let _guard = match logging::init(&log_path) {
                Ok(guard) => Some(guard),
                Err(e) => {
                    reporter.warn(&format!("{:#}; continuing without a log file", e));
                    None
                }
            };

            let settings = RunSettings {
                output_root: cli
                    .output_dir
                    .or_else(|| config.output_dir.clone())
                    .unwrap_or_else(config::default_output_root),
                ignore_path,
                include_prereleases: cli.include_prereleases || config.include_prereleases,
                interactive: !cli.no_select,
                only: cli.only,
            };

            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?
                .block_on(run(config, settings, reporter))
        }
    }
}

async fn run(config: AppConfig, settings: RunSettings, reporter: Reporter) -> anyhow::Result<()> {
    let hosts = ReleaseHosts::new()
        .with(Arc::new(
            GitHubHost::new(&config.github.api_url).with_token(config::github_token()),
        ))
        .with(Arc::new(GitLabHost::new().with_token(config::gitlab_token())));
    let selector: Box<dyn PackageSelector> = if settings.interactive {
        Box::new(TerminalSelector)
    } else {
        Box::new(NoSelection)
    };

    let orchestrator = Orchestrator::new(
        Arc::new(Homebrew::default()),
        hosts,
        selector,
        reporter,
        settings,
    )
    .with_resolver(RepositoryResolver::new(HostPatterns::new(
        config.gitlab_hosts.clone(),
    )));

    orchestrator.run().await?;
    Ok(())
}
