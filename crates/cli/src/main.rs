use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use gtd_tracker::{
    apply_repaints, BadgeState, BadgeSurface, FsVault, SettingsStore, SyncEngine, VaultWatcher,
    WatchConfig,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "gtd-status")]
#[command(about = "Next-step badges for project files in a markdown vault", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the vault and print each project file with its badge state
    Status(StatusArgs),

    /// Reconcile, then watch the vault and print badge transitions
    Watch(WatchArgs),

    /// Show or edit the tracker settings
    Config(ConfigArgs),
}

#[derive(Args)]
struct StatusArgs {
    /// Vault root directory
    #[arg(long, default_value = ".")]
    vault: PathBuf,

    /// Settings blob (default: <vault>/.gtd-tracker/settings.json)
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Args)]
struct WatchArgs {
    /// Vault root directory
    #[arg(long, default_value = ".")]
    vault: PathBuf,

    /// Settings blob (default: <vault>/.gtd-tracker/settings.json)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Debounce window for filesystem events, in milliseconds
    #[arg(long, default_value_t = 500)]
    debounce_ms: u64,
}

#[derive(Args)]
struct ConfigArgs {
    /// Vault root directory
    #[arg(long, default_value = ".")]
    vault: PathBuf,

    /// Settings blob (default: <vault>/.gtd-tracker/settings.json)
    #[arg(long)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current configuration
    Show,

    /// Update settings; every change persists immediately
    Set(SetArgs),
}

#[derive(Args)]
struct SetArgs {
    /// Folder prefix under which files are tracked, e.g. "Projects/"
    #[arg(long)]
    projects_folder: Option<String>,

    /// Tag marking an open task as having a defined next action
    #[arg(long)]
    next_step_tag: Option<String>,

    /// Tag marking an open task as blocked on an external party
    #[arg(long)]
    waiting_for_tag: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Status(args) => run_status(args),
        Commands::Watch(args) => run_watch(args).await,
        Commands::Config(args) => run_config(args),
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default));
    builder.target(env_logger::Target::Stderr).init();
}

fn settings_path(vault: &Path, explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| vault.join(".gtd-tracker").join("settings.json"))
}

/// Prints badge transitions as the watch loop applies them.
struct TerminalBadges;

impl BadgeSurface for TerminalBadges {
    fn repaint(&mut self, path: &str, state: BadgeState) {
        println!("{state:<16} {path}");
    }

    fn clear(&mut self, path: &str) {
        println!("{:<16} {path}", BadgeState::Clear);
    }
}

fn run_status(args: StatusArgs) -> Result<()> {
    let vault = FsVault::new(&args.vault)
        .with_context(|| format!("failed to open vault at {}", args.vault.display()))?;
    let store = SettingsStore::new(settings_path(&args.vault, args.settings));
    let mut engine = SyncEngine::from_store(store)?;

    let stats = engine
        .reconcile(&vault)
        .context("vault reconciliation failed")?;
    // The table below is this surface's initial paint; the queued repaints
    // would duplicate it.
    let _ = engine.drain_repaints();

    for (path, status) in engine.cache().entries() {
        println!("{:<16} {path}", BadgeState::from_flags(status.flags()));
    }
    log::info!(
        "{} project files tracked ({} rescanned, {} dropped)",
        stats.tracked,
        stats.scanned,
        stats.dropped
    );
    Ok(())
}

async fn run_watch(args: WatchArgs) -> Result<()> {
    let vault = FsVault::new(&args.vault)
        .with_context(|| format!("failed to open vault at {}", args.vault.display()))?;
    let store = SettingsStore::new(settings_path(&args.vault, args.settings));
    let mut engine = SyncEngine::from_store(store)?;

    let mut surface = TerminalBadges;
    // A failed startup pass is logged, not fatal; watching still corrects
    // state as events come in.
    match engine.reconcile(&vault) {
        Ok(stats) => log::info!("{} project files tracked", stats.tracked),
        Err(err) => log::error!("startup reconciliation failed: {err}"),
    }
    apply_repaints(Some(&mut surface), &engine.drain_repaints());

    let config = WatchConfig {
        debounce: Duration::from_millis(args.debounce_ms),
        ..WatchConfig::default()
    };
    let mut watcher = VaultWatcher::start(vault, engine, config)?;
    log::info!("watching {} (ctrl-c to stop)", args.vault.display());
    watcher.run(&mut surface).await?;
    Ok(())
}

fn run_config(args: ConfigArgs) -> Result<()> {
    let store = SettingsStore::new(settings_path(&args.vault, args.settings));
    match args.action {
        ConfigAction::Show => {
            let settings = store.load_or_default();
            println!("projects-folder:  {}", settings.projects_folder_prefix);
            println!("next-step-tag:    {}", settings.next_step_tag);
            println!("waiting-for-tag:  {}", settings.waiting_for_tag);
            println!("cached files:     {}", settings.project_file_cache.len());
        }
        ConfigAction::Set(set) => {
            let mut settings = store.load_or_default();
            if let Some(value) = set.projects_folder {
                settings.projects_folder_prefix = value;
            }
            if let Some(value) = set.next_step_tag {
                settings.next_step_tag = value;
            }
            if let Some(value) = set.waiting_for_tag {
                settings.waiting_for_tag = value;
            }
            settings
                .tag_config()
                .validate()
                .map_err(|err| anyhow::anyhow!(err))?;
            // Keep the fingerprint the cache was built with: the engine
            // notices the mismatch on next load and forces a full rescan.
            store.save(&settings)?;
            println!("saved {}", store.path().display());
        }
    }
    Ok(())
}
