use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use outbreak_repl::{EditMode, EditorConfig, EditorContext};

/// Outbreak - interactive editor for mass-outbreak slots
#[derive(Parser, Debug)]
#[command(name = "outbreak")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Force vi editing mode
    #[arg(long, conflicts_with_all = ["emacs", "edit_mode"])]
    vi: bool,

    /// Force emacs editing mode
    #[arg(long, conflicts_with = "edit_mode")]
    emacs: bool,

    /// Editing mode
    #[arg(long, value_enum, env = "OUTBREAK_EDIT_MODE")]
    edit_mode: Option<EditMode>,

    /// Device to connect to at startup: a bridge URL or `memory`
    #[arg(long, env = "OUTBREAK_DEVICE")]
    device: Option<String>,

    /// Directory of curated species defaults
    #[arg(long, env = "OUTBREAK_DEFAULTS")]
    defaults: Option<PathBuf>,

    /// Cancel a device write that takes longer than this
    #[arg(long)]
    write_timeout_ms: Option<u64>,

    /// Config file (defaults to <config dir>/outbreak/config.json)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn edit_mode(&self) -> Option<EditMode> {
        if self.vi {
            Some(EditMode::Vi)
        } else if self.emacs {
            Some(EditMode::Emacs)
        } else {
            self.edit_mode
        }
    }

    /// Command-line values win over the config file.
    fn apply(&self, config: &mut EditorConfig) {
        if let Some(device) = &self.device {
            config.device = Some(device.clone());
        }
        if let Some(dir) = &self.defaults {
            config.defaults_dir = Some(dir.clone());
        }
        if let Some(ms) = self.write_timeout_ms {
            config.write_timeout_ms = Some(ms);
        }
        if let Some(mode) = self.edit_mode() {
            config.edit_mode = Some(mode);
        }
    }
}

fn init_tracing() {
    // Logs go to stderr so they stay out of the prompt's way.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("OUTBREAK_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing();

    let mut config = match EditorConfig::discover(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    args.apply(&mut config);

    let ctx = match EditorContext::from_config(&config) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = outbreak_repl::run(ctx, config.edit_mode) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
