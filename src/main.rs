use clap::Parser;
use env_logger::{Env, Target};
use piece_edit::config::{RcConfig, RcLoader};
use piece_edit::controller::EditorController;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "piece-edit",
    version,
    about = "A small terminal text editor built on a piece table"
)]
struct Args {
    /// Files to open; names that do not exist are created on save
    files: Vec<PathBuf>,

    /// Read settings from this file instead of .pieceeditrc
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Maximum undo snapshots kept per document
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(2..))]
    history_limit: Option<u64>,

    /// Case-insensitive (ASCII) search
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Do not insert closing brackets automatically
    #[arg(long)]
    no_autopairs: bool,

    /// Write log output to this file (filtered by RUST_LOG)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print a sample .pieceeditrc and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    /// Command-line flags take precedence over the rc file.
    fn apply_to(&self, config: &mut RcConfig) {
        if let Some(limit) = self.history_limit {
            // Larger than the address space is as good as unlimited.
            config.history_limit = usize::try_from(limit).unwrap_or(usize::MAX);
        }
        if self.ignore_case {
            config.case_sensitive = false;
        }
        if self.no_autopairs {
            config.auto_pairs = false;
        }
    }
}

// The terminal belongs to the editor, so logs only ever go to a file.
fn init_logging(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", RcLoader::generate_sample_rc());
        return Ok(());
    }

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    // Load RC configuration
    let mut config = RcLoader::load_config(args.config.as_deref());
    args.apply_to(&mut config);
    log::info!("starting with {config:?}");

    let controller = if args.files.is_empty() {
        EditorController::new(&config)
    } else {
        EditorController::new_with_files(args.files, &config)?
    };

    controller.run()
}
