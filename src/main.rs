use clap::{Parser, Subcommand};
use env_logger::Env;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use upload_blurhash::algorithms::{PlaceholderError, RawOptions, Registry, dispatch};
use upload_blurhash::config::{self, CONFIG_FILE_NAME};
use upload_blurhash::imaging::BackendError;
use upload_blurhash::output::{self, EncodeOutcome};

#[derive(Parser)]
#[command(name = "upload-blurhash")]
#[command(about = "Compute image placeholders the way the upload hook does")]
#[command(long_about = "\
Compute image placeholders the way the upload hook does

The hook stores a compact placeholder (BlurHash or ThumbHash) on every
uploaded image. This tool runs the same algorithms on local files so you can
preview placeholders and validate a blurhash.toml before deploying it.

Config (blurhash.toml, all keys optional):

  collections = [\"media\"]        # Omit to target every upload collection
  mimeTypePattern = \"image/*\"    # Glob: *, ?, [...], {a,b}
  algorithm = \"blurhash\"         # or \"thumbhash\"
  componentX = 4                 # Any other key is an algorithm option

Run 'upload-blurhash gen-config' to generate a documented blurhash.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing blurhash.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Log each step (repeat for more detail); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the placeholder for each image file
    Encode {
        /// Image files to encode
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Algorithm to use instead of the configured one
        #[arg(long)]
        algorithm: Option<String>,
    },
    /// List registered algorithms and their options
    Algorithms,
    /// Validate blurhash.toml without encoding anything
    Check,
    /// Print a stock blurhash.toml with all options documented
    GenConfig,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let registry = Registry::builtin();

    match cli.command {
        Command::Encode { files, algorithm } => {
            let mut plugin_config = config::load_config(&cli.config)?;
            if algorithm.is_some() {
                plugin_config.algorithm = algorithm;
                // Options belong to the configured algorithm, not the override.
                plugin_config.options.clear();
            }
            let validated = plugin_config.validate(&registry)?;
            let algorithm = validated.algorithm;

            let outcomes: Vec<EncodeOutcome> = files
                .par_iter()
                .map(|path| EncodeOutcome {
                    path: path.clone(),
                    result: encode_file(path, algorithm.as_str(), &validated.options),
                })
                .collect();

            output::print_encode_results(algorithm, &outcomes);
            if outcomes.iter().any(|o| o.result.is_err()) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Algorithms => {
            output::print_algorithms(registry.entries());
        }
        Command::Check => {
            let path = cli.config.join(CONFIG_FILE_NAME);
            let source = path.exists().then_some(path.as_path());
            let validated = config::load_config(&cli.config)?.validate(&registry)?;
            output::print_check(source, &validated);
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn encode_file(path: &Path, algorithm: &str, options: &RawOptions) -> Result<String, PlaceholderError> {
    let data = std::fs::read(path).map_err(BackendError::from)?;
    log::info!("{}: {} bytes", path.display(), data.len());
    dispatch(Some(algorithm), &data, options)
}
