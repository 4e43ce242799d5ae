use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use raft_lib::config::BuildRequest;
use raft_lib::orchestrator::CleanScope;

mod cmd;
mod output;

use output::{OutputFormat, print_error};

/// raft - native dependency manager and cmake build orchestrator
#[derive(Parser)]
#[command(name = "raft")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging (RUST_LOG overrides)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Download, build and install dependencies, then build the project
  Build {
    #[command(flatten)]
    target: TargetArgs,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },

  /// Build the project and launch its executable
  Run {
    #[command(flatten)]
    target: TargetArgs,
  },

  /// Remove build and install directories (sources are kept)
  Clean {
    /// Only clean dependency build and install trees, not the project build
    #[arg(short = 'a', long = "dependencies", conflicts_with = "dependency")]
    dependencies: bool,

    /// Only clean the build directories of one dependency
    #[arg(short = 'd', long = "dependency", value_name = "NAME")]
    dependency: Option<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },

  /// List supported platforms and architectures
  Info {
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },
}

#[derive(Args)]
struct TargetArgs {
  /// Platform to build for (case-insensitive)
  #[arg(short, long)]
  platform: Option<String>,

  /// Architecture to build for (case-insensitive)
  #[arg(short, long)]
  architecture: Option<String>,

  /// Build in release mode
  #[arg(short, long)]
  release: bool,

  /// Build a distributable package
  #[arg(short, long)]
  distribute: bool,
}

impl From<TargetArgs> for BuildRequest {
  fn from(args: TargetArgs) -> Self {
    BuildRequest {
      platform: args.platform,
      architecture: args.architecture,
      release: args.release,
      distribute: args.distribute,
    }
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match run(cli.command) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{err:#}"));
      ExitCode::FAILURE
    }
  }
}

fn init_tracing(verbose: bool) {
  let default = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn run(command: Commands) -> Result<()> {
  match command {
    Commands::Build { target, output } => cmd::cmd_build(target.into(), output),
    Commands::Run { target } => cmd::cmd_run(target.into()),
    Commands::Clean {
      dependencies,
      dependency,
      output,
    } => {
      let scope = match (dependencies, dependency) {
        (_, Some(name)) => CleanScope::Dependency(name),
        (true, None) => CleanScope::Dependencies,
        (false, None) => CleanScope::All,
      };
      cmd::cmd_clean(scope, output)
    }
    Commands::Info { output } => cmd::cmd_info(output),
  }
}
