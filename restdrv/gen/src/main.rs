//! restdrv Code Generator
//!
//! Generates a C++ REST driver header from a `.rest` schema file.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use restdrv_define::Schema;
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;

use restdrv_gen::config::{DEFAULT_RUNTIME_INCLUDE_DIR, DEFAULT_RUNTIME_NAMESPACE, GeneratorConfig};
use restdrv_gen::errors::GeneratorError;
use restdrv_gen::output::{generate_and_write, output_path};
use restdrv_gen::walker::resolve;

/// restdrv code generator - transforms REST schemas into C++ driver headers
#[derive(Parser, Debug)]
#[command(name = "restdrv-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate `<output_dir>/<schema>.hh` from a schema file
    Generate {
        /// Schema file to read (e.g. `virtual_network.rest`)
        schema: PathBuf,

        /// Directory to write the header into
        #[arg(default_value = ".")]
        output_dir: PathBuf,

        /// Print the header without writing it
        #[arg(long)]
        dry_run: bool,

        /// Namespace of the runtime library in generated code
        #[arg(long, default_value = DEFAULT_RUNTIME_NAMESPACE)]
        runtime_namespace: String,

        /// Include directory of the runtime library headers
        #[arg(long, default_value = DEFAULT_RUNTIME_INCLUDE_DIR)]
        runtime_include_dir: String,
    },

    /// Print the resolved field tree of a schema as JSON
    Inspect {
        /// Schema file to read
        schema: PathBuf,

        /// Resolve this node instead of every `ROOT.data` entry
        #[arg(long)]
        node: Option<String>,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), GeneratorError> {
    match cli.command {
        Command::Generate {
            schema,
            output_dir,
            dry_run,
            runtime_namespace,
            runtime_include_dir,
        } => {
            let config = GeneratorConfig {
                runtime_namespace,
                runtime_include_dir,
                ..GeneratorConfig::default()
            };
            debug!(?config, dry_run, "generating");
            generate_and_write(&schema, &output_dir, &config, dry_run)?;

            if !dry_run {
                let source = restdrv_define::schema::source_name_for(&schema);
                eprintln!(
                    "{} {}",
                    "Generated".green().bold(),
                    output_path(&output_dir, &source).display()
                );
            }
            Ok(())
        }
        Command::Inspect { schema, node } => {
            let schema = Schema::load(&schema)?;
            let names = match &node {
                Some(name) => vec![name.as_str()],
                None => schema.data(),
            };
            let fields = names
                .into_iter()
                .map(|name| resolve(&schema, name))
                .collect::<Result<Vec<_>, _>>()?;

            let json = serde_json::to_string_pretty(&fields)?;
            println!("{}", json);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  {} {}", "caused by:".yellow(), cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
