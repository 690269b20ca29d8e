//! confpath CLI - look up values in JSON, YAML and environment variables
//!
//! Usage:
//!   confpath get config.yaml --field servers --index 0 --field host
//!   confpath get --env APP_ --field database --field url
//!   confpath check config.yaml settings.json
//!
//! Paths are given as ordered `--field` / `--index` flags; their order on
//! the command line is the order of the steps.

use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use colored::Colorize;
use confpath_core::{load, load_file, Container, EnvContainer, Error, Format, Path, PathStep};
use std::path::PathBuf;
use std::process::ExitCode;

/// confpath - Path lookups over JSON, YAML and environment variables
#[derive(Parser)]
#[command(name = "confpath")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get the string value at a path
    Get {
        /// JSON or YAML file to read
        #[arg(required_unless_present = "env", conflicts_with = "env")]
        file: Option<PathBuf>,

        /// Read environment variables starting with PREFIX instead of a file
        #[arg(short, long, value_name = "PREFIX")]
        env: Option<String>,

        /// Input format, detected from the file extension when omitted
        #[arg(long, value_name = "FORMAT", conflicts_with = "env")]
        format: Option<Format>,

        /// Select a mapping key (repeatable)
        #[arg(short = 'k', long = "field", value_name = "NAME", action = ArgAction::Append)]
        fields: Vec<String>,

        /// Select a sequence element (repeatable)
        #[arg(short = 'i', long = "index", value_name = "N", action = ArgAction::Append)]
        indices: Vec<usize>,

        /// Value to print when the path does not exist
        #[arg(short, long)]
        default: Option<String>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Quick syntax check of JSON or YAML files
    Check {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Run the CLI with the process arguments
pub fn run() -> ExitCode {
    let matches = Cli::command().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    init_logging(cli.verbose);

    match cli.command {
        Commands::Get {
            file,
            env,
            format,
            fields,
            indices,
            default,
            output,
        } => {
            let path = match matches.subcommand_matches("get") {
                Some(sub) => ordered_path(sub, fields, indices),
                None => Path::root(),
            };
            cmd_get(file, env, format, &path, default, &output)
        }

        Commands::Check { files } => cmd_check(files),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Rebuild the path from `--field` and `--index` in command-line order
fn ordered_path(matches: &ArgMatches, fields: Vec<String>, indices: Vec<usize>) -> Path {
    let field_positions = matches.indices_of("fields").into_iter().flatten();
    let index_positions = matches.indices_of("indices").into_iter().flatten();

    let mut steps: Vec<(usize, PathStep)> = field_positions
        .zip(fields.into_iter().map(PathStep::Field))
        .chain(index_positions.zip(indices.into_iter().map(PathStep::Index)))
        .collect();

    steps.sort_by_key(|(pos, _)| *pos);
    steps.into_iter().map(|(_, step)| step).collect()
}

fn load_container(
    file: Option<&PathBuf>,
    env: Option<&str>,
    format: Option<Format>,
) -> Result<Box<dyn Container>, Error> {
    match (env, file) {
        (Some(prefix), _) => Ok(Box::new(EnvContainer::from_env(prefix)?)),
        (None, Some(file)) => match format {
            Some(format) => {
                let display = file.display().to_string();
                let bytes =
                    std::fs::read(file).map_err(|e| Error::io(display.clone(), e.to_string()))?;
                load(format, &bytes).map_err(|e| e.in_file(display))
            }
            None => load_file(file),
        },
        (None, None) => Err(Error::io("<none>", "No input specified")
            .with_help("Pass a file or --env PREFIX")),
    }
}

fn cmd_get(
    file: Option<PathBuf>,
    env: Option<String>,
    format: Option<Format>,
    path: &Path,
    default: Option<String>,
    output: &str,
) -> ExitCode {
    let container = match load_container(file.as_ref(), env.as_deref(), format) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            return ExitCode::from(2);
        }
    };

    let result = match container.get_value_at_path(path) {
        Err(e) if e.is_not_found() && default.is_some() => {
            log::debug!("using default for {}: {}", path, e.kind);
            Ok(default.unwrap_or_default())
        }
        other => other,
    };

    match result {
        Ok(value) => {
            if output == "json" {
                let json = serde_json::json!({ "value": value });
                println!("{}", json);
            } else {
                println!("{}", value);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if output == "json" {
                let json = serde_json::json!({
                    "error": e.kind.to_string(),
                    "path": e.path,
                });
                println!("{}", json);
            } else {
                eprintln!("{}: {}", "Error".red(), e);
            }
            ExitCode::from(1)
        }
    }
}

fn cmd_check(files: Vec<PathBuf>) -> ExitCode {
    let mut all_valid = true;

    for file in files {
        match load_file(&file) {
            Ok(container) => {
                println!(
                    "{} {}: valid {}",
                    "✓".green(),
                    file.display(),
                    container.format().to_string().to_uppercase()
                );
            }
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                all_valid = false;
            }
        }
    }

    if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
