//! Command-line interface for mfm
//! Converts MFM declaration files into the two-document YAML layout (or any other registered format).
//!
//! Usage:
//!   mfm `<input>`... [-o `<output>`]... [--format `<format>`]   - Convert one or more files
//!   mfm --list-formats                                        - List all available formats
//!
//! Each `-o` names the output of the input closest before it. Inputs without
//! one are written next to themselves with `convert.output_extension`.

use clap::{Arg, ArgAction, ArgMatches, Command};
use mfm_config::{Loader, MfmConfig};
use mfm_parser::mfm::formats::DEFAULT_REGISTRY;
use mfm_parser::Converter;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// One conversion job: an input file and where its output goes
#[derive(Debug, Clone, PartialEq, Eq)]
struct Job {
    input: PathBuf,
    output: Option<PathBuf>,
}

impl Job {
    fn output_path(&self, extension: &str) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension(extension))
    }
}

fn build_cli() -> Command {
    Command::new("mfm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert MFM declaration files to YAML")
        .arg_required_else_help(true)
        .arg(
            Arg::new("input")
                .help("Path to an MFM file (repeatable)")
                .required_unless_present("list-formats")
                .num_args(1..)
                .action(ArgAction::Append)
                .value_parser(clap::value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Output path for the input preceding this flag")
                .action(ArgAction::Append)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format (default: convert.format from configuration)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the built-in defaults")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
}

fn main() {
    let matches = build_cli().get_matches();

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let config = load_config(&matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    init_tracing(matches.get_count("verbose"), &config.logging.level);

    let jobs = collect_jobs(&matches).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(2);
    });

    if !handle_convert_command(&jobs, &config) {
        std::process::exit(1);
    }
}

fn load_config(matches: &ArgMatches) -> Result<MfmConfig, mfm_config::ConfigError> {
    Loader::new()
        .with_user_file(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))
        .with_format(matches.get_one::<String>("format").map(String::as_str))?
        .build()
}

/// `-v` flags win over the configured level
fn init_tracing(verbosity: u8, configured: &str) {
    let filter = match verbosity {
        0 => EnvFilter::try_new(configured).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn collect_jobs(matches: &ArgMatches) -> Result<Vec<Job>, String> {
    let inputs = indexed_values(matches, "input");
    let outputs = indexed_values(matches, "output");
    pair_outputs(inputs, outputs)
}

fn indexed_values(matches: &ArgMatches, id: &str) -> Vec<(usize, PathBuf)> {
    match (matches.indices_of(id), matches.get_many::<PathBuf>(id)) {
        (Some(indices), Some(values)) => indices.zip(values.cloned()).collect(),
        _ => Vec::new(),
    }
}

/// Attach every output to the closest input before it on the command line
fn pair_outputs(
    inputs: Vec<(usize, PathBuf)>,
    outputs: Vec<(usize, PathBuf)>,
) -> Result<Vec<Job>, String> {
    let mut jobs: Vec<(usize, Job)> = inputs
        .into_iter()
        .map(|(index, input)| (index, Job { input, output: None }))
        .collect();

    for (index, output) in outputs {
        let owner = jobs
            .iter_mut()
            .rev()
            .find(|(input_index, _)| *input_index < index)
            .map(|(_, job)| job)
            .ok_or_else(|| format!("--output '{}' is not preceded by an input", output.display()))?;
        if owner.output.is_some() {
            return Err(format!(
                "input '{}' has more than one --output",
                owner.input.display()
            ));
        }
        owner.output = Some(output);
    }

    Ok(jobs.into_iter().map(|(_, job)| job).collect())
}

/// Handle the convert command; returns false if any input failed
fn handle_convert_command(jobs: &[Job], config: &MfmConfig) -> bool {
    let format = config.convert.format.as_str();
    if !DEFAULT_REGISTRY.has(format) {
        eprintln!("Format '{}' not found", format);
        eprintln!("Available formats: {}", DEFAULT_REGISTRY.list_formats().join(", "));
        return false;
    }

    let converter = Converter::new(format);
    debug!(format = converter.format(), inputs = jobs.len(), "starting batch");
    let mut failures = 0;

    for job in jobs {
        let output = job.output_path(&config.convert.output_extension);
        debug!(input = %job.input.display(), output = %output.display(), "converting");

        if let Err(message) = convert_file(&converter, &job.input, &output) {
            error!(input = %job.input.display(), "conversion failed");
            eprintln!("{}: {}", job.input.display(), message);
            failures += 1;
            if !config.convert.continue_on_error {
                break;
            }
        } else {
            info!(output = %output.display(), "wrote");
        }
    }

    failures == 0
}

/// Convert one file, returning a rendered message on failure
fn convert_file(converter: &Converter, input: &Path, output: &Path) -> Result<(), String> {
    let source = fs::read(input).map_err(|e| format!("Error reading file: {}", e))?;
    let bytes = converter
        .convert_to_vec(&source)
        .map_err(|e| e.render(&source))?;
    fs::write(output, bytes).map_err(|e| format!("Error writing '{}': {}", output.display(), e))
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available formats:\n");

    for name in DEFAULT_REGISTRY.list_formats() {
        if let Some(formatter) = DEFAULT_REGISTRY.get(&name) {
            println!("  {}", name);
            println!("    {}", formatter.description());
            println!();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(input: &str, output: Option<&str>) -> Job {
        Job {
            input: PathBuf::from(input),
            output: output.map(PathBuf::from),
        }
    }

    fn parse(args: &[&str]) -> Result<Vec<Job>, String> {
        let matches = build_cli()
            .try_get_matches_from(std::iter::once("mfm").chain(args.iter().copied()))
            .map_err(|e| e.to_string())?;
        collect_jobs(&matches)
    }

    #[test]
    fn test_outputs_follow_their_inputs() {
        let jobs = parse(&["a.mfm", "-o", "a.out", "b.mfm", "c.mfm", "--output", "c.out"]).unwrap();
        assert_eq!(
            jobs,
            vec![
                job("a.mfm", Some("a.out")),
                job("b.mfm", None),
                job("c.mfm", Some("c.out")),
            ]
        );
    }

    #[test]
    fn test_output_before_any_input_is_rejected() {
        let err = parse(&["-o", "x.yaml", "a.mfm"]).unwrap_err();
        assert!(err.contains("not preceded by an input"));
    }

    #[test]
    fn test_two_outputs_for_one_input_are_rejected() {
        let err = parse(&["a.mfm", "-o", "one.yaml", "-o", "two.yaml"]).unwrap_err();
        assert!(err.contains("more than one --output"));
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            job("dir/messages.mfm", None).output_path("yaml"),
            PathBuf::from("dir/messages.yaml")
        );
        assert_eq!(
            job("noext", None).output_path("yml"),
            PathBuf::from("noext.yml")
        );
        assert_eq!(
            job("a.mfm", Some("custom.txt")).output_path("yaml"),
            PathBuf::from("custom.txt")
        );
    }

    #[test]
    fn test_pairing_without_outputs() {
        let jobs = pair_outputs(
            vec![(1, PathBuf::from("a")), (2, PathBuf::from("b"))],
            Vec::new(),
        )
        .unwrap();
        assert_eq!(jobs, vec![job("a", None), job("b", None)]);
    }
}
