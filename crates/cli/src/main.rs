mod resolve;

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use apidiff_core::{build_artifact_pair, classify_changes, diff_artifacts, Artifact, Report};

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Compare the public API surface of two compiled library versions.
#[derive(Parser)]
#[command(
    name = "apidiff",
    version,
    about = "JVM API compatibility diff tool"
)]
struct Cli {
    /// Old version: a .class file or a directory scanned recursively
    old: PathBuf,

    /// New version: a .class file or a directory scanned recursively
    new: PathBuf,

    /// Output format (text or json)
    #[arg(long, default_value = "text", value_enum)]
    format: OutputFormat,

    /// Exit with status 1 when binary- or source-breaking changes are found
    #[arg(long)]
    fail_on_breaking: bool,

    /// Version label for the old artifact (defaults to the path name)
    #[arg(long)]
    old_label: Option<String>,

    /// Version label for the new artifact (defaults to the path name)
    #[arg(long)]
    new_label: Option<String>,

    /// Suppress non-essential output
    #[arg(long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let old_label = cli
        .old_label
        .clone()
        .unwrap_or_else(|| resolve::default_label(&cli.old));
    let new_label = cli
        .new_label
        .clone()
        .unwrap_or_else(|| resolve::default_label(&cli.new));

    let old_buffers = match resolve::load_class_buffers(&cli.old) {
        Ok(b) => b,
        Err(e) => {
            report_error(&e.to_string(), cli.format, cli.quiet);
            process::exit(2);
        }
    };
    let new_buffers = match resolve::load_class_buffers(&cli.new) {
        Ok(b) => b,
        Err(e) => {
            report_error(&e.to_string(), cli.format, cli.quiet);
            process::exit(2);
        }
    };

    let (old_artifact, new_artifact) = match build_artifact_pair(
        (&old_label, &old_buffers),
        (&new_label, &new_buffers),
    ) {
        (Ok(old), Ok(new)) => (old, new),
        (Err(e), _) | (_, Err(e)) => {
            report_error(&e.to_string(), cli.format, cli.quiet);
            process::exit(2);
        }
    };

    if !cli.quiet {
        warn_skipped(&old_artifact);
        warn_skipped(&new_artifact);
    }

    let classified = classify_changes(
        diff_artifacts(&old_artifact, &new_artifact),
        &old_artifact,
        &new_artifact,
    );
    let report = Report::build(&old_artifact, &new_artifact, classified);

    if !cli.quiet {
        match cli.format {
            OutputFormat::Text => println!("{}", report.to_text()),
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(&report.to_json()).unwrap_or_default()
            ),
        }
    }

    if cli.fail_on_breaking && report.has_breaking() {
        process::exit(1);
    }
}

/// Recoverable parse failures are warnings: the diff still runs on the
/// classes that parsed.
fn warn_skipped(artifact: &Artifact) {
    for diagnostic in &artifact.diagnostics {
        eprintln!(
            "warning: skipped class buffer {} in '{}': {}",
            diagnostic.buffer_index, artifact.label, diagnostic.message
        );
    }
}

fn report_error(msg: &str, format: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Text => eprintln!("error: {}", msg),
        OutputFormat::Json => {
            eprintln!("{{\"error\": \"{}\"}}", msg.replace('"', "\\\""));
        }
    }
}
