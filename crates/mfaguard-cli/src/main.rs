//! CLI entry point for mfaguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, logging setup and
//! exit codes. All business logic lives in the `mfaguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use mfaguard_app::{
    CheckInput, ExplainOutput, parse_report_json, render_annotations, render_console,
    render_markdown, run_check, run_explain, runtime_error_report, serialize_report,
    to_renderable, verdict_exit_code,
};
use mfaguard_settings::Overrides;
use mfaguard_source::{AccountSource, InventoryFile, SyntheticDirectory};
use mfaguard_types::ComplianceReport;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "mfaguard",
    version,
    about = "Identity-account policy compliance checks (mandatory MFA and friends)"
)]
struct Cli {
    /// Path to mfaguard config TOML (missing file means defaults).
    #[arg(long, global = true, default_value = "mfaguard.toml")]
    config: Utf8PathBuf,

    /// Override profile (mfa-only|strict|audit).
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Log filter, e.g. `info` or `mfaguard_app=debug`. Falls back to RUST_LOG, then `warn`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate the policy over an account population and write artifacts.
    Check {
        /// Inventory file (JSON or `.toml`).
        #[arg(long, conflicts_with = "synthetic", required_unless_present = "synthetic")]
        accounts: Option<Utf8PathBuf>,

        /// Generate a synthetic directory of N accounts instead of reading a file.
        #[arg(long, value_name = "N")]
        synthetic: Option<usize>,

        /// Seed for the synthetic directory (random if omitted).
        #[arg(long, requires = "synthetic")]
        seed: Option<u64>,

        /// Override evaluation strategy (solver|direct).
        #[arg(long)]
        strategy: Option<String>,

        /// Override maximum findings to emit.
        #[arg(long)]
        max_listed: Option<u32>,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/mfaguard/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/mfaguard/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        #[arg(long, default_value = "artifacts/mfaguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (stdout if omitted).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        #[arg(long, default_value = "artifacts/mfaguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a check_id or code with remediation guidance.
    Explain {
        /// The check_id (e.g. "identity.mfa_required") or code (e.g. "mfa_disabled").
        identifier: String,
    },

    /// Print the JSON schema of `mfaguard.toml`.
    ConfigSchema,
}

struct CheckArgs {
    accounts: Option<Utf8PathBuf>,
    synthetic: Option<usize>,
    seed: Option<u64>,
    strategy: Option<String>,
    max_listed: Option<u32>,
    report_out: Utf8PathBuf,
    write_markdown: bool,
    markdown_out: Utf8PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match cli.cmd {
        Commands::Check {
            ref accounts,
            synthetic,
            seed,
            ref strategy,
            max_listed,
            ref report_out,
            write_markdown,
            ref markdown_out,
        } => {
            let args = CheckArgs {
                accounts: accounts.clone(),
                synthetic,
                seed,
                strategy: strategy.clone(),
                max_listed,
                report_out: report_out.clone(),
                write_markdown,
                markdown_out: markdown_out.clone(),
            };
            cmd_check(&cli, args)
        }
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Annotations { report, max } => cmd_annotations(report, max),
        Commands::Explain { identifier } => cmd_explain(&identifier),
        Commands::ConfigSchema => {
            let schema = mfaguard_settings::config_schema();
            println!(
                "{}",
                serde_json::to_string_pretty(&schema).context("serialize config schema")?
            );
            Ok(())
        }
    }
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_check(cli: &Cli, args: CheckArgs) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        // Missing config file is allowed (defaults apply).
        let cfg_text = match std::fs::read_to_string(&cli.config) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %cli.config, "no config file; using defaults");
                String::new()
            }
            Err(err) => {
                return Err(anyhow::Error::new(err).context(format!("read config {}", cli.config)));
            }
        };

        let source: Box<dyn AccountSource> = match (&args.accounts, args.synthetic) {
            (Some(path), _) => Box::new(InventoryFile::new(path.clone())),
            (None, Some(size)) => Box::new(SyntheticDirectory::new(size, args.seed)),
            (None, None) => anyhow::bail!("either --accounts or --synthetic is required"),
        };

        let input = CheckInput {
            config_text: &cfg_text,
            overrides: Overrides {
                profile: cli.profile.clone(),
                max_listed: args.max_listed,
                strategy: args.strategy.clone(),
            },
            source: source.as_ref(),
        };

        let output = run_check(input)?;
        let renderable = to_renderable(&output.report);
        print!("{}", render_console(&renderable));

        write_report_file(&args.report_out, &output.report).context("write report json")?;
        tracing::info!(path = %args.report_out, "wrote report");

        if args.write_markdown {
            let md = render_markdown(&renderable);
            write_text_file(&args.markdown_out, &md).context("write markdown")?;
        }

        Ok(verdict_exit_code(output.report.verdict.status))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(&format!("{err:#}"));
            if let Err(write_err) = write_report_file(&args.report_out, &report) {
                tracing::warn!(error = %write_err, "could not write runtime error report");
            }
            eprintln!("mfaguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn write_report_file(path: &Utf8Path, report: &ComplianceReport) -> anyhow::Result<()> {
    let data = serialize_report(report)?;
    write_bytes(path, &data)
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes())
}

fn write_bytes(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, data).with_context(|| format!("write {path}"))
}

fn read_report(path: &Utf8Path) -> anyhow::Result<ComplianceReport> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read report: {path}"))?;
    parse_report_json(&text)
}

fn cmd_md(report_path: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let report = read_report(&report_path)?;
    let md = render_markdown(&to_renderable(&report));

    match output {
        Some(out_path) => write_text_file(&out_path, &md).context("write markdown output")?,
        None => print!("{md}"),
    }
    Ok(())
}

fn cmd_annotations(report_path: Utf8PathBuf, max: usize) -> anyhow::Result<()> {
    let report = read_report(&report_path)?;
    for annotation in render_annotations(&to_renderable(&report), max) {
        println!("{annotation}");
    }
    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", mfaguard_app::format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_check_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                mfaguard_app::format_not_found(&identifier, available_check_ids, available_codes)
            );
            std::process::exit(1);
        }
    }
}
