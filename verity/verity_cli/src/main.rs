use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::json;
use shared_logging::LogLevel;
use verity_assessment::{AppraisalConfig, AppraisalReport, AppraisalRuntime, AppraisalTelemetry};

#[derive(Parser, Debug)]
#[command(name = "verity", version, about = "Heuristic claim and query appraisal")]
struct Cli {
    /// JSON record to appraise.
    #[arg(default_value = "input.json")]
    input: PathBuf,
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON-lines log file; overrides the configured path.
    #[arg(long)]
    log_path: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let telemetry = build_telemetry(&config, cli.log_path)?;
    let runtime = AppraisalRuntime::new(&config, telemetry.clone());

    let (report, loaded) = match runtime.appraise_path(&cli.input) {
        Ok(report) => (report, true),
        Err(err) => (AppraisalReport::unavailable(&err), false),
    };
    match cli.format {
        Format::Text => print!("{report}"),
        Format::Json => println!("{}", report.to_json_pretty()?),
    }

    if let Some(tel) = &telemetry {
        // The exit status reflects the load only.
        let _ = tel.log(
            LogLevel::Info,
            "appraisal.run.finished",
            json!({ "input": cli.input.display().to_string(), "loaded": loaded }),
        );
    }
    Ok(if loaded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn load_config(path: Option<&Path>) -> Result<AppraisalConfig> {
    match path {
        Some(path) => AppraisalConfig::load(path),
        None => Ok(AppraisalConfig::default()),
    }
}

fn build_telemetry(
    config: &AppraisalConfig,
    log_path: Option<PathBuf>,
) -> Result<Option<AppraisalTelemetry>> {
    let path = log_path.or_else(|| config.telemetry.log_path.clone());
    let Some(path) = path else {
        return Ok(None);
    };
    let telemetry = AppraisalTelemetry::builder("verity")
        .settings(&config.telemetry)
        .log_path(&path)
        .build()
        .with_context(|| format!("opening log file {}", path.display()))?;
    Ok(Some(telemetry))
}
