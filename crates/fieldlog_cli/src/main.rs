//! Command-line entry point for inspecting a fieldlog database.
//!
//! # Responsibility
//! - Print reports from the same store the app writes to.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage:
//! - `fieldlog_cli version`
//! - `fieldlog_cli report [MONTH 1-12] [YEAR]`
//! - `fieldlog_cli annual [YEAR]`
//! - `fieldlog_cli deleted`

use fieldlog_core::db::open_db;
use fieldlog_core::{
    core_version, init_logging, CoreConfig, EnglishCatalog, FieldLog, SqliteBlobStore, SystemClock,
};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    match run(&args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("fieldlog_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<String, String> {
    let command = args.first().map(String::as_str).unwrap_or("version");
    if command == "version" {
        return Ok(format!("fieldlog_core version={}", core_version()));
    }

    let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, &log_dir.to_string_lossy())?;
    }
    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let log = FieldLog::load(
        SqliteBlobStore::new(&conn),
        Arc::new(SystemClock),
        config.session,
    );

    match command {
        "report" => {
            let report = match args.get(1) {
                None => log.current_month_report(&EnglishCatalog),
                Some(raw) => {
                    let month = parse_month(raw)?;
                    let year = args.get(2).map(|raw| parse_year(raw)).transpose()?;
                    log.month_report(month, year, &EnglishCatalog)
                }
            };
            Ok(report.share.message)
        }
        "annual" => {
            let year = args.get(1).map(|raw| parse_year(raw)).transpose()?;
            let annual = log.annual_report(year, &EnglishCatalog);
            let totals = fieldlog_core::format_report_for_sharing(&annual.totals, &EnglishCatalog);
            Ok(format!("{}\n{totals}", annual.title))
        }
        "deleted" => Ok(log
            .contacts()
            .deleted_contacts()
            .iter()
            .map(|contact| format!("{}\t{}", contact.id, contact.name))
            .collect::<Vec<_>>()
            .join("\n")),
        other => Err(format!(
            "unknown command `{other}`; expected version|report|annual|deleted"
        )),
    }
}

/// One-based month on the command line, zero-based internally.
fn parse_month(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(month @ 1..=12) => Ok(month - 1),
        _ => Err(format!("month must be 1-12, got `{raw}`")),
    }
}

fn parse_year(raw: &str) -> Result<i32, String> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| format!("year must be a number, got `{raw}`"))
}
