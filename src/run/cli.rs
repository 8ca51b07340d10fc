use anyhow::Result;
use std::path::Path;
use tracing::warn;

use crate::config::Config;
use crate::error::Error;
use crate::forecast::{self, ForecastParams, DEFAULT_FORECAST_MONTHS};
use crate::import::CsvImporter;
use crate::models::Forecast;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn as_cli(args: &[String], config: &Config) -> Result<()> {
    let args: Vec<String> = args
        .iter()
        .filter(|a| a.as_str() != "--verbose" && a.as_str() != "-v")
        .cloned()
        .collect();

    let Some(command) = args.get(1) else {
        print_usage();
        return Ok(());
    };

    match command.as_str() {
        "forecast" | "f" => cli_forecast(&args[2..], config),
        "check" | "c" => cli_check(&args[2..]),
        "view" => cli_view(&args[2..], config),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("spendcast {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

pub(crate) fn print_usage() {
    println!("Spendcast — project monthly savings from spending history");
    println!();
    println!("Usage: spendcast <command> [options]");
    println!();
    println!("Commands:");
    println!("  forecast <file.csv>           Print historical and predicted savings");
    println!("    --income <amount>           Monthly income (default: config `income`)");
    println!("    --months <n>                Months to predict (default: config or 3)");
    println!("    --json                      Emit JSON instead of a table");
    println!("  check <file.csv>              Validate a CSV without forecasting");
    println!("  view <file.csv>               Browse the forecast interactively");
    println!("    --income, --months          As for forecast");
    println!("  --verbose, -v                 Debug logging (RUST_LOG overrides)");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("CSV format: header `month,category,amount`, one row per expense.");
}

fn cli_forecast(args: &[String], config: &Config) -> Result<()> {
    let params = resolve_params(args, config)?;
    let path = input_path(args, "forecast")?;
    let raw = CsvImporter::read(path)?;

    let result = forecast::forecast_csv(&raw, &params).map_err(report)?;

    if args.iter().any(|a| a == "--json") {
        for category in result.shadowed_categories() {
            warn!(
                category,
                "category name clashes with a summary key; its amounts are counted in savings but left out of the JSON months"
            );
        }
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_table(path, &params, &result);
    }
    Ok(())
}

fn cli_check(args: &[String]) -> Result<()> {
    let path = input_path(args, "check")?;
    let raw = CsvImporter::read(path)?;
    let data = CsvImporter::validate(&raw).map_err(|e| report(e.into()))?;

    let first = data.months().first().copied().unwrap_or_default();
    let last = data.last_month().unwrap_or_default();

    println!("{}: OK", path.display());
    println!("  Rows:        {}", data.observations().len());
    println!("  Skipped:     {}", data.skipped());
    println!("  Months:      {} ({first}..{last})", data.months().len());
    println!("  Categories:  {}", data.categories().len());
    for name in data.categories() {
        println!("    {name}");
    }
    Ok(())
}

fn cli_view(args: &[String], config: &Config) -> Result<()> {
    let params = resolve_params(args, config)?;
    let path = input_path(args, "view")?;
    super::as_tui(path.to_path_buf(), params)
}

/// Income and horizon from flags, falling back to the config file.
fn resolve_params(args: &[String], config: &Config) -> Result<ForecastParams> {
    let income = flag_value(args, "--income")
        .map(str::to_string)
        .or_else(|| config.income_arg());
    let months = flag_value(args, "--months");
    let default_months = config.forecast_months.unwrap_or(DEFAULT_FORECAST_MONTHS);

    ForecastParams::parse(income.as_deref(), months, default_months)
        .map_err(|e| report(e.into()))
}

fn input_path<'a>(args: &'a [String], command: &str) -> Result<&'a Path> {
    args.first()
        .filter(|a| !a.starts_with('-'))
        .map(Path::new)
        .ok_or_else(|| anyhow::anyhow!("Usage: spendcast {command} <file.csv> [options]"))
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn report(err: Error) -> anyhow::Error {
    anyhow::anyhow!(err.report())
}

fn print_table(path: &Path, params: &ForecastParams, forecast: &Forecast) {
    println!(
        "Spendcast — {} (income {}, {} months ahead)",
        path.display(),
        format_amount(params.income()),
        params.forecast_months()
    );

    let widths: Vec<usize> = forecast
        .categories
        .iter()
        .map(|c| c.chars().count().clamp(12, 20))
        .collect();
    let rule = 33 + widths.iter().map(|w| w + 1).sum::<usize>();
    println!("{}", "─".repeat(rule));

    let mut header = format!("{:>6}  {:<9} {:>15}", "Month", "Kind", "Savings");
    for (name, &width) in forecast.categories.iter().zip(&widths) {
        header.push_str(&format!(" {:>width$}", truncate(name, width)));
    }
    println!("{header}");

    for month in &forecast.forecast {
        let mut line = format!(
            "{:>6}  {:<9} {:>15}",
            month.month,
            month.kind.as_str(),
            format_amount(month.savings)
        );
        for (name, &width) in forecast.categories.iter().zip(&widths) {
            let cell = month
                .amount(name)
                .map(format_amount)
                .unwrap_or_else(|| "-".into());
            line.push_str(&format!(" {cell:>width$}"));
        }
        println!("{line}");
    }
}
