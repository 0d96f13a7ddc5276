use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use pass_decision::analysis_export::{export_xlsx, render_table, write_json};
use pass_decision::logging::init_logging;
use pass_decision::scenario::{default_dashboard_scenario, parse_scenario_json};
use pass_decision::{AnalyzerConfig, PassAnalyzer, XtGrid};

const DEFAULT_TOP: usize = 3;

#[derive(Debug, Default)]
struct Args {
    scenario: Option<PathBuf>,
    config: Option<PathBuf>,
    grid: Option<PathBuf>,
    xlsx: Option<PathBuf>,
    top: Option<usize>,
    json: bool,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_logging();

    let args = parse_args(std::env::args().skip(1).collect())?;

    let config = match &args.config {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    }
    .with_env_overrides();
    let analyzer = match &args.grid {
        Some(path) => PassAnalyzer::with_grid(config, XtGrid::load(path)?)?,
        None => PassAnalyzer::new(config)?,
    };

    let scenario = match &args.scenario {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("read scenario {}", path.display()))?;
            parse_scenario_json(&raw)
                .with_context(|| format!("load scenario {}", path.display()))?
        }
        None => default_dashboard_scenario()?,
    };

    let result = analyzer.analyze(&scenario);

    if args.json {
        let json = match args.top {
            Some(n) => write_json(&result.with_top_alternatives(n))?,
            None => write_json(&result)?,
        };
        println!("{json}");
    } else {
        let actual = result.actual();
        println!(
            "Pass decision: player {} -> player {} (rank {} of {})",
            scenario.passer_id(),
            actual.receiver_id,
            result.actual_rank(),
            result.len()
        );
        println!();
        print!("{}", render_table(&result));
        println!();
        let top = args.top.unwrap_or(DEFAULT_TOP);
        println!("Feasible alternatives (top {top}):");
        for row in result.top_alternatives(top) {
            println!(
                "  -> player {:<3} completion {:>5.1}%  score {:+.4}",
                row.receiver_id,
                row.completion * 100.0,
                row.score
            );
        }
        let missed = result.missed_alternatives();
        if missed.is_empty() {
            println!("Actual pass was the best available option.");
        } else {
            println!("Missed: {} better option(s) were available.", missed.len());
        }
    }

    if let Some(path) = &args.xlsx {
        let report = export_xlsx(path, &scenario, &result)?;
        eprintln!(
            "[INFO] Wrote {} ({} passes, {} players)",
            path.display(),
            report.passes,
            report.players
        );
    }

    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<Args> {
    let mut out = Args::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((f, v)) if f.starts_with("--") => (f.to_string(), Some(v.to_string())),
            _ => (arg.clone(), None),
        };
        let mut value = |name: &str| -> Result<String> {
            match inline.clone().or_else(|| iter.next()) {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => bail!("{name} needs a value"),
            }
        };
        match flag.as_str() {
            "--json" => out.json = true,
            "--config" => out.config = Some(PathBuf::from(value("--config")?)),
            "--grid" => out.grid = Some(PathBuf::from(value("--grid")?)),
            "--xlsx" => out.xlsx = Some(PathBuf::from(value("--xlsx")?)),
            "--top" => {
                let raw = value("--top")?;
                out.top = Some(raw.parse().with_context(|| format!("bad --top value {raw}"))?);
            }
            other if other.starts_with("--") => bail!("unknown flag {other}"),
            _ => {
                if out.scenario.is_some() {
                    bail!("only one scenario file may be given");
                }
                out.scenario = Some(PathBuf::from(arg));
            }
        }
    }
    Ok(out)
}
