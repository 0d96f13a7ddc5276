use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use pass_decision::fake_scenario::random_scenarios;
use pass_decision::logging::init_logging;
use pass_decision::{AnalyzerConfig, PassAnalyzer};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_logging();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let n = arg_value(&args, "--n")
        .map(|raw| raw.parse::<usize>().with_context(|| format!("bad --n value {raw}")))
        .transpose()?
        .unwrap_or(1000)
        .max(1);
    let seed = arg_value(&args, "--seed")
        .map(|raw| raw.parse::<u64>().with_context(|| format!("bad --seed value {raw}")))
        .transpose()?
        .unwrap_or(42);
    let worst_path = arg_value(&args, "--worst").map(PathBuf::from);

    let scenarios = random_scenarios(n, seed)?;
    let analyzer = PassAnalyzer::new(AnalyzerConfig::default().with_env_overrides())?;
    let results = analyzer.analyze_many(&scenarios);

    let mut best_played = 0usize;
    let mut gap_sum = 0.0;
    let mut missed_count = 0usize;
    let mut worst: Option<(usize, f64)> = None;
    for (idx, result) in results.iter().enumerate() {
        let missed = result.missed_alternatives();
        let Some(best) = missed.first() else {
            best_played += 1;
            continue;
        };
        let gap = best.score - result.actual().score;
        gap_sum += gap;
        missed_count += 1;
        if worst.is_none_or(|(_, g)| gap > g) {
            worst = Some((idx, gap));
        }
    }

    println!("Missed-pass backtest");
    println!("Scenarios: {n} (seed {seed})");
    println!(
        "Actual pass was best: {best_played} ({:.1}%)",
        100.0 * best_played as f64 / n as f64
    );
    if missed_count > 0 {
        println!("Mean score gap when missed: {:.4}", gap_sum / missed_count as f64);
    }

    if let (Some(path), Some((idx, gap))) = (worst_path, worst) {
        let json = serde_json::to_string_pretty(&scenarios[idx].to_input())
            .context("serialize worst scenario")?;
        fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
        println!("Worst miss (gap {gap:.4}) saved to {}", path.display());
    }

    Ok(())
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    args.iter().enumerate().find_map(|(idx, arg)| {
        if let Some(v) = arg.strip_prefix(&prefix) {
            return Some(v.trim().to_string());
        }
        if arg == flag {
            return args.get(idx + 1).cloned();
        }
        None
    })
}
