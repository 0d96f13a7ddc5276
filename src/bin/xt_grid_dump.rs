use std::path::PathBuf;

use anyhow::{Context, Result};

use pass_decision::logging::init_logging;
use pass_decision::xt_grid::{DEFAULT_COLS, DEFAULT_ROWS, generate_xt_grid};

fn main() -> Result<()> {
    init_logging();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let cols = parse_usize_arg(&args, "--cols")?.unwrap_or(DEFAULT_COLS);
    let rows = parse_usize_arg(&args, "--rows")?.unwrap_or(DEFAULT_ROWS);
    let grid = generate_xt_grid(cols, rows);

    println!("xT grid {}x{} (top row = y max, goal on the right)", grid.cols, grid.rows);
    for row in (0..grid.rows).rev() {
        let line = (0..grid.cols)
            .map(|col| format!("{:.3}", grid.values[row * grid.cols + col]))
            .collect::<Vec<_>>()
            .join(" ");
        println!("{line}");
    }

    if let Some(path) = parse_path_arg(&args, "--save") {
        grid.save(&path)?;
        println!("Saved: {}", path.display());
    }
    Ok(())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Result<Option<usize>> {
    match parse_value(args, flag) {
        Some(raw) => raw
            .parse::<usize>()
            .map(Some)
            .with_context(|| format!("bad {flag} value {raw}")),
        None => Ok(None),
    }
}

fn parse_path_arg(args: &[String], flag: &str) -> Option<PathBuf> {
    parse_value(args, flag).map(PathBuf::from)
}

fn parse_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.clone());
            }
        }
    }
    None
}
