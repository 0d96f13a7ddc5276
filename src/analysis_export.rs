use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::analyzer::{AnalysisResult, COLUMNS, CandidatePass};
use crate::scenario::{Scenario, Team};

pub struct ExportReport {
    pub passes: usize,
    pub players: usize,
    pub missed: usize,
}

/// Fixed-width text table, one line per row, header first.
pub fn render_table(result: &AnalysisResult) -> String {
    let rows: Vec<Vec<String>> = result.rows().iter().map(pass_row).collect();
    let mut widths: Vec<usize> = COLUMNS.iter().map(|c| c.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{cell:>w$}", w = *w))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}

pub fn write_json(result: &AnalysisResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("serialize analysis result")
}

pub fn export_xlsx(path: &Path, scenario: &Scenario, result: &AnalysisResult) -> Result<ExportReport> {
    let mut passes_rows = vec![COLUMNS.iter().map(|c| c.to_string()).collect::<Vec<_>>()];
    passes_rows.extend(result.rows().iter().map(pass_row));

    let mut players_rows = vec![vec![
        "Player ID".to_string(),
        "Team".to_string(),
        "X".to_string(),
        "Y".to_string(),
        "Role".to_string(),
    ]];
    let actual = scenario.actual_pass();
    for p in scenario.players() {
        let role = if p.id == scenario.passer_id() {
            "passer"
        } else if p.id == actual.receiver_id {
            "actual receiver"
        } else {
            ""
        };
        players_rows.push(vec![
            p.id.to_string(),
            match p.team {
                Team::Attacker => "Attacker".to_string(),
                Team::Defender => "Defender".to_string(),
            },
            fmt_num(p.position.x),
            fmt_num(p.position.y),
            role.to_string(),
        ]);
    }

    let missed = result.missed_alternatives();
    let mut summary_rows = vec![
        vec!["Field".to_string(), "Value".to_string()],
        vec!["Generated".to_string(), chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()],
        vec!["Passer".to_string(), scenario.passer_id().to_string()],
        vec!["Actual receiver".to_string(), actual.receiver_id.to_string()],
        vec!["Actual rank".to_string(), format!("{} of {}", result.actual_rank(), result.len())],
        vec!["Missed alternatives".to_string(), missed.len().to_string()],
    ];
    if let Some(best) = missed.first() {
        summary_rows.push(vec![
            "Best missed receiver".to_string(),
            best.receiver_id.to_string(),
        ]);
        summary_rows.push(vec![
            "Score gap".to_string(),
            format!("{:.4}", best.score - result.actual().score),
        ]);
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Passes")?;
        write_rows(sheet, &passes_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Scenario")?;
        write_rows(sheet, &players_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary")?;
        write_rows(sheet, &summary_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        passes: passes_rows.len().saturating_sub(1),
        players: players_rows.len().saturating_sub(1),
        missed: missed.len(),
    })
}

fn pass_row(row: &CandidatePass) -> Vec<String> {
    vec![
        row.receiver_id.to_string(),
        fmt_num(row.start_x),
        fmt_num(row.start_y),
        fmt_num(row.end_x),
        fmt_num(row.end_y),
        row.is_actual.to_string(),
        format!("{:.4}", row.score),
        format!("{:.3}", row.completion),
        row.lane_defenders.to_string(),
        format!("{:.4}", row.xt_start),
        format!("{:.4}", row.xt_end),
        format!("{:.1}", row.length),
        row.rank.to_string(),
    ]
}

fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
