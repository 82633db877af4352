//! File writers and console previews for generated reports.

use crate::error::Result;
use crate::types::{KindStats, ReportData, StatPreviewRow};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

pub fn write_text(path: &str, text: &str) -> Result<()> {
    std::fs::write(path, text)?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

fn stat_rows(kind: &str, stats: &KindStats, out: &mut Vec<StatPreviewRow>) {
    for stat in &stats.jeonse_by_type {
        out.push(StatPreviewRow {
            kind: format!("{} 전세", kind),
            area_type: stat.area_type,
            count: stat.count,
            avg_deposit_uk: stat.avg_deposit_uk.to_string(),
            avg_rent_manwon: "-".to_string(),
        });
    }
    for stat in &stats.wolse_by_type {
        out.push(StatPreviewRow {
            kind: format!("{} 월세", kind),
            area_type: stat.area_type,
            count: stat.count,
            avg_deposit_uk: stat.avg_deposit_uk.to_string(),
            avg_rent_manwon: stat
                .avg_rent_manwon
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".to_string()),
        });
    }
}

/// Print the per-type statistics of a report as one markdown table.
pub fn preview_stats(data: &ReportData) {
    let mut rows = Vec::new();
    stat_rows("신규", &data.stats.new, &mut rows);
    stat_rows("갱신", &data.stats.renew, &mut rows);
    preview_table_rows(&rows, rows.len());
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}
