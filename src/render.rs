//! Pure rendering of [`ReportData`]: the blog-post text and the HTML
//! detail tables. Both are deterministic string builders with no locale or
//! clock dependence.

use crate::types::{ContractItem, KindStats, ReportData};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;

static PERIOD_PHRASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+월\s+\d+주차").unwrap());

/// Short period phrase for the title: "2025년 12월 1주차" → "12월 1주차".
/// Falls back to the full period text when the shape is unexpected.
fn period_phrase(period_text: &str) -> &str {
    PERIOD_PHRASE_RE
        .find(period_text)
        .map(|m| m.as_str())
        .unwrap_or(period_text)
}

/// Location phrase: city and region joined, trimmed when either is empty.
fn location_phrase(city: &str, region: &str) -> String {
    format!("{} {}", city, region).trim().to_string()
}

fn push_stat_bullets(text: &mut String, stats: &KindStats) {
    if !stats.jeonse_by_type.is_empty() {
        text.push_str("**전세**\n");
        for stat in &stats.jeonse_by_type {
            let _ = writeln!(
                text,
                "- {}㎡: {}건, 평균 {}억",
                stat.area_type, stat.count, stat.avg_deposit_uk
            );
        }
        text.push('\n');
    }

    if !stats.wolse_by_type.is_empty() {
        text.push_str("**월세**\n");
        for stat in &stats.wolse_by_type {
            let _ = writeln!(
                text,
                "- {}㎡: {}건, 평균 {}억/{}만원",
                stat.area_type,
                stat.count,
                stat.avg_deposit_uk,
                stat.avg_rent_manwon.unwrap_or(0)
            );
        }
        text.push('\n');
    }
}

/// Render the weekly blog post. Sections with no statistics are omitted
/// entirely rather than emitting empty headers.
pub fn render_post(data: &ReportData) -> String {
    let meta = &data.meta;
    let summary = &data.summary;

    let period_display = period_phrase(&meta.period_text);
    let location_display = location_phrase(&meta.city, &meta.region);

    let mut text = String::new();

    let _ = writeln!(
        text,
        "{} {} 아파트 전·월세 실거래 정리\n",
        period_display, location_display
    );

    let _ = writeln!(
        text,
        "국토교통부 실거래가 공개자료를 기준으로 {} {} 아파트 전·월세 거래를 정리했습니다.\n",
        meta.period_text, location_display
    );

    let _ = write!(
        text,
        "총 {}건의 거래가 있었으며, ",
        summary.total_count
    );
    let _ = write!(
        text,
        "신규 계약 {}건(전세 {}건, 월세 {}건), ",
        summary.new_count, summary.new_jeonse_count, summary.new_wolse_count
    );
    let _ = writeln!(
        text,
        "갱신 계약 {}건(전세 {}건, 월세 {}건)입니다.",
        summary.renew_count, summary.renew_jeonse_count, summary.renew_wolse_count
    );
    let _ = writeln!(
        text,
        "전체적으로는 전세 {}건, 월세 {}건입니다.\n",
        summary.jeonse_count, summary.wolse_count
    );

    let new_stats = &data.stats.new;
    if !new_stats.jeonse_by_type.is_empty() || !new_stats.wolse_by_type.is_empty() {
        text.push_str("### 신규 계약 통계\n\n");
        push_stat_bullets(&mut text, new_stats);
    }

    let renew_stats = &data.stats.renew;
    if !renew_stats.jeonse_by_type.is_empty() || !renew_stats.wolse_by_type.is_empty() {
        text.push_str("### 갱신 계약 통계\n\n");
        push_stat_bullets(&mut text, renew_stats);
    }

    text.push_str("상세 거래 내역은 아래 표를 참조하세요.\n\n");

    text
}

fn push_table(html: &mut String, title: &str, items: &[ContractItem]) {
    if items.is_empty() {
        return;
    }

    let _ = writeln!(html, "<h3>{}</h3>", title);
    html.push_str(
        "<table border=\"1\" cellpadding=\"4\" cellspacing=\"0\" style=\"border-collapse: collapse; width: 100%;\">\n",
    );
    html.push_str("  <thead>\n");
    html.push_str("    <tr style=\"background-color: #f0f0f0;\">\n");
    for header in [
        "NO",
        "동",
        "단지명",
        "전월세구분",
        "전용면적",
        "보증금(억)",
        "월세(만원)",
        "층",
        "계약일",
    ] {
        let _ = writeln!(html, "      <th>{}</th>", header);
    }
    html.push_str("    </tr>\n");
    html.push_str("  </thead>\n");
    html.push_str("  <tbody>\n");

    for item in items {
        let rent = match item.rent_manwon {
            Some(r) if r != 0.0 => r.to_string(),
            _ => "-".to_string(),
        };
        html.push_str("    <tr>\n");
        let _ = writeln!(html, "      <td style=\"text-align: center;\">{}</td>", item.no);
        let _ = writeln!(html, "      <td>{}</td>", item.dong);
        let _ = writeln!(html, "      <td>{}</td>", item.complex);
        let _ = writeln!(
            html,
            "      <td style=\"text-align: center;\">{}</td>",
            item.lease_kind
        );
        let _ = writeln!(
            html,
            "      <td style=\"text-align: center;\">{}㎡</td>",
            item.area_m2.floor() as i64
        );
        let _ = writeln!(
            html,
            "      <td style=\"text-align: right;\">{}</td>",
            item.deposit_uk
        );
        let _ = writeln!(html, "      <td style=\"text-align: right;\">{}</td>", rent);
        let _ = writeln!(
            html,
            "      <td style=\"text-align: center;\">{}</td>",
            item.floor
        );
        let _ = writeln!(
            html,
            "      <td style=\"text-align: center;\">{}</td>",
            item.contract_date
        );
        html.push_str("    </tr>\n");
    }

    html.push_str("  </tbody>\n");
    html.push_str("</table>\n\n");
}

/// Render the detail tables: new contracts first, then renewals. Empty
/// lists produce no table at all.
pub fn render_tables(data: &ReportData) -> String {
    let mut html = String::new();
    push_table(&mut html, "신규 계약", &data.contracts.new);
    push_table(&mut html, "갱신 계약", &data.contracts.renew);
    html
}
