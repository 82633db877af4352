//! Conversion of raw source rows into canonical [`Deal`] records.
//!
//! Two entry points, one per source format: items from the 국토교통부
//! transaction API and rows from the ministry spreadsheet export. Both are
//! per-record tolerant: a bad row yields `None` and the batch continues.
//! The batch wrappers collect context for every dropped row so the caller
//! can log it; this module itself performs no I/O.

use crate::period::derive_period;
use crate::region::RegionTable;
use crate::types::{ContractKind, Deal, LeaseKind};
use crate::util::{parse_date_safe, parse_f64_or_zero, parse_f64_safe, parse_i32_safe};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One `<item>` of the API payload. Every field is optional; accessors
/// below substitute documented defaults instead of failing on absence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiItem {
    #[serde(rename = "aptNm")]
    pub apt_nm: Option<String>,
    #[serde(rename = "contractType")]
    pub contract_type: Option<String>,
    #[serde(rename = "dealDay")]
    pub deal_day: Option<String>,
    #[serde(rename = "dealMonth")]
    pub deal_month: Option<String>,
    #[serde(rename = "dealYear")]
    pub deal_year: Option<String>,
    #[serde(rename = "deposit")]
    pub deposit: Option<String>,
    #[serde(rename = "excluUseAr")]
    pub exclu_use_ar: Option<String>,
    #[serde(rename = "floor")]
    pub floor: Option<String>,
    #[serde(rename = "jibun")]
    pub jibun: Option<String>,
    #[serde(rename = "monthlyRent")]
    pub monthly_rent: Option<String>,
    #[serde(rename = "preDeposit")]
    pub pre_deposit: Option<String>,
    #[serde(rename = "umdNm")]
    pub umd_nm: Option<String>,
    #[serde(rename = "useRRRight")]
    pub use_rr_right: Option<String>,
}

/// One data row of the spreadsheet export, keyed by its Korean headers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetRow {
    #[serde(rename = "시군구")]
    pub sigungu: Option<String>,
    #[serde(rename = "단지명")]
    pub complex: Option<String>,
    #[serde(rename = "전월세구분")]
    pub lease_kind: Option<String>,
    #[serde(rename = "계약구분")]
    pub contract_kind: Option<String>,
    #[serde(rename = "전용면적(㎡)")]
    pub area_m2: Option<String>,
    #[serde(rename = "보증금(만원)")]
    pub deposit: Option<String>,
    #[serde(rename = "월세금(만원)")]
    pub rent: Option<String>,
    #[serde(rename = "계약년월")]
    pub year_month: Option<String>,
    #[serde(rename = "계약일")]
    pub day: Option<String>,
    #[serde(rename = "층")]
    pub floor: Option<String>,
    #[serde(rename = "갱신요구권 사용")]
    pub renew_right_used: Option<String>,
    #[serde(rename = "종전계약 보증금(만원)")]
    pub prev_deposit: Option<String>,
}

/// Outcome of normalizing one batch: the converted deals plus context for
/// each dropped row, for operator-visible logging by the caller.
#[derive(Debug, Default)]
pub struct DropReport {
    pub total: usize,
    pub converted: usize,
    pub dropped: Vec<String>,
}

impl DropReport {
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }
}

fn text(s: &Option<String>) -> &str {
    s.as_deref().unwrap_or("").trim()
}

/// Convert one API item. `lawd_cd` is the 5-digit region code the payload
/// was requested for. Returns `None` when the contract date is invalid.
pub fn from_api_item(item: &ApiItem, lawd_cd: &str, regions: &RegionTable) -> Option<Deal> {
    let names = regions.resolve(lawd_cd);

    // 법정동명, falling back to the lot number.
    let dong = match text(&item.umd_nm) {
        "" => text(&item.jibun),
        d => d,
    }
    .to_string();

    // 월세 0 means a pure-deposit lease.
    let monthly_rent = parse_f64_or_zero(item.monthly_rent.as_deref());
    let lease_kind = if monthly_rent == 0.0 {
        LeaseKind::Jeonse
    } else {
        LeaseKind::Wolse
    };

    let contract_kind = if text(&item.contract_type).contains("갱신") {
        ContractKind::Renew
    } else {
        ContractKind::New
    };

    let area_m2 = parse_f64_or_zero(item.exclu_use_ar.as_deref());
    let deposit_manwon = parse_f64_or_zero(item.deposit.as_deref());

    let iso = format!(
        "{}-{:0>2}-{:0>2}",
        text(&item.deal_year),
        text(&item.deal_month),
        text(&item.deal_day)
    );
    let contract_date = parse_date_safe(&iso)?;
    let (period_key, period_text) = derive_period(contract_date);

    let rent_manwon = match lease_kind {
        LeaseKind::Wolse => Some(monthly_rent),
        LeaseKind::Jeonse => None,
    };

    let prev_deposit_manwon = match text(&item.pre_deposit) {
        "" => None,
        s => parse_f64_safe(Some(s)),
    };

    let renew_right_used = match text(&item.use_rr_right) {
        "" => None,
        s => Some(s.to_string()),
    };

    Some(Deal {
        city: names.city,
        region: names.region,
        dong,
        complex: text(&item.apt_nm).to_string(),
        lease_kind,
        contract_kind,
        area_m2,
        area_type: crate::util::area_type_of(area_m2),
        contract_date,
        period_key,
        period_text,
        deposit_manwon,
        deposit_uk: crate::util::deposit_uk_of(deposit_manwon),
        rent_manwon,
        floor: parse_i32_safe(item.floor.as_deref()).unwrap_or(0),
        contract_type_label: contract_kind.label().to_string(),
        renew_right_used,
        prev_deposit_manwon,
        raw_row: None,
    })
}

/// Split a 시군구 field like `"서울특별시 강동구 고덕동"` into
/// `(city, region, dong)`. Two tokens leave the dong empty, one token
/// leaves both region and dong empty.
fn split_sigungu(full: &str) -> (String, String, String) {
    let parts: Vec<&str> = full.split_whitespace().collect();
    match parts.len() {
        0 => (String::new(), String::new(), String::new()),
        1 => (parts[0].to_string(), String::new(), String::new()),
        2 => (parts[0].to_string(), parts[1].to_string(), String::new()),
        _ => (
            parts[0].to_string(),
            parts[1].to_string(),
            parts[2..].join(" "),
        ),
    }
}

/// Contract-date strategies for the spreadsheet path, tried in order:
/// 계약년월 `"YYYYMM"` combined with the 계약일 day field, then a
/// `"YY.MM.DD"` shape in the day field alone, then a full `"YYYY-MM-DD"`
/// already present in the day field.
fn parse_sheet_date(year_month: &str, day: &str) -> Option<NaiveDate> {
    let strategies: [fn(&str, &str) -> Option<NaiveDate>; 3] =
        [date_from_year_month_day, date_from_dotted_day, date_from_iso_day];
    strategies.iter().find_map(|s| s(year_month, day))
}

fn date_from_year_month_day(year_month: &str, day: &str) -> Option<NaiveDate> {
    if year_month.len() != 6 || day.is_empty() {
        return None;
    }
    let year = year_month.get(0..4)?;
    let month = year_month.get(4..6)?;
    let iso = format!("{}-{}-{:0>2}", year, month, day);
    parse_date_safe(&iso)
}

fn date_from_dotted_day(_year_month: &str, day: &str) -> Option<NaiveDate> {
    // "25.11.01" → 2025-11-01.
    let parts: Vec<&str> = day.split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    let year: i32 = parts[0].trim().parse().ok()?;
    let iso = format!("{}-{:0>2}-{:0>2}", year + 2000, parts[1].trim(), parts[2].trim());
    parse_date_safe(&iso)
}

fn date_from_iso_day(_year_month: &str, day: &str) -> Option<NaiveDate> {
    parse_date_safe(day)
}

/// Convert one spreadsheet row. Returns `None` when no date strategy
/// yields a valid contract date.
pub fn from_sheet_row(row: &SheetRow) -> Option<Deal> {
    let (city, region, dong) = split_sigungu(text(&row.sigungu));

    let lease_kind = if text(&row.lease_kind).contains("전세") {
        LeaseKind::Jeonse
    } else {
        LeaseKind::Wolse
    };

    let contract_kind = if text(&row.contract_kind).contains("갱신") {
        ContractKind::Renew
    } else {
        ContractKind::New
    };

    let area_m2 = parse_f64_or_zero(row.area_m2.as_deref());
    let deposit_manwon = parse_f64_or_zero(row.deposit.as_deref());

    let rent_manwon = match lease_kind {
        LeaseKind::Wolse => Some(parse_f64_or_zero(row.rent.as_deref())),
        LeaseKind::Jeonse => None,
    };

    let contract_date = parse_sheet_date(text(&row.year_month), text(&row.day))?;
    let (period_key, period_text) = derive_period(contract_date);

    // A zero previous deposit is treated as absent, matching the source
    // data where the column is blank or zero for non-renewals.
    let prev_deposit_manwon =
        parse_f64_safe(row.prev_deposit.as_deref()).filter(|v| *v != 0.0);

    let renew_right_used = match text(&row.renew_right_used) {
        "" => None,
        s => Some(s.to_string()),
    };

    Some(Deal {
        city,
        region,
        dong,
        complex: text(&row.complex).to_string(),
        lease_kind,
        contract_kind,
        area_m2,
        area_type: crate::util::area_type_of(area_m2),
        contract_date,
        period_key,
        period_text,
        deposit_manwon,
        deposit_uk: crate::util::deposit_uk_of(deposit_manwon),
        rent_manwon,
        floor: parse_i32_safe(row.floor.as_deref()).unwrap_or(0),
        contract_type_label: contract_kind.label().to_string(),
        renew_right_used,
        prev_deposit_manwon,
        raw_row: serde_json::to_value(row).ok(),
    })
}

pub fn normalize_api_items(
    items: &[ApiItem],
    lawd_cd: &str,
    regions: &RegionTable,
) -> (Vec<Deal>, DropReport) {
    let mut deals = Vec::with_capacity(items.len());
    let mut report = DropReport {
        total: items.len(),
        ..DropReport::default()
    };
    for item in items {
        match from_api_item(item, lawd_cd, regions) {
            Some(deal) => deals.push(deal),
            None => report.dropped.push(format!(
                "유효하지 않은 날짜: {}-{}-{} ({})",
                text(&item.deal_year),
                text(&item.deal_month),
                text(&item.deal_day),
                text(&item.apt_nm)
            )),
        }
    }
    report.converted = deals.len();
    (deals, report)
}

pub fn normalize_sheet_rows(rows: &[SheetRow]) -> (Vec<Deal>, DropReport) {
    let mut deals = Vec::with_capacity(rows.len());
    let mut report = DropReport {
        total: rows.len(),
        ..DropReport::default()
    };
    for row in rows {
        match from_sheet_row(row) {
            Some(deal) => deals.push(deal),
            None => report.dropped.push(format!(
                "날짜 파싱 실패: 계약년월={} 계약일={} ({})",
                text(&row.year_month),
                text(&row.day),
                text(&row.complex)
            )),
        }
    }
    report.converted = deals.len();
    (deals, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn api_item() -> ApiItem {
        ApiItem {
            apt_nm: Some("은마".to_string()),
            deal_year: Some("2025".to_string()),
            deal_month: Some("12".to_string()),
            deal_day: Some("3".to_string()),
            deposit: Some("65,000".to_string()),
            monthly_rent: Some("0".to_string()),
            exclu_use_ar: Some("84.97".to_string()),
            floor: Some("11".to_string()),
            umd_nm: Some("대치동".to_string()),
            ..ApiItem::default()
        }
    }

    #[test]
    fn api_item_jeonse() {
        let table = RegionTable::builtin();
        let deal = from_api_item(&api_item(), "11680", &table).unwrap();
        assert_eq!(deal.lease_kind, LeaseKind::Jeonse);
        assert_eq!(deal.contract_kind, ContractKind::New);
        assert_eq!(deal.city, "서울특별시");
        assert_eq!(deal.region, "강남구");
        assert_eq!(deal.dong, "대치동");
        assert_eq!(deal.contract_date.to_string(), "2025-12-03");
        assert_eq!(deal.period_key, "2025-12-W1");
        assert_eq!(deal.area_type, 26);
        assert_eq!(deal.deposit_uk, 6.5);
        assert_eq!(deal.rent_manwon, None);
        assert_eq!(deal.floor, 11);
    }

    #[test]
    fn api_item_wolse_and_renewal() {
        let table = RegionTable::builtin();
        let item = ApiItem {
            monthly_rent: Some("120".to_string()),
            contract_type: Some("갱신".to_string()),
            pre_deposit: Some("55,000".to_string()),
            use_rr_right: Some("사용".to_string()),
            ..api_item()
        };
        let deal = from_api_item(&item, "11680", &table).unwrap();
        assert_eq!(deal.lease_kind, LeaseKind::Wolse);
        assert_eq!(deal.contract_kind, ContractKind::Renew);
        assert_eq!(deal.contract_type_label, "갱신");
        assert_eq!(deal.rent_manwon, Some(120.0));
        assert_eq!(deal.prev_deposit_manwon, Some(55000.0));
        assert_eq!(deal.renew_right_used.as_deref(), Some("사용"));
    }

    #[test]
    fn api_item_invalid_date_is_dropped() {
        let table = RegionTable::builtin();
        let item = ApiItem {
            deal_month: Some("02".to_string()),
            deal_day: Some("30".to_string()),
            ..api_item()
        };
        assert!(from_api_item(&item, "11680", &table).is_none());
    }

    #[test]
    fn api_item_dong_falls_back_to_jibun() {
        let table = RegionTable::builtin();
        let item = ApiItem {
            umd_nm: None,
            jibun: Some("316".to_string()),
            ..api_item()
        };
        let deal = from_api_item(&item, "11680", &table).unwrap();
        assert_eq!(deal.dong, "316");
    }

    #[test]
    fn api_item_unknown_region_still_produced() {
        let table = RegionTable::builtin();
        let deal = from_api_item(&api_item(), "99999", &table).unwrap();
        assert_eq!(deal.city, "알 수 없음");
        assert_eq!(deal.region, "알 수 없음");
    }

    #[test]
    fn normalization_is_idempotent() {
        let table = RegionTable::builtin();
        let a = from_api_item(&api_item(), "11680", &table).unwrap();
        let b = from_api_item(&api_item(), "11680", &table).unwrap();
        assert_eq!(serde_json::to_value(&a).unwrap(), serde_json::to_value(&b).unwrap());
    }

    fn sheet_row() -> SheetRow {
        SheetRow {
            sigungu: Some("서울특별시 강동구 고덕동".to_string()),
            complex: Some("고덕그라시움".to_string()),
            lease_kind: Some("전세".to_string()),
            contract_kind: Some("신규".to_string()),
            area_m2: Some("59.8".to_string()),
            deposit: Some("42,000".to_string()),
            rent: Some("0".to_string()),
            year_month: Some("202512".to_string()),
            day: Some("3".to_string()),
            floor: Some("7".to_string()),
            ..SheetRow::default()
        }
    }

    #[test]
    fn sheet_row_basic() {
        let deal = from_sheet_row(&sheet_row()).unwrap();
        assert_eq!(deal.city, "서울특별시");
        assert_eq!(deal.region, "강동구");
        assert_eq!(deal.dong, "고덕동");
        assert_eq!(deal.lease_kind, LeaseKind::Jeonse);
        assert_eq!(deal.contract_kind, ContractKind::New);
        assert_eq!(deal.contract_date.to_string(), "2025-12-03");
        assert_eq!(deal.period_key, "2025-12-W1");
        assert_eq!(deal.deposit_uk, 4.2);
        assert!(deal.raw_row.is_some());
    }

    #[test]
    fn sigungu_token_counts() {
        assert_eq!(
            split_sigungu("경기도 하남시"),
            ("경기도".to_string(), "하남시".to_string(), String::new())
        );
        assert_eq!(
            split_sigungu("세종특별자치시"),
            ("세종특별자치시".to_string(), String::new(), String::new())
        );
        assert_eq!(
            split_sigungu("서울특별시 송파구 신천동 일부"),
            (
                "서울특별시".to_string(),
                "송파구".to_string(),
                "신천동 일부".to_string()
            )
        );
    }

    #[test]
    fn sheet_date_fallback_strategy() {
        let row = SheetRow {
            year_month: None,
            day: Some("25.11.01".to_string()),
            ..sheet_row()
        };
        let deal = from_sheet_row(&row).unwrap();
        assert_eq!(deal.contract_date.to_string(), "2025-11-01");

        let row = SheetRow {
            year_month: None,
            day: Some("invalid".to_string()),
            ..sheet_row()
        };
        assert!(from_sheet_row(&row).is_none());
    }

    #[test]
    fn sheet_date_accepts_full_iso_day() {
        // A 계약일 that already carries a complete date passes through.
        let row = SheetRow {
            year_month: None,
            day: Some("2025-11-01".to_string()),
            ..sheet_row()
        };
        let deal = from_sheet_row(&row).unwrap();
        assert_eq!(deal.contract_date.to_string(), "2025-11-01");
        assert_eq!(deal.period_key, "2025-11-W1");

        let row = SheetRow {
            year_month: None,
            day: Some("2025-02-30".to_string()),
            ..sheet_row()
        };
        assert!(from_sheet_row(&row).is_none());
    }

    #[test]
    fn sheet_zero_prev_deposit_is_absent() {
        let row = SheetRow {
            prev_deposit: Some("0".to_string()),
            ..sheet_row()
        };
        assert_eq!(from_sheet_row(&row).unwrap().prev_deposit_manwon, None);

        let row = SheetRow {
            prev_deposit: Some("38,000".to_string()),
            ..sheet_row()
        };
        assert_eq!(
            from_sheet_row(&row).unwrap().prev_deposit_manwon,
            Some(38000.0)
        );
    }

    #[test]
    fn sheet_wolse_keeps_rent() {
        let row = SheetRow {
            lease_kind: Some("월세".to_string()),
            rent: Some("1,200".to_string()),
            ..sheet_row()
        };
        let deal = from_sheet_row(&row).unwrap();
        assert_eq!(deal.lease_kind, LeaseKind::Wolse);
        assert_eq!(deal.rent_manwon, Some(1200.0));
    }

    #[test]
    fn batch_drops_are_counted() {
        let table = RegionTable::builtin();
        let bad = ApiItem {
            deal_day: Some("32".to_string()),
            ..api_item()
        };
        let (deals, report) = normalize_api_items(&[api_item(), bad], "11680", &table);
        assert_eq!(deals.len(), 1);
        assert_eq!(report.total, 2);
        assert_eq!(report.converted, 1);
        assert_eq!(report.dropped_count(), 1);
        assert!(report.dropped[0].contains("2025-12-32"));
    }
}
