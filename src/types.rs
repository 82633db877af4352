use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// 전세 (deposit only) vs. 월세 (deposit plus monthly rent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaseKind {
    #[serde(rename = "JEONSE")]
    Jeonse,
    #[serde(rename = "WOLSE")]
    Wolse,
}

impl LeaseKind {
    pub fn label(self) -> &'static str {
        match self {
            LeaseKind::Jeonse => "전세",
            LeaseKind::Wolse => "월세",
        }
    }
}

/// Fresh contract vs. renewal of an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractKind {
    #[serde(rename = "NEW")]
    New,
    #[serde(rename = "RENEW")]
    Renew,
}

impl ContractKind {
    pub fn label(self) -> &'static str {
        match self {
            ContractKind::New => "신규",
            ContractKind::Renew => "갱신",
        }
    }
}

/// Canonical lease transaction record. Produced once by the normalizer and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    pub city: String,
    pub region: String,
    pub dong: String,
    pub complex: String,
    pub lease_kind: LeaseKind,
    pub contract_kind: ContractKind,
    /// Exclusive-use floor area in m².
    pub area_m2: f64,
    /// Pyeong-equivalent display type, `round(area_m2 / 3.3)`. The report
    /// aggregator groups by `floor(area_m2)` instead; the two derivations
    /// are intentionally distinct.
    pub area_type: i32,
    pub contract_date: NaiveDate,
    /// `"YYYY-MM-W<n>"` reporting bucket, see `period::derive_period`.
    pub period_key: String,
    pub period_text: String,
    /// Deposit in 만원 (10,000 KRW units).
    pub deposit_manwon: f64,
    /// Deposit rescaled to 억 (100,000,000 KRW units), 1 decimal.
    pub deposit_uk: f64,
    /// Present iff `lease_kind` is 월세.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_manwon: Option<f64>,
    pub floor: i32,
    pub contract_type_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renew_right_used: Option<String>,
    /// Deposit under the prior contract, for renewals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_deposit_manwon: Option<f64>,
    /// Opaque audit copy of the source spreadsheet row, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_row: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub period_key: String,
    pub period_text: String,
    pub city: String,
    pub region: String,
}

/// The nine summary counts for one reporting period.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Summary {
    pub total_count: usize,
    pub new_count: usize,
    pub renew_count: usize,
    pub jeonse_count: usize,
    pub wolse_count: usize,
    pub new_jeonse_count: usize,
    pub new_wolse_count: usize,
    pub renew_jeonse_count: usize,
    pub renew_wolse_count: usize,
}

/// Per-area-type statistics within one contract-kind × lease-kind partition.
///
/// `area_type` here is `floor(area_m2)` of the grouped deals, which is not
/// the same as `Deal::area_type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeStat {
    pub area_type: i32,
    pub count: usize,
    pub avg_deposit_uk: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_rent_manwon: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KindStats {
    pub jeonse_by_type: Vec<TypeStat>,
    pub wolse_by_type: Vec<TypeStat>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub new: KindStats,
    pub renew: KindStats,
}

/// Flattened, numbered projection of a deal for table rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ContractItem {
    pub no: usize,
    pub dong: String,
    pub complex: String,
    /// Korean label, "전세" or "월세".
    pub lease_kind: String,
    pub contract_type_label: String,
    pub area_type: i32,
    pub area_m2: f64,
    pub deposit_uk: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_manwon: Option<f64>,
    pub floor: i32,
    pub contract_date: NaiveDate,
    pub period_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renew_right_used: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Contracts {
    pub new: Vec<ContractItem>,
    pub renew: Vec<ContractItem>,
}

/// Everything the renderers need for one period's report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub meta: ReportMeta,
    pub summary: Summary,
    pub stats: Stats,
    pub contracts: Contracts,
}

/// Console preview row for per-type statistics.
#[derive(Debug, Clone, Tabled)]
pub struct StatPreviewRow {
    #[tabled(rename = "구분")]
    pub kind: String,
    #[tabled(rename = "면적(㎡)")]
    pub area_type: i32,
    #[tabled(rename = "건수")]
    pub count: usize,
    #[tabled(rename = "평균 보증금(억)")]
    pub avg_deposit_uk: String,
    #[tabled(rename = "평균 월세(만원)")]
    pub avg_rent_manwon: String,
}
