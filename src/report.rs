//! Report aggregation for one reporting period.

use crate::error::{ReportError, Result};
use crate::store::DealStore;
use crate::types::{
    ContractItem, ContractKind, Contracts, Deal, KindStats, LeaseKind, ReportData, ReportMeta,
    Stats, Summary, TypeStat,
};
use crate::util::{average, round1};
use std::collections::BTreeMap;

/// Build the full report for one period, optionally narrowed to a city
/// and/or region. An empty filtered set is a domain-visible `NoData`
/// condition, not a crash.
pub fn build_report(
    store: &dyn DealStore,
    period_key: &str,
    city: Option<&str>,
    region: Option<&str>,
) -> Result<ReportData> {
    let deals = store.query(period_key, city, region);
    if deals.is_empty() {
        let filter = match (city, region) {
            (None, None) => None,
            (c, r) => Some(
                [c.unwrap_or(""), r.unwrap_or("")]
                    .join(" ")
                    .trim()
                    .to_string(),
            ),
        };
        return Err(ReportError::NoData {
            period_key: period_key.to_string(),
            filter,
        });
    }

    let city_val = if deals[0].city.is_empty() {
        city.unwrap_or("").to_string()
    } else {
        deals[0].city.clone()
    };
    let region_val = deals[0].region.clone();
    let location = location_text(&city_val, &region_val);

    let meta = ReportMeta {
        period_key: period_key.to_string(),
        period_text: if deals[0].period_text.is_empty() {
            period_key.to_string()
        } else {
            deals[0].period_text.clone()
        },
        city: city_val,
        region: location,
    };

    let new_deals: Vec<&Deal> = deals
        .iter()
        .filter(|d| d.contract_kind == ContractKind::New)
        .collect();
    let renew_deals: Vec<&Deal> = deals
        .iter()
        .filter(|d| d.contract_kind == ContractKind::Renew)
        .collect();

    let count_lease = |list: &[&Deal], kind: LeaseKind| {
        list.iter().filter(|d| d.lease_kind == kind).count()
    };

    let summary = Summary {
        total_count: deals.len(),
        new_count: new_deals.len(),
        renew_count: renew_deals.len(),
        jeonse_count: deals
            .iter()
            .filter(|d| d.lease_kind == LeaseKind::Jeonse)
            .count(),
        wolse_count: deals
            .iter()
            .filter(|d| d.lease_kind == LeaseKind::Wolse)
            .count(),
        new_jeonse_count: count_lease(&new_deals, LeaseKind::Jeonse),
        new_wolse_count: count_lease(&new_deals, LeaseKind::Wolse),
        renew_jeonse_count: count_lease(&renew_deals, LeaseKind::Jeonse),
        renew_wolse_count: count_lease(&renew_deals, LeaseKind::Wolse),
    };

    let stats = Stats {
        new: KindStats {
            jeonse_by_type: stats_by_type(&new_deals, LeaseKind::Jeonse),
            wolse_by_type: stats_by_type(&new_deals, LeaseKind::Wolse),
        },
        renew: KindStats {
            jeonse_by_type: stats_by_type(&renew_deals, LeaseKind::Jeonse),
            wolse_by_type: stats_by_type(&renew_deals, LeaseKind::Wolse),
        },
    };

    let contracts = Contracts {
        new: contract_list(&new_deals),
        renew: contract_list(&renew_deals),
    };

    Ok(ReportData {
        meta,
        summary,
        stats,
        contracts,
    })
}

/// Combined location display. For cities whose single "region" equals the
/// city itself the stored region already carries the city name, so it is
/// used alone instead of being prefixed again.
fn location_text(city: &str, region: &str) -> String {
    if city.is_empty() || region.is_empty() {
        let fallback = if region.is_empty() { city } else { region };
        if fallback.is_empty() {
            return "지역 정보 없음".to_string();
        }
        return fallback.to_string();
    }
    if region.starts_with(city) {
        region.to_string()
    } else {
        format!("{} {}", city, region)
    }
}

/// Per-area-type statistics for one lease kind within a contract-kind
/// partition. The grouping key is `floor(area_m2)`, deliberately distinct
/// from the pyeong-rounded `Deal::area_type` used for display.
fn stats_by_type(deals: &[&Deal], lease_kind: LeaseKind) -> Vec<TypeStat> {
    let mut grouped: BTreeMap<i32, Vec<&Deal>> = BTreeMap::new();
    for deal in deals.iter().filter(|d| d.lease_kind == lease_kind) {
        grouped.entry(deal.area_m2.floor() as i32).or_default().push(deal);
    }

    grouped
        .into_iter()
        .map(|(area_type, group)| {
            let deposits: Vec<f64> = group.iter().map(|d| d.deposit_uk).collect();
            let avg_rent_manwon = match lease_kind {
                LeaseKind::Wolse => {
                    let rents: Vec<f64> =
                        group.iter().map(|d| d.rent_manwon.unwrap_or(0.0)).collect();
                    Some(average(&rents).round() as i64)
                }
                LeaseKind::Jeonse => None,
            };
            TypeStat {
                area_type,
                count: group.len(),
                avg_deposit_uk: round1(average(&deposits)),
                avg_rent_manwon,
            }
        })
        .collect()
}

/// 1-based sequential numbering over the subset in its stored
/// (contract-date-ascending) order.
fn contract_list(deals: &[&Deal]) -> Vec<ContractItem> {
    deals
        .iter()
        .enumerate()
        .map(|(idx, deal)| ContractItem {
            no: idx + 1,
            dong: deal.dong.clone(),
            complex: deal.complex.clone(),
            lease_kind: deal.lease_kind.label().to_string(),
            contract_type_label: deal.contract_type_label.clone(),
            area_type: deal.area_type,
            area_m2: deal.area_m2,
            deposit_uk: deal.deposit_uk,
            rent_manwon: deal.rent_manwon,
            floor: deal.floor,
            contract_date: deal.contract_date,
            period_text: deal.period_text.clone(),
            renew_right_used: deal.renew_right_used.clone(),
        })
        .collect()
}
