//! Deal store seam.
//!
//! The aggregator only depends on this trait; the in-memory implementation
//! backs the CLI and the tests. Queries always return rows sorted by
//! contract date ascending so downstream contract numbering is stable.

use crate::types::Deal;
use std::collections::BTreeSet;

pub trait DealStore {
    fn insert(&mut self, deals: Vec<Deal>);

    /// Deals matching the period key and, when given, exact city/region,
    /// sorted by contract date ascending.
    fn query(&self, period_key: &str, city: Option<&str>, region: Option<&str>) -> Vec<Deal>;

    /// Distinct period keys present in the store, ascending.
    fn periods(&self) -> Vec<String>;

    /// Distinct `(city, region)` pairs present in the store, ascending.
    fn regions(&self) -> Vec<(String, String)>;

    /// Distinct dong names within one city/region, ascending.
    fn dongs(&self, city: &str, region: &str) -> Vec<String>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    deals: Vec<Deal>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.deals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deals.is_empty()
    }
}

impl DealStore for MemoryStore {
    fn insert(&mut self, mut deals: Vec<Deal>) {
        self.deals.append(&mut deals);
    }

    fn query(&self, period_key: &str, city: Option<&str>, region: Option<&str>) -> Vec<Deal> {
        let mut matched: Vec<Deal> = self
            .deals
            .iter()
            .filter(|d| d.period_key == period_key)
            .filter(|d| city.map_or(true, |c| d.city == c))
            .filter(|d| region.map_or(true, |r| d.region == r))
            .cloned()
            .collect();
        matched.sort_by_key(|d| d.contract_date);
        matched
    }

    fn periods(&self) -> Vec<String> {
        let set: BTreeSet<String> = self.deals.iter().map(|d| d.period_key.clone()).collect();
        set.into_iter().collect()
    }

    fn regions(&self) -> Vec<(String, String)> {
        let set: BTreeSet<(String, String)> = self
            .deals
            .iter()
            .map(|d| (d.city.clone(), d.region.clone()))
            .collect();
        set.into_iter().collect()
    }

    fn dongs(&self, city: &str, region: &str) -> Vec<String> {
        let set: BTreeSet<String> = self
            .deals
            .iter()
            .filter(|d| d.city == city && d.region == region)
            .map(|d| d.dong.clone())
            .collect();
        set.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{from_api_item, ApiItem};
    use crate::region::RegionTable;

    fn deal(day: &str, code: &str) -> Deal {
        let item = ApiItem {
            apt_nm: Some("단지".to_string()),
            deal_year: Some("2025".to_string()),
            deal_month: Some("12".to_string()),
            deal_day: Some(day.to_string()),
            deposit: Some("50,000".to_string()),
            monthly_rent: Some("0".to_string()),
            exclu_use_ar: Some("84.0".to_string()),
            umd_nm: Some("대치동".to_string()),
            ..ApiItem::default()
        };
        from_api_item(&item, code, &RegionTable::builtin()).unwrap()
    }

    #[test]
    fn query_sorts_by_contract_date() {
        let mut store = MemoryStore::new();
        store.insert(vec![deal("5", "11680"), deal("1", "11680"), deal("3", "11680")]);
        let days: Vec<u32> = store
            .query("2025-12-W1", None, None)
            .iter()
            .map(|d| chrono::Datelike::day(&d.contract_date))
            .collect();
        assert_eq!(days, vec![1, 3, 5]);
    }

    #[test]
    fn query_filters_by_region() {
        let mut store = MemoryStore::new();
        store.insert(vec![deal("1", "11680"), deal("2", "11650")]);
        assert_eq!(store.query("2025-12-W1", None, Some("강남구")).len(), 1);
        assert_eq!(
            store
                .query("2025-12-W1", Some("서울특별시"), None)
                .len(),
            2
        );
        assert!(store.query("2025-11-W1", None, None).is_empty());
    }

    #[test]
    fn distinct_listings() {
        let mut store = MemoryStore::new();
        store.insert(vec![deal("1", "11680"), deal("9", "11680"), deal("2", "11650")]);
        assert_eq!(store.periods(), vec!["2025-12-W1", "2025-12-W2"]);
        assert_eq!(
            store.regions(),
            vec![
                ("서울특별시".to_string(), "강남구".to_string()),
                ("서울특별시".to_string(), "서초구".to_string()),
            ]
        );
        assert_eq!(store.dongs("서울특별시", "강남구"), vec!["대치동"]);
    }
}
