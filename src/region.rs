//! Administrative region-code lookup.
//!
//! A 법정동 code is 10 digits; its first 5 identify the city/district and
//! that prefix is all the transaction API works with. The first 2 digits
//! select the 시/도 (city/province), the full 5 the 구/시 (district).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sentinel for codes missing from the table. Unknown codes never abort
/// ingestion; the deal is produced with these names instead.
pub const UNKNOWN_REGION: &str = "알 수 없음";

/// One entry of the region-code table, as managed by the admin operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionCode {
    pub code: String,
    pub city: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionNames {
    pub city: String,
    pub region: String,
}

/// Immutable-after-startup lookup table. Built once from the built-in data
/// (optionally extended through the admin operations) and passed explicitly
/// to the normalizer.
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    cities: HashMap<String, String>,
    regions: HashMap<String, String>,
}

const CITY_CODES: &[(&str, &str)] = &[
    ("11", "서울특별시"),
    ("26", "부산광역시"),
    ("27", "대구광역시"),
    ("28", "인천광역시"),
    ("29", "광주광역시"),
    ("30", "대전광역시"),
    ("31", "울산광역시"),
    ("36", "세종특별자치시"),
    ("41", "경기도"),
    ("42", "강원도"),
    ("43", "충청북도"),
    ("44", "충청남도"),
    ("45", "전라북도"),
    ("46", "전라남도"),
    ("47", "경상북도"),
    ("48", "경상남도"),
    ("50", "제주특별자치도"),
];

const REGION_CODES: &[(&str, &str)] = &[
    ("11110", "종로구"),
    ("11140", "중구"),
    ("11170", "용산구"),
    ("11200", "성동구"),
    ("11215", "광진구"),
    ("11230", "동대문구"),
    ("11260", "중랑구"),
    ("11290", "성북구"),
    ("11305", "강북구"),
    ("11320", "도봉구"),
    ("11350", "노원구"),
    ("11380", "은평구"),
    ("11410", "서대문구"),
    ("11440", "마포구"),
    ("11470", "양천구"),
    ("11500", "강서구"),
    ("11530", "구로구"),
    ("11545", "금천구"),
    ("11560", "영등포구"),
    ("11590", "동작구"),
    ("11620", "관악구"),
    ("11650", "서초구"),
    ("11680", "강남구"),
    ("11710", "송파구"),
    ("11740", "강동구"),
    ("41450", "하남시"),
    ("41130", "성남시"),
];

impl RegionTable {
    /// The table shipped with the binary, covering the 시/도 prefixes and
    /// the Seoul-area districts.
    pub fn builtin() -> Self {
        let cities = CITY_CODES
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let regions = REGION_CODES
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RegionTable { cities, regions }
    }

    /// Map a 5-digit code to display names. Unknown prefixes or codes
    /// resolve to [`UNKNOWN_REGION`] rather than failing.
    pub fn resolve(&self, code5: &str) -> RegionNames {
        let city_code = code5.get(0..2).unwrap_or("");
        let region_code = code5.get(0..5).unwrap_or("");
        RegionNames {
            city: self
                .cities
                .get(city_code)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_REGION.to_string()),
            region: self
                .regions
                .get(region_code)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_REGION.to_string()),
        }
    }

    pub fn add(&mut self, entry: RegionCode) {
        if let Some(prefix) = entry.code.get(0..2) {
            self.cities.insert(prefix.to_string(), entry.city);
        }
        self.regions.insert(entry.code, entry.region);
    }

    pub fn remove(&mut self, code5: &str) -> bool {
        self.regions.remove(code5).is_some()
    }

    pub fn bulk_upsert<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = RegionCode>,
    {
        for entry in entries {
            self.add(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve() {
        let table = RegionTable::builtin();
        let names = table.resolve("11680");
        assert_eq!(names.city, "서울특별시");
        assert_eq!(names.region, "강남구");

        let names = table.resolve("41450");
        assert_eq!(names.city, "경기도");
        assert_eq!(names.region, "하남시");
    }

    #[test]
    fn unknown_codes_use_sentinel() {
        let table = RegionTable::builtin();
        let names = table.resolve("99999");
        assert_eq!(names.city, UNKNOWN_REGION);
        assert_eq!(names.region, UNKNOWN_REGION);

        // Known city prefix, unknown district.
        let names = table.resolve("11999");
        assert_eq!(names.city, "서울특별시");
        assert_eq!(names.region, UNKNOWN_REGION);
    }

    #[test]
    fn admin_operations() {
        let mut table = RegionTable::builtin();
        let before = table.len();
        table.add(RegionCode {
            code: "41570".to_string(),
            city: "경기도".to_string(),
            region: "김포시".to_string(),
        });
        assert_eq!(table.len(), before + 1);
        assert_eq!(table.resolve("41570").region, "김포시");

        assert!(table.remove("41570"));
        assert!(!table.remove("41570"));
        assert_eq!(table.resolve("41570").region, UNKNOWN_REGION);
    }
}
