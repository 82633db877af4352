//! Raw source providers: the saved 국토교통부 API payload (XML) and the
//! ministry spreadsheet export saved as CSV.
//!
//! The loader owns the batch-level error policy: it normalizes every row,
//! logs each dropped record with its offending context, and never lets one
//! bad row abort the rest of the batch.

use crate::error::{ReportError, Result};
use crate::normalize::{
    normalize_api_items, normalize_sheet_rows, ApiItem, DropReport, SheetRow,
};
use crate::region::RegionTable;
use crate::types::Deal;
use csv::ReaderBuilder;
use log::{info, warn};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};

/// The spreadsheet export reserves its first 12 rows for a title block;
/// the column-header row follows, then the data.
const SHEET_TITLE_ROWS: usize = 12;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    header: ApiHeader,
    body: Option<ApiBody>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiHeader {
    #[serde(rename = "resultCode")]
    result_code: Option<String>,
    #[serde(rename = "resultMsg")]
    result_msg: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiBody {
    items: Option<ApiItems>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiItems {
    item: Vec<ApiItem>,
}

/// Parse a saved API payload and extract its items.
///
/// A header result code other than `"00"`/`"000"` is an upstream failure
/// and is surfaced with the API's own message.
pub fn read_api_payload<R: BufRead>(reader: R) -> Result<Vec<ApiItem>> {
    let response: ApiResponse =
        quick_xml::de::from_reader(reader).map_err(|e| ReportError::Xml(e.to_string()))?;

    let code = response.header.result_code.unwrap_or_default();
    if code != "00" && code != "000" {
        return Err(ReportError::Api {
            code,
            msg: response.header.result_msg.unwrap_or_default(),
        });
    }

    Ok(response
        .body
        .and_then(|b| b.items)
        .map(|i| i.item)
        .unwrap_or_default())
}

/// Read spreadsheet rows from CSV text, skipping the title block. The line
/// after the skipped block is taken as the header row.
pub fn read_sheet_rows<R: BufRead>(mut reader: R) -> Result<Vec<SheetRow>> {
    let mut line = String::new();
    for _ in 0..SHEET_TITLE_ROWS {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(Vec::new());
        }
    }

    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut rows = Vec::new();
    for result in rdr.deserialize::<SheetRow>() {
        rows.push(result?);
    }
    Ok(rows)
}

fn log_drops(report: &DropReport) {
    for context in &report.dropped {
        warn!("행 건너뜀: {}", context);
    }
    info!(
        "{}건 중 {}건 변환, {}건 건너뜀",
        report.total,
        report.converted,
        report.dropped_count()
    );
}

/// Load and normalize a saved API payload file for one region code.
pub fn load_api_file(
    path: &str,
    lawd_cd: &str,
    regions: &RegionTable,
) -> Result<(Vec<Deal>, DropReport)> {
    let reader = BufReader::new(File::open(path)?);
    let items = read_api_payload(reader)?;
    let (deals, report) = normalize_api_items(&items, lawd_cd, regions);
    log_drops(&report);
    Ok((deals, report))
}

/// Load and normalize a spreadsheet export saved as CSV.
pub fn load_sheet_file(path: &str) -> Result<(Vec<Deal>, DropReport)> {
    let reader = BufReader::new(File::open(path)?);
    let rows = read_sheet_rows(reader)?;
    let (deals, report) = normalize_sheet_rows(&rows);
    log_drops(&report);
    Ok((deals, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const PAYLOAD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<response>
  <header>
    <resultCode>00</resultCode>
    <resultMsg>NORMAL SERVICE.</resultMsg>
  </header>
  <body>
    <items>
      <item>
        <aptNm>은마</aptNm>
        <dealYear>2025</dealYear>
        <dealMonth>12</dealMonth>
        <dealDay>3</dealDay>
        <deposit>65,000</deposit>
        <monthlyRent>0</monthlyRent>
        <excluUseAr>84.97</excluUseAr>
        <floor>11</floor>
        <umdNm>대치동</umdNm>
      </item>
      <item>
        <aptNm>래미안</aptNm>
        <dealYear>2025</dealYear>
        <dealMonth>12</dealMonth>
        <dealDay>10</dealDay>
        <deposit>30,000</deposit>
        <monthlyRent>90</monthlyRent>
        <excluUseAr>59.9</excluUseAr>
        <floor>3</floor>
        <umdNm>대치동</umdNm>
        <contractType>갱신</contractType>
      </item>
    </items>
  </body>
</response>"#;

    #[test]
    fn payload_items_are_extracted() {
        let items = read_api_payload(Cursor::new(PAYLOAD)).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].apt_nm.as_deref(), Some("은마"));
        assert_eq!(items[1].monthly_rent.as_deref(), Some("90"));
    }

    #[test]
    fn error_result_code_is_surfaced() {
        let payload = r#"<response>
  <header><resultCode>22</resultCode><resultMsg>LIMITED NUMBER OF SERVICE REQUESTS EXCEEDS</resultMsg></header>
</response>"#;
        let err = read_api_payload(Cursor::new(payload)).unwrap_err();
        match err {
            crate::error::ReportError::Api { code, msg } => {
                assert_eq!(code, "22");
                assert!(msg.contains("LIMITED"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_body_yields_no_items() {
        let payload = r#"<response>
  <header><resultCode>00</resultCode><resultMsg>OK</resultMsg></header>
  <body><items/></body>
</response>"#;
        let items = read_api_payload(Cursor::new(payload)).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn sheet_title_block_is_skipped() {
        let mut csv_text = String::new();
        for i in 0..12 {
            csv_text.push_str(&format!("제목 {}\n", i));
        }
        csv_text.push_str("시군구,단지명,전월세구분,계약구분,전용면적(㎡),보증금(만원),월세금(만원),계약년월,계약일,층\n");
        csv_text.push_str("서울특별시 강동구 고덕동,고덕그라시움,전세,신규,59.8,42000,0,202512,3,7\n");

        let rows = read_sheet_rows(Cursor::new(csv_text)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].complex.as_deref(), Some("고덕그라시움"));
        assert_eq!(rows[0].year_month.as_deref(), Some("202512"));
    }

    #[test]
    fn short_file_is_empty_not_an_error() {
        let rows = read_sheet_rows(Cursor::new("only one line\n")).unwrap();
        assert!(rows.is_empty());
    }
}
