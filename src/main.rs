// Entry point and high-level CLI flow.
//
// - Option [1] loads a ministry spreadsheet export (CSV) into the store.
// - Option [2] loads a saved 국토교통부 API payload (XML) for one region
//   code into the store.
// - Option [3] builds the report for a period and writes the post text,
//   the HTML tables and a JSON dump.
// - Option [4] lists the period keys currently in the store.
use lease_report::error::ReportError;
use lease_report::region::RegionTable;
use lease_report::store::{DealStore, MemoryStore};
use lease_report::util::format_int;
use lease_report::{loader, output, render, report};
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::Mutex;

// Simple in-memory deal store so we can ingest several sources and then
// generate reports multiple times in a single run.
static APP_STATE: Lazy<Mutex<MemoryStore>> = Lazy::new(|| Mutex::new(MemoryStore::new()));

/// Read a single line of input after printing a prompt.
fn prompt(label: &str) -> String {
    print!("{}", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn prompt_or(label: &str, default: &str) -> String {
    let value = prompt(label);
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

/// Ask the user whether to go back to the selection menu after generating
/// a report. Returns `true` for `Y`, `false` for `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        match prompt("Back to Menu (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn report_ingest(converted: usize, dropped: usize) {
    println!(
        "{}건 변환 완료, {}건 건너뜀.",
        format_int(converted as i64),
        format_int(dropped as i64)
    );
    let store = APP_STATE.lock().unwrap();
    println!("현재 저장된 거래: {}건\n", format_int(store.len() as i64));
}

/// Handle option [1]: load and normalize the spreadsheet CSV.
fn handle_load_sheet() {
    let path = prompt_or("CSV file [rent_deals.csv]: ", "rent_deals.csv");
    match loader::load_sheet_file(&path) {
        Ok((deals, drop_report)) => {
            let converted = deals.len();
            APP_STATE.lock().unwrap().insert(deals);
            report_ingest(converted, drop_report.dropped_count());
        }
        Err(e) => eprintln!("Failed to load file: {}\n", e),
    }
}

/// Handle option [2]: load and normalize a saved API payload.
fn handle_load_api() {
    let path = prompt_or("XML payload file [molit_payload.xml]: ", "molit_payload.xml");
    let lawd_cd = prompt("법정동코드 (5자리): ");
    if lawd_cd.len() != 5 {
        println!("법정동코드는 5자리여야 합니다.\n");
        return;
    }

    let regions = RegionTable::builtin();
    match loader::load_api_file(&path, &lawd_cd, &regions) {
        Ok((deals, drop_report)) => {
            let converted = deals.len();
            APP_STATE.lock().unwrap().insert(deals);
            report_ingest(converted, drop_report.dropped_count());
        }
        Err(e) => eprintln!("Failed to load payload: {}\n", e),
    }
}

/// Handle option [3]: build a period report and write all three outputs.
fn handle_generate_report() {
    let period_key = prompt("Period key (예: 2025-12-W1): ");
    let city = prompt("City filter (optional): ");
    let region = prompt("Region filter (optional): ");

    let city = (!city.is_empty()).then_some(city);
    let region = (!region.is_empty()).then_some(region);

    let store = APP_STATE.lock().unwrap();
    let data = match report::build_report(&*store, &period_key, city.as_deref(), region.as_deref())
    {
        Ok(data) => data,
        Err(e @ ReportError::NoData { .. }) => {
            println!("{}\n", e);
            return;
        }
        Err(e) => {
            eprintln!("Report error: {}\n", e);
            return;
        }
    };

    println!("\n{} {} 리포트 생성 중...\n", data.meta.period_text, data.meta.region);

    let post = render::render_post(&data);
    let tables = render::render_tables(&data);

    if let Err(e) = output::write_text("post.txt", &post) {
        eprintln!("Write error: {}", e);
    }
    if let Err(e) = output::write_text("tables.html", &tables) {
        eprintln!("Write error: {}", e);
    }
    if let Err(e) = output::write_json("report.json", &data) {
        eprintln!("Write error: {}", e);
    }

    println!("총 {}건 (신규 {}건 / 갱신 {}건)\n",
        format_int(data.summary.total_count as i64),
        format_int(data.summary.new_count as i64),
        format_int(data.summary.renew_count as i64)
    );
    output::preview_stats(&data);
    println!("(post.txt, tables.html, report.json 파일로 저장되었습니다)\n");
}

/// Handle option [4]: list the distinct period keys in the store.
fn handle_list_periods() {
    let store = APP_STATE.lock().unwrap();
    let periods = store.periods();
    if periods.is_empty() {
        println!("저장된 거래가 없습니다.\n");
        return;
    }
    for period in periods {
        println!("{}", period);
    }
    println!();
}

fn main() {
    env_logger::init();
    loop {
        println!("Select:");
        println!("[1] Load spreadsheet CSV");
        println!("[2] Load API payload XML");
        println!("[3] Generate report");
        println!("[4] List stored periods\n");
        match prompt("Enter choice: ").as_str() {
            "1" => handle_load_sheet(),
            "2" => handle_load_api(),
            "3" => {
                println!();
                handle_generate_report();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "4" => handle_list_periods(),
            _ => println!("Invalid choice. Please enter 1-4.\n"),
        }
    }
}
