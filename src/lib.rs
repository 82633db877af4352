//! lease-report — normalizes Korean apartment lease transactions (국토교통부
//! API payloads and ministry spreadsheet exports) into canonical deal
//! records and renders weekly period reports as text and HTML.

pub mod error;
pub mod loader;
pub mod normalize;
pub mod output;
pub mod period;
pub mod region;
pub mod report;
pub mod render;
pub mod store;
pub mod types;
pub mod util;
