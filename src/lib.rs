//! Scraper for the MagicPort fishing vessel directory.
//!
//! Authenticates with browser session cookies, walks the paginated vessel
//! listing, visits each vessel's detail page and writes flat records to CSV.

pub mod detail;
pub mod driver;
pub mod error;
pub mod listing;
pub mod logger;
pub mod models;
pub mod report;
pub mod session;
pub mod storage;
