//! Crash-reporting service access

mod client;

pub use client::fetch_crash_reports;
