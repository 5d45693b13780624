//! trending-coins command-line front end: configuration, report rendering,
//! self-check and environment diagnostics.

pub mod check;
pub mod config;
pub mod doctor;
pub mod report;

pub use config::{resolve_source, resolve_url, DEFAULT_SNAPSHOT, URL_ENV};
pub use report::{render_json, render_table};
