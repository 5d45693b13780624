//! Core data types for extracted listing rows and errors.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One assembled row of the trending report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinRow {
    #[serde(rename = "Coin Names")]
    pub name: String,
    #[serde(rename = "Daily % Change")]
    pub change_24h: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "Daily Volume")]
    pub volume: String,
}

impl CoinRow {
    /// Values in column order, matching [`crate::Field::ALL`].
    pub fn values(&self) -> [&str; 4] {
        [&self.name, &self.change_24h, &self.price, &self.volume]
    }
}

/// Errors that can occur while acquiring or extracting a listing.
#[derive(thiserror::Error, Debug)]
pub enum TrendingError {
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Render failure: {0}")]
    RenderFailure(String),

    #[error("Malformed structure: match #{index} of `{selector}` has no text leaf (page layout changed?)")]
    MalformedStructure { selector: String, index: usize },

    #[error("Length mismatch between extracted fields: {}", format_lengths(.lengths))]
    LengthMismatch { lengths: Vec<(&'static str, usize)> },

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_lengths(lengths: &[(&'static str, usize)]) -> String {
    lengths
        .iter()
        .map(|(label, len)| format!("{label}={len}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience result type.
pub type TrendingResult<T> = Result<T, TrendingError>;
