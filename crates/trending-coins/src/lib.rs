//! trending-coins: render a trending cryptocurrency listing, extract its
//! name, 24h change, price and volume columns, and assemble them into rows.

pub mod acquire;
pub mod assemble;
pub mod document;
pub mod extract;
pub mod renderer;
pub mod selector;
pub mod types;

pub use acquire::{
    acquire, load_from_file, load_from_string, load_from_web, Source, WebOptions, DEFAULT_URL,
};
pub use assemble::{assemble, extract_columns, zip_columns, DEFAULT_ROW_COUNT};
pub use document::ParsedDocument;
pub use extract::extract;
pub use selector::{Field, FieldSelector};
pub use types::*;
