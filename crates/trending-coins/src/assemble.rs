//! Row assembly: four field extractions zipped into labelled rows.

use crate::document::ParsedDocument;
use crate::extract::extract;
use crate::selector::Field;
use crate::types::{CoinRow, TrendingError, TrendingResult};

/// Default number of rows in a report.
pub const DEFAULT_ROW_COUNT: usize = 10;

/// Extract the four report fields (at most `count` each) and zip them into rows.
pub fn assemble(doc: &ParsedDocument, count: usize) -> TrendingResult<Vec<CoinRow>> {
    let [names, changes, prices, volumes] = extract_columns(doc, count)?;
    zip_columns(names, changes, prices, volumes)
}

/// Extract every field in [`Field::ALL`] order.
pub fn extract_columns(doc: &ParsedDocument, count: usize) -> TrendingResult<[Vec<String>; 4]> {
    Ok([
        extract(doc, &Field::Name.selector(count)?)?,
        extract(doc, &Field::Change24h.selector(count)?)?,
        extract(doc, &Field::Price.selector(count)?)?,
        extract(doc, &Field::Volume.selector(count)?)?,
    ])
}

/// Zip four columns into rows. All columns must have the same length.
pub fn zip_columns(
    names: Vec<String>,
    changes: Vec<String>,
    prices: Vec<String>,
    volumes: Vec<String>,
) -> TrendingResult<Vec<CoinRow>> {
    let lengths = [names.len(), changes.len(), prices.len(), volumes.len()];
    if lengths.iter().any(|&len| len != lengths[0]) {
        return Err(TrendingError::LengthMismatch {
            lengths: Field::ALL
                .iter()
                .zip(lengths)
                .map(|(field, len)| (field.label(), len))
                .collect(),
        });
    }

    let rows = names
        .into_iter()
        .zip(changes)
        .zip(prices)
        .zip(volumes)
        .map(|(((name, change_24h), price), volume)| CoinRow {
            name,
            change_24h,
            price,
            volume,
        })
        .collect();
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(prefix: &str, len: usize) -> Vec<String> {
        (0..len).map(|i| format!("{prefix}{i}")).collect()
    }

    #[test]
    fn test_equal_lengths_zip_in_order() {
        let rows = zip_columns(
            column("n", 10),
            column("c", 10),
            column("p", 10),
            column("v", 10),
        )
        .unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[3].values(), ["n3", "c3", "p3", "v3"]);
    }

    #[test]
    fn test_short_column_is_length_mismatch() {
        let err = zip_columns(
            column("n", 10),
            column("c", 9),
            column("p", 10),
            column("v", 10),
        )
        .unwrap_err();
        match err {
            TrendingError::LengthMismatch { lengths } => assert_eq!(
                lengths,
                vec![
                    ("Coin Names", 10),
                    ("Daily % Change", 9),
                    ("Price", 10),
                    ("Daily Volume", 10)
                ]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_columns_yield_no_rows() {
        let rows = zip_columns(vec![], vec![], vec![], vec![]).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_assemble_single_row_page() {
        let doc = ParsedDocument::parse(
            r#"<table><tr>
                <td><a><span class="d-lg-none font-bold">GOD</span></a></td>
                <td class="td-price price"><span>$439,632</span></td>
                <td class="td-change24h change24h stat-percent text-center"><span>-3.2%</span></td>
                <td class="td-liquidity_score lit"><a><span>$92,706</span></a></td>
            </tr></table>"#,
        );
        let rows = assemble(&doc, 10).unwrap();
        assert_eq!(
            rows,
            vec![CoinRow {
                name: "GOD".into(),
                change_24h: "-3.2".into(),
                price: "439,632".into(),
                volume: "92,706".into(),
            }]
        );
    }

    #[test]
    fn test_assemble_missing_column_is_mismatch() {
        let doc = ParsedDocument::parse(
            r#"<table><tr>
                <td><span class="d-lg-none font-bold">GOD</span></td>
                <td class="td-price price"><span>$1</span></td>
            </tr></table>"#,
        );
        assert!(matches!(
            assemble(&doc, 10),
            Err(TrendingError::LengthMismatch { .. })
        ));
    }
}
