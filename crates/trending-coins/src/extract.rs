//! Field extraction from a parsed listing page.
//!
//! Each matched element is walked depth-first in pre-order, starting at the
//! element itself; the first element of the selector's leaf kind carries the
//! display text. A matched `<span>` is therefore its own leaf, while a
//! `<td>` yields its first nested `<span>`.

use scraper::ElementRef;

use crate::document::ParsedDocument;
use crate::selector::FieldSelector;
use crate::types::{TrendingError, TrendingResult};

/// Extract up to `selector.max_count()` stripped text values in document order.
///
/// Fewer matches than the max count is not an error; a match without a text
/// leaf is. Leaf text is trimmed of surrounding whitespace (before and after
/// the strip token is removed), and a leaf holding only whitespace counts as
/// missing, so a blanked-out cell surfaces as `MalformedStructure` instead of
/// an empty value.
pub fn extract(doc: &ParsedDocument, selector: &FieldSelector) -> TrendingResult<Vec<String>> {
    let mut values = Vec::with_capacity(selector.max_count());

    for (index, element) in doc.select(selector).take(selector.max_count()).enumerate() {
        let text = leaf_text(element, selector.leaf_kind()).ok_or_else(|| {
            TrendingError::MalformedStructure {
                selector: selector.css_text(),
                index,
            }
        })?;
        values.push(strip(&text, selector.strip_token()));
    }

    tracing::debug!("{selector}: extracted {} value(s)", values.len());
    Ok(values)
}

/// Text of the first `leaf` element at or below `element`, if it has any.
fn leaf_text(element: ElementRef<'_>, leaf: &str) -> Option<String> {
    let leaf = element
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == leaf)?;

    let text: String = leaf.text().collect();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Remove all occurrences of `token`, then trim.
pub fn strip(text: &str, token: Option<&str>) -> String {
    match token {
        Some(token) if !token.is_empty() => text.replace(token, "").trim().to_string(),
        _ => text.trim().to_string(),
    }
}
