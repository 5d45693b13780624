//! Parsed, queryable markup document.

use scraper::{ElementRef, Html};

use crate::selector::FieldSelector;

/// An immutable HTML tree produced by one acquisition.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    html: Html,
}

impl ParsedDocument {
    /// Parse markup. Parsing is lenient and never fails.
    ///
    /// Bare table rows or cells with no enclosing `<table>`, `<body>` or
    /// `<html>` (saved snippets, test strings) are given a table context
    /// first; the HTML parser would otherwise discard the `<tr>`/`<td>` tags.
    pub fn parse(markup: &str) -> Self {
        let html = match table_context(markup) {
            Some(wrapped) => Html::parse_document(&wrapped),
            None => Html::parse_document(markup),
        };
        Self { html }
    }

    /// All elements matching `selector`, in document order.
    pub fn select<'a>(
        &'a self,
        selector: &'a FieldSelector,
    ) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html
            .select(selector.css())
            .filter(move |element| selector.matches(element))
    }

    /// Count of elements matching `selector`, ignoring its max count.
    pub fn count(&self, selector: &FieldSelector) -> usize {
        self.select(selector).count()
    }

    /// Serialize the tree back to HTML.
    pub fn html(&self) -> String {
        self.html.html()
    }
}

/// Wrap bare row/cell markup in the table elements it needs, if any.
fn table_context(markup: &str) -> Option<String> {
    let lower = markup.to_ascii_lowercase();
    if ["table", "body", "html"].iter().any(|tag| has_tag(&lower, tag)) {
        return None;
    }
    if has_tag(&lower, "tr") {
        Some(format!("<table>{markup}</table>"))
    } else if has_tag(&lower, "td") || has_tag(&lower, "th") {
        Some(format!("<table><tr>{markup}</tr></table>"))
    } else {
        None
    }
}

/// Whether lowercase `markup` contains a start tag named exactly `name`.
fn has_tag(markup: &str, name: &str) -> bool {
    let open = format!("<{name}");
    markup.match_indices(&open).any(|(at, _)| {
        markup[at + open.len()..]
            .chars()
            .next()
            .is_some_and(|c| c == '>' || c == '/' || c.is_ascii_whitespace())
    })
}
