//! Field selectors: element kind, attribute filter, count and strip token.

use std::collections::BTreeMap;
use std::fmt;

use crate::types::{TrendingError, TrendingResult};

/// Element kind that carries the display text inside a matched element.
pub const DEFAULT_LEAF: &str = "span";

/// A validated structural query for one extracted field.
///
/// Matches elements of `element` kind whose attributes equal every entry of
/// the filter. A `class` filter compares the whitespace-separated class list
/// in order: `"td-price price"` matches `class=" td-price  price"` but not an
/// element carrying just one of the classes, or extra ones.
#[derive(Debug, Clone)]
pub struct FieldSelector {
    element: String,
    attributes: BTreeMap<String, String>,
    max_count: usize,
    strip: Option<String>,
    leaf: String,
    css: scraper::Selector,
}

impl FieldSelector {
    /// Build a selector, validating names and compiling the CSS query.
    pub fn new(
        element: &str,
        attributes: BTreeMap<String, String>,
        max_count: usize,
    ) -> TrendingResult<Self> {
        validate_name("element kind", element)?;
        for name in attributes.keys() {
            validate_name("attribute name", name)?;
        }
        let element = element.to_ascii_lowercase();
        let attributes: BTreeMap<String, String> = attributes
            .into_iter()
            .map(|(name, value)| {
                let name = name.to_ascii_lowercase();
                let value = if name == "class" {
                    normalize_classes(&value)
                } else {
                    value
                };
                (name, value)
            })
            .collect();
        let css = compile(&element, &attributes)?;
        Ok(Self {
            element,
            attributes,
            max_count,
            strip: None,
            leaf: DEFAULT_LEAF.to_string(),
            css,
        })
    }

    /// Shorthand for the common single-class filter.
    pub fn with_class(element: &str, class: &str, max_count: usize) -> TrendingResult<Self> {
        let mut attributes = BTreeMap::new();
        attributes.insert("class".to_string(), class.to_string());
        Self::new(element, attributes, max_count)
    }

    /// Remove every occurrence of `token` from extracted text. Empty means none.
    pub fn strip(mut self, token: &str) -> Self {
        self.strip = (!token.is_empty()).then(|| token.to_string());
        self
    }

    /// Override the element kind that carries the text (default `span`).
    pub fn leaf(mut self, leaf: &str) -> TrendingResult<Self> {
        validate_name("leaf kind", leaf)?;
        self.leaf = leaf.to_ascii_lowercase();
        Ok(self)
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }

    pub fn strip_token(&self) -> Option<&str> {
        self.strip.as_deref()
    }

    pub fn leaf_kind(&self) -> &str {
        &self.leaf
    }

    /// The compiled CSS query.
    pub(crate) fn css(&self) -> &scraper::Selector {
        &self.css
    }

    /// CSS source text, usable in `document.querySelectorAll`.
    ///
    /// A `class` filter becomes one `~=` term per class, so the CSS alone may
    /// also match elements with extra classes; [`FieldSelector::matches`]
    /// applies the exact class-list check.
    pub fn css_text(&self) -> String {
        css_source(&self.element, &self.attributes)
    }

    /// Exact class-list check for an element already matched by the CSS.
    pub fn matches(&self, element: &scraper::ElementRef<'_>) -> bool {
        match self.attributes.get("class") {
            Some(classes) => element
                .value()
                .attr("class")
                .is_some_and(|actual| normalize_classes(actual) == *classes),
            None => true,
        }
    }
}

fn normalize_classes(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

impl fmt::Display for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css_text())
    }
}

fn validate_name(what: &str, name: &str) -> TrendingResult<()> {
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(TrendingError::InvalidSelector(format!(
            "{what} {name:?} is not a valid identifier"
        )))
    }
}

fn css_source(element: &str, attributes: &BTreeMap<String, String>) -> String {
    let mut css = element.to_string();
    for (name, value) in attributes {
        if name == "class" && !value.is_empty() {
            for class in value.split(' ') {
                css.push_str(&format!("[class~={}]", quote(class)));
            }
        } else {
            css.push_str(&format!("[{name}={}]", quote(value)));
        }
    }
    css
}

fn compile(
    element: &str,
    attributes: &BTreeMap<String, String>,
) -> TrendingResult<scraper::Selector> {
    let source = css_source(element, attributes);
    scraper::Selector::parse(&source)
        .map_err(|e| TrendingError::InvalidSelector(format!("{source}: {e:?}")))
}

/// The four columns of the trending report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Change24h,
    Price,
    Volume,
}

impl Field {
    /// All fields in column order.
    pub const ALL: [Field; 4] = [Field::Name, Field::Change24h, Field::Price, Field::Volume];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Coin Names",
            Field::Change24h => "Daily % Change",
            Field::Price => "Price",
            Field::Volume => "Daily Volume",
        }
    }

    pub fn element(self) -> &'static str {
        match self {
            Field::Name => "span",
            Field::Change24h | Field::Price | Field::Volume => "td",
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Field::Name => "d-lg-none font-bold",
            Field::Change24h => "td-change24h change24h stat-percent text-center",
            Field::Price => "td-price price",
            Field::Volume => "td-liquidity_score lit",
        }
    }

    pub fn strip_token(self) -> &'static str {
        match self {
            Field::Name => "",
            Field::Change24h => "%",
            Field::Price | Field::Volume => "$",
        }
    }

    /// The selector for this field, capped at `max_count` matches.
    pub fn selector(self, max_count: usize) -> TrendingResult<FieldSelector> {
        Ok(FieldSelector::with_class(self.element(), self.class(), max_count)?
            .strip(self.strip_token()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_filter_becomes_word_terms() {
        let sel = FieldSelector::with_class("td", " td-price  price ", 10).unwrap();
        assert_eq!(sel.attributes()["class"], "td-price price");
        assert_eq!(sel.css_text(), r#"td[class~="td-price"][class~="price"]"#);
        assert_eq!(sel.max_count(), 10);
        assert_eq!(sel.leaf_kind(), "span");
        assert!(sel.strip_token().is_none());
    }

    #[test]
    fn test_quotes_in_values_are_escaped() {
        let mut attrs = BTreeMap::new();
        attrs.insert("title".to_string(), r#"say "hi""#.to_string());
        let sel = FieldSelector::new("a", attrs, 1).unwrap();
        assert_eq!(sel.css_text(), r#"a[title="say \"hi\""]"#);
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        assert!(matches!(
            FieldSelector::with_class("", "x", 1),
            Err(TrendingError::InvalidSelector(_))
        ));
        assert!(matches!(
            FieldSelector::with_class("td>span", "x", 1),
            Err(TrendingError::InvalidSelector(_))
        ));
        let mut attrs = BTreeMap::new();
        attrs.insert("data price".to_string(), "1".to_string());
        assert!(FieldSelector::new("td", attrs, 1).is_err());
        assert!(FieldSelector::with_class("td", "x", 1)
            .unwrap()
            .leaf("1b")
            .is_err());
    }

    #[test]
    fn test_class_list_must_match_exactly() {
        let doc = scraper::Html::parse_fragment(
            r#"<p class="td-price  price"></p><p class=" td-price price "></p>
               <p class="td-price"></p><p class="td-price price extra"></p>
               <p class="price td-price"></p>"#,
        );
        let sel = FieldSelector::with_class("p", "td-price price", 10).unwrap();
        let matched: Vec<_> = doc
            .select(sel.css())
            .filter(|e| sel.matches(e))
            .map(|e| e.value().attr("class").unwrap_or_default().to_string())
            .collect();
        assert_eq!(matched, vec!["td-price  price", " td-price price "]);
    }

    #[test]
    fn test_empty_strip_token_means_none() {
        let sel = FieldSelector::with_class("td", "x", 1).unwrap().strip("");
        assert!(sel.strip_token().is_none());
    }

    #[test]
    fn test_builtin_fields() {
        for field in Field::ALL {
            let sel = field.selector(10).unwrap();
            assert_eq!(sel.element(), field.element());
            assert_eq!(sel.attributes()["class"], field.class());
        }
        assert_eq!(Field::Change24h.selector(1).unwrap().strip_token(), Some("%"));
        assert_eq!(Field::Price.selector(1).unwrap().strip_token(), Some("$"));
        assert_eq!(Field::Volume.selector(1).unwrap().strip_token(), Some("$"));
        assert_eq!(Field::Name.selector(1).unwrap().strip_token(), None);
        assert_eq!(Field::Change24h.to_string(), "Daily % Change");
    }
}
