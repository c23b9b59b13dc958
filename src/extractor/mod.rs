pub mod competitors;
pub mod listing;

pub use competitors::*;
pub use listing::*;

use scraper::{ElementRef, Selector};

/// First element under `scope` matching a configured selector. An unparsable
/// selector counts as a failed lookup, not an error.
pub(crate) fn select_first<'a>(scope: ElementRef<'a>, selector_str: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector_str).ok()?;
    scope.select(&selector).next()
}

/// Trimmed text of the first matching element. Found-but-empty text is
/// returned verbatim; only a missing element yields `None`.
pub(crate) fn select_text(scope: ElementRef<'_>, selector_str: &str) -> Option<String> {
    let element = select_first(scope, selector_str)?;
    Some(element.text().collect::<String>().trim().to_string())
}

/// Attribute value of the first matching element.
pub(crate) fn select_attr(scope: ElementRef<'_>, selector_str: &str, attr: &str) -> Option<String> {
    let element = select_first(scope, selector_str)?;
    element.value().attr(attr).map(|v| v.to_string())
}
