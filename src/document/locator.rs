// SPDX-License-Identifier: PMPL-1.0-or-later
//! XPath-style element locators, e.g. `/html/body/div[2]/p`.
//!
//! A positional index is only added when the parent has more than one
//! child element with the same tag name.

use scraper::ElementRef;

/// Build the locator for an element
pub fn xpath(element: ElementRef<'_>) -> String {
    let mut segments = Vec::new();
    let mut current = Some(element);

    while let Some(el) = current {
        let name = el.value().name();
        let same_tag = |sibling: &ElementRef<'_>| sibling.value().name() == name;
        let before = el
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .filter(same_tag)
            .count();
        let after = el
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .filter(same_tag)
            .count();

        if before + after > 0 {
            segments.push(format!("{}[{}]", name, before + 1));
        } else {
            segments.push(name.to_string());
        }

        current = el.parent().and_then(ElementRef::wrap);
    }

    segments.reverse();
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn paths(html: &str, selector: &str) -> Vec<String> {
        let doc = Html::parse_document(html);
        let selector = Selector::parse(selector).unwrap();
        doc.select(&selector).map(xpath).collect()
    }

    #[test]
    fn test_unique_children_have_no_index() {
        assert_eq!(
            paths("<html><body><main><p>x</p></main></body></html>", "p"),
            vec!["/html/body/main/p"]
        );
    }

    #[test]
    fn test_repeated_tags_are_indexed() {
        assert_eq!(
            paths(
                "<html><body><div><p>a</p></div><span></span><div><p>b</p><p>c</p></div></body></html>",
                "p"
            ),
            vec!["/html/body/div[1]/p", "/html/body/div[2]/p[1]", "/html/body/div[2]/p[2]"]
        );
    }

    #[test]
    fn test_body_locator() {
        assert_eq!(paths("<p>x</p>", "body"), vec!["/html/body"]);
    }
}
