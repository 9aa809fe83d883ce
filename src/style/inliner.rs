// SPDX-License-Identifier: PMPL-1.0-or-later
//! Stylesheet flattening.
//!
//! Validators only ever look at per-element declarations. This module
//! bridges `<style>` blocks and linked stylesheets onto the elements their
//! selectors match, the same job an email "premailer" does. Rules apply in
//! source order; there is no specificity sorting.

use crate::config::Config;
use crate::error::{Result, ZooError};
use ego_tree::NodeId;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Pseudo-classes that depend on user interaction and can't be matched
/// statically; rules using them are kept aside per element.
const DYNAMIC_PSEUDO_CLASSES: &[&str] = &[
    "focus",
    "hover",
    "active",
    "visited",
    "link",
    "focus-within",
    "focus-visible",
    "target",
];

/// Legacy single-colon pseudo-elements
const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["before", "after", "first-line", "first-letter"];

/// Declarations a stylesheet contributes to one element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementRules {
    /// Declaration blocks in source order
    pub blocks: Vec<String>,
    /// `(pseudo-class, declaration block)` pairs in source order
    pub pseudo_blocks: Vec<(String, String)>,
}

/// Stylesheet declarations keyed by the element they apply to
pub type FlattenedStyles = HashMap<NodeId, ElementRules>;

/// Something that can flatten a document's stylesheets onto its elements
pub trait Inliner {
    fn flatten(&self, html: &Html) -> Result<FlattenedStyles>;
}

/// Flattens `<style>` blocks and local `<link rel="stylesheet">` files
#[derive(Debug, Clone)]
pub struct StylesheetInliner {
    static_path: PathBuf,
    media_rules: BTreeSet<String>,
}

/// A parsed style rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssRule {
    pub selectors: String,
    pub declarations: String,
}

impl StylesheetInliner {
    pub fn new(static_path: impl Into<PathBuf>, media_rules: BTreeSet<String>) -> Self {
        Self {
            static_path: static_path.into(),
            media_rules,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.static_path.clone(), config.media_rules.clone())
    }

    /// Collect stylesheet text in document order
    fn stylesheet_sources(&self, html: &Html) -> Result<Vec<String>> {
        let selector = compile("style, link")?;
        let mut sources = Vec::new();

        for element in html.select(&selector) {
            match element.value().name() {
                "style" => sources.push(element.text().collect::<String>()),
                "link" if is_stylesheet_link(element) => {
                    if let Some(href) = element.value().attr("href") {
                        if let Some(css) = self.load_external(href)? {
                            sources.push(css);
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(sources)
    }

    /// Load a linked stylesheet from the static path.
    ///
    /// Absolute hrefs are rooted at the static path, not the filesystem.
    fn load_external(&self, href: &str) -> Result<Option<String>> {
        let href = href.trim();
        let lower = href.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//") {
            warn!("Remote stylesheet {} is not fetched", href);
            return Ok(None);
        }
        if lower.starts_with("data:") {
            debug!("Skipping data URI stylesheet");
            return Ok(None);
        }

        let local = href.split(['?', '#']).next().unwrap_or(href);
        let path = self.static_path.join(local.trim_start_matches('/'));
        if !path.is_file() {
            return Err(ZooError::UnresolvableExternalStylesheet {
                href: href.to_string(),
                path,
            });
        }

        debug!("Loading stylesheet {}", path.display());
        Ok(Some(std::fs::read_to_string(&path)?))
    }
}

impl Inliner for StylesheetInliner {
    fn flatten(&self, html: &Html) -> Result<FlattenedStyles> {
        let mut flattened = FlattenedStyles::new();

        for css in self.stylesheet_sources(html)? {
            for rule in parse_stylesheet(&css, &self.media_rules) {
                apply_rule(html, &rule, &mut flattened);
            }
        }

        Ok(flattened)
    }
}

fn is_stylesheet_link(element: ElementRef<'_>) -> bool {
    element
        .value()
        .attr("rel")
        .map(|rel| {
            rel.split_whitespace()
                .any(|token| token.eq_ignore_ascii_case("stylesheet"))
        })
        .unwrap_or(false)
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|err| ZooError::Selector {
        selector: selector.to_string(),
        reason: err.to_string(),
    })
}

fn comment_regex() -> &'static Regex {
    static COMMENTS: OnceLock<Regex> = OnceLock::new();
    COMMENTS.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"))
}

/// Parse stylesheet text into style rules.
///
/// `@media` blocks contribute their rules only when the media text contains
/// one of `media_rules`; other at-rules are dropped.
pub fn parse_stylesheet(css: &str, media_rules: &BTreeSet<String>) -> Vec<CssRule> {
    let css = comment_regex().replace_all(css, "");
    let mut rules = Vec::new();
    collect_rules(&css, media_rules, &mut rules);
    rules
}

fn collect_rules(css: &str, media_rules: &BTreeSet<String>, rules: &mut Vec<CssRule>) {
    let mut rest = css;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        let open = rest.find('{');

        // Statement at-rules such as @import and @charset
        if rest.starts_with('@') {
            if let Some(semi) = rest.find(';') {
                if open.map(|o| semi < o).unwrap_or(true) {
                    rest = &rest[semi + 1..];
                    continue;
                }
            }
        }

        let Some(open) = open else {
            break;
        };
        let close = matching_brace(rest, open).unwrap_or(rest.len());
        let prelude = rest[..open].trim();
        let body = &rest[open + 1..close];

        if let Some(at_rule) = prelude.strip_prefix('@') {
            let lower = at_rule.to_lowercase();
            if let Some(media) = lower.strip_prefix("media") {
                if media_rules
                    .iter()
                    .any(|rule| media.contains(rule.to_lowercase().as_str()))
                {
                    collect_rules(body, media_rules, rules);
                } else {
                    debug!("Ignoring @media{} block", media);
                }
            }
        } else if !prelude.is_empty() {
            rules.push(CssRule {
                selectors: prelude.to_string(),
                declarations: body.trim().to_string(),
            });
        }

        rest = rest.get(close + 1..).unwrap_or("");
    }
}

/// Index of the brace closing the one at `open`
fn matching_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in text[open..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split a trailing dynamic pseudo-class off a selector, e.g.
/// `a.nav:focus` becomes `("a.nav", Some("focus"))`
fn split_dynamic_pseudo(selector: &str) -> (String, Option<String>) {
    if let Some(idx) = selector.rfind(':') {
        let pseudo = selector[idx + 1..].to_lowercase();
        if DYNAMIC_PSEUDO_CLASSES.contains(&pseudo.as_str()) {
            let base = selector[..idx].trim_end();
            let base = if base.is_empty() || base.ends_with(['>', '+', '~']) {
                format!("{} *", base).trim().to_string()
            } else {
                base.to_string()
            };
            return (base, Some(pseudo));
        }
    }
    (selector.to_string(), None)
}

fn mentions_unmatchable_pseudo(selector: &str) -> bool {
    if selector.contains("::") {
        return true;
    }
    selector.split(':').skip(1).any(|part| {
        let name: String = part
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect::<String>()
            .to_lowercase();
        DYNAMIC_PSEUDO_CLASSES.contains(&name.as_str())
            || LEGACY_PSEUDO_ELEMENTS.contains(&name.as_str())
    })
}

fn apply_rule(html: &Html, rule: &CssRule, flattened: &mut FlattenedStyles) {
    if rule.declarations.is_empty() {
        return;
    }

    for raw in rule.selectors.split(',') {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        let (base, pseudo) = split_dynamic_pseudo(raw);
        if mentions_unmatchable_pseudo(&base) {
            debug!("Skipping selector {:?} with a pseudo that can't be matched", raw);
            continue;
        }

        let selector = match compile(&base) {
            Ok(selector) => selector,
            Err(err) => {
                debug!("{}, skipping rule", err);
                continue;
            }
        };

        for element in html.select(&selector) {
            let entry = flattened.entry(element.id()).or_default();
            match &pseudo {
                Some(pseudo) => entry
                    .pseudo_blocks
                    .push((pseudo.clone(), rule.declarations.clone())),
                None => entry.blocks.push(rule.declarations.clone()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn media(rules: &[&str]) -> BTreeSet<String> {
        rules.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_parse_simple_rules() {
        let rules = parse_stylesheet(
            "/* heading */ h1 { color: red; }\n.note, p { font-size: 12pt }",
            &media(&[]),
        );
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].selectors, "h1");
        assert_eq!(rules[0].declarations, "color: red;");
        assert_eq!(rules[1].selectors, ".note, p");
    }

    #[test]
    fn test_media_rules_follow_allow_list() {
        let css = "@charset \"utf-8\";\n@media print { p { color: black } }\n@media screen and (min-width: 10px) { p { color: gray } }";
        assert!(parse_stylesheet(css, &media(&[])).is_empty());

        let screen = parse_stylesheet(css, &media(&["screen"]));
        assert_eq!(screen.len(), 1);
        assert_eq!(screen[0].declarations, "color: gray");
    }

    #[test]
    fn test_media_rules_ignore_case() {
        let css = "@MEDIA Print { p { color: black } }";
        let rules = parse_stylesheet(css, &media(&["Print"]));
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].declarations, "color: black");
        assert_eq!(parse_stylesheet("@media print { p { color: black } }", &media(&["PRINT"])).len(), 1);
    }

    #[test]
    fn test_other_at_rules_are_ignored() {
        let css = "@font-face { font-family: x; src: url(x.woff) }\n@keyframes spin { from { top: 0 } to { top: 1px } }\nb { font-weight: bold }";
        let rules = parse_stylesheet(css, &media(&["screen"]));
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].selectors, "b");
    }

    #[test]
    fn test_flatten_style_blocks() {
        let html = Html::parse_document(
            "<html><head><style>p { color: red } .x { color: blue }</style></head>\
             <body><p class=\"x\">a</p><p>b</p></body></html>",
        );
        let flattened = StylesheetInliner::new(".", media(&[])).flatten(&html).unwrap();
        let p = compile("p").unwrap();
        let paragraphs: Vec<_> = html.select(&p).collect();

        let first = &flattened[&paragraphs[0].id()];
        assert_eq!(first.blocks, vec!["color: red".to_string(), "color: blue".to_string()]);
        let second = &flattened[&paragraphs[1].id()];
        assert_eq!(second.blocks, vec!["color: red".to_string()]);
    }

    #[test]
    fn test_dynamic_pseudo_classes_are_kept_aside() {
        let html = Html::parse_document(
            "<html><head><style>a:focus { outline: none } a { color: navy }\
             p::before { content: 'x' } :hover { color: red }</style></head>\
             <body><a href=\"#\">link</a><p>t</p></body></html>",
        );
        let flattened = StylesheetInliner::new(".", media(&[])).flatten(&html).unwrap();
        let a = html.select(&compile("a").unwrap()).next().unwrap();
        let rules = &flattened[&a.id()];
        assert_eq!(rules.blocks, vec!["color: navy".to_string()]);
        assert!(rules
            .pseudo_blocks
            .contains(&("focus".to_string(), "outline: none".to_string())));
        assert!(rules
            .pseudo_blocks
            .contains(&("hover".to_string(), "color: red".to_string())));

        let p = html.select(&compile("p").unwrap()).next().unwrap();
        assert!(flattened.get(&p.id()).map(|r| r.blocks.is_empty()).unwrap_or(true));
    }

    #[test]
    fn test_linked_stylesheet_resolves_against_static_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("css")).unwrap();
        let mut file = std::fs::File::create(dir.path().join("css/site.css")).unwrap();
        writeln!(file, "em {{ color: #777 }}").unwrap();

        let html = Html::parse_document(
            "<html><head><link rel=\"stylesheet\" href=\"/css/site.css?v=2\"></head>\
             <body><em>x</em></body></html>",
        );
        let flattened = StylesheetInliner::new(dir.path(), media(&[]))
            .flatten(&html)
            .unwrap();
        let em = html.select(&compile("em").unwrap()).next().unwrap();
        assert_eq!(flattened[&em.id()].blocks, vec!["color: #777".to_string()]);
    }

    #[test]
    fn test_missing_stylesheet_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let html = Html::parse_document(
            "<html><head><link rel=\"Stylesheet\" href=\"missing.css\"></head><body></body></html>",
        );
        let err = StylesheetInliner::new(dir.path(), media(&[]))
            .flatten(&html)
            .unwrap_err();
        assert!(matches!(err, ZooError::UnresolvableExternalStylesheet { .. }));
    }

    #[test]
    fn test_remote_stylesheets_are_skipped() {
        let html = Html::parse_document(
            "<html><head><link rel=\"stylesheet\" href=\"https://cdn.example.com/a.css\"></head><body></body></html>",
        );
        let flattened = StylesheetInliner::new(".", media(&[])).flatten(&html).unwrap();
        assert!(flattened.is_empty());
    }
}
