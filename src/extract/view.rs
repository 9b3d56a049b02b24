//! Parsed snapshot of the results page.
//!
//! A [`PageView`] wraps one HTML snapshot. It is not `Send`, so callers parse,
//! read and drop it between suspension points.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::utils::clean;

static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("static selector"));
static BODY_ROWS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tbody tr").expect("static selector"));

/// Elements whose boundaries separate words in rendered text.
const BREAKING_ELEMENTS: &[&str] = &[
    "br", "p", "div", "li", "td", "th", "tr", "thead", "tbody", "table", "option",
];

/// Elements whose text is never rendered.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

pub struct PageView {
    html: Html,
}

impl PageView {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Innermost table whose text contains every marker.
    pub fn table_containing(&self, markers: &[&str]) -> Option<ElementRef<'_>> {
        let matching: Vec<ElementRef<'_>> = self
            .html
            .select(&TABLE)
            .filter(|table| {
                let text = inner_text(*table);
                markers.iter().all(|m| text.contains(m))
            })
            .collect();

        matching
            .iter()
            .copied()
            .find(|outer| {
                !matching
                    .iter()
                    .any(|inner| inner.ancestors().any(|a| a.id() == outer.id()))
            })
    }

    /// Rendered text of each element enclosing an occurrence of `marker`,
    /// innermost first, for every occurrence in document order.
    pub fn texts_around<'a>(&'a self, marker: &'a str) -> impl Iterator<Item = String> + 'a {
        let needle = marker.to_lowercase();
        self.html
            .root_element()
            .descendants()
            .filter(move |node| {
                node.value()
                    .as_text()
                    .is_some_and(|text| text.to_lowercase().contains(&needle))
            })
            .filter(|node| {
                node.parent()
                    .and_then(ElementRef::wrap)
                    .is_some_and(|parent| !HIDDEN_ELEMENTS.contains(&parent.value().name()))
            })
            .flat_map(|node| node.ancestors().filter_map(ElementRef::wrap).map(inner_text))
    }
}

/// Body rows of a table that carry at least one data cell.
pub(crate) fn data_rows<'a>(table: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    table.select(&BODY_ROWS).filter(|row| cells(*row).next().is_some())
}

/// Direct `td` children of a row.
pub(crate) fn cells<'a>(row: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "td")
}

/// Whitespace-normalized rendered text of an element.
///
/// Approximates the browser's `innerText`: block and cell boundaries become
/// spaces, script and style contents are skipped.
pub(crate) fn inner_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    clean(&out)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            let name = child.value().name();
            if HIDDEN_ELEMENTS.contains(&name) {
                continue;
            }
            let breaking = BREAKING_ELEMENTS.contains(&name);
            if breaking {
                out.push(' ');
            }
            collect_text(child, out);
            if breaking {
                out.push(' ');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_text_separates_cells() {
        let view = PageView::parse(
            "<table><tr><td>FARMACIA <b>CENTRALE</b></td><td>VIA<br>ROMA</td></tr></table>",
        );
        let table = view.table_containing(&["FARMACIA"]).unwrap();
        assert_eq!(inner_text(table), "FARMACIA CENTRALE VIA ROMA");
    }

    #[test]
    fn test_inner_text_skips_scripts() {
        let view = PageView::parse("<div>risultati<script>var x = 1;</script></div>");
        let texts: Vec<String> = view.texts_around("risultati").collect();
        assert_eq!(texts[0], "risultati");
    }

    #[test]
    fn test_table_containing_prefers_innermost() {
        let view = PageView::parse(
            r#"<table id="layout"><tr><td>
                 <table id="results"><tr><th>Denominazione</th><th>Indirizzo</th></tr></table>
               </td></tr></table>"#,
        );
        let table = view.table_containing(&["Denominazione", "Indirizzo"]).unwrap();
        assert_eq!(table.value().attr("id"), Some("results"));
    }

    #[test]
    fn test_texts_around_walks_outward() {
        let view = PageView::parse(
            "<div id='esito'><span>Risultati</span> <b>1</b> - <b>10</b> di <b>42</b></div>",
        );
        let texts: Vec<String> = view.texts_around("risultati").take(2).collect();
        assert_eq!(texts, vec!["Risultati", "Risultati 1 - 10 di 42"]);
    }
}
