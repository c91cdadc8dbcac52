use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::crawlers::first_text;

/// Paragraphs that contribute to the search text.
const LEADING_PARAGRAPHS: usize = 5;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Summary fields of a page used for topical scoring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocBasics {
    pub title: String,
    pub h1: String,
    pub meta_desc: String,
    /// Title, top heading, description, `h2`/`h3` text and leading paragraphs,
    /// whitespace-collapsed.
    pub text: String,
}

fn joined_text<'a>(elements: impl Iterator<Item = scraper::ElementRef<'a>>) -> String {
    elements
        .map(|el| el.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn extract_doc_basics(html: &str) -> DocBasics {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let title = first_text(root, "title");
    let h1 = first_text(root, "h1");

    let meta_selector = Selector::parse(r#"meta[name="description"]"#).unwrap();
    let meta_desc = root
        .select(&meta_selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .unwrap_or_default()
        .to_string();

    let heading_selector = Selector::parse("h2, h3").unwrap();
    let headings = joined_text(root.select(&heading_selector));

    let paragraph_selector = Selector::parse("p").unwrap();
    let first_paragraphs = joined_text(root.select(&paragraph_selector).take(LEADING_PARAGRAPHS));

    let combined = [
        title.as_str(),
        h1.as_str(),
        meta_desc.as_str(),
        headings.as_str(),
        first_paragraphs.as_str(),
    ]
    .join(" ");
    let text = WHITESPACE.replace_all(&combined, " ").trim().to_string();

    DocBasics {
        title,
        h1,
        meta_desc,
        text,
    }
}
