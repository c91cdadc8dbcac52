use scraper::{ElementRef, Html, Selector};

use crate::ARTICLE_TEXT_LIMIT;
use crate::crawlers::first_text;
use crate::domain::article::Article;

/// Elements dropped before any text is read.
const BOILERPLATE: &str = "nav, footer, aside, script, style, noscript";

/// Article fields extracted from a single HTML document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedArticle {
    pub title: String,
    pub published: Option<String>,
    pub text: String,
}

impl CleanedArticle {
    pub fn into_article(self, url: &str) -> Article {
        Article {
            url: url.to_string(),
            title: self.title,
            published: self.published,
            text: self.text,
        }
    }
}

fn meta_content(root: ElementRef<'_>, css: &str) -> Option<String> {
    let selector = Selector::parse(css).unwrap();
    root.select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .filter(|content| !content.is_empty())
        .map(str::to_string)
}

/// Strips boilerplate from an article page and extracts its title, publish
/// time and paragraph text.
///
/// Parsing is best-effort: malformed HTML yields whatever fields could be
/// found. The text is capped at [`ARTICLE_TEXT_LIMIT`] characters.
pub fn clean_article(html: &str) -> CleanedArticle {
    let mut document = Html::parse_document(html);

    let boilerplate = Selector::parse(BOILERPLATE).unwrap();
    let removed: Vec<_> = document.select(&boilerplate).map(|el| el.id()).collect();
    for id in removed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    // Detached subtrees are only skipped when walking down from the root.
    let root = document.root_element();

    let mut title = first_text(root, "h1");
    if title.is_empty() {
        title = first_text(root, "title");
    }

    let paragraph_selector = Selector::parse("p").unwrap();
    let text = root
        .select(&paragraph_selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .chars()
        .take(ARTICLE_TEXT_LIMIT)
        .collect();

    let published = meta_content(root, r#"meta[property="article:published_time"]"#)
        .or_else(|| meta_content(root, r#"meta[name="date"]"#));

    CleanedArticle {
        title,
        published,
        text,
    }
}
