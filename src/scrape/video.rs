//! Video page extraction.
//!
//! The video source publishes schema.org microdata, so every field comes out
//! of `meta[itemprop]` tags with the document `<title>` as the only fallback.
//! Extraction is pure: markup in, draft record or error out, no I/O.

use scraper::{Html, Selector};

use super::ScrapeError;
use super::slug::ascii_slug;

/// A normalized video record as extracted from a source page, before the
/// thumbnail has been mirrored and the row written.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoDraft {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub embed_url: String,
    /// Remote thumbnail URL as published by the source, None when absent
    pub thumbnail_url: Option<String>,
    /// Raw ISO-8601 duration, kept verbatim for schema markup
    pub duration: String,
    pub duration_sec: i32,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

pub fn extract_video(html: &str) -> Result<VideoDraft, ScrapeError> {
    let doc = Html::parse_document(html);

    if super::is_challenge_page(&doc) {
        return Err(ScrapeError::Blocked);
    }

    let title = meta_itemprop(&doc, "name")
        .or_else(|| page_title(&doc))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(ScrapeError::MissingTitle)?;

    let duration = meta_itemprop(&doc, "duration").unwrap_or_else(|| "PT0S".to_string());
    let duration_sec = iso8601_to_seconds(&duration);

    Ok(VideoDraft {
        slug: ascii_slug(&title),
        description: meta_itemprop(&doc, "description").unwrap_or_default(),
        embed_url: meta_itemprop(&doc, "embedURL").unwrap_or_default(),
        thumbnail_url: meta_itemprop(&doc, "thumbnailUrl"),
        duration,
        duration_sec,
        tags: anchor_texts(&doc, "a[href*=\"/tag/\"]"),
        categories: anchor_texts(&doc, "a[href*=\"/category/\"]"),
        title,
    })
}

/// Convert an ISO-8601 duration of the `PT#H#M#S` family to seconds.
/// Every component is optional; anything malformed yields 0, never an error.
pub fn iso8601_to_seconds(raw: &str) -> i32 {
    let Some(body) = raw.trim().strip_prefix("PT") else {
        return 0;
    };

    let mut total: i64 = 0;
    let mut digits = String::new();
    for ch in body.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let Ok(value) = digits.parse::<i64>() else {
            return 0;
        };
        digits.clear();
        let unit: i64 = match ch {
            'H' => 3600,
            'M' => 60,
            'S' => 1,
            _ => return 0,
        };
        total += value * unit;
    }
    if !digits.is_empty() {
        // trailing digits without a unit marker
        return 0;
    }

    total.clamp(0, i32::MAX as i64) as i32
}

fn meta_itemprop(doc: &Html, prop: &str) -> Option<String> {
    let selector = Selector::parse(&format!("meta[itemprop=\"{}\"]", prop)).ok()?;
    doc.select(&selector)
        .next()?
        .value()
        .attr("content")
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

fn page_title(doc: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    doc.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

/// Visible texts of anchors matching `selector`, in document order.
/// Duplicates are kept on purpose: the stored tag list mirrors the page.
fn anchor_texts(doc: &Html, selector: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };
    doc.select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head>
        <title>Fallback Title - Site</title>
        <meta itemprop="name" content="Sunset Timelapse 4K">
        <meta itemprop="description" content="A timelapse over the bay.">
        <meta itemprop="embedURL" content="//player.example/embed/abc123">
        <meta itemprop="thumbnailUrl" content="https://img.example/thumbs/abc123.jpg">
        <meta itemprop="duration" content="PT1H2M3S">
        </head><body>
        <a href="/tag/timelapse">Timelapse</a>
        <a href="/tag/nature">Nature</a>
        <a href="/tag/timelapse">Timelapse</a>
        <a href="/category/outdoors">Outdoors</a>
        <a href="/about">About</a>
        </body></html>"#;

    #[test]
    fn extracts_all_microdata_fields() {
        let draft = extract_video(PAGE).unwrap();
        assert_eq!(draft.title, "Sunset Timelapse 4K");
        assert_eq!(draft.slug, "sunset-timelapse-4k");
        assert_eq!(draft.description, "A timelapse over the bay.");
        assert_eq!(draft.embed_url, "//player.example/embed/abc123");
        assert_eq!(
            draft.thumbnail_url.as_deref(),
            Some("https://img.example/thumbs/abc123.jpg")
        );
        assert_eq!(draft.duration, "PT1H2M3S");
        assert_eq!(draft.duration_sec, 3723);
    }

    #[test]
    fn keeps_tag_order_and_duplicates() {
        let draft = extract_video(PAGE).unwrap();
        assert_eq!(draft.tags, vec!["Timelapse", "Nature", "Timelapse"]);
        assert_eq!(draft.categories, vec!["Outdoors"]);
    }

    #[test]
    fn falls_back_to_title_tag() {
        let html = "<html><head><title> Plain Page </title></head><body></body></html>";
        let draft = extract_video(html).unwrap();
        assert_eq!(draft.title, "Plain Page");
        assert_eq!(draft.duration, "PT0S");
        assert_eq!(draft.duration_sec, 0);
        assert!(draft.thumbnail_url.is_none());
    }

    #[test]
    fn missing_title_is_an_error() {
        let html = "<html><head></head><body><p>no title here</p></body></html>";
        assert!(matches!(extract_video(html), Err(ScrapeError::MissingTitle)));
    }

    #[test]
    fn challenge_page_short_circuits() {
        let html = r#"<html><head><title>Just a moment...</title>
            <meta itemprop="name" content="Should not matter"></head><body></body></html>"#;
        assert!(matches!(extract_video(html), Err(ScrapeError::Blocked)));
    }

    #[test]
    fn duration_parser_handles_each_component() {
        assert_eq!(iso8601_to_seconds("PT1H2M3S"), 3723);
        assert_eq!(iso8601_to_seconds("PT5M"), 300);
        assert_eq!(iso8601_to_seconds("PT90S"), 90);
        assert_eq!(iso8601_to_seconds("PT2H"), 7200);
        assert_eq!(iso8601_to_seconds("PT0S"), 0);
    }

    #[test]
    fn duration_parser_never_panics_on_garbage() {
        assert_eq!(iso8601_to_seconds(""), 0);
        assert_eq!(iso8601_to_seconds("PT"), 0);
        assert_eq!(iso8601_to_seconds("1:02:03"), 0);
        assert_eq!(iso8601_to_seconds("PTXS"), 0);
        assert_eq!(iso8601_to_seconds("PT12"), 0);
        assert_eq!(iso8601_to_seconds("P1DT2H"), 0);
    }
}
