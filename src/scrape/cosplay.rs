//! Cosplay album page extraction.
//!
//! Album pages are WordPress-flavored: the interesting fields live in labeled
//! `blockquote` paragraphs, download buttons, and a `.gallery-item` grid.
//! Gallery images are rewritten onto our CDN at extraction time so the stored
//! record never references the origin host.

use scraper::{Html, Selector};

use super::ScrapeError;
use super::slug::unicode_slug;
use crate::models::DownloadLinks;

/// A normalized album record as extracted from a source page.
#[derive(Debug, Clone, PartialEq)]
pub struct CosplayDraft {
    pub title: String,
    pub slug: String,
    pub cosplayer: String,
    pub character_name: String,
    pub source_work: String,
    pub downloads: DownloadLinks,
    /// CDN-rewritten image URLs, document order, exact duplicates skipped
    pub gallery: Vec<String>,
    pub description: String,
    pub archive_password: String,
    pub video_embed: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

pub fn extract_cosplay(html: &str, cdn_base: &str) -> Result<CosplayDraft, ScrapeError> {
    let doc = Html::parse_document(html);

    if super::is_challenge_page(&doc) {
        return Err(ScrapeError::Blocked);
    }

    let title = first_text(&doc, "h1.entry-title")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(ScrapeError::MissingTitle)?;
    let slug = unicode_slug(&title);

    let mut cosplayer = String::new();
    let mut character_name = String::new();
    let mut source_work = String::new();
    let mut archive_password = String::new();
    if let (Ok(para_sel), Ok(a_sel), Ok(input_sel)) = (
        Selector::parse("blockquote p"),
        Selector::parse("a"),
        Selector::parse("input"),
    ) {
        for para in doc.select(&para_sel) {
            let text = para.text().collect::<String>();
            let linked = || {
                para.select(&a_sel)
                    .next()
                    .map(|a| a.text().collect::<String>().trim().to_string())
                    .unwrap_or_default()
            };
            if text.contains("Cosplayer:") {
                cosplayer = linked();
            }
            if text.contains("Character:") {
                character_name = linked();
            }
            if text.contains("Appear In:") {
                source_work = linked();
            }
            if text.contains("Unzip Password:") {
                archive_password = para
                    .select(&input_sel)
                    .next()
                    .and_then(|i| i.value().attr("value"))
                    .unwrap_or_default()
                    .to_string();
            }
        }
    }

    // First button wins per provider, later ones for the same provider are
    // ignored.
    let mut downloads = DownloadLinks::default();
    if let Ok(button_sel) = Selector::parse(".button.alert") {
        for button in doc.select(&button_sel) {
            let Some(href) = button.value().attr("href") else {
                continue;
            };
            let label = button.text().collect::<String>().to_lowercase();
            let slot = if label.contains("mediafire") {
                &mut downloads.mediafire
            } else if label.contains("telegram") {
                &mut downloads.telegram
            } else if label.contains("sorafolder") {
                &mut downloads.sorafolder
            } else if label.contains("gofile") {
                &mut downloads.gofile
            } else {
                continue;
            };
            if slot.is_none() {
                *slot = Some(href.to_string());
            }
        }
    }

    let mut gallery: Vec<String> = Vec::new();
    if let Ok(item_sel) = Selector::parse(".gallery-item a") {
        for anchor in doc.select(&item_sel) {
            if let Some(href) = anchor.value().attr("href") {
                let cdn_url = rewrite_to_cdn(href, cdn_base);
                if !gallery.contains(&cdn_url) {
                    gallery.push(cdn_url);
                }
            }
        }
    }

    let mut video_embed = String::new();
    if let Ok(iframe_sel) = Selector::parse("iframe") {
        for iframe in doc.select(&iframe_sel) {
            if let Some(src) = iframe.value().attr("src") {
                if src.contains("embed") || src.contains("player") || src.contains("cossora") {
                    video_embed = src.to_string();
                    break;
                }
            }
        }
    }

    let description = format!(
        "Cosplay {} by {} from {}. Full gallery and download links available.",
        character_name, cosplayer, source_work
    );

    Ok(CosplayDraft {
        title,
        slug,
        cosplayer,
        character_name,
        source_work,
        downloads,
        gallery,
        description,
        archive_password,
        video_embed,
        tags: dedup_texts(&doc, ".entry-meta a[rel=\"tag\"]"),
        categories: dedup_texts(&doc, ".entry-category a"),
    })
}

/// Move an image onto the CDN: the `http(s)://` prefix is stripped and the
/// remainder, origin host included, becomes the path under `cdn_base`.
pub fn rewrite_to_cdn(src: &str, cdn_base: &str) -> String {
    let stripped = src
        .strip_prefix("https://")
        .or_else(|| src.strip_prefix("http://"))
        .unwrap_or(src);
    format!("{}/{}", cdn_base.trim_end_matches('/'), stripped)
}

fn first_text(doc: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    doc.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

/// Trimmed anchor texts with duplicates removed, first occurrence wins.
fn dedup_texts(doc: &Html, selector: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };
    let mut seen = std::collections::HashSet::new();
    doc.select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}
