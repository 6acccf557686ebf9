//! RSS feeds and XML sitemaps, assembled as strings like the HTML views.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::AppState;
use crate::constants::{
    RSS_ALBUM_ITEMS, RSS_CATEGORY_ALBUM_ITEMS, RSS_CATEGORY_VIDEO_ITEMS, RSS_VIDEO_ITEMS,
    VIDEO_SITEMAP_LIMIT, VIDEO_SITEMAP_MAX_TAGS,
};
use crate::domain::{cosplays, videos};
use crate::models::{CosplayAlbum, Video};
use crate::services::error::LogErr;

fn xml_response(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/xml")], body).into_response()
}

fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Wrap text in a CDATA section, splitting any `]]>` the text itself carries.
fn cdata(input: &str) -> String {
    format!("<![CDATA[{}]]>", input.replace("]]>", "]]]]><![CDATA[>"))
}

/// Thumbnails may be stored absolute (mirrored) or site-relative (legacy);
/// feeds always need an absolute URL, with a stock poster when there is none.
fn feed_thumb(site_url: &str, media_base: &str, raw: &str) -> String {
    if raw.is_empty() {
        format!("{}/default-poster.jpg", media_base)
    } else if raw.starts_with("http") {
        raw.to_string()
    } else {
        format!("{}/{}", site_url, raw.trim_start_matches('/'))
    }
}

/// One entry of a merged video + album feed
struct FeedItem {
    title: String,
    url: String,
    thumb: String,
    summary: String,
    type_label: &'static str,
    created_at: DateTime<Utc>,
}

impl FeedItem {
    fn from_video(video: Video, site_url: &str, media_base: &str) -> Self {
        FeedItem {
            url: format!("{}/video/{}", site_url, video.slug),
            thumb: feed_thumb(site_url, media_base, &video.thumbnail),
            summary: format!("Watch {}", video.title),
            type_label: "Video",
            title: video.title,
            created_at: video.created_at,
        }
    }

    fn from_album(album: CosplayAlbum, site_url: &str, media_base: &str) -> Self {
        let first = album.gallery.first().map(String::as_str).unwrap_or("");
        FeedItem {
            url: format!("{}/cosplay/{}", site_url, album.slug),
            thumb: feed_thumb(site_url, media_base, first),
            summary: format!("Cosplay photo collection {}", album.title),
            type_label: "Cosplay Album",
            title: album.title,
            created_at: album.created_at,
        }
    }
}

fn merge_by_recency(mut items: Vec<FeedItem>) -> Vec<FeedItem> {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items
}

/// GET /rss - newest videos and albums in one channel
pub async fn rss(State(state): State<Arc<AppState>>) -> Result<Response, StatusCode> {
    let site_url = &state.config.site_url;
    let media_base = &state.config.media_public_url;

    let videos = videos::latest(&state.db, RSS_VIDEO_ITEMS)
        .await
        .log_500("rss video query")?;
    let albums = cosplays::latest_filtered(&state.db, None, None, RSS_ALBUM_ITEMS)
        .await
        .log_500("rss album query")?;

    let items = merge_by_recency(
        videos
            .into_iter()
            .map(|v| FeedItem::from_video(v, site_url, media_base))
            .chain(
                albums
                    .into_iter()
                    .map(|a| FeedItem::from_album(a, site_url, media_base)),
            )
            .collect(),
    );

    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <rss version=\"2.0\" xmlns:atom=\"http://www.w3.org/2005/Atom\" \
         xmlns:media=\"http://search.yahoo.com/mrss/\">\n<channel>\n\
         <title>{name} - Latest Updates</title>\n\
         <link>{site}</link>\n\
         <description>New videos and cosplay galleries on {name}</description>\n\
         <language>en</language>\n\
         <lastBuildDate>{build}</lastBuildDate>\n\
         <atom:link href=\"{site}/rss\" rel=\"self\" type=\"application/rss+xml\" />\n",
        name = xml_escape(&state.config.site_name),
        site = xml_escape(site_url),
        build = Utc::now().to_rfc2822(),
    );

    for item in items {
        xml.push_str(&format!(
            "<item>\n\
             <title>{title}</title>\n\
             <link>{url}</link>\n\
             <guid isPermaLink=\"true\">{url}</guid>\n\
             <description><![CDATA[<img src=\"{thumb}\" width=\"320\" style=\"object-fit:cover;\" /><br/>\
             <p>{summary}</p><p><strong>Type:</strong> {label}</p>]]></description>\n\
             <media:content url=\"{thumb}\" medium=\"image\">\
             <media:title type=\"plain\">{title}</media:title></media:content>\n\
             <pubDate>{date}</pubDate>\n\
             </item>\n",
            title = cdata(&item.title),
            url = xml_escape(&item.url),
            thumb = xml_escape(&item.thumb),
            summary = xml_escape(&item.summary),
            label = item.type_label,
            date = item.created_at.to_rfc2822(),
        ));
    }

    xml.push_str("</channel>\n</rss>\n");
    Ok(xml_response(xml))
}

/// GET /rss/category/{slug} - category-filtered feed, no media extensions
pub async fn rss_category(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Response, StatusCode> {
    let site_url = &state.config.site_url;
    let media_base = &state.config.media_public_url;
    let keyword = slug.replace('-', " ");

    let videos = videos::latest_in_category(&state.db, &keyword, RSS_CATEGORY_VIDEO_ITEMS)
        .await
        .log_500("category rss video query")?;
    let albums = cosplays::latest_filtered(&state.db, None, Some(&keyword), RSS_CATEGORY_ALBUM_ITEMS)
        .await
        .log_500("category rss album query")?;

    let items = merge_by_recency(
        videos
            .into_iter()
            .map(|v| FeedItem::from_video(v, site_url, media_base))
            .chain(
                albums
                    .into_iter()
                    .map(|a| FeedItem::from_album(a, site_url, media_base)),
            )
            .collect(),
    );

    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <rss version=\"2.0\" xmlns:atom=\"http://www.w3.org/2005/Atom\">\n<channel>\n\
         <title>Category: {slug}</title>\n\
         <link>{site}</link>\n\
         <description>Category feed for {slug}</description>\n\
         <language>en</language>\n\
         <atom:link href=\"{site}/rss/category/{slug}\" rel=\"self\" type=\"application/rss+xml\" />\n",
        slug = xml_escape(&slug),
        site = xml_escape(site_url),
    );

    for item in items {
        xml.push_str(&format!(
            "<item>\n\
             <title>{title}</title>\n\
             <link>{url}</link>\n\
             <guid>{url}</guid>\n\
             <description><![CDATA[<img src=\"{thumb}\" width=\"320\" /><br/>{text} ({label})]]></description>\n\
             <pubDate>{date}</pubDate>\n\
             </item>\n",
            title = cdata(&item.title),
            url = xml_escape(&item.url),
            thumb = xml_escape(&item.thumb),
            text = xml_escape(&item.title),
            label = if item.type_label == "Video" { "Video" } else { "Cosplay" },
            date = item.created_at.to_rfc2822(),
        ));
    }

    xml.push_str("</channel>\n</rss>\n");
    Ok(xml_response(xml))
}

/// GET /sitemap.xml - every page URL with image hints plus unique tag pages
pub async fn sitemap(State(state): State<Arc<AppState>>) -> Result<Response, StatusCode> {
    let site_url = &state.config.site_url;
    let media_base = &state.config.media_public_url;

    let videos = videos::for_sitemap(&state.db)
        .await
        .log_500("sitemap video query")?;
    let albums = cosplays::for_sitemap(&state.db)
        .await
        .log_500("sitemap album query")?;

    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" \
         xmlns:image=\"http://www.google.com/schemas/sitemap-image/1.1\">\n\
         <url><loc>{site}/</loc><changefreq>daily</changefreq><priority>1.0</priority></url>\n\
         <url><loc>{site}/cosplay</loc><changefreq>daily</changefreq><priority>0.9</priority></url>\n",
        site = xml_escape(site_url),
    );

    let mut unique_tags = BTreeSet::new();

    for video in &videos {
        for tag in &video.tags {
            unique_tags.insert(tag.to_lowercase().trim().replace(' ', "-"));
        }
        let thumb = feed_thumb(site_url, media_base, &video.thumbnail);
        xml.push_str(&format!(
            "<url>\n<loc>{site}/video/{slug}</loc>\n\
             <lastmod>{date}</lastmod>\n\
             <changefreq>weekly</changefreq>\n<priority>0.8</priority>\n\
             <image:image><image:loc>{thumb}</image:loc><image:title>{title}</image:title></image:image>\n\
             </url>\n",
            site = xml_escape(site_url),
            slug = xml_escape(&video.slug),
            date = video.created_at.format("%Y-%m-%d"),
            thumb = xml_escape(&thumb),
            title = cdata(&video.title),
        ));
    }

    for album in &albums {
        for tag in &album.tags {
            unique_tags.insert(tag.to_lowercase().trim().replace(' ', "-"));
        }
        let thumb = album
            .gallery
            .first()
            .cloned()
            .unwrap_or_else(|| format!("{}/default-cosplay.jpg", media_base));
        xml.push_str(&format!(
            "<url>\n<loc>{site}/cosplay/{slug}</loc>\n\
             <lastmod>{date}</lastmod>\n\
             <changefreq>weekly</changefreq>\n<priority>0.8</priority>\n\
             <image:image><image:loc>{thumb}</image:loc><image:title>{title}</image:title></image:image>\n\
             </url>\n",
            site = xml_escape(site_url),
            slug = xml_escape(&album.slug),
            date = album.created_at.format("%Y-%m-%d"),
            thumb = xml_escape(&thumb),
            title = cdata(&album.title),
        ));
    }

    for tag_slug in unique_tags {
        if tag_slug.is_empty() {
            continue;
        }
        xml.push_str(&format!(
            "<url><loc>{}/tag/{}</loc><changefreq>weekly</changefreq><priority>0.6</priority></url>\n",
            xml_escape(site_url),
            xml_escape(&tag_slug)
        ));
    }

    xml.push_str("</urlset>\n");
    Ok(xml_response(xml))
}

/// GET /sitemap-video.xml - Google video sitemap for the newest 1000 videos
pub async fn sitemap_video(State(state): State<Arc<AppState>>) -> Result<Response, StatusCode> {
    let site_url = &state.config.site_url;
    let media_base = &state.config.media_public_url;

    let videos = videos::for_video_sitemap(&state.db, VIDEO_SITEMAP_LIMIT)
        .await
        .log_500("video sitemap query")?;

    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" \
         xmlns:video=\"http://www.google.com/schemas/sitemap-video/1.1\">\n\
         <url><loc>{site}/</loc><priority>1.0</priority></url>\n",
        site = xml_escape(site_url),
    );

    for video in &videos {
        let thumb = feed_thumb(site_url, media_base, &video.thumbnail);
        let player = if video.embed_url.starts_with("//") {
            format!("https:{}", video.embed_url)
        } else {
            video.embed_url.clone()
        };
        let description: String = video.description.chars().take(2000).collect();

        let mut tags = String::new();
        for tag in video.tags.iter().take(VIDEO_SITEMAP_MAX_TAGS) {
            tags.push_str(&format!("<video:tag>{}</video:tag>", cdata(tag)));
        }

        xml.push_str(&format!(
            "<url><loc>{site}/video/{slug}</loc><video:video>\n\
             <video:thumbnail_loc>{thumb}</video:thumbnail_loc>\n\
             <video:title>{title}</video:title>\n\
             <video:description>{description}</video:description>\n\
             <video:player_loc allow_embed=\"yes\" autoplay=\"ap=1\">{player}</video:player_loc>\n\
             <video:duration>{duration}</video:duration>\n\
             <video:publication_date>{published}</video:publication_date>\n\
             {tags}\n\
             </video:video></url>\n",
            site = xml_escape(site_url),
            slug = xml_escape(&video.slug),
            thumb = xml_escape(&thumb),
            title = cdata(&video.title),
            description = cdata(&description),
            player = xml_escape(&player),
            duration = video.duration_sec,
            published = video.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        ));
    }

    xml.push_str("</urlset>\n");
    Ok(xml_response(xml))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cdata_splits_terminators() {
        assert_eq!(cdata("plain"), "<![CDATA[plain]]>");
        assert_eq!(
            cdata("bad ]]> payload"),
            "<![CDATA[bad ]]]]><![CDATA[> payload]]>"
        );
    }

    #[test]
    fn xml_escape_covers_attribute_characters() {
        assert_eq!(
            xml_escape(r#"a&b<c>"d'"#),
            "a&amp;b&lt;c&gt;&quot;d&apos;"
        );
    }

    #[test]
    fn feed_thumbs_fall_back_to_stock_poster() {
        let site = "https://vitrine.example";
        let media = "https://vitrine.example/media";
        assert_eq!(
            feed_thumb(site, media, ""),
            "https://vitrine.example/media/default-poster.jpg"
        );
        assert_eq!(
            feed_thumb(site, media, "https://cdn.vitrine.example/t/a.jpg"),
            "https://cdn.vitrine.example/t/a.jpg"
        );
        assert_eq!(
            feed_thumb(site, media, "/uploads/thumbs/a.jpg"),
            "https://vitrine.example/uploads/thumbs/a.jpg"
        );
    }

    #[test]
    fn merged_feeds_sort_newest_first() {
        let older = FeedItem {
            title: "older".to_string(),
            url: String::new(),
            thumb: String::new(),
            summary: String::new(),
            type_label: "Video",
            created_at: Utc::now() - chrono::Duration::hours(2),
        };
        let newer = FeedItem {
            title: "newer".to_string(),
            url: String::new(),
            thumb: String::new(),
            summary: String::new(),
            type_label: "Cosplay Album",
            created_at: Utc::now(),
        };
        let merged = merge_by_recency(vec![older, newer]);
        assert_eq!(merged[0].title, "newer");
        assert_eq!(merged[1].title, "older");
    }
}
