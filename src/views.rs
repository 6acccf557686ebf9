//! Server-rendered HTML for the public site and the admin pages.
//!
//! Markup is assembled into strings by hand. Every dynamic value passes
//! through [`escape_html`] before insertion; stored media URLs are used
//! as-is (absolute mirrored URLs, or legacy relative paths that resolve
//! through the `/uploads` redirect).

use chrono::{DateTime, Utc};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::json;

use crate::models::{CosplayAlbum, Video};

/// Per-page SEO fields consumed by [`layout`].
pub struct SeoMeta {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub image: String,
    pub no_index: bool,
}

/// Site-level values every renderer needs.
pub struct PageContext<'a> {
    pub site_name: &'a str,
    pub site_url: &'a str,
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// MM:SS under an hour, HH:MM:SS from an hour up. Non-positive input
/// renders as "00:00".
pub fn format_duration(total_secs: i32) -> String {
    if total_secs <= 0 {
        return "00:00".to_string();
    }
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if total_secs >= 3600 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Human heading for a tag or category slug: hyphens become spaces and
/// each word is capitalized.
pub fn display_name(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Suffix appended to titles past the first page.
pub fn page_label(page: i64) -> String {
    if page > 1 {
        format!(" - Page {}", page)
    } else {
        String::new()
    }
}

/// Pages store mirrored thumbnails as absolute URLs; legacy rows may hold
/// site-relative paths. og:image must always be absolute.
fn absolute_image(site_url: &str, path: &str) -> String {
    if path.is_empty() || path.starts_with("http") {
        path.to_string()
    } else {
        format!("{}/{}", site_url, path.trim_start_matches('/'))
    }
}

/// Embed URLs are stored protocol-relative where the source serves them
/// that way.
fn embed_src(embed_url: &str) -> String {
    if embed_url.starts_with("//") {
        format!("https:{}", embed_url)
    } else {
        embed_url.to_string()
    }
}

/// Article structured data for the detail pages. The section list carries
/// the record's categories so crawlers can classify the page.
fn detail_json_ld(
    ctx: &PageContext,
    seo: &SeoMeta,
    sections: &[String],
    published: DateTime<Utc>,
) -> String {
    let author_slug = utf8_percent_encode(ctx.site_name, NON_ALPHANUMERIC);
    let payload = json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": seo.title,
        "description": seo.description,
        "image": seo.image,
        "mainEntityOfPage": seo.canonical,
        "articleSection": sections,
        "datePublished": published.to_rfc3339(),
        "publisher": {
            "@type": "Organization",
            "name": ctx.site_name,
            "url": ctx.site_url,
        },
        "author": {
            "@type": "Person",
            "name": ctx.site_name,
            "url": format!("{}/author/{}/", ctx.site_url, author_slug),
        },
    });
    // JSON inside a script element: escape "<" so markup in a title can
    // never terminate the element early.
    let safe = payload.to_string().replace('<', "\\u003c");
    format!("<script type=\"application/ld+json\">{}</script>\n", safe)
}

const STYLE: &str = "\
body{margin:0;font-family:system-ui,sans-serif;background:#111;color:#eee}\
a{color:#7cb3ff;text-decoration:none}\
header,footer{padding:12px 16px;background:#1b1b1b}\
header form{display:inline-block;margin-left:16px}\
main{max-width:1100px;margin:0 auto;padding:16px}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(220px,1fr));gap:14px}\
.card{background:#1b1b1b;border-radius:6px;overflow:hidden}\
.card img{width:100%;aspect-ratio:16/9;object-fit:cover;display:block}\
.card .placeholder{width:100%;aspect-ratio:16/9;background:#2a2a2a}\
.card .body{padding:8px}\
.badge{background:#000a;padding:1px 5px;border-radius:3px;font-size:12px}\
.pager{margin:20px 0;text-align:center}\
.pager a,.pager span{margin:0 8px}\
.player iframe{width:100%;aspect-ratio:16/9;border:0}\
.gallery img{max-width:100%;margin-bottom:10px;display:block}\
.downloads a{display:inline-block;margin:4px 8px 4px 0;padding:6px 12px;background:#2d5a9e;border-radius:4px;color:#fff}\
.taglist a{display:inline-block;margin:2px 6px 2px 0}\
.error{color:#ff7b72}";

fn layout(ctx: &PageContext, seo: &SeoMeta, body: &str) -> String {
    let title = escape_html(&seo.title);
    let description = escape_html(&seo.description);
    let canonical = escape_html(&seo.canonical);
    let site_name = escape_html(ctx.site_name);

    let mut head = String::new();
    head.push_str(&format!("<title>{}</title>\n", title));
    head.push_str(&format!(
        "<meta name=\"description\" content=\"{}\">\n",
        description
    ));
    if seo.no_index {
        head.push_str("<meta name=\"robots\" content=\"noindex\">\n");
    }
    head.push_str(&format!("<link rel=\"canonical\" href=\"{}\">\n", canonical));
    head.push_str(&format!("<meta property=\"og:title\" content=\"{}\">\n", title));
    head.push_str(&format!(
        "<meta property=\"og:description\" content=\"{}\">\n",
        description
    ));
    head.push_str(&format!("<meta property=\"og:url\" content=\"{}\">\n", canonical));
    if !seo.image.is_empty() {
        head.push_str(&format!(
            "<meta property=\"og:image\" content=\"{}\">\n",
            escape_html(&seo.image)
        ));
    }
    head.push_str(&format!(
        "<link rel=\"alternate\" type=\"application/rss+xml\" title=\"{}\" href=\"/rss\">\n",
        site_name
    ));

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         {head}<style>{STYLE}</style>\n</head>\n<body>\n\
         <header><a href=\"/\"><strong>{site_name}</strong></a> \
         <a href=\"/cosplay\">Cosplay</a>\
         <form action=\"/search\" method=\"get\">\
         <input type=\"search\" name=\"q\" placeholder=\"Search\">\
         <button type=\"submit\">Go</button></form></header>\n\
         <main>\n{body}</main>\n\
         <footer><a href=\"/rss\">RSS</a> <a href=\"/sitemap.xml\">Sitemap</a> \
         &copy; {site_name}</footer>\n</body>\n</html>\n"
    )
}

fn video_card(video: &Video) -> String {
    let title = escape_html(&video.title);
    let thumb = if video.thumbnail.is_empty() {
        "<div class=\"placeholder\"></div>".to_string()
    } else {
        format!(
            "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
            escape_html(&video.thumbnail),
            title
        )
    };
    format!(
        "<div class=\"card\"><a href=\"/video/{slug}\">{thumb}\
         <div class=\"body\"><span class=\"badge\">{duration}</span> {title}\
         <br><small>{views} views</small></div></a></div>\n",
        slug = escape_html(&video.slug),
        duration = format_duration(video.duration_sec),
        views = video.views,
    )
}

fn album_card(album: &CosplayAlbum) -> String {
    let title = escape_html(&album.title);
    let thumb = match album.gallery.first() {
        Some(src) => format!(
            "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
            escape_html(src),
            title
        ),
        None => "<div class=\"placeholder\"></div>".to_string(),
    };
    format!(
        "<div class=\"card\"><a href=\"/cosplay/{slug}\">{thumb}\
         <div class=\"body\">{title}<br><small>{views} views</small></div></a></div>\n",
        slug = escape_html(&album.slug),
        views = album.views,
    )
}

fn video_grid(videos: &[Video]) -> String {
    let mut html = String::from("<div class=\"grid\">\n");
    for video in videos {
        html.push_str(&video_card(video));
    }
    html.push_str("</div>\n");
    html
}

fn album_grid(albums: &[CosplayAlbum]) -> String {
    let mut html = String::from("<div class=\"grid\">\n");
    for album in albums {
        html.push_str(&album_card(album));
    }
    html.push_str("</div>\n");
    html
}

fn pagination_nav(base_path: &str, page: i64, total_pages: i64) -> String {
    if total_pages <= 1 {
        return String::new();
    }
    let href = |p: i64| {
        if p <= 1 {
            base_path.to_string()
        } else {
            format!("{}?page={}", base_path, p)
        }
    };
    let mut html = String::from("<nav class=\"pager\">");
    if page > 1 {
        html.push_str(&format!("<a href=\"{}\">&laquo; Prev</a>", href(page - 1)));
    }
    html.push_str(&format!("<span>Page {} of {}</span>", page, total_pages));
    if page < total_pages {
        html.push_str(&format!("<a href=\"{}\">Next &raquo;</a>", href(page + 1)));
    }
    html.push_str("</nav>\n");
    html
}

fn tag_links(prefix: &str, names: &[String]) -> String {
    let mut html = String::from("<p class=\"taglist\">");
    for name in names {
        let slug = name.to_lowercase().trim().replace(' ', "-");
        html.push_str(&format!(
            "<a href=\"{}/{}\">{}</a>",
            prefix,
            escape_html(&slug),
            escape_html(name)
        ));
    }
    html.push_str("</p>\n");
    html
}

pub fn home(
    ctx: &PageContext,
    videos: &[Video],
    albums: &[CosplayAlbum],
    page: i64,
    total_pages: i64,
) -> String {
    let image = videos
        .first()
        .map(|v| absolute_image(ctx.site_url, &v.thumbnail))
        .unwrap_or_default();
    let seo = SeoMeta {
        title: format!("{}{}", ctx.site_name, page_label(page)),
        description: format!("Latest videos and cosplay galleries on {}", ctx.site_name),
        canonical: if page > 1 {
            format!("{}/?page={}", ctx.site_url, page)
        } else {
            format!("{}/", ctx.site_url)
        },
        image,
        no_index: false,
    };

    let mut body = String::new();
    if !albums.is_empty() {
        body.push_str("<h2>New Cosplay</h2>\n");
        body.push_str(&album_grid(albums));
    }
    body.push_str("<h2>Latest Videos</h2>\n");
    body.push_str(&video_grid(videos));
    body.push_str(&pagination_nav("/", page, total_pages));

    layout(ctx, &seo, &body)
}

pub fn video_detail(ctx: &PageContext, video: &Video, related: &[Video]) -> String {
    let seo = SeoMeta {
        title: format!("{} - {}", video.title, ctx.site_name),
        description: video.description.clone(),
        canonical: format!("{}/video/{}", ctx.site_url, video.slug),
        image: absolute_image(ctx.site_url, &video.thumbnail),
        no_index: false,
    };

    let mut body = String::new();
    body.push_str(&detail_json_ld(ctx, &seo, &video.categories, video.created_at));
    body.push_str(&format!("<h1>{}</h1>\n", escape_html(&video.title)));
    if !video.embed_url.is_empty() {
        body.push_str(&format!(
            "<div class=\"player\"><iframe src=\"{}\" allowfullscreen></iframe></div>\n",
            escape_html(&embed_src(&video.embed_url))
        ));
    }
    body.push_str(&format!(
        "<p><span class=\"badge\">{}</span> {} views</p>\n",
        format_duration(video.duration_sec),
        video.views
    ));
    if !video.description.is_empty() {
        body.push_str(&format!("<p>{}</p>\n", escape_html(&video.description)));
    }
    if !video.categories.is_empty() {
        body.push_str("<h3>Categories</h3>\n");
        body.push_str(&tag_links("/category", &video.categories));
    }
    if !video.tags.is_empty() {
        body.push_str("<h3>Tags</h3>\n");
        body.push_str(&tag_links("/tag", &video.tags));
    }
    if !related.is_empty() {
        body.push_str("<h2>Related Videos</h2>\n");
        body.push_str(&video_grid(related));
    }

    layout(ctx, &seo, &body)
}

pub fn cosplay_index(
    ctx: &PageContext,
    albums: &[CosplayAlbum],
    page: i64,
    total_pages: i64,
) -> String {
    let seo = SeoMeta {
        title: format!("Cosplay Galleries - {}{}", ctx.site_name, page_label(page)),
        description: format!("Cosplay photo galleries and downloads on {}", ctx.site_name),
        canonical: if page > 1 {
            format!("{}/cosplay?page={}", ctx.site_url, page)
        } else {
            format!("{}/cosplay", ctx.site_url)
        },
        image: albums
            .first()
            .and_then(|a| a.gallery.first())
            .map(|src| absolute_image(ctx.site_url, src))
            .unwrap_or_default(),
        no_index: false,
    };

    let mut body = String::from("<h1>Cosplay Galleries</h1>\n");
    body.push_str(&album_grid(albums));
    body.push_str(&pagination_nav("/cosplay", page, total_pages));

    layout(ctx, &seo, &body)
}

pub fn cosplay_detail(
    ctx: &PageContext,
    album: &CosplayAlbum,
    related: &[CosplayAlbum],
) -> String {
    let main_image = album.gallery.first().map(String::as_str).unwrap_or("");
    let seo = SeoMeta {
        title: format!("{} - {}", album.title, ctx.site_name),
        description: format!("{} - {} photos. {}", album.title, album.gallery.len(), album.description),
        canonical: format!("{}/cosplay/{}", ctx.site_url, album.slug),
        image: absolute_image(ctx.site_url, main_image),
        no_index: false,
    };

    let mut body = String::new();
    body.push_str(&detail_json_ld(ctx, &seo, &album.categories, album.created_at));
    body.push_str(&format!("<h1>{}</h1>\n", escape_html(&album.title)));

    let mut facts = String::new();
    if !album.cosplayer.is_empty() {
        facts.push_str(&format!("Cosplayer: {}<br>", escape_html(&album.cosplayer)));
    }
    if !album.character_name.is_empty() {
        facts.push_str(&format!("Character: {}<br>", escape_html(&album.character_name)));
    }
    if !album.source_work.is_empty() {
        facts.push_str(&format!("Appears in: {}<br>", escape_html(&album.source_work)));
    }
    if !facts.is_empty() {
        body.push_str(&format!("<p>{}</p>\n", facts));
    }
    if !album.description.is_empty() {
        body.push_str(&format!("<p>{}</p>\n", escape_html(&album.description)));
    }

    if !album.video_embed.is_empty() {
        body.push_str(&format!(
            "<div class=\"player\"><iframe src=\"{}\" allowfullscreen></iframe></div>\n",
            escape_html(&embed_src(&album.video_embed))
        ));
    }

    let downloads = &album.downloads.0;
    if !downloads.is_empty() {
        body.push_str("<h3>Downloads</h3>\n<p class=\"downloads\">");
        for (label, link) in [
            ("Mediafire", &downloads.mediafire),
            ("Telegram", &downloads.telegram),
            ("Sorafolder", &downloads.sorafolder),
            ("Gofile", &downloads.gofile),
        ] {
            if let Some(url) = link {
                body.push_str(&format!(
                    "<a href=\"{}\" rel=\"nofollow noopener\" target=\"_blank\">{}</a>",
                    escape_html(url),
                    label
                ));
            }
        }
        body.push_str("</p>\n");
        if !album.archive_password.is_empty() {
            body.push_str(&format!(
                "<p>Unzip password: <code>{}</code></p>\n",
                escape_html(&album.archive_password)
            ));
        }
    }

    if !album.gallery.is_empty() {
        body.push_str("<div class=\"gallery\">\n");
        for (i, src) in album.gallery.iter().enumerate() {
            body.push_str(&format!(
                "<img src=\"{}\" alt=\"{} photo {}\" loading=\"lazy\">\n",
                escape_html(src),
                escape_html(&album.title),
                i + 1
            ));
        }
        body.push_str("</div>\n");
    }

    if !album.tags.is_empty() {
        body.push_str("<h3>Tags</h3>\n");
        body.push_str(&tag_links("/tag", &album.tags));
    }
    if !related.is_empty() {
        body.push_str("<h2>More Cosplay</h2>\n");
        body.push_str(&album_grid(related));
    }

    layout(ctx, &seo, &body)
}

pub fn search_results(
    ctx: &PageContext,
    query: &str,
    videos: &[Video],
    albums: &[CosplayAlbum],
) -> String {
    let seo = SeoMeta {
        title: format!("Search: {} - {}", query, ctx.site_name),
        description: format!("Search results for {}", query),
        canonical: format!("{}/search", ctx.site_url),
        image: String::new(),
        no_index: true,
    };

    let mut body = String::new();
    body.push_str(&format!(
        "<h1>Search results for \"{}\"</h1>\n",
        escape_html(query)
    ));
    if videos.is_empty() && albums.is_empty() {
        body.push_str("<p>Nothing found.</p>\n");
    }
    if !videos.is_empty() {
        body.push_str("<h2>Videos</h2>\n");
        body.push_str(&video_grid(videos));
    }
    if !albums.is_empty() {
        body.push_str("<h2>Cosplay</h2>\n");
        body.push_str(&album_grid(albums));
    }

    layout(ctx, &seo, &body)
}

/// Shared renderer for tag and category pages, which differ only in
/// heading and base path.
pub fn taxonomy_page(
    ctx: &PageContext,
    base_path: &str,
    slug: &str,
    videos: &[Video],
    albums: &[CosplayAlbum],
    page: i64,
    total_pages: i64,
) -> String {
    let heading = display_name(slug);
    let base = format!("{}/{}", base_path, slug);
    let seo = SeoMeta {
        title: format!("{} - {}{}", heading, ctx.site_name, page_label(page)),
        description: format!("{} videos and cosplay galleries on {}", heading, ctx.site_name),
        canonical: if page > 1 {
            format!("{}{}?page={}", ctx.site_url, base, page)
        } else {
            format!("{}{}", ctx.site_url, base)
        },
        image: videos
            .first()
            .map(|v| absolute_image(ctx.site_url, &v.thumbnail))
            .unwrap_or_default(),
        no_index: false,
    };

    let mut body = String::new();
    body.push_str(&format!("<h1>{}</h1>\n", escape_html(&heading)));
    if !albums.is_empty() {
        body.push_str("<h2>Cosplay</h2>\n");
        body.push_str(&album_grid(albums));
    }
    body.push_str("<h2>Videos</h2>\n");
    if videos.is_empty() {
        body.push_str("<p>No videos yet.</p>\n");
    } else {
        body.push_str(&video_grid(videos));
    }
    body.push_str(&pagination_nav(&base, page, total_pages));

    layout(ctx, &seo, &body)
}

pub fn not_found(ctx: &PageContext, videos: &[Video]) -> String {
    let seo = SeoMeta {
        title: format!("Page Not Found - {}", ctx.site_name),
        description: "The page you were looking for does not exist.".to_string(),
        canonical: format!("{}/", ctx.site_url),
        image: String::new(),
        no_index: true,
    };

    let mut body = String::from(
        "<h1>Page Not Found</h1>\n<p>The page you were looking for does not exist. \
         Here is something else to watch instead.</p>\n",
    );
    if !videos.is_empty() {
        body.push_str(&video_grid(videos));
    }
    body.push_str("<p><a href=\"/\">Back to the homepage</a></p>\n");

    layout(ctx, &seo, &body)
}

pub fn login_page(ctx: &PageContext, error: Option<&str>) -> String {
    let seo = SeoMeta {
        title: format!("Admin Login - {}", ctx.site_name),
        description: String::new(),
        canonical: format!("{}/admin/login", ctx.site_url),
        image: String::new(),
        no_index: true,
    };

    let mut body = String::from("<h1>Admin Login</h1>\n");
    if let Some(message) = error {
        body.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(message)));
    }
    body.push_str(
        "<form method=\"post\" action=\"/admin/login\">\
         <input type=\"password\" name=\"password\" placeholder=\"Password\" required>\
         <button type=\"submit\">Log in</button></form>\n",
    );

    layout(ctx, &seo, &body)
}

pub fn admin_panel(ctx: &PageContext) -> String {
    let seo = SeoMeta {
        title: format!("Admin - {}", ctx.site_name),
        description: String::new(),
        canonical: format!("{}/admin", ctx.site_url),
        image: String::new(),
        no_index: true,
    };

    let body = "<h1>Admin</h1>\n\
        <h2>Scrape Video</h2>\n\
        <form method=\"post\" action=\"/api/scrape\">\
        <input type=\"url\" name=\"url\" placeholder=\"Video page URL\" size=\"60\" required>\
        <button type=\"submit\">Scrape</button></form>\n\
        <h2>Scrape Cosplay Album</h2>\n\
        <form method=\"post\" action=\"/api/scrape-cosplay\">\
        <input type=\"url\" name=\"url\" placeholder=\"Album page URL\" size=\"60\" required>\
        <button type=\"submit\">Scrape</button></form>\n\
        <p><a href=\"/admin/logout\">Log out</a></p>\n";

    layout(ctx, &seo, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DownloadLinks;
    use chrono::Utc;
    use sqlx::types::Json;

    fn ctx() -> PageContext<'static> {
        PageContext {
            site_name: "Vitrine",
            site_url: "https://vitrine.example",
        }
    }

    fn sample_video() -> Video {
        Video {
            id: 1,
            title: "Stage Play <Act 2>".to_string(),
            slug: "stage-play-act-2".to_string(),
            description: "A description".to_string(),
            embed_url: "//player.example/embed/99".to_string(),
            thumbnail: "https://cdn.vitrine.example/thumbnails/stage-play-act-2.jpg".to_string(),
            duration: "PT1H2M3S".to_string(),
            duration_sec: 3723,
            tags: vec!["stage".to_string()],
            categories: vec!["plays".to_string()],
            views: 7,
            created_at: Utc::now(),
        }
    }

    fn sample_album() -> CosplayAlbum {
        CosplayAlbum {
            id: 1,
            title: "Miku Winter Set".to_string(),
            slug: "miku-winter-set".to_string(),
            cosplayer: "Aki".to_string(),
            character_name: "Miku".to_string(),
            source_work: "Vocaloid".to_string(),
            gallery: vec!["https://cdn.vitrine.example/img/1.jpg".to_string()],
            downloads: Json(DownloadLinks {
                mediafire: Some("https://mediafire.example/f/abc".to_string()),
                ..Default::default()
            }),
            description: "Cosplay Miku by Aki from Vocaloid.".to_string(),
            archive_password: "vitrine".to_string(),
            video_embed: String::new(),
            tags: vec!["miku".to_string()],
            categories: vec!["vocaloid".to_string()],
            views: 3,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn escapes_html_metacharacters() {
        assert_eq!(
            escape_html("<b>\"a\" & 'b'</b>"),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn duration_formats() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(-5), "00:00");
        assert_eq!(format_duration(62), "01:02");
        assert_eq!(format_duration(3599), "59:59");
        assert_eq!(format_duration(3600), "01:00:00");
        assert_eq!(format_duration(3723), "01:02:03");
    }

    #[test]
    fn display_names_from_slugs() {
        assert_eq!(display_name("one-punch-man"), "One Punch Man");
        assert_eq!(display_name("cosplay"), "Cosplay");
    }

    #[test]
    fn video_detail_escapes_and_upgrades_embed() {
        let page = video_detail(&ctx(), &sample_video(), &[]);
        assert!(page.contains("Stage Play &lt;Act 2&gt;"));
        assert!(!page.contains("<Act 2>"));
        assert!(page.contains("https://player.example/embed/99"));
        assert!(page.contains("01:02:03"));
    }

    #[test]
    fn detail_pages_carry_article_structured_data() {
        let page = video_detail(&ctx(), &sample_video(), &[]);
        assert!(page.contains("<script type=\"application/ld+json\">"));
        assert!(page.contains("\"@type\":\"Article\""));
        assert!(page.contains("\"articleSection\":[\"plays\"]"));
        // markup in the title is unicode-escaped inside the JSON payload
        assert!(page.contains("\\u003cAct 2"));

        let album_page = cosplay_detail(&ctx(), &sample_album(), &[]);
        assert!(album_page.contains("\"articleSection\":[\"vocaloid\"]"));
    }

    #[test]
    fn search_page_is_noindex() {
        let page = search_results(&ctx(), "miku", &[], &[]);
        assert!(page.contains("noindex"));
        assert!(page.contains("Nothing found"));
    }

    #[test]
    fn cosplay_detail_lists_downloads_and_password() {
        let page = cosplay_detail(&ctx(), &sample_album(), &[]);
        assert!(page.contains("Mediafire"));
        assert!(!page.contains("Gofile"));
        assert!(page.contains("Unzip password"));
        assert!(page.contains("1 photos"));
    }

    #[test]
    fn pagination_only_past_one_page() {
        assert_eq!(pagination_nav("/", 1, 1), "");
        let nav = pagination_nav("/", 2, 5);
        assert!(nav.contains("href=\"/\""));
        assert!(nav.contains("href=\"/?page=3\""));
        assert!(nav.contains("Page 2 of 5"));
    }

    #[test]
    fn titles_get_page_labels() {
        let page = home(&ctx(), &[sample_video()], &[], 3, 9);
        assert!(page.contains("<title>Vitrine - Page 3</title>"));
        let front = home(&ctx(), &[sample_video()], &[], 1, 9);
        assert!(front.contains("<title>Vitrine</title>"));
    }
}
