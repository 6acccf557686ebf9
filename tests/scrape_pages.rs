//! End-to-end extraction tests against full, noisy source pages.
//!
//! The inline unit tests cover each selector in isolation; these pages carry
//! the surrounding junk a real fetch returns (navigation, ads, analytics,
//! unrelated iframes) to verify the extractors stay locked onto their fields.

use bytes::Bytes;
use vitrine::scrape::ScrapeError;
use vitrine::scrape::cosplay::extract_cosplay;
use vitrine::scrape::video::extract_video;
use vitrine::storage::{MediaStore, content_type_for};

/// A video page the way the source actually serves it: schema.org microdata
/// in the head, OpenGraph noise alongside it, tag links scattered through
/// both the tag box and the related-videos sidebar.
const VIDEO_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>City Lights Drive POV 60fps - WatchHub</title>
  <meta charset="utf-8">
  <meta property="og:title" content="City Lights Drive POV 60fps">
  <meta property="og:type" content="video.other">
  <meta itemprop="name" content="City Lights Drive POV 60fps">
  <meta itemprop="description" content="Night drive through downtown, shot at 60fps.">
  <meta itemprop="embedURL" content="https://player.watchhub.example/embed/ncd-4417">
  <meta itemprop="thumbnailUrl" content="https://img.watchhub.example/thumbs/ncd-4417.jpg">
  <meta itemprop="duration" content="PT12M34S">
  <script>window.__ANALYTICS__ = {"page": "video", "id": "ncd-4417"};</script>
</head>
<body>
  <nav><a href="/">Home</a><a href="/browse">Browse</a><a href="/about">About</a></nav>
  <main>
    <div id="player" data-embed="ncd-4417"></div>
    <h1>City Lights Drive POV 60fps</h1>
    <div class="tag-box">
      <a href="/tag/city">City</a>
      <a href="/tag/night">Night</a>
      <a href="/tag/pov">POV</a>
    </div>
    <div class="cat-box"><a href="/category/driving">Driving</a></div>
  </main>
  <aside class="related">
    <a href="/video/other-clip">Another clip</a>
    <a href="/tag/dashcam">Dashcam</a>
  </aside>
  <footer><a href="/terms">Terms</a></footer>
</body>
</html>"#;

/// A cosplay album page in its WordPress shape: labeled blockquote rows,
/// download buttons, a gallery grid, and three iframes of which only one is
/// the album's player.
const COSPLAY_PAGE: &str = r#"<!DOCTYPE html>
<html lang="ja">
<head><title>刻晴 Keqing Costume Gallery | CosArchive</title></head>
<body>
  <header><nav><a href="/">CosArchive</a><a href="/cosplay">Albums</a></nav></header>
  <article>
    <header class="entry-header">
      <h1 class="entry-title">刻晴 Keqing Costume Gallery</h1>
      <div class="entry-category"><a href="/category/game">Game</a></div>
      <div class="entry-meta">
        <a rel="tag" href="/tag/keqing">Keqing</a>
        <a rel="tag" href="/tag/genshin-impact">Genshin Impact</a>
        <a rel="tag" href="/tag/keqing">Keqing</a>
      </div>
    </header>
    <blockquote>
      <p>Cosplayer: <a href="/cosplayer/yuki">Yuki</a></p>
      <p>Character: <a href="/character/keqing">Keqing</a></p>
      <p>Appear In: <a href="/work/genshin-impact">Genshin Impact</a></p>
      <p>Photos shot on location, enjoy!</p>
      <p>Unzip Password: <input type="text" value="cos2024!" readonly></p>
    </blockquote>
    <iframe src="https://ads.example/slot1" width="300" height="250"></iframe>
    <iframe src="https://cossora.site/v/kq-gallery" allowfullscreen></iframe>
    <iframe src="https://comments.example/thread/5512"></iframe>
    <div class="gallery">
      <figure class="gallery-item"><a href="https://img.origin-host.net/kq/001.jpg"><img src="https://img.origin-host.net/kq/t/001.jpg"></a></figure>
      <figure class="gallery-item"><a href="https://img.origin-host.net/kq/002.jpg"><img src="https://img.origin-host.net/kq/t/002.jpg"></a></figure>
      <figure class="gallery-item"><a href="https://img.origin-host.net/kq/001.jpg"><img src="https://img.origin-host.net/kq/t/001.jpg"></a></figure>
    </div>
    <div class="wp-block-buttons">
      <a class="button alert" href="https://www.mediafire.example/file/kq.zip">MEDIAFIRE Download</a>
      <a class="button alert" href="https://t.example/cosarchive">Telegram Channel</a>
      <a class="button alert" href="https://sorafolder.example/d/kq">SoraFolder Mirror</a>
      <a class="button alert" href="https://gofile.example/d/kq">GoFile Backup</a>
      <a class="button alert" href="/report?album=kq">Report broken link</a>
    </div>
  </article>
  <footer><a href="/terms">Terms</a></footer>
</body>
</html>"#;

/// The interstitial an anti-bot proxy serves in place of either page kind.
const CHALLENGE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Just a moment...</title>
  <meta http-equiv="refresh" content="390">
  <script src="/cdn-cgi/challenge-platform/orchestrate/chl_page"></script>
</head>
<body>
  <h1>Checking your browser before accessing the site.</h1>
  <noscript>Please enable JavaScript and cookies to continue.</noscript>
</body>
</html>"#;

#[test]
fn full_video_page_extracts_every_field() {
    let draft = extract_video(VIDEO_PAGE).unwrap();

    assert_eq!(draft.title, "City Lights Drive POV 60fps");
    assert_eq!(draft.slug, "city-lights-drive-pov-60fps");
    assert_eq!(draft.description, "Night drive through downtown, shot at 60fps.");
    assert_eq!(draft.embed_url, "https://player.watchhub.example/embed/ncd-4417");
    assert_eq!(
        draft.thumbnail_url.as_deref(),
        Some("https://img.watchhub.example/thumbs/ncd-4417.jpg")
    );
    assert_eq!(draft.duration, "PT12M34S");
    assert_eq!(draft.duration_sec, 12 * 60 + 34);

    // Tag anchors are collected document-wide, so the sidebar link lands
    // after the tag box, in document order.
    assert_eq!(draft.tags, vec!["City", "Night", "POV", "Dashcam"]);
    assert_eq!(draft.categories, vec!["Driving"]);
}

#[test]
fn full_album_page_extracts_every_field() {
    let cdn = "https://cdn.example.net";
    let draft = extract_cosplay(COSPLAY_PAGE, cdn).unwrap();

    assert_eq!(draft.title, "刻晴 Keqing Costume Gallery");
    assert_eq!(draft.slug, "刻晴-keqing-costume-gallery");
    assert_eq!(draft.cosplayer, "Yuki");
    assert_eq!(draft.character_name, "Keqing");
    assert_eq!(draft.source_work, "Genshin Impact");
    assert_eq!(draft.archive_password, "cos2024!");
    assert_eq!(
        draft.description,
        "Cosplay Keqing by Yuki from Genshin Impact. Full gallery and download links available."
    );

    // The ad iframe precedes the player but matches no player pattern; the
    // comment iframe after it never gets a look.
    assert_eq!(draft.video_embed, "https://cossora.site/v/kq-gallery");

    // Gallery URLs move onto the CDN with the origin host kept in the path,
    // and the repeated first photo collapses to one entry.
    assert_eq!(
        draft.gallery,
        vec![
            "https://cdn.example.net/img.origin-host.net/kq/001.jpg",
            "https://cdn.example.net/img.origin-host.net/kq/002.jpg",
        ]
    );

    assert_eq!(
        draft.downloads.mediafire.as_deref(),
        Some("https://www.mediafire.example/file/kq.zip")
    );
    assert_eq!(draft.downloads.telegram.as_deref(), Some("https://t.example/cosarchive"));
    assert_eq!(draft.downloads.sorafolder.as_deref(), Some("https://sorafolder.example/d/kq"));
    assert_eq!(draft.downloads.gofile.as_deref(), Some("https://gofile.example/d/kq"));

    assert_eq!(draft.tags, vec!["Keqing", "Genshin Impact"]);
    assert_eq!(draft.categories, vec!["Game"]);
}

#[test]
fn challenge_interstitial_blocks_both_extractors() {
    assert!(matches!(extract_video(CHALLENGE_PAGE), Err(ScrapeError::Blocked)));
    assert!(matches!(
        extract_cosplay(CHALLENGE_PAGE, "https://cdn.example.net"),
        Err(ScrapeError::Blocked)
    ));
}

/// A mirrored thumbnail must come back out of the store under the same
/// object path the ingest pipeline would publish, with a content type the
/// media route can serve.
#[tokio::test]
async fn mirrored_thumbnail_round_trips_through_local_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = MediaStore::new(
        Some(dir.path().to_path_buf()),
        None,
        "unused".to_string(),
        "http://localhost:3000/media".to_string(),
    );

    let draft = extract_video(VIDEO_PAGE).unwrap();
    let object_path = format!("thumbnails/{}.jpg", draft.slug);

    store
        .store(&object_path, Bytes::from_static(b"\xff\xd8\xff\xe0 fake jpeg"))
        .await
        .unwrap();

    let bytes = store.read(&object_path).await.unwrap();
    assert_eq!(bytes, b"\xff\xd8\xff\xe0 fake jpeg");
    assert_eq!(content_type_for(&object_path), "image/jpeg");
}
