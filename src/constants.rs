//! Application constants

use std::time::Duration;

/// Videos per page on the home, search, tag and category listings
pub const VIDEOS_PER_PAGE: i64 = 24;

/// Albums per page on the cosplay index
pub const ALBUMS_PER_PAGE: i64 = 24;

/// Albums shown in the strip on the home page
pub const HOME_ALBUM_STRIP: i64 = 10;

/// Albums shown alongside search/tag/category results
pub const SIDE_ALBUM_STRIP: i64 = 12;

/// Related videos sampled on a video detail page
pub const RELATED_VIDEOS: i64 = 8;

/// Related albums sampled on an album detail page
pub const RELATED_ALBUMS: i64 = 4;

/// Random videos embedded in the 404 page
pub const NOT_FOUND_SAMPLE: i64 = 4;

/// Newest videos / albums merged into the global RSS feed
pub const RSS_VIDEO_ITEMS: i64 = 30;
pub const RSS_ALBUM_ITEMS: i64 = 20;

/// Items per side in a category RSS feed
pub const RSS_CATEGORY_VIDEO_ITEMS: i64 = 20;
pub const RSS_CATEGORY_ALBUM_ITEMS: i64 = 10;

/// Video sitemap entry cap (Google rejects oversized video sitemaps)
pub const VIDEO_SITEMAP_LIMIT: i64 = 1000;

/// Tags per entry allowed in a video sitemap
pub const VIDEO_SITEMAP_MAX_TAGS: usize = 32;

/// Response cache TTL classes
pub const TTL_HOME: Duration = Duration::from_secs(5 * 60);
pub const TTL_SEARCH: Duration = Duration::from_secs(10 * 60);
pub const TTL_ALBUM_INDEX: Duration = Duration::from_secs(15 * 60);
pub const TTL_TAXONOMY: Duration = Duration::from_secs(30 * 60);
pub const TTL_DETAIL: Duration = Duration::from_secs(60 * 60);

/// Fetch timeouts for the two scrape pipelines
pub const VIDEO_FETCH_TIMEOUT: Duration = Duration::from_secs(20);
pub const ALBUM_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
