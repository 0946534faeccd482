//! Timeline item filtering and extraction.

use chrono::{DateTime, Utc};

use crate::api::types::{ExtendedEntities, TimelineItem, VideoVariant};
use crate::tweet::record::{tweet_url, TweetRecord, TweetUser};

/// Text prefix marking a retweet.
pub const RETWEET_PREFIX: &str = "RT @";

/// Posts with more whole days elapsed than this are dropped.
pub const RECENCY_WINDOW_DAYS: i64 = 1;

/// Why a timeline item was not turned into a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Quote,
    Retweet,
    TooOld,
    MissingIdentity,
}

/// Filter and extract a timeline item.
///
/// Filters run in order and stop at the first match: quote posts,
/// retweets, posts outside the recency window, posts without a screen
/// name or id.
pub fn parse_timeline_item(
    item: &TimelineItem,
    now: DateTime<Utc>,
) -> std::result::Result<TweetRecord, SkipReason> {
    let legacy = item.legacy.as_ref();

    if legacy.is_some_and(|l| l.is_quote_status) {
        return Err(SkipReason::Quote);
    }

    let full_text = legacy.and_then(|l| l.full_text.as_deref());
    if full_text.map_or(true, is_retweet_text) {
        return Err(SkipReason::Retweet);
    }

    let created_at = legacy.and_then(|l| l.created_at.as_deref());
    if created_at.is_some_and(|raw| is_outside_window(raw, now)) {
        return Err(SkipReason::TooOld);
    }

    let (Some(screen_name), Some(id)) = (item.screen_name(), item.status_id()) else {
        return Err(SkipReason::MissingIdentity);
    };

    let (images, videos) = legacy
        .and_then(|l| l.extended_entities.as_ref())
        .map(extract_media)
        .unwrap_or_default();

    Ok(TweetRecord {
        user: project_user(item),
        images,
        videos,
        tweet_url: tweet_url(screen_name, id),
        full_text: full_text.map(str::to_string),
        created_at: created_at.map(str::to_string),
    })
}

/// Whether the text marks a retweet.
pub fn is_retweet_text(text: &str) -> bool {
    text.starts_with(RETWEET_PREFIX)
}

/// Whether a post created at `raw` is older than the recency window.
///
/// Unparsable timestamps are kept.
pub fn is_outside_window(raw: &str, now: DateTime<Utc>) -> bool {
    match parse_created_at(raw) {
        Some(created) => (now - created).num_days() > RECENCY_WINDOW_DAYS,
        None => {
            tracing::debug!("Unparsable createdAt '{}', keeping post", raw);
            false
        }
    }
}

/// Parse `createdAt` in the upstream format (`Wed Oct 10 20:19:24 +0000 2018`)
/// or RFC 3339.
pub fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, "%a %b %d %H:%M:%S %z %Y")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn project_user(item: &TimelineItem) -> TweetUser {
    let Some(user) = item.user.as_ref() else {
        return TweetUser::default();
    };

    TweetUser {
        screen_name: user.screen_name.clone(),
        name: user.name.clone(),
        profile_image_url: user.profile_image_url_https.clone(),
        description: user.description.clone(),
        followers_count: user.followers_count,
        friends_count: user.friends_count,
        location: user.location.clone(),
    }
}

/// Split attached media into image URLs and best video URLs.
pub fn extract_media(entities: &ExtendedEntities) -> (Vec<String>, Vec<String>) {
    let images = entities
        .media
        .iter()
        .filter(|m| m.kind == "photo")
        .filter_map(|m| m.media_url_https.clone())
        .collect();

    let videos = entities
        .media
        .iter()
        .filter(|m| m.kind == "video" || m.kind == "animated_gif")
        .filter_map(|m| {
            let info = m.video_info.as_ref()?;
            select_best_video(&info.variants).map(|v| v.url.clone())
        })
        .collect();

    (images, videos)
}

/// Highest-bitrate `video/mp4` variant; the first one wins on equal bitrates.
pub fn select_best_video(variants: &[VideoVariant]) -> Option<&VideoVariant> {
    let mut best: Option<&VideoVariant> = None;

    for variant in variants.iter().filter(|v| v.content_type == "video/mp4") {
        let bitrate = variant.bitrate.unwrap_or(0);
        match best {
            Some(current) if current.bitrate.unwrap_or(0) >= bitrate => {}
            _ => best = Some(variant),
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 29, 12, 0, 0).unwrap()
    }

    fn upstream_date(dt: DateTime<Utc>) -> String {
        dt.format("%a %b %d %H:%M:%S %z %Y").to_string()
    }

    fn item(text: &str, created: DateTime<Utc>) -> TimelineItem {
        serde_json::from_value(json!({
            "legacy": {
                "id_str": "1773000000000000000",
                "full_text": text,
                "created_at": upstream_date(created),
                "is_quote_status": false
            },
            "user": {
                "screen_name": "alice",
                "name": "Alice",
                "profile_image_url_https": "https://pbs.twimg.com/profile_images/a.jpg",
                "description": "bio",
                "followers_count": 100,
                "friends_count": 10,
                "location": "Earth"
            }
        }))
        .unwrap()
    }

    fn variant(bitrate: Option<u64>, content_type: &str, url: &str) -> VideoVariant {
        VideoVariant {
            bitrate,
            content_type: content_type.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_qualifying_post() {
        let record = parse_timeline_item(&item("hello world", now()), now()).unwrap();
        assert_eq!(
            record.tweet_url,
            "https://x.com/alice/status/1773000000000000000"
        );
        assert_eq!(record.full_text.as_deref(), Some("hello world"));
        assert_eq!(record.user.screen_name.as_deref(), Some("alice"));
        assert_eq!(record.user.followers_count, Some(100));
        assert_eq!(record.user.location.as_deref(), Some("Earth"));
    }

    #[test]
    fn test_retweet_excluded() {
        let result = parse_timeline_item(&item("RT @alice hi", now()), now());
        assert_eq!(result, Err(SkipReason::Retweet));
    }

    #[test]
    fn test_missing_text_excluded() {
        let mut it = item("x", now());
        it.legacy.as_mut().unwrap().full_text = None;
        assert_eq!(parse_timeline_item(&it, now()), Err(SkipReason::Retweet));
    }

    #[test]
    fn test_quote_excluded_before_other_checks() {
        let mut it = item("RT @bob quoted", now() - Duration::days(3));
        it.legacy.as_mut().unwrap().is_quote_status = true;
        assert_eq!(parse_timeline_item(&it, now()), Err(SkipReason::Quote));
    }

    #[test]
    fn test_old_post_excluded() {
        let it = item("old news", now() - Duration::days(3));
        assert_eq!(parse_timeline_item(&it, now()), Err(SkipReason::TooOld));
    }

    #[test]
    fn test_recency_window_counts_whole_days() {
        let it = item("yesterday-ish", now() - Duration::hours(47));
        assert!(parse_timeline_item(&it, now()).is_ok());

        let it = item("two days", now() - Duration::hours(48));
        assert_eq!(parse_timeline_item(&it, now()), Err(SkipReason::TooOld));
    }

    #[test]
    fn test_missing_identity_excluded() {
        let mut it = item("hello", now());
        it.user = None;
        assert_eq!(
            parse_timeline_item(&it, now()),
            Err(SkipReason::MissingIdentity)
        );

        let mut it = item("hello", now());
        it.legacy.as_mut().unwrap().id_str = None;
        assert_eq!(
            parse_timeline_item(&it, now()),
            Err(SkipReason::MissingIdentity)
        );
    }

    #[test]
    fn test_unparsable_date_kept() {
        let mut it = item("hello", now());
        it.legacy.as_mut().unwrap().created_at = Some("yesterday".into());
        assert!(parse_timeline_item(&it, now()).is_ok());
    }

    #[test]
    fn test_parse_created_at_formats() {
        let expected = Utc.with_ymd_and_hms(2018, 10, 10, 20, 19, 24).unwrap();
        assert_eq!(
            parse_created_at("Wed Oct 10 20:19:24 +0000 2018"),
            Some(expected)
        );
        assert_eq!(parse_created_at("2018-10-10T20:19:24Z"), Some(expected));
        assert_eq!(parse_created_at(""), None);
    }

    #[test]
    fn test_select_highest_bitrate() {
        let variants = vec![
            variant(Some(480), "video/mp4", "https://video.twimg.com/480.mp4"),
            variant(Some(1200), "video/mp4", "https://video.twimg.com/1200.mp4"),
            variant(Some(800), "video/mp4", "https://video.twimg.com/800.mp4"),
        ];
        assert_eq!(
            select_best_video(&variants).unwrap().url,
            "https://video.twimg.com/1200.mp4"
        );
    }

    #[test]
    fn test_select_ignores_non_mp4_and_keeps_first_on_tie() {
        let variants = vec![
            variant(None, "application/x-mpegURL", "https://video.twimg.com/pl.m3u8"),
            variant(Some(800), "video/mp4", "https://video.twimg.com/first.mp4"),
            variant(Some(800), "video/mp4", "https://video.twimg.com/second.mp4"),
        ];
        assert_eq!(
            select_best_video(&variants).unwrap().url,
            "https://video.twimg.com/first.mp4"
        );

        let only_hls = vec![variant(None, "application/x-mpegURL", "x")];
        assert!(select_best_video(&only_hls).is_none());
    }

    #[test]
    fn test_extract_media() {
        let entities: ExtendedEntities = serde_json::from_value(json!({"media": [
            {"type": "photo", "media_url_https": "https://pbs.twimg.com/media/1.jpg"},
            {"type": "animated_gif", "video_info": {"variants": [
                {"bitrate": 0, "content_type": "video/mp4", "url": "https://video.twimg.com/gif.mp4"}
            ]}},
            {"type": "video", "video_info": {"variants": [
                {"content_type": "application/x-mpegURL", "url": "https://video.twimg.com/v.m3u8"}
            ]}},
            {"type": "photo", "media_url_https": "https://pbs.twimg.com/media/2.jpg"}
        ]}))
        .unwrap();

        let (images, videos) = extract_media(&entities);
        assert_eq!(
            images,
            vec![
                "https://pbs.twimg.com/media/1.jpg".to_string(),
                "https://pbs.twimg.com/media/2.jpg".to_string()
            ]
        );
        assert_eq!(videos, vec!["https://video.twimg.com/gif.mp4".to_string()]);
    }
}
