//! Upstream payload type definitions.
//!
//! Field names follow the raw GraphQL payloads (snake_case); camelCase
//! aliases accept payloads that were already normalized by other clients.

use serde::Deserialize;
use serde_json::Value;

/// One post of a timeline batch with the author's profile attached.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimelineItem {
    #[serde(default, alias = "restId")]
    pub rest_id: Option<String>,
    #[serde(default)]
    pub legacy: Option<TweetLegacy>,
    #[serde(default)]
    pub user: Option<UserLegacy>,
}

impl TimelineItem {
    /// Decode a `tweet_results.result` object.
    ///
    /// Unwraps `TweetWithVisibilityResults` and reads the author from
    /// `core.user_results.result`. Returns `None` for tombstones and other
    /// results without a tweet body.
    pub fn from_graphql(result: &Value) -> Option<Self> {
        let result = match result.get("__typename").and_then(Value::as_str) {
            Some("TweetWithVisibilityResults") => result.get("tweet")?,
            Some("TweetTombstone") | Some("TweetUnavailable") => return None,
            _ => result,
        };

        let legacy: TweetLegacy = serde_json::from_value(result.get("legacy")?.clone()).ok()?;
        let rest_id = result
            .get("rest_id")
            .and_then(Value::as_str)
            .map(str::to_string);

        let user = result
            .pointer("/core/user_results/result")
            .map(UserLegacy::from_graphql);

        Some(Self {
            rest_id,
            legacy: Some(legacy),
            user,
        })
    }

    /// Stable id of the post (`legacy.id_str`, falling back to `rest_id`).
    pub fn status_id(&self) -> Option<&str> {
        self.legacy
            .as_ref()
            .and_then(|l| l.id_str.as_deref())
            .or(self.rest_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    pub fn screen_name(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.screen_name.as_deref())
            .filter(|name| !name.is_empty())
    }
}

/// The `legacy` block of a tweet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TweetLegacy {
    #[serde(default, alias = "idStr")]
    pub id_str: Option<String>,
    #[serde(default, alias = "fullText")]
    pub full_text: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default, alias = "isQuoteStatus")]
    pub is_quote_status: bool,
    #[serde(default, alias = "extendedEntities")]
    pub extended_entities: Option<ExtendedEntities>,
}

/// Attached media.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtendedEntities {
    #[serde(default)]
    pub media: Vec<Media>,
}

/// A single media attachment.
#[derive(Debug, Clone, Deserialize)]
pub struct Media {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, alias = "mediaUrlHttps")]
    pub media_url_https: Option<String>,
    #[serde(default, alias = "videoInfo")]
    pub video_info: Option<VideoInfo>,
}

/// Encodings available for a video or animated GIF.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub variants: Vec<VideoVariant>,
}

/// One encoding of a video.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoVariant {
    #[serde(default)]
    pub bitrate: Option<u64>,
    #[serde(default, alias = "contentType")]
    pub content_type: String,
    pub url: String,
}

/// The `legacy` block of a user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserLegacy {
    #[serde(default, alias = "screenName")]
    pub screen_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "profileImageUrlHttps")]
    pub profile_image_url_https: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "followersCount")]
    pub followers_count: Option<u64>,
    #[serde(default, alias = "friendsCount")]
    pub friends_count: Option<u64>,
    #[serde(default)]
    pub location: Option<String>,
}

impl UserLegacy {
    /// Decode a `user_results.result` object.
    ///
    /// Newer payloads moved `screen_name` and `name` from `legacy` into
    /// `core`, and the avatar into `avatar.image_url`; both layouts are read.
    pub fn from_graphql(result: &Value) -> Self {
        let mut user: UserLegacy = result
            .get("legacy")
            .cloned()
            .and_then(|legacy| serde_json::from_value(legacy).ok())
            .unwrap_or_default();

        let text_at = |pointer: &str| {
            result
                .pointer(pointer)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        if user.screen_name.is_none() {
            user.screen_name = text_at("/core/screen_name");
        }
        if user.name.is_none() {
            user.name = text_at("/core/name");
        }
        if user.profile_image_url_https.is_none() {
            user.profile_image_url_https = text_at("/avatar/image_url");
        }
        if user.location.is_none() {
            user.location = text_at("/location/location");
        }

        user
    }
}
