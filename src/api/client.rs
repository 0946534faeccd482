//! Upstream web API client.

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde_json::{json, Value};

use crate::api::context::RequestContext;
use crate::api::session::CredentialExchange;
use crate::api::types::TimelineItem;
use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// GraphQL operation: profile lookup by screen name.
const USER_BY_SCREEN_NAME: &str = "xmU6X_CKVnQ5lSrCbAmJsg/UserByScreenName";

/// GraphQL operation: reverse-chronological home timeline.
const HOME_LATEST_TIMELINE: &str = "HJFjzBgCs16TqxewQOeLNg/HomeLatestTimeline";

/// Capabilities the collectors need from the upstream service.
#[async_trait]
pub trait UpstreamApi: Send + Sync {
    /// Raw profile payload for a screen name.
    async fn get_profile_by_handle(&self, handle: &str) -> Result<Value>;

    /// Most recent items of the authenticated account's home timeline.
    async fn get_latest_timeline(&self, count: u32) -> Result<Vec<TimelineItem>>;
}

/// Authenticated client for the web GraphQL API.
pub struct XApi {
    client: Client,
    api_base: String,
    context: RequestContext,
}

impl XApi {
    pub fn new(api_base: impl Into<String>, context: RequestContext) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Fetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            context,
        })
    }

    /// Exchange `token` for a session and build a client signed with it.
    pub async fn connect(config: &ClientConfig, token: &str) -> Result<Self> {
        let exchange = CredentialExchange::from_config(config)?;
        let cookies = exchange.exchange(token).await?;
        tracing::debug!(
            "Session cookies: {}",
            cookies.names().collect::<Vec<_>>().join(", ")
        );

        let context = RequestContext::new(cookies, &config.user_agent)?;
        Self::new(config.api_base.clone(), context)
    }

    /// Make an authenticated GraphQL GET request.
    async fn get(&self, operation: &str, variables: &Value) -> Result<Value> {
        let url = format!("{}/{}", self.api_base, operation);

        let mut base = header::HeaderMap::new();
        base.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        let headers = self.context.build_headers(&base);

        tracing::debug!("GET {} variables={}", url, variables);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("variables", variables.to_string()),
                ("features", graphql_features().to_string()),
            ])
            .headers(headers)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("{}: {}", operation, e)))?;

        let text = check_status(response).await?.text().await?;
        tracing::debug!("Response length: {} bytes", text.len());

        serde_json::from_str(&text).map_err(|e| {
            Error::Fetch(format!(
                "Failed to parse {} response: {} - Response: {}",
                operation,
                e,
                truncate(&text, 500)
            ))
        })
    }
}

#[async_trait]
impl UpstreamApi for XApi {
    async fn get_profile_by_handle(&self, handle: &str) -> Result<Value> {
        let variables = json!({
            "screen_name": handle,
            "withSafetyModeUserFields": true,
        });
        self.get(USER_BY_SCREEN_NAME, &variables).await
    }

    async fn get_latest_timeline(&self, count: u32) -> Result<Vec<TimelineItem>> {
        let variables = json!({
            "count": count,
            "includePromotedContent": false,
            "latestControlAvailable": true,
            "requestContext": "launch",
        });
        let payload = self.get(HOME_LATEST_TIMELINE, &variables).await?;

        if let Some(errors) = payload.get("errors").filter(|_| payload.get("data").is_none()) {
            return Err(Error::Fetch(format!(
                "timeline request rejected: {}",
                truncate(&errors.to_string(), 500)
            )));
        }

        Ok(timeline_items(&payload))
    }
}

/// Map rate limiting and auth failures to errors.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    tracing::debug!("Response status: {}", status);

    if status == 429 {
        return Err(Error::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Fetch(format!(
            "HTTP {}: {}",
            status,
            if body.is_empty() {
                "empty response"
            } else {
                truncate(&body, 500)
            }
        )));
    }

    Ok(response)
}

/// Collect the tweets of a `HomeLatestTimeline` payload, in upstream order.
pub fn timeline_items(payload: &Value) -> Vec<TimelineItem> {
    let instructions = payload
        .pointer("/data/home/home_timeline_urt/instructions")
        .and_then(Value::as_array);

    let Some(instructions) = instructions else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for instruction in instructions {
        let Some(entries) = instruction.get("entries").and_then(Value::as_array) else {
            continue;
        };

        for entry in entries {
            let content = match entry.get("content") {
                Some(content) => content,
                None => continue,
            };

            // Single tweets carry itemContent directly; conversation modules nest them.
            let mut results: Vec<&Value> = Vec::new();
            if let Some(result) = content.pointer("/itemContent/tweet_results/result") {
                results.push(result);
            }
            if let Some(module_items) = content.get("items").and_then(Value::as_array) {
                results.extend(
                    module_items
                        .iter()
                        .filter_map(|i| i.pointer("/item/itemContent/tweet_results/result")),
                );
            }

            items.extend(results.into_iter().filter_map(TimelineItem::from_graphql));
        }
    }

    items
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn graphql_features() -> Value {
    json!({
        "rweb_tipjar_consumption_enabled": true,
        "responsive_web_graphql_exclude_directive_enabled": true,
        "verified_phone_label_enabled": false,
        "creator_subscriptions_tweet_preview_api_enabled": true,
        "responsive_web_graphql_timeline_navigation_enabled": true,
        "responsive_web_graphql_skip_user_profile_image_extensions_enabled": false,
        "communities_web_enable_tweet_community_results_fetch": true,
        "c9s_tweet_anatomy_moderator_badge_enabled": true,
        "articles_preview_enabled": true,
        "tweetypie_unmention_optimization_enabled": true,
        "responsive_web_edit_tweet_api_enabled": true,
        "graphql_is_translatable_rweb_tweet_is_translatable_enabled": true,
        "view_counts_everywhere_api_enabled": true,
        "longform_notetweets_consumption_enabled": true,
        "responsive_web_twitter_article_tweet_consumption_enabled": true,
        "tweet_awards_web_tipping_enabled": false,
        "freedom_of_speech_not_reach_fetch_enabled": true,
        "standardized_nudges_misinfo": true,
        "tweet_with_visibility_results_prefer_gql_limited_actions_policy_enabled": true,
        "longform_notetweets_rich_text_read_enabled": true,
        "longform_notetweets_inline_media_enabled": true,
        "responsive_web_enhance_cards_enabled": false,
        "hidden_profile_likes_enabled": true,
        "hidden_profile_subscriptions_enabled": true,
        "highlights_tweets_tab_ui_enabled": true,
        "subscriptions_verification_info_is_identity_verified_enabled": true,
        "subscriptions_verification_info_verified_since_enabled": true,
        "responsive_web_twitter_article_notes_tab_enabled": true,
        "subscriptions_feature_can_gift_premium": true,
        "profile_label_improvements_pcf_label_in_post_enabled": true,
    })
}
