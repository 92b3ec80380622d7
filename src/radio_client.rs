use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::AppError;

pub const SEARCH_PATH: &str = "new_combo_search.php";
pub const SEARCH_PARAM: &str = "srch";
pub const NO_FREQUENCY_SENTINEL: &str = "~";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub name: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub language: String,
    pub genre: String,
    pub frequency: Option<String>,
    pub stream_type: String,
    pub bitrate: u32,
    pub play_count: u64,
    pub favorite_count: u64,
    pub deeplink: String,
    pub short_code: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Podcast {
    pub name: String,
    pub category: String,
    pub language: String,
    pub description: Option<String>,
    pub total_streams: u64,
    pub deeplink: String,
    pub short_code: Option<String>,
}

/// Decoded upstream result. Only the first `radio` and first `podcast` group are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub stations: Vec<Station>,
    pub podcasts: Vec<Podcast>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty() && self.podcasts.is_empty()
    }
}

#[async_trait]
pub trait StationSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResults, AppError>;
}

#[derive(Debug, Clone)]
pub struct RadioApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl RadioApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::internal(format!("failed to build http client: {err}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/{SEARCH_PATH}", self.base_url)
    }

    async fn fetch(&self, query: &str) -> Result<SearchResults, AppError> {
        let response = self
            .http
            .get(self.search_url())
            .query(&[(SEARCH_PARAM, query)])
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        decode_search_response(&body)
    }
}

#[async_trait]
impl StationSearch for RadioApiClient {
    async fn search(&self, query: &str) -> Result<SearchResults, AppError> {
        debug!(query = %query, "upstream search");

        let result = self.fetch(query).await;

        if let Err(err) = &result {
            warn!(query = %query, error = %err, code = err.code(), "upstream search failed");
        }
        result
    }
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    data: SearchBody,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(rename = "ErrorCode", deserialize_with = "lenient_number")]
    error_code: i64,
    #[serde(rename = "ErrorMessage", default, deserialize_with = "null_as_empty")]
    error_message: String,
    #[serde(rename = "Data", default)]
    groups: Option<Vec<RawGroup>>,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct RawStation {
    st_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    st_city: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    st_state: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    st_country: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    st_lang: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    st_genre: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    st_bc_freq: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    st_type: String,
    #[serde(default, deserialize_with = "lenient_count")]
    st_bitrate: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    st_play_cnt: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    st_fav_cnt: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    deeplink: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    st_shorturl: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    st_weburl: String,
}

#[derive(Debug, Deserialize)]
struct RawPodcast {
    p_name: String,
    #[serde(default, alias = "cat_name", deserialize_with = "null_as_empty")]
    p_category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    p_lang: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    p_desc: String,
    #[serde(default, deserialize_with = "lenient_count")]
    total_stream: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    deeplink: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    p_shorturl: String,
}

/// Blank values are absent; anything else is kept exactly as sent.
fn non_empty(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

impl From<RawStation> for Station {
    fn from(raw: RawStation) -> Self {
        let frequency =
            non_empty(raw.st_bc_freq).filter(|freq| freq.trim() != NO_FREQUENCY_SENTINEL);

        Self {
            name: raw.st_name,
            city: raw.st_city,
            state: raw.st_state,
            country: raw.st_country,
            language: raw.st_lang,
            genre: raw.st_genre,
            frequency,
            stream_type: raw.st_type,
            bitrate: raw.st_bitrate,
            play_count: raw.st_play_cnt,
            favorite_count: raw.st_fav_cnt,
            deeplink: raw.deeplink,
            short_code: non_empty(raw.st_shorturl),
            website: non_empty(raw.st_weburl),
        }
    }
}

impl From<RawPodcast> for Podcast {
    fn from(raw: RawPodcast) -> Self {
        Self {
            name: raw.p_name,
            category: raw.p_category,
            language: raw.p_lang,
            description: non_empty(raw.p_desc),
            total_streams: raw.total_stream,
            deeplink: raw.deeplink,
            short_code: non_empty(raw.p_shorturl),
        }
    }
}

/// Decode an upstream body, surfacing a non-zero `ErrorCode` as [`AppError::Upstream`].
pub fn decode_search_response(body: &[u8]) -> Result<SearchResults, AppError> {
    let envelope: SearchEnvelope = serde_json::from_slice(body)
        .map_err(|err| AppError::MalformedUpstream(err.to_string()))?;
    let body = envelope.data;

    if body.error_code != 0 {
        return Err(AppError::upstream(body.error_code, body.error_message));
    }

    let mut results = SearchResults::default();
    let mut seen_radio = false;
    let mut seen_podcast = false;

    for group in body.groups.unwrap_or_default() {
        match group.kind.as_str() {
            "radio" if !seen_radio => {
                seen_radio = true;
                results.stations = decode_records::<RawStation, Station>(group.data, "radio")?;
            }
            "podcast" if !seen_podcast => {
                seen_podcast = true;
                results.podcasts = decode_records::<RawPodcast, Podcast>(group.data, "podcast")?;
            }
            other => debug!(group = %other, "skipping upstream result group"),
        }
    }

    Ok(results)
}

fn decode_records<R, T>(data: Value, kind: &str) -> Result<Vec<T>, AppError>
where
    R: de::DeserializeOwned,
    T: From<R>,
{
    if data.is_null() {
        return Ok(Vec::new());
    }

    let raw: Vec<R> = serde_json::from_value(data)
        .map_err(|err| AppError::MalformedUpstream(format!("{kind} group: {err}")))?;
    Ok(raw.into_iter().map(T::from).collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Text(String),
}

/// Accepts a JSON number, a numeric string, an empty string or null.
fn lenient_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr + Default,
{
    match Option::<Lenient<T>>::deserialize(deserializer)? {
        None => Ok(T::default()),
        Some(Lenient::Value(value)) => Ok(value),
        Some(Lenient::Text(text)) if text.trim().is_empty() => Ok(T::default()),
        Some(Lenient::Text(text)) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid number {text:?}"))),
    }
}

/// Counts shown to users. A value that is not a non-negative integer (or a string holding
/// one) reads as zero instead of failing the whole search.
fn lenient_count<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: de::DeserializeOwned + FromStr + Default,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match value {
        Value::Null => None,
        Value::String(text) => text.trim().parse().ok(),
        other => serde_json::from_value(other.clone())
            .inspect_err(|_| debug!(value = %other, "unusable upstream count"))
            .ok(),
    };
    Ok(parsed.unwrap_or_default())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
