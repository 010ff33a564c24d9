//! Data models for the news API payloads.
//!
//! This module defines the shapes the renderer works with:
//! - [`Article`]: one news item, as returned in a list or as a detail page
//! - [`RelatedNewsItem`]: the trimmed article shown under a detail page
//! - [`Payload`]: the validated response, one of list / human detail / bot detail
//!
//! The API is loose about types. Ids arrive as numbers or strings, `topic`,
//! `authors` and `keywords` as a comma-joined string or a list, and
//! `published_date` as epoch milliseconds (number or numeric string) or a
//! free-form date string. The enums below accept every variant, and a field
//! whose value fits none of them reads as absent instead of failing the
//! whole article.

use crate::error::{FrontError, Result};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// Error text for a list response whose `news` field is not an array.
pub const INVALID_NEWS_DATA: &str = "Invalid news data received";
/// Error text for a page response missing `static_html` (bots) or `title` (humans).
pub const INVALID_PAGE_DATA: &str = "Invalid page data received";

/// An article identifier, numeric or textual on the wire.
///
/// Numbers outside `i64` (floats, large unsigned) keep their JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArticleId {
    Number(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for ArticleId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => Ok(n.as_i64().map_or_else(|| ArticleId::Text(n.to_string()), ArticleId::Number)),
            Value::String(s) => Ok(ArticleId::Text(s)),
            other => Err(de::Error::custom(format!("expected a number or string id, got {other}"))),
        }
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleId::Number(n) => write!(f, "{n}"),
            ArticleId::Text(s) => f.write_str(s),
        }
    }
}

/// A field that is either a single (possibly comma-joined) string or a list.
///
/// Numbers and booleans are kept as their JSON text, in lists too; other
/// list entries (null, objects, nested lists) are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TextOrList {
    Text(String),
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for TextOrList {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => Ok(TextOrList::List(items.into_iter().filter_map(scalar_text).collect())),
            other => scalar_text(other)
                .map(TextOrList::Text)
                .ok_or_else(|| de::Error::custom("expected a string or a list")),
        }
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl TextOrList {
    /// The first entry: the whole string for [`TextOrList::Text`].
    pub fn first(&self) -> Option<&str> {
        match self {
            TextOrList::Text(s) => Some(s.as_str()),
            TextOrList::List(items) => items.first().map(String::as_str),
        }
    }

    /// Display form: the string itself, or the list joined with `", "`.
    pub fn joined(&self) -> String {
        match self {
            TextOrList::Text(s) => s.clone(),
            TextOrList::List(items) => items.join(", "),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            TextOrList::Text(s) => s.is_empty(),
            TextOrList::List(items) => items.is_empty(),
        }
    }
}

/// A publication timestamp as delivered by the API.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Timestamp {
    /// Whether the value counts as "no date" (`0`, `0.0`, NaN or an empty string).
    pub fn is_blank(&self) -> bool {
        match self {
            Timestamp::Integer(n) => *n == 0,
            Timestamp::Float(f) => *f == 0.0 || f.is_nan(),
            Timestamp::Text(s) => s.is_empty(),
        }
    }
}

/// A single news article.
///
/// Every field is optional on the wire; a missing field and an empty string
/// are treated alike by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Article {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<ArticleId>,
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub top_image: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub authors: Option<TextOrList>,
    #[serde(deserialize_with = "lenient")]
    pub publisher_title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub publisher_logo: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub published_date: Option<Timestamp>,
    #[serde(deserialize_with = "lenient")]
    pub news_html: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub news_text: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub keywords: Option<TextOrList>,
    #[serde(deserialize_with = "lenient")]
    pub topic: Option<TextOrList>,
    #[serde(deserialize_with = "lenient")]
    pub url: Option<String>,
    /// Related articles; `None` when the field is absent or not a list.
    #[serde(rename = "relatedNews", deserialize_with = "lenient_related")]
    pub related_news: Option<Vec<RelatedNewsItem>>,
}

impl Article {
    pub fn title(&self) -> Option<&str> {
        non_empty(&self.title)
    }

    pub fn description(&self) -> Option<&str> {
        non_empty(&self.description)
    }

    pub fn top_image(&self) -> Option<&str> {
        non_empty(&self.top_image)
    }

    pub fn publisher_title(&self) -> Option<&str> {
        non_empty(&self.publisher_title)
    }

    /// The publication date, unless it is absent or blank.
    pub fn date(&self) -> Option<&Timestamp> {
        self.published_date.as_ref().filter(|t| !t.is_blank())
    }

    /// Keywords in display form, unless absent or empty.
    pub fn keywords(&self) -> Option<String> {
        self.keywords
            .as_ref()
            .filter(|k| !k.is_empty())
            .map(TextOrList::joined)
    }

    /// Authors in display form, unless absent or empty.
    pub fn authors(&self) -> Option<String> {
        self.authors
            .as_ref()
            .filter(|a| !a.is_empty())
            .map(TextOrList::joined)
    }
}

/// The trimmed article shown in a detail page's related list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RelatedNewsItem {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<ArticleId>,
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub top_image: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub published_date: Option<Timestamp>,
}

/// Prerendered content the API serves to crawlers.
#[derive(Debug, Clone, PartialEq)]
pub struct BotPage {
    pub static_html: String,
    pub structured_data: Value,
    /// Article-like record feeding the meta tags (title, description, image, keywords).
    pub meta_tags: Article,
}

/// A validated API response.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `isPage: false` with a `news` array.
    List(Vec<Article>),
    /// `isPage: true, isBot: false` with a title.
    DetailHuman(Article),
    /// `isPage: true, isBot: true` with `static_html`.
    DetailBot(BotPage),
}

impl Payload {
    /// Validate a decoded response body and classify it.
    ///
    /// # Errors
    ///
    /// [`FrontError::InvalidPayload`] with [`INVALID_PAGE_DATA`] when a page
    /// response lacks `static_html` (bots) or `title` (humans), or with
    /// [`INVALID_NEWS_DATA`] when a list response has no `news` array.
    pub fn from_value(value: Value) -> Result<Self> {
        if truthy(value.get("isPage")) {
            if truthy(value.get("isBot")) {
                let static_html = value
                    .get("static_html")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| FrontError::InvalidPayload(INVALID_PAGE_DATA.to_string()))?
                    .to_string();
                let structured_data = value.get("structured_data").cloned().unwrap_or(Value::Null);
                let meta_tags = match value.get("meta_tags") {
                    Some(v) if !v.is_null() => serde_json::from_value(v.clone()).unwrap_or_else(|e| {
                        warn!(error = %e, "meta_tags did not decode; using defaults");
                        Article::default()
                    }),
                    _ => Article::default(),
                };
                return Ok(Payload::DetailBot(BotPage {
                    static_html,
                    structured_data,
                    meta_tags,
                }));
            }

            let article: Article = serde_json::from_value(value)
                .map_err(|_| FrontError::InvalidPayload(INVALID_PAGE_DATA.to_string()))?;
            if article.title().is_none() {
                return Err(FrontError::InvalidPayload(INVALID_PAGE_DATA.to_string()));
            }
            return Ok(Payload::DetailHuman(article));
        }

        match value.get("news") {
            Some(Value::Array(news)) => {
                let items: Vec<Article> = news
                    .iter()
                    .enumerate()
                    .filter(|(_, item)| !item.is_null())
                    .filter_map(|(index, item)| match serde_json::from_value(item.clone()) {
                        Ok(article) => Some(article),
                        Err(e) => {
                            warn!(index, error = %e, "Skipping news item that did not decode");
                            None
                        }
                    })
                    .collect();
                Ok(Payload::List(items))
            }
            _ => Err(FrontError::InvalidPayload(INVALID_NEWS_DATA.to_string())),
        }
    }
}

pub(crate) fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// JavaScript-style truthiness of a JSON value.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Decode an optional field, reading a value of the wrong shape as absent.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match serde_json::from_value(v) {
        Ok(field) => Some(field),
        Err(e) => {
            debug!(error = %e, "Ignoring field that did not decode");
            None
        }
    }))
}

/// Accept `relatedNews` only when it is a list, skipping entries that are
/// null or not objects.
fn lenient_related<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<RelatedNewsItem>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter(|item| item.is_object())
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_article_accepts_loose_types() {
        let article: Article = serde_json::from_value(json!({
            "id": 42,
            "title": "Budget passes",
            "topic": ["Politics", "Economy"],
            "authors": "Jane Roe",
            "keywords": ["budget", "parliament"],
            "published_date": "1700000000000"
        }))
        .unwrap();

        assert_eq!(article.id, Some(ArticleId::Number(42)));
        assert_eq!(article.topic.as_ref().and_then(TextOrList::first), Some("Politics"));
        assert_eq!(article.authors().as_deref(), Some("Jane Roe"));
        assert_eq!(article.keywords().as_deref(), Some("budget, parliament"));
        assert_eq!(
            article.published_date,
            Some(Timestamp::Text("1700000000000".to_string()))
        );
    }

    #[test]
    fn test_mixed_and_numeric_lists() {
        let payload = Payload::from_value(json!({
            "isPage": true,
            "isBot": false,
            "title": "T",
            "keywords": ["a", 1],
            "topic": [true, null, "Local", {"x": 1}],
            "authors": 7
        }))
        .unwrap();
        let Payload::DetailHuman(article) = payload else {
            panic!("expected human detail");
        };
        assert_eq!(article.keywords().as_deref(), Some("a, 1"));
        assert_eq!(article.topic, Some(TextOrList::List(vec!["true".to_string(), "Local".to_string()])));
        assert_eq!(article.authors().as_deref(), Some("7"));
    }

    #[test]
    fn test_ids_outside_i64() {
        let article: Article = serde_json::from_value(json!({"id": 1.5})).unwrap();
        assert_eq!(article.id, Some(ArticleId::Text("1.5".to_string())));

        let article: Article = serde_json::from_value(json!({"id": u64::MAX})).unwrap();
        assert_eq!(article.id.map(|id| id.to_string()).as_deref(), Some("18446744073709551615"));
    }

    #[test]
    fn test_wrong_field_types_read_as_absent() {
        let payload = Payload::from_value(json!({
            "isPage": true,
            "isBot": false,
            "title": "Still renders",
            "id": {"nested": true},
            "description": 12,
            "publisher_title": ["Daily"],
            "published_date": [1700000000000_i64],
            "keywords": {"a": 1}
        }))
        .unwrap();
        let Payload::DetailHuman(article) = payload else {
            panic!("expected human detail");
        };
        assert_eq!(article.title(), Some("Still renders"));
        assert_eq!(article.id, None);
        assert_eq!(article.description(), None);
        assert_eq!(article.publisher_title(), None);
        assert_eq!(article.published_date, None);
        assert_eq!(article.keywords(), None);
    }

    #[test]
    fn test_article_id_display() {
        assert_eq!(ArticleId::Number(7).to_string(), "7");
        assert_eq!(ArticleId::Text("abc-1".to_string()).to_string(), "abc-1");
    }

    #[test]
    fn test_blank_fields_read_as_absent() {
        let article: Article = serde_json::from_value(json!({
            "title": "",
            "published_date": 0,
            "keywords": ""
        }))
        .unwrap();
        assert_eq!(article.title(), None);
        assert_eq!(article.date(), None);
        assert_eq!(article.keywords(), None);
    }

    #[test]
    fn test_related_news_skips_nulls_and_ignores_non_lists() {
        let article: Article = serde_json::from_value(json!({
            "title": "x",
            "relatedNews": [null, {"id": 1, "title": "One"}, 5]
        }))
        .unwrap();
        let related = article.related_news.unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].title.as_deref(), Some("One"));

        let article: Article =
            serde_json::from_value(json!({"title": "x", "relatedNews": "nope"})).unwrap();
        assert!(article.related_news.is_none());
    }

    #[test]
    fn test_payload_list() {
        let payload = Payload::from_value(json!({
            "isPage": false,
            "news": [{"id": 1, "title": "A"}, null, "junk", {"id": 2, "title": "B"}]
        }))
        .unwrap();
        match payload {
            Payload::List(items) => assert_eq!(items.len(), 2),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_payload_list_requires_array() {
        let err = Payload::from_value(json!({"isPage": false, "news": {"id": 1}})).unwrap_err();
        assert_eq!(err.to_string(), INVALID_NEWS_DATA);

        let err = Payload::from_value(json!({})).unwrap_err();
        assert_eq!(err.to_string(), INVALID_NEWS_DATA);
    }

    #[test]
    fn test_payload_human_detail_requires_title() {
        let err = Payload::from_value(json!({"isPage": true, "isBot": false})).unwrap_err();
        assert_eq!(err.to_string(), INVALID_PAGE_DATA);

        let payload =
            Payload::from_value(json!({"isPage": true, "isBot": false, "title": "Hello"})).unwrap();
        assert!(matches!(payload, Payload::DetailHuman(a) if a.title() == Some("Hello")));
    }

    #[test]
    fn test_payload_bot_requires_static_html() {
        let err = Payload::from_value(json!({
            "isPage": true,
            "isBot": true,
            "meta_tags": {"title": "T"}
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), INVALID_PAGE_DATA);
    }

    #[test]
    fn test_payload_bot() {
        let payload = Payload::from_value(json!({
            "isPage": true,
            "isBot": true,
            "static_html": "<article>Body</article>",
            "structured_data": {"@type": "NewsArticle"},
            "meta_tags": {"title": "Crawled", "description": "D"}
        }))
        .unwrap();
        match payload {
            Payload::DetailBot(bot) => {
                assert_eq!(bot.static_html, "<article>Body</article>");
                assert_eq!(bot.structured_data["@type"], "NewsArticle");
                assert_eq!(bot.meta_tags.title(), Some("Crawled"));
            }
            other => panic!("expected bot page, got {other:?}"),
        }
    }

    #[test]
    fn test_truthiness() {
        assert!(!truthy(None));
        assert!(!truthy(Some(&json!(0))));
        assert!(!truthy(Some(&json!(""))));
        assert!(truthy(Some(&json!(1))));
        assert!(truthy(Some(&json!("yes"))));
        assert!(truthy(Some(&json!({}))));
    }
}
