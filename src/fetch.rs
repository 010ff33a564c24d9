//! News API access.
//!
//! One request per page load: the page's host, query string and referrer are
//! POSTed as JSON to `{api_base_url}/news`, and the JSON answer is handed back
//! undecoded for [`Payload::from_value`](crate::models::Payload::from_value) to
//! validate. There is no retry, timeout or cancellation.
//!
//! # Architecture
//!
//! - [`PageLocation`]: the page URL and referrer, the client-side inputs
//! - [`RequestContext`]: the request body derived from a location
//! - [`NewsApi`]: the transport seam; [`HttpNewsApi`] is the `reqwest` client

use crate::error::{FrontError, Result};
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// The page being rendered: its URL and the referring page, if any.
#[derive(Debug, Clone)]
pub struct PageLocation {
    url: Url,
    referrer: Option<String>,
}

impl PageLocation {
    /// # Errors
    ///
    /// [`FrontError::InvalidUrl`] if `url` is not absolute.
    pub fn parse(url: &str, referrer: Option<String>) -> Result<Self> {
        Ok(Self {
            url: Url::parse(url)?,
            referrer,
        })
    }

    pub fn href(&self) -> &str {
        self.url.as_str()
    }

    /// Hostname, with `:port` when the URL names a non-default port.
    pub fn host(&self) -> String {
        let hostname = self.url.host_str().unwrap_or("");
        match self.url.port() {
            Some(port) => format!("{hostname}:{port}"),
            None => hostname.to_string(),
        }
    }

    /// The query string including `?`, or empty.
    pub fn search(&self) -> String {
        match self.url.query() {
            Some(q) if !q.is_empty() => format!("?{q}"),
            _ => String::new(),
        }
    }

    /// The `news` query parameter, which selects a detail page.
    pub fn news_id(&self) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == "news")
            .map(|(_, v)| v.into_owned())
    }

    pub fn is_detail(&self) -> bool {
        self.news_id().is_some_and(|id| !id.is_empty())
    }

    pub fn request_context(&self) -> RequestContext {
        RequestContext {
            host: self.host(),
            search: self.search(),
            referrer: self.referrer.clone().unwrap_or_default(),
        }
    }
}

/// Body of the news request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestContext {
    pub host: String,
    pub search: String,
    #[serde(rename = "ref")]
    pub referrer: String,
}

/// Transport for the news request.
///
/// Implementors return the decoded JSON body of a successful response, or
/// [`FrontError::Network`] for transport failures, non-2xx statuses and
/// bodies that are not JSON.
pub trait NewsApi {
    async fn fetch(&self, context: &RequestContext) -> Result<Value>;
}

/// The HTTP client for the news API.
#[derive(Debug, Clone)]
pub struct HttpNewsApi {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpNewsApi {
    pub fn new(api_base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: news_endpoint(api_base_url),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl NewsApi for HttpNewsApi {
    #[instrument(level = "info", skip_all, fields(endpoint = %self.endpoint, search = %context.search))]
    async fn fetch(&self, context: &RequestContext) -> Result<Value> {
        let t0 = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(context)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, elapsed_ms = t0.elapsed().as_millis() as u64, "News API returned an error status");
            return Err(FrontError::Network(format!("status {status}")));
        }

        let body = response.json::<Value>().await?;
        info!(%status, elapsed_ms = t0.elapsed().as_millis() as u64, "Fetched news payload");
        debug!(is_page = ?body.get("isPage"), "Payload kind");
        Ok(body)
    }
}

fn news_endpoint(api_base_url: &str) -> String {
    format!("{}/news", api_base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Accept one connection, answer it with `response`, and hand back the
    /// raw request that was received.
    async fn serve_once(response: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/api", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&request[..end]).to_lowercase();
                    let length = head
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            String::from_utf8(request).unwrap()
        });
        (base, handle)
    }

    fn http_response(status: &str, content_type: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn local_api(base: &str) -> HttpNewsApi {
        HttpNewsApi {
            client: reqwest::Client::builder().no_proxy().build().unwrap(),
            endpoint: news_endpoint(base),
        }
    }

    fn context() -> RequestContext {
        RequestContext {
            host: "news.example".to_string(),
            search: "?news=42".to_string(),
            referrer: "https://search.example/".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_posts_json_context() {
        let (base, server) =
            serve_once(http_response("200 OK", "application/json", r#"{"isPage":false,"news":[]}"#)).await;

        let body = local_api(&base).fetch(&context()).await.unwrap();
        assert_eq!(body, serde_json::json!({"isPage": false, "news": []}));

        let request = server.await.unwrap();
        let (head, payload) = request.split_once("\r\n\r\n").unwrap();
        assert!(head.starts_with("POST /api/news HTTP/1.1\r\n"), "{head}");
        let head = head.to_lowercase();
        assert!(head.contains("content-type: application/json"), "{head}");
        assert!(head.contains("accept: application/json"), "{head}");
        let sent: Value = serde_json::from_str(payload).unwrap();
        assert_eq!(
            sent,
            serde_json::json!({"host": "news.example", "search": "?news=42", "ref": "https://search.example/"})
        );
    }

    #[tokio::test]
    async fn test_fetch_error_status_is_network_error() {
        let (base, server) =
            serve_once(http_response("500 Internal Server Error", "application/json", r#"{"error":"boom"}"#)).await;
        let err = local_api(&base).fetch(&context()).await.unwrap_err();
        assert!(matches!(&err, FrontError::Network(msg) if msg.contains("500")), "{err}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_non_json_body_is_network_error() {
        let (base, server) = serve_once(http_response("200 OK", "text/html", "<html>maintenance</html>")).await;
        let err = local_api(&base).fetch(&context()).await.unwrap_err();
        assert!(matches!(err, FrontError::Network(_)), "{err}");
        server.await.unwrap();
    }

    #[test]
    fn test_request_context_from_detail_url() {
        let loc = PageLocation::parse(
            "https://news.example:8443/read?news=42&utm=x",
            Some("https://search.example/".to_string()),
        )
        .unwrap();
        assert_eq!(
            loc.request_context(),
            RequestContext {
                host: "news.example:8443".to_string(),
                search: "?news=42&utm=x".to_string(),
                referrer: "https://search.example/".to_string(),
            }
        );
        assert_eq!(loc.news_id().as_deref(), Some("42"));
        assert!(loc.is_detail());
    }

    #[test]
    fn test_request_context_from_home_url() {
        let loc = PageLocation::parse("https://news.example/", None).unwrap();
        let ctx = loc.request_context();
        assert_eq!(ctx.host, "news.example");
        assert_eq!(ctx.search, "");
        assert_eq!(ctx.referrer, "");
        assert!(!loc.is_detail());
    }

    #[test]
    fn test_default_port_is_omitted() {
        let loc = PageLocation::parse("https://news.example:443/?", None).unwrap();
        assert_eq!(loc.host(), "news.example");
        assert_eq!(loc.search(), "");
    }

    #[test]
    fn test_request_body_uses_ref_key() {
        let ctx = RequestContext {
            host: "h".to_string(),
            search: "?news=1".to_string(),
            referrer: "r".to_string(),
        };
        let body = serde_json::to_value(&ctx).unwrap();
        assert_eq!(body, serde_json::json!({"host": "h", "search": "?news=1", "ref": "r"}));
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(news_endpoint("https://api.example/api"), "https://api.example/api/news");
        assert_eq!(news_endpoint("https://api.example/api/"), "https://api.example/api/news");
        assert_eq!(HttpNewsApi::new("http://localhost:3000").endpoint(), "http://localhost:3000/news");
    }

    #[test]
    fn test_relative_url_rejected() {
        assert!(matches!(
            PageLocation::parse("/?news=1", None),
            Err(FrontError::InvalidUrl(_))
        ));
    }
}
