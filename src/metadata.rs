//! SEO metadata for detail pages.
//!
//! [`MetadataSynchronizer::patches`] yields one upsert per head tag, so
//! applying it any number of times leaves exactly one tag of each kind holding
//! the latest value. [`MetadataSynchronizer::json_ld`] builds the schema.org
//! `NewsArticle` object that replaces any existing JSON-LD block.

use crate::dates::format_date;
use crate::models::Article;
use crate::view::{MetaKey, Patch};
use serde_json::{Value, json};

pub const DEFAULT_TITLE: &str = "News Article";
pub const DEFAULT_DESCRIPTION: &str = "Read the latest news update.";
pub const DEFAULT_KEYWORDS: &str = "news, article";
pub const DEFAULT_IMAGE: &str = "default-image.jpg";
pub const TWITTER_CARD: &str = "summary_large_image";

/// Builds head metadata for the page at `page_url`.
#[derive(Debug, Clone)]
pub struct MetadataSynchronizer {
    page_url: String,
    default_image: String,
}

impl MetadataSynchronizer {
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            default_image: DEFAULT_IMAGE.to_string(),
        }
    }

    /// Image used for `og:image` / `twitter:image` when the article has none.
    pub fn with_default_image(mut self, image: impl Into<String>) -> Self {
        self.default_image = image.into();
        self
    }

    /// Title, meta tags and canonical link for `article`.
    pub fn patches(&self, article: &Article) -> Vec<Patch> {
        let title = article.title().unwrap_or(DEFAULT_TITLE);
        let description = article.description().unwrap_or(DEFAULT_DESCRIPTION);
        let image = article.top_image().unwrap_or(self.default_image.as_str());
        let keywords = article.keywords().unwrap_or_else(|| DEFAULT_KEYWORDS.to_string());

        vec![
            Patch::Title(title.to_string()),
            Patch::meta(MetaKey::Name, "description", description),
            Patch::meta(MetaKey::Property, "og:title", title),
            Patch::meta(MetaKey::Property, "og:description", description),
            Patch::meta(MetaKey::Property, "og:url", self.page_url.as_str()),
            Patch::meta(MetaKey::Property, "og:image", image),
            Patch::meta(MetaKey::Name, "twitter:card", TWITTER_CARD),
            Patch::meta(MetaKey::Name, "twitter:title", title),
            Patch::meta(MetaKey::Name, "twitter:description", description),
            Patch::meta(MetaKey::Name, "twitter:image", image),
            Patch::meta(MetaKey::Name, "keywords", keywords),
            Patch::Link {
                rel: "canonical".to_string(),
                href: self.page_url.clone(),
            },
        ]
    }

    /// The schema.org `NewsArticle` for `article`.
    pub fn json_ld(&self, article: &Article) -> Value {
        let date = format_date(article.published_date.as_ref());
        json!({
            "@context": "https://schema.org",
            "@type": "NewsArticle",
            "headline": article.title,
            "description": article.description,
            "image": [article.top_image],
            "datePublished": date,
            "dateModified": date,
            "author": {
                "@type": "Person",
                "name": article.authors(),
            },
            "publisher": {
                "@type": "Organization",
                "name": article.publisher_title,
                "logo": {
                    "@type": "ImageObject",
                    "url": article.publisher_logo.as_deref().unwrap_or(""),
                },
            },
            "mainEntityOfPage": {
                "@type": "WebPage",
                "@id": self.page_url,
            },
            "keywords": article.keywords(),
            "articleBody": article.news_text.as_deref().unwrap_or(""),
            "url": self.page_url,
        })
    }
}
