//! Page rendering: validated payload in, [`PageView`] out.
//!
//! Three terminal states, chosen by the [`Payload`] variant:
//!
//! | Payload | View |
//! |---------|------|
//! | [`Payload::List`] | grid of article cards, newest first |
//! | [`Payload::DetailHuman`] | full article with metadata, JSON-LD, related list and ads |
//! | [`Payload::DetailBot`] | server-prerendered HTML, provided metadata, no chrome |
//!
//! Nothing here touches a document; the returned patches are applied by a
//! [`Surface`](crate::surface::Surface).

use crate::dates::{format_date, sort_key};
use crate::metadata::MetadataSynchronizer;
use crate::models::{Article, ArticleId, BotPage, Payload, RelatedNewsItem, TextOrList};
use crate::topics::TopicSet;
use crate::view::{Display, PageView, Patch};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::cmp::Reverse;
use tracing::debug;

/// Selectors of the page template the renderer writes to.
pub mod targets {
    pub const NEWS_GRID: &str = "#news-grid";
    pub const NEWS_DETAIL: &str = "#news";
    pub const NEWS_TOPIC: &str = "#news-topic";
    pub const NEWS_TITLE: &str = "#news-title";
    pub const NEWS_IMAGE: &str = "#news-image";
    pub const NEWS_DESCRIPTION: &str = "#news-description";
    pub const NEWS_AUTHOR: &str = "#news-author span";
    pub const NEWS_PUBLISHER: &str = "#news-publisher span";
    pub const NEWS_DATE: &str = "#news-published_date span";
    pub const NEWS_CONTENT: &str = "#news-content";
    pub const NEWS_KEYWORDS: &str = "#news-keywords span";
    pub const RELATED_LIST: &str = "#related-news-list";
    pub const NAV_CATEGORIES: &str = ".nav-categories";
    pub const ADS_TOP: &str = ".ads-container-top";
    pub const ADS_MIDDLE: &str = ".ads-container-middle";
}

use targets::*;

pub const ERROR_LOADING: &str = "Error loading data.";
pub const NO_NEWS: &str = "No news available for this category";
pub const NO_RELATED: &str = "No related news available";

/// Detail chrome a crawler does not need.
const BOT_REMOVED: &[&str] = &[
    ".breadcrumb",
    "#news-title",
    ".post-meta",
    "#news-image",
    "#news-description",
    "#news-keywords",
];

/// Blocks hidden from crawlers.
const BOT_HIDDEN: &[&str] = &[".share-buttons", ADS_TOP, ADS_MIDDLE, ".related-titles"];

/// Which of the three views a payload lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    List,
    DetailHuman,
    DetailBot,
}

impl ViewState {
    pub fn of(payload: &Payload) -> Self {
        match payload {
            Payload::List(_) => ViewState::List,
            Payload::DetailHuman(_) => ViewState::DetailHuman,
            Payload::DetailBot(_) => ViewState::DetailBot,
        }
    }
}

/// Renders detail pages; list rendering needs no metadata and lives in
/// [`list_view`] and [`category_bar`].
#[derive(Debug, Clone)]
pub struct PageRenderer {
    metadata: MetadataSynchronizer,
}

impl PageRenderer {
    pub fn new(metadata: MetadataSynchronizer) -> Self {
        Self { metadata }
    }

    /// View for a detail payload. List payloads go through
    /// [`AppState`](crate::app::AppState) so topics are cached first.
    pub fn detail(&self, payload: &Payload) -> Option<PageView> {
        match payload {
            Payload::DetailHuman(article) => Some(self.human_detail(article)),
            Payload::DetailBot(bot) => Some(self.bot_detail(bot)),
            Payload::List(_) => None,
        }
    }

    /// Full article view for a human visitor.
    pub fn human_detail(&self, article: &Article) -> PageView {
        let mut view = PageView::default();
        view.push(Patch::display(NEWS_GRID, Display::None));
        view.push(Patch::display(NEWS_DETAIL, Display::Block));

        let topic = article
            .topic
            .as_ref()
            .and_then(TextOrList::first)
            .filter(|t| !t.is_empty())
            .unwrap_or("General");
        view.push(Patch::text(NEWS_TOPIC, topic));

        view.push(Patch::text(NEWS_TITLE, article.title().unwrap_or("Title not available")));
        view.push(Patch::attr(NEWS_IMAGE, "src", article.top_image().unwrap_or("")));
        view.push(Patch::display(
            NEWS_IMAGE,
            if article.top_image().is_some() {
                Display::Block
            } else {
                Display::None
            },
        ));
        view.push(Patch::text(
            NEWS_DESCRIPTION,
            article.description().unwrap_or("Description not available."),
        ));
        view.push(Patch::text(NEWS_AUTHOR, article.authors().unwrap_or_else(|| "Unknown".to_string())));
        view.push(Patch::text(NEWS_PUBLISHER, article.publisher_title().unwrap_or("Unknown")));
        view.push(Patch::text(NEWS_DATE, format_date(article.published_date.as_ref())));
        view.push(Patch::html(
            NEWS_CONTENT,
            crate::models::non_empty(&article.news_html).unwrap_or("No content available"),
        ));
        view.push(Patch::text(NEWS_KEYWORDS, article.keywords().unwrap_or_else(|| "N/A".to_string())));

        view.extend(self.metadata.patches(article));
        view.push(Patch::JsonLd(self.metadata.json_ld(article)));

        view.push(related_list(article.related_news.as_deref()));

        view.push(Patch::display(ADS_TOP, Display::Flex));
        view.push(Patch::display(ADS_MIDDLE, Display::Flex));
        view
    }

    /// Prerendered view for a crawler.
    pub fn bot_detail(&self, bot: &BotPage) -> PageView {
        let mut view = PageView::default();
        view.push(Patch::display(NEWS_GRID, Display::None));
        view.push(Patch::display(NEWS_DETAIL, Display::Block));
        view.extend(BOT_REMOVED.iter().map(|s| Patch::remove(s)));
        view.push(Patch::html(NEWS_CONTENT, bot.static_html.as_str()));
        view.extend(self.metadata.patches(&bot.meta_tags));
        view.push(Patch::JsonLd(bot.structured_data.clone()));
        view.extend(BOT_HIDDEN.iter().map(|s| Patch::display(s, Display::None)));
        view
    }
}

/// The inline error shown when a load fails.
pub fn error_view(is_detail: bool) -> PageView {
    let target = if is_detail { NEWS_TITLE } else { NEWS_GRID };
    PageView {
        patches: vec![Patch::text(target, ERROR_LOADING)],
    }
}

/// The article grid for `items`.
pub fn list_view(items: &[&Article]) -> PageView {
    let mut view = PageView::default();
    if items.is_empty() {
        view.push(Patch::html(NEWS_GRID, format!(r#"<div class="no-news">{NO_NEWS}</div>"#)));
        return view;
    }
    let cards: String = sort_for_display(items).into_iter().map(card).collect();
    view.push(Patch::html(NEWS_GRID, cards));
    view
}

/// The category bar with `active` highlighted.
pub fn category_bar(topics: &TopicSet, active: Option<usize>) -> Patch {
    let links: String = topics
        .labels()
        .iter()
        .enumerate()
        .map(|(i, topic)| {
            let class = if Some(i) == active {
                "nav-category active"
            } else {
                "nav-category"
            };
            format!(
                r##"<a href="#" class="{class}" data-topic="{}">{}</a>"##,
                attr(topic),
                text(topic)
            )
        })
        .collect();
    Patch::html(NAV_CATEGORIES, links)
}

/// Dated articles newest first, then undated ones in received order.
///
/// Dates that fail to parse still count as dated and sort after every
/// parseable one.
pub fn sort_for_display<'a>(items: &[&'a Article]) -> Vec<&'a Article> {
    let (mut dated, undated): (Vec<&Article>, Vec<&Article>) =
        items.iter().copied().partition(|a| a.date().is_some());
    dated.sort_by_key(|a| Reverse(a.date().and_then(sort_key)));
    debug!(dated = dated.len(), undated = undated.len(), "Sorted list items");
    dated.extend(undated);
    dated
}

fn news_href(id: Option<&ArticleId>) -> String {
    let id = id.map(ToString::to_string).unwrap_or_default();
    format!("?news={}", urlencoding::encode(&id))
}

fn meta_span(icon: &str, value: &str) -> String {
    format!(r#"<span><i class="{icon}"></i> {}</span>"#, text(value))
}

fn card(article: &Article) -> String {
    let title = article.title().unwrap_or("Untitled");
    format!(
        concat!(
            r#"<div class="news-item">"#,
            r#"<img src="{src}" alt="{alt}">"#,
            r#"<div class="news-info">"#,
            r#"<h2 class="title"><a href="{href}">{title}</a></h2>"#,
            r#"<div class="description">{description}</div>"#,
            r#"<div class="news-meta">{date}{publisher}</div>"#,
            "</div></div>"
        ),
        src = attr(article.top_image().unwrap_or("")),
        alt = attr(title),
        href = attr(&news_href(article.id.as_ref())),
        title = text(title),
        description = text(article.description().unwrap_or("")),
        date = meta_span("far fa-clock", &format_date(article.published_date.as_ref())),
        publisher = meta_span("far fa-newspaper", article.publisher_title().unwrap_or("Unknown")),
    )
}

fn related_list(items: Option<&[RelatedNewsItem]>) -> Patch {
    let Some(items) = items else {
        return Patch::html(RELATED_LIST, format!("<p>{NO_RELATED}</p>"));
    };
    Patch::html(RELATED_LIST, items.iter().map(related_card).collect::<String>())
}

fn related_card(item: &RelatedNewsItem) -> String {
    let title = crate::models::non_empty(&item.title).unwrap_or("Untitled");
    let external = crate::models::non_empty(&item.url);
    let href = match external {
        Some(url) => format!("{url}{}", news_href(item.id.as_ref())),
        None => news_href(item.id.as_ref()),
    };
    let target = if external.is_some() { "_blank" } else { "_self" };

    format!(
        concat!(
            r#"<div class="news-item">"#,
            r#"<div class="related-image"><img src="{src}" alt="{alt}"></div>"#,
            r#"<h3 class="title"><a href="{href}" target="{target}">{title}</a></h3>"#,
            r#"<div class="news-meta">{date}</div>"#,
            "</div>"
        ),
        src = attr(crate::models::non_empty(&item.top_image).unwrap_or("")),
        alt = attr(title),
        href = attr(&href),
        target = target,
        title = text(title),
        date = meta_span("far fa-clock", &format_date(item.published_date.as_ref())),
    )
}
