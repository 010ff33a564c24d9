//! Topic extraction and category filtering for the list view.
//!
//! The category bar always starts with [`ALL_TOPICS`], followed by every
//! distinct topic label in the order it was first seen across the articles.

use crate::models::{Article, TextOrList};
use itertools::Itertools;
use std::iter;

/// The sentinel category that disables filtering.
pub const ALL_TOPICS: &str = "All";

/// Ordered, de-duplicated topic labels. The first entry is always [`ALL_TOPICS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSet(Vec<String>);

impl TopicSet {
    /// Collect the topics of `articles`.
    ///
    /// Comma-joined topic strings are split and trimmed; list topics are
    /// taken verbatim.
    pub fn extract(articles: &[Article]) -> Self {
        let labels = articles
            .iter()
            .filter_map(|a| a.topic.as_ref())
            .flat_map(|topic| match topic {
                TextOrList::Text(s) => s
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>(),
                TextOrList::List(items) => items.clone(),
            });

        TopicSet(
            iter::once(ALL_TOPICS.to_string())
                .chain(labels)
                .unique()
                .collect(),
        )
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    /// Position of `label` in the bar, if present.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.0.iter().position(|t| t == label)
    }
}

impl Default for TopicSet {
    fn default() -> Self {
        TopicSet(vec![ALL_TOPICS.to_string()])
    }
}

/// Whether `article` belongs to `category`.
///
/// Matching is a case-insensitive substring test against the topic string or
/// any element of the topic list. [`ALL_TOPICS`] matches everything; articles
/// without a topic match nothing else.
pub fn matches_category(article: &Article, category: &str) -> bool {
    if category == ALL_TOPICS {
        return true;
    }
    let needle = category.to_lowercase();
    match &article.topic {
        None => false,
        Some(TextOrList::Text(s)) => s.to_lowercase().contains(&needle),
        Some(TextOrList::List(items)) => items.iter().any(|t| t.to_lowercase().contains(&needle)),
    }
}

/// The articles shown for `category`, in their original order.
pub fn filter_by_category<'a>(articles: &'a [Article], category: &str) -> Vec<&'a Article> {
    articles
        .iter()
        .filter(|a| matches_category(a, category))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_topic(topic: TextOrList) -> Article {
        Article {
            topic: Some(topic),
            ..Default::default()
        }
    }

    fn text(s: &str) -> TextOrList {
        TextOrList::Text(s.to_string())
    }

    fn list(items: &[&str]) -> TextOrList {
        TextOrList::List(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_extract_order_and_dedup() {
        let articles = vec![with_topic(text("Tech, Sports")), with_topic(list(&["Tech", "Health"]))];
        let topics = TopicSet::extract(&articles);
        assert_eq!(topics.labels(), ["All", "Tech", "Sports", "Health"]);
    }

    #[test]
    fn test_extract_empty_and_untopical() {
        assert_eq!(TopicSet::extract(&[]).labels(), ["All"]);
        let articles = vec![Article::default(), with_topic(text(" , Local ,"))];
        assert_eq!(TopicSet::extract(&articles).labels(), ["All", "Local"]);
    }

    #[test]
    fn test_extract_does_not_repeat_all() {
        let articles = vec![with_topic(list(&["All", "World"]))];
        assert_eq!(TopicSet::extract(&articles).labels(), ["All", "World"]);
    }

    #[test]
    fn test_matches_case_insensitive_substring() {
        assert!(matches_category(&with_topic(text("Tech, Sports")), "sports"));
        assert!(matches_category(&with_topic(list(&["Health", "TECHNOLOGY"])), "tech"));
        assert!(!matches_category(&with_topic(text("Politics")), "Tech"));
        assert!(!matches_category(&Article::default(), "Tech"));
        assert!(matches_category(&Article::default(), ALL_TOPICS));
    }

    #[test]
    fn test_filter_all_restores_everything() {
        let articles = vec![
            with_topic(text("Tech")),
            with_topic(text("Sports")),
            Article::default(),
        ];
        assert_eq!(filter_by_category(&articles, "Tech").len(), 1);
        assert_eq!(filter_by_category(&articles, ALL_TOPICS).len(), 3);
    }

    #[test]
    fn test_position() {
        let topics = TopicSet::extract(&[with_topic(text("A, B"))]);
        assert_eq!(topics.position("B"), Some(2));
        assert_eq!(topics.position("A"), Some(1));
        assert_eq!(topics.position("C"), None);
    }
}
