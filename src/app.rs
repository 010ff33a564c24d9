//! Page controller: one load per page view, then category filtering.
//!
//! [`NewsPage::load`] runs the whole page lifecycle: fetch, validate, render,
//! and on any failure show "Error loading data." in place. A successful list
//! load returns the [`AppState`] that later category clicks read from.

use crate::error::Result;
use crate::fetch::{NewsApi, PageLocation};
use crate::models::{Article, Payload};
use crate::render::{self, PageRenderer, ViewState};
use crate::surface::Surface;
use crate::topics::{ALL_TOPICS, TopicSet, filter_by_category};
use crate::utils::truncate_for_log;
use crate::view::PageView;
use tracing::{error, info, instrument};

/// Articles from the last list load and the topics derived from them.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    all_news: Vec<Article>,
    topics: TopicSet,
    active_category: String,
}

impl AppState {
    pub fn new(articles: Vec<Article>) -> Self {
        let topics = TopicSet::extract(&articles);
        Self {
            all_news: articles,
            topics,
            active_category: ALL_TOPICS.to_string(),
        }
    }

    /// Category bar plus grid for the current category.
    pub fn view(&self) -> PageView {
        let mut view = PageView::default();
        view.push(render::category_bar(&self.topics, self.topics.position(&self.active_category)));
        let visible = filter_by_category(&self.all_news, &self.active_category);
        view.extend(render::list_view(&visible).patches);
        view
    }

    /// Switch to `category` and return the view to apply.
    ///
    /// [`ALL_TOPICS`] restores the full list.
    pub fn select_category(&mut self, category: &str) -> PageView {
        self.active_category = category.to_string();
        let view = self.view();
        info!(
            category,
            shown = filter_by_category(&self.all_news, category).len(),
            total = self.all_news.len(),
            "Category selected"
        );
        view
    }
}

/// A page view bound to its location and API.
#[derive(Debug)]
pub struct NewsPage<A> {
    api: A,
    location: PageLocation,
    renderer: PageRenderer,
}

impl<A: NewsApi> NewsPage<A> {
    pub fn new(api: A, location: PageLocation, renderer: PageRenderer) -> Self {
        Self {
            api,
            location,
            renderer,
        }
    }

    pub fn location(&self) -> &PageLocation {
        &self.location
    }

    /// Fetch and render onto `surface`.
    ///
    /// Returns the list state after a list load, `None` after a detail load
    /// or a failure. Failures are logged and rendered inline, never returned.
    #[instrument(level = "info", skip_all, fields(url = %self.location.href()))]
    pub async fn load<S: Surface>(&self, surface: &mut S) -> Option<AppState> {
        match self.try_load(surface).await {
            Ok(state) => state,
            Err(e) => {
                error!(error = %e, "Error fetching data");
                surface.apply_view(&render::error_view(self.location.is_detail()));
                None
            }
        }
    }

    async fn try_load<S: Surface>(&self, surface: &mut S) -> Result<Option<AppState>> {
        let body = self.api.fetch(&self.location.request_context()).await?;
        let payload = Payload::from_value(body.clone()).inspect_err(|e| {
            error!(
                error = %e,
                body = %truncate_for_log(&body.to_string(), 300),
                "Rejected payload"
            );
        })?;

        let state = ViewState::of(&payload);
        info!(?state, "Rendering page");
        match payload {
            Payload::List(articles) => {
                let app_state = AppState::new(articles);
                surface.apply_view(&app_state.view());
                Ok(Some(app_state))
            }
            detail => {
                if let Some(view) = self.renderer.detail(&detail) {
                    surface.apply_view(&view);
                }
                Ok(None)
            }
        }
    }
}
