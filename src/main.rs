//! # Awful News Front
//!
//! Renders the news site's pages from the news API: the home page as a grid of
//! article cards with a category bar, and an article page with its SEO meta
//! tags, canonical link and JSON-LD kept in sync with the article shown.
//!
//! ## Usage
//!
//! ```sh
//! awful_news_front --url "https://news.example/?news=42" -o ./out/42.html
//! ```
//!
//! ## Architecture
//!
//! One page load runs straight through:
//! 1. **Fetch**: POST the page's host, query string and referrer to `/news`
//! 2. **Validate**: classify the answer as a list, a human detail or a bot detail
//! 3. **Render**: build a [`view::PageView`] of patches for that payload
//! 4. **Apply**: patch the template [`dom::Document`] and write it out
//!
//! Any failure along the way is logged and rendered as "Error loading data."
//! in the region the page was about to fill.

use clap::Parser;
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod app;
mod cli;
mod config;
mod dates;
mod dom;
mod error;
mod fetch;
mod metadata;
mod models;
mod output;
mod render;
mod surface;
mod topics;
mod utils;
mod view;

use app::NewsPage;
use cli::Cli;
use config::{FrontConfig, load_config};
use dom::Document;
use fetch::{HttpNewsApi, PageLocation};
use metadata::MetadataSynchronizer;
use render::PageRenderer;
use surface::Surface;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_front starting up");

    let args = Cli::parse();
    debug!(?args.url, ?args.template, ?args.output, "Parsed CLI arguments");

    let mut config = match args.config.as_deref() {
        Some(path) => load_config(path).await?,
        None => FrontConfig::default(),
    };
    if let Some(base) = args.api_base_url {
        config.api_base_url = base;
    }

    let template = output::load_template(args.template.as_deref()).await?;
    let mut doc = Document::parse(&template);

    let location = PageLocation::parse(&args.url, args.referrer)?;
    let api = HttpNewsApi::new(&config.api_base_url);
    info!(endpoint = %api.endpoint(), detail = location.is_detail(), "Loading page");

    let metadata = MetadataSynchronizer::new(location.href()).with_default_image(&config.default_image);
    let page = NewsPage::new(api, location, PageRenderer::new(metadata));

    let state = page.load(&mut doc).await;
    match (state, args.category.as_deref()) {
        (Some(mut state), Some(category)) => doc.apply_view(&state.select_category(category)),
        (None, Some(category)) => {
            warn!(category, "Category ignored: no news list was loaded");
        }
        _ => {}
    }

    output::write_page(&doc.to_html()?, args.output.as_deref()).await?;

    let elapsed = start_time.elapsed();
    info!(
        elapsed_secs = elapsed.as_secs_f64(),
        "Rendered {} in {:.2?}",
        page.location().href(),
        elapsed
    );

    Ok(())
}
