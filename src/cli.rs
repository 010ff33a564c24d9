//! Command-line interface definitions.
//!
//! Renders one page view: the page URL decides list vs. detail the same way the
//! browser's location would, and the result is written as HTML.

use clap::Parser;

/// Command-line arguments for rendering a news page.
///
/// # Examples
///
/// ```sh
/// # Home page to stdout
/// awful_news_front --url https://news.example/
///
/// # Article page into a file, using a custom template
/// awful_news_front --url "https://news.example/?news=42" -t page.html -o out/42.html
///
/// # Home page filtered to one category
/// awful_news_front --url https://news.example/ --category Sports
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Page URL being rendered, e.g. `https://news.example/?news=42`
    #[arg(short, long)]
    pub url: String,

    /// Referring page sent to the API as `ref`
    #[arg(short, long)]
    pub referrer: Option<String>,

    /// HTML template to render into (built-in template when omitted)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Output file for the rendered HTML (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Category to select after a list load
    #[arg(long)]
    pub category: Option<String>,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// News API base URL, overriding the config file
    #[arg(long, env = "NEWS_API_BASE_URL")]
    pub api_base_url: Option<String>,
}
