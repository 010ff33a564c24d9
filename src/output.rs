//! Template input and rendered page output.
//!
//! The renderer reads one HTML template and writes one HTML page. Without a
//! `--template` the built-in `templates/index.html` is used; without an
//! `--output` the page goes to stdout.

use crate::utils::ensure_parent_writable;
use std::error::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, instrument};

/// The page template compiled into the binary.
pub const BUILTIN_TEMPLATE: &str = include_str!("../templates/index.html");

/// Read the page template from `path`, or return the built-in one.
#[instrument(level = "info", skip_all, fields(path = ?path))]
pub async fn load_template(path: Option<&str>) -> Result<String, Box<dyn Error>> {
    let Some(path) = path else {
        info!("Using built-in template");
        return Ok(BUILTIN_TEMPLATE.to_string());
    };
    match fs::read_to_string(path).await {
        Ok(html) => {
            info!(bytes = html.len(), "Loaded template");
            Ok(html)
        }
        Err(e) => {
            error!(error = %e, "Failed to read template");
            Err(e.into())
        }
    }
}

/// Write the rendered page to `path`, or to stdout.
#[instrument(level = "info", skip_all, fields(path = ?path, bytes = html.len()))]
pub async fn write_page(html: &str, path: Option<&str>) -> Result<(), Box<dyn Error>> {
    match path {
        Some(path) => {
            ensure_parent_writable(path).await?;
            fs::write(path, html).await?;
            info!("Wrote page");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(html.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builtin_template_when_no_path() {
        let html = load_template(None).await.unwrap();
        assert!(html.contains(r#"id="news-grid""#));
        assert!(html.contains(r#"id="news""#));
    }

    #[tokio::test]
    async fn test_missing_template_is_error() {
        assert!(load_template(Some("/nonexistent/template.html")).await.is_err());
    }

    #[tokio::test]
    async fn test_write_then_read_back() {
        let dir = std::env::temp_dir().join(format!("news_front_out_{}", std::process::id()));
        let file = dir.join("page.html");
        let path = file.to_str().unwrap();

        write_page("<p>hi</p>", Some(path)).await.unwrap();
        assert_eq!(load_template(Some(path)).await.unwrap(), "<p>hi</p>");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
