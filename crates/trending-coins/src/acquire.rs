//! Document acquisition from the web, a saved snapshot, or a string.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::document::ParsedDocument;
use crate::renderer::chromium::ChromiumRenderer;
use crate::renderer::{RenderContext, Renderer};
use crate::selector::Field;
use crate::types::{TrendingError, TrendingResult};

/// The trending listing rendered when no source is given.
pub const DEFAULT_URL: &str = "https://www.coingecko.com/en/coins/trending";

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A previously saved render on disk.
    File(PathBuf),
    /// A live page, rendered in a headless browser.
    Url(String),
    /// Markup already in memory.
    Raw(String),
    /// The live page at [`DEFAULT_URL`].
    Default,
}

/// Options for live rendering.
#[derive(Debug, Clone)]
pub struct WebOptions {
    /// Upper bound on navigation plus the readiness wait.
    pub render_timeout: Duration,
    /// Delay between readiness checks.
    pub poll_interval: Duration,
    /// CSS selector whose matches signal that the table has been filled in.
    pub ready_selector: String,
    /// Matches of `ready_selector` to wait for. If the deadline passes with
    /// fewer but at least one, the page is taken as it is.
    pub min_ready_matches: usize,
    /// Write the rendered markup here for later replay.
    pub save_to: Option<PathBuf>,
    /// Browser binary; located automatically when `None`.
    pub chromium_path: Option<PathBuf>,
}

impl Default for WebOptions {
    fn default() -> Self {
        let ready_selector = Field::Price
            .selector(1)
            .map(|s| s.css_text())
            .unwrap_or_else(|_| "td".to_string());
        Self {
            render_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(500),
            ready_selector,
            min_ready_matches: 1,
            save_to: None,
            chromium_path: None,
        }
    }
}

impl WebOptions {
    /// Wait until the table shows `rows` rows (at least one).
    pub fn wait_for_rows(mut self, rows: usize) -> Self {
        self.min_ready_matches = rows.max(1);
        self
    }
}

/// Parse markup held in memory.
pub fn load_from_string(markup: &str) -> ParsedDocument {
    tracing::info!("Loading data from string");
    ParsedDocument::parse(markup)
}

/// Parse a saved render from disk.
pub fn load_from_file(path: &Path) -> TrendingResult<ParsedDocument> {
    tracing::info!("Loading data from file: {}", path.display());
    let markup = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => TrendingError::SourceNotFound(path.to_path_buf()),
        _ => TrendingError::Io(e),
    })?;
    Ok(ParsedDocument::parse(&markup))
}

/// Render `url` with `renderer`, optionally save the markup, and parse it.
///
/// The page context is closed before returning, whether or not rendering
/// succeeded. The renderer itself is left running.
pub async fn load_from_web(
    renderer: &dyn Renderer,
    url: &str,
    options: &WebOptions,
) -> TrendingResult<ParsedDocument> {
    tracing::info!("Loading data from web url: {url}");

    let mut ctx = renderer.new_context().await.map_err(render_failure)?;
    let rendered = render_page(ctx.as_mut(), url, options).await;
    if let Err(e) = ctx.close().await {
        tracing::warn!("failed to close page: {e:#}");
    }
    let markup = rendered.map_err(render_failure)?;

    if let Some(path) = &options.save_to {
        std::fs::write(path, &markup)?;
        tracing::info!("Saved rendered page to {}", path.display());
    }

    Ok(ParsedDocument::parse(&markup))
}

/// Acquire a document from `source`.
///
/// Web sources launch a dedicated browser that is shut down before this
/// returns.
pub async fn acquire(source: &Source, options: &WebOptions) -> TrendingResult<ParsedDocument> {
    match source {
        Source::File(path) => load_from_file(path),
        Source::Raw(markup) => Ok(load_from_string(markup)),
        Source::Url(url) => acquire_from_web(url, options).await,
        Source::Default => acquire_from_web(DEFAULT_URL, options).await,
    }
}

async fn acquire_from_web(url: &str, options: &WebOptions) -> TrendingResult<ParsedDocument> {
    let renderer = match &options.chromium_path {
        Some(path) => ChromiumRenderer::with_executable(path).await,
        None => ChromiumRenderer::new().await,
    }
    .map_err(render_failure)?;

    let result = load_from_web(&renderer, url, options).await;
    if renderer.active_contexts() > 0 {
        tracing::warn!("{} page(s) still open at shutdown", renderer.active_contexts());
    }
    if let Err(e) = renderer.shutdown().await {
        tracing::warn!("browser shutdown failed: {e:#}");
    }
    result
}

async fn render_page(
    ctx: &mut dyn RenderContext,
    url: &str,
    options: &WebOptions,
) -> anyhow::Result<String> {
    let deadline = Instant::now() + options.render_timeout;
    let nav = ctx
        .navigate(url, options.render_timeout.as_millis() as u64)
        .await?;
    tracing::debug!("navigated to {} in {}ms", nav.final_url, nav.load_time_ms);

    wait_until_ready(ctx, options, deadline).await?;
    ctx.get_html().await
}

/// Poll until enough `ready_selector` matches exist or `deadline` passes.
async fn wait_until_ready(
    ctx: &dyn RenderContext,
    options: &WebOptions,
    deadline: Instant,
) -> anyhow::Result<()> {
    let script = format!(
        "document.querySelectorAll({}).length",
        serde_json::to_string(&options.ready_selector)?
    );

    loop {
        let found = ctx.execute_js(&script).await?.as_u64().unwrap_or(0) as usize;
        tracing::debug!("{} match(es) for {}", found, options.ready_selector);
        if found >= options.min_ready_matches {
            return Ok(());
        }
        if Instant::now() + options.poll_interval > deadline {
            if found > 0 {
                tracing::warn!(
                    "only {found} of {} `{}` elements after {}ms; continuing",
                    options.min_ready_matches,
                    options.ready_selector,
                    options.render_timeout.as_millis()
                );
                return Ok(());
            }
            anyhow::bail!(
                "page content not ready after {}ms ({found} of {} `{}` elements)",
                options.render_timeout.as_millis(),
                options.min_ready_matches,
                options.ready_selector
            );
        }
        tokio::time::sleep(options.poll_interval).await;
    }
}

fn render_failure(e: anyhow::Error) -> TrendingError {
    TrendingError::RenderFailure(format!("{e:#}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct UnavailableRenderer;

    #[async_trait]
    impl Renderer for UnavailableRenderer {
        async fn new_context(&self) -> anyhow::Result<Box<dyn RenderContext>> {
            anyhow::bail!("no browser")
        }
        async fn shutdown(&self) -> anyhow::Result<()> {
            Ok(())
        }
        fn active_contexts(&self) -> usize {
            0
        }
    }

    #[test]
    fn test_missing_file_is_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.html");
        match load_from_file(&path) {
            Err(TrendingError::SourceNotFound(p)) => assert_eq!(p, path),
            other => panic!("expected SourceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_string_keeps_bare_cells() {
        let doc = load_from_string(r#"<td class="td-price price"><span>$1</span></td>"#);
        assert!(doc.html().contains(r#"<td class="td-price price">"#));
        assert_eq!(doc.count(&Field::Price.selector(10).unwrap()), 1);
    }

    #[test]
    fn test_load_from_string_volume_snippet() {
        let doc = load_from_string(
            r#"
<td class="td-liquidity_score lit">
<a href="/en/coins/bitcoin-god/trading_exchanges">
<span class="no-wrap" data-no-decimal="false" data-price-btc="21.73214765" data-price-previous="439632.2629217823" data-target="price.price">$439,632</span>
</a> </td>
"#,
        );
        let values = crate::extract(&doc, &Field::Volume.selector(10).unwrap()).unwrap();
        assert_eq!(values, vec!["439,632"]);
    }

    #[test]
    fn test_wait_for_rows() {
        assert_eq!(WebOptions::default().min_ready_matches, 1);
        assert_eq!(WebOptions::default().wait_for_rows(10).min_ready_matches, 10);
        assert_eq!(WebOptions::default().wait_for_rows(0).min_ready_matches, 1);
    }

    #[test]
    fn test_default_options() {
        let options = WebOptions::default();
        assert_eq!(
            options.ready_selector,
            r#"td[class~="td-price"][class~="price"]"#
        );
        assert_eq!(options.render_timeout, Duration::from_secs(30));
        assert!(options.save_to.is_none());
    }

    #[tokio::test]
    async fn test_unavailable_browser_is_render_failure() {
        let result = load_from_web(&UnavailableRenderer, DEFAULT_URL, &WebOptions::default()).await;
        assert!(matches!(result, Err(TrendingError::RenderFailure(_))));
    }

    #[tokio::test]
    async fn test_raw_source_needs_no_browser() {
        let doc = acquire(&Source::Raw("<p>hi</p>".into()), &WebOptions::default())
            .await
            .unwrap();
        assert!(doc.html().contains("<p>hi</p>"));
    }
}
