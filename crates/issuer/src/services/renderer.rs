//! HTML to PDF conversion through a headless Chromium.
//!
//! Every call launches its own browser and tears it down before returning.
//! Nothing is pooled; a crashed render cannot poison the next request.

use std::path::PathBuf;

use async_trait::async_trait;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use thiserror::Error;
use tracing::instrument;

/// Errors that can occur while converting HTML to PDF.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The browser process could not be started.
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// The browser started but loading or printing the page failed.
    #[error("page render failed: {0}")]
    Page(String),

    /// The blocking render task panicked or was cancelled.
    #[error("render task failed: {0}")]
    Task(String),
}

/// Paper sizes understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperFormat {
    A4,
}

impl PaperFormat {
    /// Portrait `(width, height)` in inches.
    #[must_use]
    pub const fn dimensions_in(self) -> (f64, f64) {
        match self {
            Self::A4 => (8.27, 11.69),
        }
    }
}

/// Page options passed to the browser's print call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfOptions {
    pub format: PaperFormat,
    pub landscape: bool,
    pub print_background: bool,
    /// Let `@page` rules in the document override `format`.
    pub prefer_css_page_size: bool,
}

impl PdfOptions {
    /// Options used for certificates: A4 landscape with backgrounds.
    #[must_use]
    pub const fn certificate() -> Self {
        Self {
            format: PaperFormat::A4,
            landscape: true,
            print_background: true,
            prefer_css_page_size: true,
        }
    }

    fn to_print_options(self) -> PrintToPdfOptions {
        let (width, height) = self.format.dimensions_in();
        PrintToPdfOptions {
            landscape: Some(self.landscape),
            print_background: Some(self.print_background),
            prefer_css_page_size: Some(self.prefer_css_page_size),
            paper_width: Some(width),
            paper_height: Some(height),
            margin_top: Some(0.0),
            margin_bottom: Some(0.0),
            margin_left: Some(0.0),
            margin_right: Some(0.0),
            ..Default::default()
        }
    }
}

/// Converts an HTML document into PDF bytes.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    /// Render `html` with `options`.
    async fn render(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>, RenderError>;
}

/// Renderer backed by a Chromium process launched per call.
#[derive(Debug, Clone, Default)]
pub struct ChromeRenderer {
    chrome_path: Option<PathBuf>,
}

impl ChromeRenderer {
    /// Create a renderer. `None` lets `headless_chrome` locate the browser.
    #[must_use]
    pub const fn new(chrome_path: Option<PathBuf>) -> Self {
        Self { chrome_path }
    }
}

#[async_trait]
impl PdfRenderer for ChromeRenderer {
    #[instrument(skip(self, html), fields(html_bytes = html.len()))]
    async fn render(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>, RenderError> {
        let chrome_path = self.chrome_path.clone();
        let html = html.to_owned();
        let options = *options;

        // headless_chrome drives the DevTools socket synchronously.
        let pdf = tokio::task::spawn_blocking(move || {
            let session = BrowserSession::launch(chrome_path)?;
            session.print(&html, options)
        })
        .await
        .map_err(|e| RenderError::Task(e.to_string()))??;

        tracing::info!(pdf_bytes = pdf.len(), "PDF rendered");
        Ok(pdf)
    }
}

/// A browser launched for a single render.
///
/// The session owns the only handle to its [`Browser`]. Dropping it drops
/// that handle, and `headless_chrome` kills and waits on the process then.
struct BrowserSession {
    browser: Browser,
}

impl BrowserSession {
    fn launch(chrome_path: Option<PathBuf>) -> Result<Self, RenderError> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .path(chrome_path)
            .build()
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        let browser = Browser::new(options).map_err(|e| RenderError::Launch(e.to_string()))?;
        tracing::debug!("Browser launched");

        Ok(Self { browser })
    }

    fn print(&self, html: &str, options: PdfOptions) -> Result<Vec<u8>, RenderError> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| RenderError::Page(e.to_string()))?;

        tab.evaluate(&set_content_script(html)?, true)
            .map_err(|e| RenderError::Page(e.to_string()))?;

        tab.print_to_pdf(Some(options.to_print_options()))
            .map_err(|e| RenderError::Page(e.to_string()))
    }
}

impl BrowserSession {
    fn process_id(&self) -> Option<u32> {
        self.browser.get_process_id()
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        tracing::debug!(pid = ?self.process_id(), "Closing browser");
    }
}

/// Script replacing the blank tab's document with `html`.
///
/// Evaluates to a promise that resolves once the document (including inline
/// images) has finished loading.
fn set_content_script(html: &str) -> Result<String, RenderError> {
    let literal = serde_json::to_string(html).map_err(|e| RenderError::Page(e.to_string()))?;

    Ok(format!(
        "document.open();\n\
         document.write({literal});\n\
         document.close();\n\
         new Promise((resolve) => {{\n\
           if (document.readyState === 'complete') {{ resolve(true); return; }}\n\
           window.addEventListener('load', () => resolve(true), {{ once: true }});\n\
         }});"
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_certificate_options() {
        let options = PdfOptions::certificate();
        assert_eq!(options.format, PaperFormat::A4);
        assert!(options.landscape);
        assert!(options.print_background);
        assert!(options.prefer_css_page_size);
    }

    #[test]
    fn test_print_options_use_a4_without_margins() {
        let print = PdfOptions::certificate().to_print_options();

        assert_eq!(print.landscape, Some(true));
        assert_eq!(print.print_background, Some(true));
        assert_eq!(print.prefer_css_page_size, Some(true));
        assert_eq!(print.paper_width, Some(8.27));
        assert_eq!(print.paper_height, Some(11.69));
        assert_eq!(print.margin_top, Some(0.0));
    }

    #[test]
    fn test_set_content_script_quotes_html() {
        let script = set_content_script("<p class=\"x\">it's\n</p>").unwrap();

        assert!(script.contains(r#"document.write("<p class=\"x\">it's\n</p>");"#));
        assert!(script.ends_with("});"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    #[ignore = "Requires a local Chromium"]
    fn test_dropping_session_stops_browser() {
        let session = BrowserSession::launch(std::env::var_os("CHROME_PATH").map(PathBuf::from))
            .unwrap();
        let pid = session.process_id().unwrap();
        let proc_dir = PathBuf::from(format!("/proc/{pid}"));
        assert!(proc_dir.exists());

        drop(session);

        // Killed and waited on, so the pid no longer has a /proc entry.
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while proc_dir.exists() && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(50));
        }
        assert!(!proc_dir.exists());
    }
}
