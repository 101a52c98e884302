use std::time::{Duration, Instant};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::dom::{GetDocumentParams, QuerySelectorParams, SetFileInputFilesParams};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tracing::{debug, warn};
use crate::config::{BrowserSettings, PostImageSettings};
use crate::error::{Result, UploadError};
use crate::postimage::extract::extract_direct_links;

const UPLOAD_WIDGET_SELECTOR: &str = "#ddupload";
const FILE_INPUT_SELECTOR: &str = r#"input[type="file"]"#;
const SHARE_FORM_SELECTOR: &str = "form.share";
const EMBED_SELECT_SELECTOR: &str = "#embed_box";
const DIRECT_LINK_OPTION: &str = "code_direct";
const CODE_BOX_SELECTOR: &str = "#code_box";

const WIDGET_TIMEOUT: Duration = Duration::from_secs(30);
const WIDGET_SETTLE: Duration = Duration::from_secs(2);
/// Several files can take a while to go through.
const RESULT_TIMEOUT: Duration = Duration::from_secs(120);
const REFRESH_PAUSE: Duration = Duration::from_secs(1);
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// The page hides its injected file input; make it reachable.
const REVEAL_FILE_INPUT_JS: &str = r#"
(function() {
    const input = document.querySelector('input[type="file"]');
    if (input) {
        input.style.visibility = 'visible';
        input.style.position = 'fixed';
        input.style.top = '0';
        input.style.left = '0';
        input.style.width = '100px';
        input.style.height = '100px';
    }
    return !!input;
})()
"#;

/// Everything that depends on the upload page's markup lives behind this.
#[async_trait]
pub trait UploadFormDriver: Send + Sync {
    /// Submits all files in one go and returns the direct links the page shows
    /// afterwards, in page order. Failing to bring the browser up at all is
    /// [`UploadError::BrowserLaunch`].
    async fn submit_files(&self, paths: &[String]) -> Result<Vec<String>>;
}

/// Drives postimages.org in a throwaway headless Chromium.
#[derive(Debug, Clone)]
pub struct ChromiumFormDriver {
    upload_url: String,
    executable: Option<String>,
}

impl ChromiumFormDriver {
    pub fn new(postimage: &PostImageSettings, browser: &BrowserSettings) -> Self {
        Self {
            upload_url: postimage.upload_url.clone(),
            executable: browser.executable.clone(),
        }
    }

    async fn drive(&self, browser: &Browser, paths: &[String]) -> Result<Vec<String>> {
        let page = browser.new_page(self.upload_url.as_str()).await?;

        wait_for_selector(&page, UPLOAD_WIDGET_SELECTOR, WIDGET_TIMEOUT).await?;
        tokio::time::sleep(WIDGET_SETTLE).await;

        page.evaluate(REVEAL_FILE_INPUT_JS).await?;
        wait_for_selector(&page, FILE_INPUT_SELECTOR, WIDGET_TIMEOUT).await?;
        set_input_files(&page, FILE_INPUT_SELECTOR, paths).await?;
        debug!(count = paths.len(), "Files handed to the upload form");

        wait_for_selector(&page, SHARE_FORM_SELECTOR, RESULT_TIMEOUT).await?;
        select_option(&page, EMBED_SELECT_SELECTOR, DIRECT_LINK_OPTION).await?;
        tokio::time::sleep(REFRESH_PAUSE).await;

        wait_for_selector(&page, CODE_BOX_SELECTOR, WIDGET_TIMEOUT).await?;
        let text = input_value(&page, CODE_BOX_SELECTOR).await?;
        Ok(extract_direct_links(&text))
    }
}

#[async_trait]
impl UploadFormDriver for ChromiumFormDriver {
    async fn submit_files(&self, paths: &[String]) -> Result<Vec<String>> {
        // Fresh profile per run; removed when dropped.
        let profile = tempfile::tempdir()
            .map_err(|e| UploadError::BrowserLaunch(format!("failed to create profile dir: {}", e)))?;

        let mut builder = BrowserConfig::builder()
            .user_data_dir(profile.path())
            .arg("--no-sandbox");
        if let Some(exe) = &self.executable {
            builder = builder.chrome_executable(exe);
        }
        let config = builder.build().map_err(UploadError::BrowserLaunch)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| UploadError::BrowserLaunch(e.to_string()))?;
        let handler_task = tokio::spawn(async move { while let Some(_event) = handler.next().await {} });

        let result = self.drive(&browser, paths).await;

        if let Err(e) = browser.close().await {
            warn!("Failed to close browser cleanly: {}", e);
        }
        if let Err(e) = browser.wait().await {
            warn!("Failed to reap browser process: {}", e);
        }
        handler_task.abort();

        result
    }
}

/// Polls until `selector` matches something or `limit` runs out.
async fn wait_for_selector(page: &Page, selector: &str, limit: Duration) -> Result<()> {
    let js = format!("document.querySelector('{}') !== null", escape_js_single(selector));
    let start = Instant::now();
    loop {
        // Evaluation fails while the page is still navigating; treat as absent.
        let present = page.evaluate(js.as_str())
            .await
            .ok()
            .and_then(|v| v.into_value::<bool>().ok())
            .unwrap_or(false);
        if present {
            return Ok(());
        }
        if start.elapsed() >= limit {
            return Err(UploadError::TimeoutExceeded {
                what: selector.to_string(),
                secs: limit.as_secs(),
            });
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

async fn set_input_files(page: &Page, selector: &str, paths: &[String]) -> Result<()> {
    let doc = page
        .execute(GetDocumentParams::builder().depth(0).build())
        .await?;
    let root_node_id = doc.result.root.node_id;

    let query = page
        .execute(QuerySelectorParams::new(root_node_id, selector))
        .await?;

    let mut set_files = SetFileInputFilesParams::new(paths.to_vec());
    set_files.node_id = Some(query.result.node_id);
    page.execute(set_files).await?;
    Ok(())
}

async fn select_option(page: &Page, selector: &str, value: &str) -> Result<()> {
    let js = format!(
        r#"
        (function() {{
            const el = document.querySelector('{}');
            if (!el) {{
                return false;
            }}
            el.value = '{}';
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return true;
        }})()
        "#,
        escape_js_single(selector),
        escape_js_single(value)
    );
    let selected: bool = page.evaluate(js.as_str())
        .await?
        .into_value()
        .map_err(|e| UploadError::Browser(e.to_string()))?;
    if !selected {
        return Err(UploadError::Browser(format!("element {} not found", selector)));
    }
    Ok(())
}

async fn input_value(page: &Page, selector: &str) -> Result<String> {
    let js = format!(
        "(function() {{ const el = document.querySelector('{}'); return el ? el.value : null; }})()",
        escape_js_single(selector)
    );
    let value: Option<String> = page.evaluate(js.as_str())
        .await?
        .into_value()
        .map_err(|e| UploadError::Browser(e.to_string()))?;
    value.ok_or_else(|| UploadError::Browser(format!("element {} not found", selector)))
}

fn escape_js_single(input: &str) -> String {
    input.replace('\\', "\\\\").replace('\'', "\\'")
}
