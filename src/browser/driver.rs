//! Browser Driver Adapter — a narrow synchronous-looking contract over the
//! asynchronous `chromiumoxide` CDP client.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::cdp::browser_protocol::page::Viewport;
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use super::fake::FakeGallery;
use crate::errors::{HarvestError, HarvestResult};

/// An opaque reference to a DOM element. Handles are owned by the adapter
/// and scoped to the session; callers never walk the underlying DOM tree
/// directly, which sidesteps cyclic-reference bookkeeping entirely.
pub struct ElementHandle(pub(crate) ElementInner);

pub(crate) enum ElementInner {
    Real(Element),
    Fake { gallery: Arc<FakeGallery>, index: usize },
}

/// Click strategies tried in order until one succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickStrategy {
    Native,
    Js,
    DispatchEvent,
    Bbox,
    Keyboard,
}

const DEFAULT_CLICK_CASCADE: [ClickStrategy; 5] = [
    ClickStrategy::Native,
    ClickStrategy::Js,
    ClickStrategy::DispatchEvent,
    ClickStrategy::Bbox,
    ClickStrategy::Keyboard,
];

/// Classifies an underlying CDP/page error as transient (retryable by the
/// caller) or permanent.
#[must_use]
pub fn is_transient(err: &anyhow::Error) -> bool {
    let msg = err.to_string().to_lowercase();
    msg.contains("not attached")
        || msg.contains("not visible")
        || msg.contains("timeout")
        || msg.contains("timed out")
        || msg.contains("network idle")
        || msg.contains("navigation")
}

/// A live browser session: one `Browser` plus the single `Page` the core
/// drives throughout the run. Holding exactly one `Page` keeps every CDP
/// interaction serialized against the same tab.
///
/// The `Fake` variant backs integration tests that exercise the Pipeline
/// Controller, Boundary Resolver, Scroll Manager, and Metadata Extractor
/// against an in-memory gallery model instead of a real Chromium instance.
pub enum Session {
    Real(RealSession),
    Fake(Arc<FakeGallery>),
}

pub struct RealSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Page,
    user_data_dir: PathBuf,
}

impl Session {
    /// Wrap an already-configured [`FakeGallery`] as a session.
    #[must_use]
    pub fn fake(gallery: Arc<FakeGallery>) -> Self {
        Self::Fake(gallery)
    }
}

/// Wraps `chromiumoxide` behind a narrow, directly-awaitable contract.
#[derive(Default)]
pub struct BrowserDriver;

impl BrowserDriver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Open the gallery URL in a fresh headless (or headed) browser.
    pub async fn open(
        &self,
        url: &str,
        headless: bool,
        viewport: (u32, u32),
    ) -> HarvestResult<Session> {
        let chrome_path = match crate::browser_setup::find_browser_executable().await {
            Ok(path) => path,
            Err(_) => crate::browser_setup::download_managed_browser()
                .await
                .map_err(|e| HarvestError::Browser(format!("no usable Chrome executable: {e:#}")))?,
        };

        let user_data_dir =
            std::env::temp_dir().join(format!("gallery_harvester_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&user_data_dir)
            .context("creating browser profile directory")
            .map_err(|e| HarvestError::Browser(e.to_string()))?;

        let mut builder = BrowserConfigBuilder::default()
            .chrome_executable(chrome_path)
            .user_data_dir(user_data_dir.clone())
            .window_size(viewport.0, viewport.1)
            .viewport(Viewport {
                width: viewport.0,
                height: viewport.1,
                device_scale_factor: Some(1.0),
                emulating_mobile: false,
                is_landscape: true,
                has_touch: false,
            })
            .request_timeout(Duration::from_secs(30))
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");

        builder = if headless {
            builder.headless_mode(HeadlessMode::default())
        } else {
            builder.with_head()
        };

        let config = builder
            .build()
            .map_err(|e| HarvestError::Browser(format!("invalid browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| HarvestError::Browser(format!("failed to launch browser: {e}")))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!("browser handler event error: {e}");
                }
            }
            info!("browser handler task exiting");
        });

        let page = browser
            .new_page(url)
            .await
            .map_err(|e| HarvestError::Browser(format!("failed to open gallery url: {e}")))?;

        debug!(%url, "opened gallery");

        Ok(Session::Real(RealSession {
            browser,
            handler: handler_task,
            page,
            user_data_dir,
        }))
    }

    /// Close the session, aborting the CDP handler task and removing the
    /// temporary profile directory. A no-op for a fake session.
    pub async fn close(&self, session: Session) -> HarvestResult<()> {
        let Session::Real(mut real) = session else { return Ok(()) };
        if let Err(e) = real.browser.close().await {
            warn!("error closing browser: {e}");
        }
        real.handler.abort();
        if let Err(e) = std::fs::remove_dir_all(&real.user_data_dir) {
            trace!("profile dir cleanup failed (already removed?): {e}");
        }
        Ok(())
    }

    /// Reload the current page. Not meaningful for a fake session, where it
    /// is a no-op.
    pub async fn reload(&self, session: &Session) -> HarvestResult<()> {
        let Session::Real(real) = session else { return Ok(()) };
        real.page
            .reload()
            .await
            .map_err(|e| HarvestError::Browser(e.to_string()))?;
        Ok(())
    }

    /// Best-effort cancellation of in-flight downloads, used by an
    /// emergency stop.
    pub async fn cancel_downloads(&self, session: &Session) -> HarvestResult<()> {
        let Session::Real(real) = session else { return Ok(()) };
        real.page
            .evaluate("window.stop();")
            .await
            .map_err(|e| HarvestError::Browser(format!("failed to cancel downloads: {e}")))?;
        Ok(())
    }

    pub async fn query_one(
        &self,
        session: &Session,
        selector: &str,
    ) -> HarvestResult<Option<ElementHandle>> {
        match session {
            Session::Real(real) => match real.page.find_element(selector).await {
                Ok(el) => Ok(Some(ElementHandle(ElementInner::Real(el)))),
                Err(e) if is_transient(&anyhow::anyhow!(e.to_string())) => Ok(None),
                Err(e) => Err(HarvestError::Browser(e.to_string())),
            },
            Session::Fake(gallery) => Ok(gallery
                .find_by_id_selector(selector)
                .map(|index| ElementHandle(ElementInner::Fake { gallery: gallery.clone(), index }))),
        }
    }

    pub async fn query_all(
        &self,
        session: &Session,
        selector: &str,
    ) -> HarvestResult<Vec<ElementHandle>> {
        match session {
            Session::Real(real) => {
                let elements = real
                    .page
                    .find_elements(selector)
                    .await
                    .map_err(|e| HarvestError::Browser(e.to_string()))?;
                Ok(elements.into_iter().map(|e| ElementHandle(ElementInner::Real(e))).collect())
            }
            Session::Fake(_) => Ok(self.query_one(session, selector).await?.into_iter().collect()),
        }
    }

    /// Query for a descendant of `container`, scoping the search to its
    /// subtree rather than the whole page (used by DOM analysis and
    /// relative-positioning extraction strategies). The fake driver models
    /// containers as leaf nodes with no queryable descendants.
    pub async fn query_one_within(
        &self,
        container: &ElementHandle,
        selector: &str,
    ) -> HarvestResult<Option<ElementHandle>> {
        match &container.0 {
            ElementInner::Real(el) => match el.find_element(selector).await {
                Ok(el) => Ok(Some(ElementHandle(ElementInner::Real(el)))),
                Err(e) if is_transient(&anyhow::anyhow!(e.to_string())) => Ok(None),
                Err(e) => Err(HarvestError::Browser(e.to_string())),
            },
            ElementInner::Fake { .. } => Ok(None),
        }
    }

    pub async fn query_all_within(
        &self,
        container: &ElementHandle,
        selector: &str,
    ) -> HarvestResult<Vec<ElementHandle>> {
        match &container.0 {
            ElementInner::Real(el) => {
                let elements = el
                    .find_elements(selector)
                    .await
                    .map_err(|e| HarvestError::Browser(e.to_string()))?;
                Ok(elements.into_iter().map(|e| ElementHandle(ElementInner::Real(e))).collect())
            }
            ElementInner::Fake { .. } => Ok(Vec::new()),
        }
    }

    pub async fn text_of(&self, handle: &ElementHandle) -> HarvestResult<String> {
        match &handle.0 {
            ElementInner::Real(el) => el
                .inner_text()
                .await
                .map_err(|e| HarvestError::Browser(e.to_string()))
                .map(|opt| opt.unwrap_or_default()),
            ElementInner::Fake { gallery, index } => Ok(gallery.text_of(*index)),
        }
    }

    pub async fn attr_of(
        &self,
        handle: &ElementHandle,
        name: &str,
    ) -> HarvestResult<Option<String>> {
        match &handle.0 {
            ElementInner::Real(el) => el.attribute(name).await.map_err(|e| HarvestError::Browser(e.to_string())),
            ElementInner::Fake { .. } => Ok(None),
        }
    }

    /// Click cascade: try each strategy in order, returning on first success.
    /// The fake driver short-circuits to a single simulated click.
    pub async fn click(&self, handle: &ElementHandle) -> HarvestResult<ClickStrategy> {
        let el = match &handle.0 {
            ElementInner::Real(el) => el,
            ElementInner::Fake { gallery, index } => {
                gallery.click_container(*index).await?;
                return Ok(ClickStrategy::Native);
            }
        };

        let mut last_err = None;
        for strategy in DEFAULT_CLICK_CASCADE {
            let result = match strategy {
                ClickStrategy::Native => el.click().await.map_err(|e| e.to_string()),
                ClickStrategy::Js => el
                    .call_js_fn("function() { this.click(); }", false)
                    .await
                    .map(|_| ())
                    .map_err(|e| e.to_string()),
                ClickStrategy::DispatchEvent => el
                    .call_js_fn(
                        "function() { this.dispatchEvent(new MouseEvent('click', { bubbles: true })); }",
                        false,
                    )
                    .await
                    .map(|_| ())
                    .map_err(|e| e.to_string()),
                ClickStrategy::Bbox => match el.scroll_into_view().await {
                    Ok(_) => el.click().await.map(|_| ()).map_err(|e| e.to_string()),
                    Err(e) => Err(e.to_string()),
                },
                ClickStrategy::Keyboard => match el.focus().await {
                    Ok(_) => el.press_key("Enter").await.map(|_| ()).map_err(|e| e.to_string()),
                    Err(e) => Err(e.to_string()),
                },
            };

            match result {
                Ok(()) => return Ok(strategy),
                Err(e) => {
                    debug!(?strategy, error = %e, "click strategy failed, trying next");
                    last_err = Some(e);
                }
            }
        }
        Err(HarvestError::Browser(format!(
            "all click strategies exhausted: {}",
            last_err.unwrap_or_default()
        )))
    }

    pub async fn type_text(&self, handle: &ElementHandle, text: &str) -> HarvestResult<()> {
        match &handle.0 {
            ElementInner::Real(el) => el
                .type_str(text)
                .await
                .map(|_| ())
                .map_err(|e| HarvestError::Browser(e.to_string())),
            ElementInner::Fake { .. } => Ok(()),
        }
    }

    pub async fn press(&self, handle: &ElementHandle, key: &str) -> HarvestResult<()> {
        match &handle.0 {
            ElementInner::Real(el) => el
                .press_key(key)
                .await
                .map(|_| ())
                .map_err(|e| HarvestError::Browser(e.to_string())),
            ElementInner::Fake { .. } => Ok(()),
        }
    }

    /// Evaluate a JS expression/script and deserialize the result.
    pub async fn evaluate<T: DeserializeOwned>(
        &self,
        session: &Session,
        script: &str,
    ) -> HarvestResult<T> {
        match session {
            Session::Real(real) => {
                let result = real
                    .page
                    .evaluate(script)
                    .await
                    .map_err(|e| HarvestError::Browser(format!("evaluate failed: {e}")))?;
                result
                    .into_value()
                    .map_err(|e| HarvestError::Browser(format!("failed to deserialize eval result: {e}")))
            }
            Session::Fake(gallery) => serde_json::from_value(gallery.evaluate(script))
                .map_err(|e| HarvestError::Browser(format!("failed to deserialize fake eval result: {e}"))),
        }
    }

    /// Register a sink invoked for every file the page initiates a download
    /// for. CDP download events require `Page::start_incognito_browser` style
    /// browser-context wiring; this crate enables downloads on the page
    /// target directly via the `Page.setDownloadBehavior` CDP command.
    pub async fn enable_downloads(
        &self,
        session: &Session,
        download_dir: &std::path::Path,
    ) -> HarvestResult<()> {
        use chromiumoxide::cdp::browser_protocol::browser::SetDownloadBehaviorParams;

        let real = match session {
            Session::Real(real) => real,
            Session::Fake(gallery) => {
                gallery.set_downloads_folder(download_dir.to_path_buf());
                return Ok(());
            }
        };

        real.page
            .execute(
                SetDownloadBehaviorParams::builder()
                    .behavior(chromiumoxide::cdp::browser_protocol::browser::SetDownloadBehaviorBehavior::Allow)
                    .download_path(download_dir.to_string_lossy().to_string())
                    .build()
                    .map_err(|e| HarvestError::Browser(format!("invalid download behavior params: {e}")))?,
            )
            .await
            .map_err(|e| HarvestError::Browser(format!("failed to enable downloads: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_cascade_order_is_ranked() {
        assert_eq!(DEFAULT_CLICK_CASCADE[0], ClickStrategy::Native);
        assert_eq!(DEFAULT_CLICK_CASCADE[4], ClickStrategy::Keyboard);
    }

    #[test]
    fn transient_classification() {
        assert!(is_transient(&anyhow::anyhow!("Element is not attached")));
        assert!(is_transient(&anyhow::anyhow!("navigation in progress")));
        assert!(!is_transient(&anyhow::anyhow!("permission denied")));
    }
}
