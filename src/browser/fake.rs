//! In-memory stand-in for [`super::driver::BrowserDriver`]'s browser-facing
//! surface.
//!
//! Exercises the Pipeline Controller, Boundary Resolver, Scroll Manager, and
//! Metadata Extractor against a scripted gallery model instead of a real
//! Chromium instance. `BrowserDriver`'s methods dispatch on the
//! [`Session`](super::Session)/[`ElementHandle`](super::ElementHandle)
//! variant, so none of those callers need to know which backend they're
//! driving.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::js_scripts;
use crate::errors::{HarvestError, HarvestResult};

/// One simulated gallery container, in document order.
#[derive(Debug, Clone)]
pub struct FakeContainer {
    pub id: String,
    pub download_filename: String,
    texts: Vec<String>,
}

impl FakeContainer {
    /// A container whose full text never changes across reads.
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>, download_filename: impl Into<String>) -> Self {
        Self { id: id.into(), download_filename: download_filename.into(), texts: vec![text.into()] }
    }

    /// A container whose text differs on its first N reads before settling;
    /// the last entry repeats for every subsequent read. Models a container
    /// whose generation metadata hasn't finished rendering yet.
    #[must_use]
    pub fn with_text_sequence(
        id: impl Into<String>,
        texts: Vec<String>,
        download_filename: impl Into<String>,
    ) -> Self {
        assert!(!texts.is_empty(), "text sequence must have at least one entry");
        Self { id: id.into(), download_filename: download_filename.into(), texts }
    }
}

#[derive(Debug)]
struct FakeState {
    containers: Vec<FakeContainer>,
    revealed: usize,
    reveal_step: usize,
    scroll_top: f64,
    px_per_attempt: f64,
    downloads_folder: Option<PathBuf>,
    text_reads: HashMap<String, usize>,
}

/// Shared, mutable gallery model driving a [`super::Session::Fake`].
#[derive(Debug)]
pub struct FakeGallery(Mutex<FakeState>);

/// Tunable knobs for a [`FakeGallery`], separated from the container list so
/// call sites read as a configuration block.
#[derive(Debug, Clone, Copy)]
pub struct FakeGalleryTuning {
    /// Containers revealed per successful scroll-mutation call.
    pub reveal_step: usize,
    /// Scroll distance (px) a scroll-mutation call reports as achieved.
    pub px_per_attempt: f64,
}

impl Default for FakeGalleryTuning {
    fn default() -> Self {
        Self { reveal_step: 1, px_per_attempt: 2_600.0 }
    }
}

impl FakeGallery {
    #[must_use]
    pub fn new(containers: Vec<FakeContainer>, tuning: FakeGalleryTuning) -> Arc<Self> {
        Arc::new(Self(Mutex::new(FakeState {
            containers,
            revealed: 0,
            reveal_step: tuning.reveal_step,
            scroll_top: 0.0,
            px_per_attempt: tuning.px_per_attempt,
            downloads_folder: None,
            text_reads: HashMap::new(),
        })))
    }

    pub(super) fn set_downloads_folder(&self, dir: PathBuf) {
        self.0.lock().unwrap().downloads_folder = Some(dir);
    }

    /// Look up a revealed container by its `[id="..."]`-style selector.
    pub(super) fn find_by_id_selector(&self, selector: &str) -> Option<usize> {
        let id = selector.strip_prefix("[id=\"")?.strip_suffix("\"]")?;
        let st = self.0.lock().unwrap();
        st.containers[..st.revealed].iter().position(|c| c.id == id)
    }

    pub(super) fn text_of(&self, idx: usize) -> String {
        let mut st = self.0.lock().unwrap();
        let id = st.containers[idx].id.clone();
        let last = st.containers[idx].texts.len() - 1;
        let read_count = st.text_reads.entry(id).or_insert(0);
        let i = (*read_count).min(last);
        *read_count += 1;
        st.containers[idx].texts[i].clone()
    }

    /// Simulate a click on a container: write its configured download file
    /// into the configured downloads folder, if one has been enabled.
    pub(super) async fn click_container(&self, idx: usize) -> HarvestResult<()> {
        let (folder, filename) = {
            let st = self.0.lock().unwrap();
            let folder = st.downloads_folder.clone();
            (folder, st.containers[idx].download_filename.clone())
        };
        if let Some(folder) = folder {
            tokio::fs::write(folder.join(&filename), b"fake artifact bytes")
                .await
                .map_err(|e| HarvestError::Browser(format!("fake driver: writing download: {e}")))?;
        }
        Ok(())
    }

    pub(super) fn evaluate(&self, script: &str) -> serde_json::Value {
        let mut st = self.0.lock().unwrap();

        if script == js_scripts::CONTAINER_IDS_SCRIPT {
            let ids: Vec<String> = st.containers[..st.revealed].iter().map(|c| c.id.clone()).collect();
            return serde_json::json!(ids);
        }
        if script == js_scripts::SCROLL_POSITION_SCRIPT {
            let max_scroll = st.containers.len() as f64 * st.px_per_attempt;
            return serde_json::json!({"scrollTop": st.scroll_top, "maxScroll": max_scroll});
        }
        if script == js_scripts::END_SENTINEL_SCRIPT {
            return serde_json::json!(false);
        }
        if script == js_scripts::LARGEST_SCROLLABLE_SCRIPT {
            return serde_json::Value::Null;
        }

        // Every remaining script is a scroll-mutation variant: reveal the
        // next chunk of containers and advance the simulated scroll offset.
        // Scroll offset tracks revealed-fraction-of-total rather than a flat
        // per-call increment, so a reveal_step spanning multiple containers
        // in one call reports a proportionally larger achieved distance
        // (and a reveal_step of 1 reports exactly px_per_attempt each time).
        let before = st.revealed;
        st.revealed = (st.revealed + st.reveal_step).min(st.containers.len());
        let advanced = st.revealed > before;
        let cap = st.containers.len() as f64 * st.px_per_attempt;
        let before_scroll_top = st.scroll_top;
        st.scroll_top = (st.revealed as f64 / st.containers.len() as f64) * cap;
        let achieved = st.scroll_top - before_scroll_top;

        if script == js_scripts::SCROLL_TO_BOTTOM_SCRIPT {
            return serde_json::json!(true);
        }
        if script.contains("scrollTop = before +") {
            return serde_json::json!(achieved);
        }
        if script.contains("scrollIntoView") {
            return serde_json::json!(advanced);
        }
        if script.contains("WheelEvent") {
            return serde_json::json!(advanced);
        }
        if script.contains("querySelectorAll('*').forEach") {
            return serde_json::json!(u32::from(advanced));
        }
        serde_json::Value::Null
    }
}
