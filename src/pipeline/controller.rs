//! Pipeline Controller: drives the pre-harvest action script, resolves the
//! boundary, and runs the harvest loop to completion.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::boundary::{self, BoundaryMode};
use crate::browser::{BrowserDriver, ElementHandle, Session};
use crate::config::{Action, CheckElementFields, Config, DuplicateMode, StartGenerationDownloadsFields};
use crate::download_log::DownloadLog;
use crate::errors::{HarvestError, HarvestResult};
use crate::extractor::{ExtractionType, ExtractorConfig, MetadataExtractor};
use crate::naming;
use crate::scroll::{AdvanceOutcome, ScrollManager, ScrollManagerConfig};
use crate::timestamp::{self, CanonicalTimestamp};

use super::download as dl;
use super::progress::{ProgressEvent, ProgressReporter};
use super::script::{eval_condition, CheckOutcome, ScriptProgram, Variable};
use super::signals::{ControlSignals, StopKind};
use super::state::{FinalizeReason, PipelineState, RunResult};

/// Resolved harvest parameters, either supplied directly by top-level
/// [`Config`] fields (no action script, or a script with no
/// `start_generation_downloads` step) or by that action's fields, which
/// take precedence when present.
struct HarvestParams {
    max_downloads: Option<u64>,
    downloads_folder: PathBuf,
    logs_folder: PathBuf,
    completed_task_selector: Option<String>,
    start_from: Option<CanonicalTimestamp>,
}

impl HarvestParams {
    fn from_config(config: &Config) -> Self {
        Self {
            max_downloads: config.max_downloads,
            downloads_folder: config.downloads_folder.clone(),
            logs_folder: config.logs_folder.clone(),
            completed_task_selector: None,
            start_from: config.start_from.clone(),
        }
    }

    fn from_action(config: &Config, fields: &StartGenerationDownloadsFields) -> Self {
        Self {
            max_downloads: fields.max_downloads.or(config.max_downloads),
            downloads_folder: PathBuf::from(&fields.downloads_folder),
            logs_folder: PathBuf::from(&fields.logs_folder),
            completed_task_selector: Some(fields.completed_task_selector.clone()),
            start_from: fields
                .start_from
                .as_deref()
                .and_then(timestamp::parse_exact_canonical)
                .or_else(|| config.start_from.clone()),
        }
    }
}

enum ScriptOutcome {
    EnterHarvest(HarvestParams),
    Completed,
    Stopped,
}

pub struct PipelineController {
    config: Config,
    driver: BrowserDriver,
}

impl PipelineController {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config, driver: BrowserDriver::new() }
    }

    pub async fn run(
        &mut self,
        signals: &mut ControlSignals,
        progress: &mut dyn ProgressReporter,
    ) -> HarvestResult<RunResult> {
        progress.report(ProgressEvent::State(PipelineState::Initializing));
        let session = self
            .driver
            .open(&self.config.gallery_url, self.config.headless, (self.config.viewport.width, self.config.viewport.height))
            .await?;

        let run_result = self.run_with_session(&session, signals, progress).await;

        if !self.config.keep_browser_open {
            if let Err(e) = self.driver.close(session).await {
                warn!(error = %e, "error closing browser session");
            }
        } else {
            std::mem::forget(session);
        }

        run_result
    }

    /// Drive a run against an already-open [`Session`], skipping the
    /// `open`/`close` lifecycle `run` manages. Lets a caller supply its own
    /// session, including a [`crate::browser::Session::fake`] one for tests
    /// that exercise the controller without a real browser.
    pub async fn run_with_session(
        &mut self,
        session: &Session,
        signals: &mut ControlSignals,
        progress: &mut dyn ProgressReporter,
    ) -> HarvestResult<RunResult> {
        let mut errors = Vec::new();
        let mut outputs = Vec::new();
        self.run_inner(session, signals, progress, &mut errors, &mut outputs).await
    }

    async fn run_inner(
        &mut self,
        session: &Session,
        signals: &mut ControlSignals,
        progress: &mut dyn ProgressReporter,
        errors: &mut Vec<String>,
        outputs: &mut Vec<PathBuf>,
    ) -> HarvestResult<RunResult> {
        let total_actions = self.config.action_script.len();

        progress.report(ProgressEvent::State(PipelineState::LoggingIn));
        let program = ScriptProgram::compile(self.config.action_script.clone());
        let (script_outcome, actions_completed) =
            run_actions(&program, &self.config, &self.driver, session, signals, progress).await?;

        let harvest_params = match script_outcome {
            ScriptOutcome::EnterHarvest(params) => params,
            ScriptOutcome::Stopped => {
                return Ok(finalize(
                    PipelineState::Cancelled,
                    Some(FinalizeReason::ExternalStop),
                    actions_completed,
                    total_actions,
                    0,
                    errors.clone(),
                    outputs.clone(),
                ));
            }
            ScriptOutcome::Completed if total_actions == 0 => HarvestParams::from_config(&self.config),
            ScriptOutcome::Completed => {
                return Ok(finalize(
                    PipelineState::Done,
                    Some(FinalizeReason::ActionScriptCompleted),
                    actions_completed,
                    total_actions,
                    0,
                    errors.clone(),
                    outputs.clone(),
                ));
            }
        };

        if signals.stop_kind().is_some() {
            return Ok(finalize(
                PipelineState::Cancelled,
                Some(FinalizeReason::ExternalStop),
                actions_completed,
                total_actions,
                0,
                errors.clone(),
                outputs.clone(),
            ));
        }

        let mut log = DownloadLog::open(&harvest_params.logs_folder.join("download_log.txt")).await?;
        tokio::fs::create_dir_all(&harvest_params.downloads_folder)
            .await
            .map_err(|e| HarvestError::Config(format!("creating downloads folder: {e}")))?;
        self.driver.enable_downloads(session, &harvest_params.downloads_folder).await?;

        let scroll_config = ScrollManagerConfig {
            min_scroll_distance: self.config.min_scroll_distance,
            max_scroll_attempts: self.config.max_scroll_attempts,
            max_consecutive_scroll_failures: self.config.max_consecutive_scroll_failures,
            dom_wait_timeout: Duration::from_millis(self.config.dom_wait_timeout_ms),
        };
        let mut scroll = ScrollManager::new(scroll_config);

        let extractor_config = ExtractorConfig {
            dom_wait_timeout: Duration::from_millis(self.config.dom_wait_timeout_ms),
            retry_attempts: self.config.retry_attempts,
            retry_delay: Duration::from_millis(250),
        };
        let mut extractor = MetadataExtractor::new(extractor_config);

        progress.report(ProgressEvent::State(PipelineState::ResolvingBoundary));
        let mode = match &harvest_params.start_from {
            Some(ts) => BoundaryMode::StartFrom(ts.clone()),
            None => BoundaryMode::FirstUnseen,
        };
        let cancel = signals.as_cancel_watch();
        let boundary_outcome = boundary::resolve(
            mode,
            &self.driver,
            session,
            &self.config.gallery_url,
            &mut extractor,
            &mut scroll,
            &log,
            &cancel,
        )
        .await?;

        if !boundary_outcome.found {
            use crate::boundary::UnresolvedReason;
            let reason = match boundary_outcome.unresolved_reason {
                Some(UnresolvedReason::EndOfGallery) => FinalizeReason::EndOfGalleryAssumed,
                Some(UnresolvedReason::ScrollCapExceeded) => FinalizeReason::ScrollCapExceeded,
                Some(UnresolvedReason::Cancelled) | None => FinalizeReason::ExternalStop,
            };
            return Ok(finalize(
                PipelineState::Finalizing,
                Some(reason),
                actions_completed,
                total_actions,
                0,
                errors.clone(),
                outputs.clone(),
            ));
        }

        progress.report(ProgressEvent::State(PipelineState::Harvesting));
        let harvest_outcome = self
            .harvest_loop(
                session,
                &harvest_params,
                boundary_outcome.container_id.expect("found implies container_id"),
                &mut scroll,
                &mut extractor,
                &mut log,
                signals,
                progress,
                errors,
                outputs,
            )
            .await?;

        progress.report(ProgressEvent::State(PipelineState::Finalizing));
        Ok(finalize(
            if matches!(harvest_outcome.1, FinalizeReason::ExternalStop | FinalizeReason::ExternalStopEmergency) {
                PipelineState::Cancelled
            } else if matches!(harvest_outcome.1, FinalizeReason::ExtractionFailuresExceeded) {
                PipelineState::Failed
            } else {
                PipelineState::Done
            },
            Some(harvest_outcome.1),
            actions_completed,
            total_actions,
            harvest_outcome.0,
            errors.clone(),
            outputs.clone(),
        ))
    }

    #[allow(clippy::too_many_arguments)]
    async fn harvest_loop(
        &mut self,
        session: &Session,
        params: &HarvestParams,
        boundary_container: String,
        scroll: &mut ScrollManager,
        extractor: &mut MetadataExtractor,
        log: &mut DownloadLog,
        signals: &mut ControlSignals,
        progress: &mut dyn ProgressReporter,
        errors: &mut Vec<String>,
        outputs: &mut Vec<PathBuf>,
    ) -> HarvestResult<(u64, FinalizeReason)> {
        let mut downloads: u64 = 0;
        let mut consecutive_duplicates: u32 = 0;
        let mut consecutive_extraction_failures: u32 = 0;
        let mut processed: HashSet<String> = HashSet::new();
        let mut cursor = DocumentCursor::new(boundary_container);
        let cancel = signals.as_cancel_watch();

        loop {
            if let Some(kind) = signals.stop_kind() {
                let reason = match kind {
                    StopKind::Graceful => FinalizeReason::ExternalStop,
                    StopKind::Emergency => {
                        let _ = self.driver.cancel_downloads(session).await;
                        FinalizeReason::ExternalStopEmergency
                    }
                };
                return Ok((downloads, reason));
            }
            signals.wait_while_paused().await;

            let Some(container_id) = cursor.next(scroll, &self.driver, session, &cancel).await? else {
                match cursor.last_advance_outcome {
                    Some(AdvanceOutcome::EndOfGallery) | None => {
                        return Ok((downloads, FinalizeReason::EndOfGalleryAssumed))
                    }
                    Some(AdvanceOutcome::AttemptsExhausted)
                    | Some(AdvanceOutcome::ConsecutiveFailuresExceeded) => {
                        return Ok((downloads, FinalizeReason::ScrollCapExceeded))
                    }
                    Some(AdvanceOutcome::Cancelled) => return Ok((downloads, FinalizeReason::ExternalStop)),
                    Some(AdvanceOutcome::PredicateSatisfied) => unreachable!(),
                }
            };

            if !processed.insert(container_id.clone()) {
                continue;
            }

            let Some(handle) = self.driver.query_one(session, &format!("[id=\"{container_id}\"]")).await? else {
                continue;
            };

            let record = extractor
                .extract(&self.driver, session, &handle, &container_id, &self.config.gallery_url, ExtractionType::All)
                .await?;

            let Some(record) = record else {
                consecutive_extraction_failures += 1;
                errors.push(format!("extraction failed for container {container_id}"));
                if consecutive_extraction_failures >= self.config.max_consecutive_extraction_failures {
                    return Ok((downloads, FinalizeReason::ExtractionFailuresExceeded));
                }
                continue;
            };
            consecutive_extraction_failures = 0;

            let Some(creation_time) = record.creation_time else {
                errors.push(format!("container {container_id} has no recoverable timestamp"));
                continue;
            };

            if log.contains(&creation_time) {
                match self.config.duplicate_mode {
                    DuplicateMode::Finish => return Ok((downloads, FinalizeReason::DuplicateReached)),
                    DuplicateMode::Skip => {
                        consecutive_duplicates += 1;
                        if consecutive_duplicates >= self.config.consecutive_duplicate_threshold {
                            return Ok((downloads, FinalizeReason::DuplicateRun));
                        }
                        continue;
                    }
                }
            }

            match self
                .download_one(session, params, &handle, &container_id, &creation_time)
                .await
            {
                Ok(path) => {
                    log.append(creation_time, record.prompt.unwrap_or_default()).await?;
                    outputs.push(path);
                    downloads += 1;
                    consecutive_duplicates = 0;
                    progress.report(ProgressEvent::Progress {
                        current: downloads,
                        total: params.max_downloads,
                        status: format!("downloaded container {container_id}"),
                    });
                }
                Err(e) => {
                    warn!(container_id, error = %e, "download failed after retries, skipping container");
                    errors.push(format!("download failed for {container_id}: {e}"));
                }
            }

            if let Some(max) = params.max_downloads {
                if downloads >= max {
                    return Ok((downloads, FinalizeReason::MaxDownloadsReached));
                }
            }

            tokio::task::yield_now().await;
        }
    }

    async fn download_one(
        &self,
        session: &Session,
        params: &HarvestParams,
        handle: &ElementHandle,
        container_id: &str,
        creation_time: &CanonicalTimestamp,
    ) -> HarvestResult<PathBuf> {
        let timeout = Duration::from_millis(self.config.download_timeout_ms);
        let mut last_err = None;

        for attempt in 0..=self.config.retry_attempts {
            if attempt > 0 {
                tokio::time::sleep(Duration::from_millis(250) * attempt).await;
            }

            if let Some(selector) = &params.completed_task_selector {
                let _ = self.driver.query_one_within(handle, selector).await;
            }

            let before = dl::snapshot_dir(&params.downloads_folder).await?;
            if let Err(e) = self.driver.click(handle).await {
                last_err = Some(e);
                continue;
            }

            match dl::wait_for_download(&params.downloads_folder, &before, timeout).await {
                Ok(staged) => {
                    let ext = naming::extension_from_source(&staged.to_string_lossy());
                    let dest = naming::canonical_destination(&params.downloads_folder, creation_time, &ext)?;
                    tokio::fs::rename(&staged, &dest)
                        .await
                        .map_err(|e| HarvestError::Download(format!("moving {}: {e}", staged.display())))?;
                    debug!(container_id, dest = %dest.display(), "download complete");
                    return Ok(dest);
                }
                Err(e) => {
                    warn!(container_id, attempt, error = %e, "download attempt failed, retrying");
                    last_err = Some(e);
                }
            }
        }

        let _ = session;
        Err(last_err.unwrap_or_else(|| HarvestError::Download("download failed with no recorded error".into())))
    }
}

/// Tracks document-order traversal across the already-known container list,
/// extending it via the Scroll Manager once exhausted.
struct DocumentCursor {
    sorted_ids: Vec<String>,
    position: usize,
    last_advance_outcome: Option<AdvanceOutcome>,
}

fn container_sort_key(id: &str) -> u64 {
    id.rsplit("__").next().and_then(|n| n.parse::<u64>().ok()).unwrap_or(u64::MAX)
}

impl DocumentCursor {
    fn new(start_container: String) -> Self {
        Self { sorted_ids: vec![start_container], position: 0, last_advance_outcome: None }
    }

    async fn next(
        &mut self,
        scroll: &mut ScrollManager,
        driver: &BrowserDriver,
        session: &Session,
        cancel: &tokio::sync::watch::Receiver<bool>,
    ) -> HarvestResult<Option<String>> {
        loop {
            if self.position < self.sorted_ids.len() {
                let id = self.sorted_ids[self.position].clone();
                self.position += 1;
                return Ok(Some(id));
            }

            let outcome = scroll
                .advance_until(driver, session, cancel, |new_ids| !new_ids.is_empty())
                .await?;
            self.last_advance_outcome = Some(outcome);

            match outcome {
                AdvanceOutcome::PredicateSatisfied => {
                    let mut ids: Vec<String> = scroll.state().known_container_ids.iter().cloned().collect();
                    ids.sort_by_key(|id| container_sort_key(id));
                    self.sorted_ids = ids;
                }
                _ => return Ok(None),
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn finalize(
    final_state: PipelineState,
    reason: Option<FinalizeReason>,
    actions_completed: usize,
    total_actions: usize,
    downloads: u64,
    errors: Vec<String>,
    outputs: Vec<PathBuf>,
) -> RunResult {
    RunResult { final_state, reason, actions_completed, total_actions, downloads, errors, outputs }
}

/// Execute the pre-harvest action script, returning once it either enters
/// the harvest phase (`start_generation_downloads`), runs to completion, or
/// is stopped externally.
async fn run_actions(
    program: &ScriptProgram,
    config: &Config,
    driver: &BrowserDriver,
    session: &Session,
    signals: &mut ControlSignals,
    _progress: &mut dyn ProgressReporter,
) -> HarvestResult<(ScriptOutcome, usize)> {
    let mut pc = 0usize;
    let mut variables: HashMap<String, Variable> = HashMap::new();
    let mut last_check = CheckOutcome::default();
    let mut open_if_groups: Vec<usize> = Vec::new();
    let mut conditional_wait_retries: HashMap<usize, u32> = HashMap::new();
    let mut executed = 0usize;

    while pc < program.actions.len() {
        if signals.stop_kind().is_some() {
            return Ok((ScriptOutcome::Stopped, executed));
        }
        signals.wait_while_paused().await;

        let action = &program.actions[pc];
        match action {
            Action::IfBegin { condition } | Action::Elif { condition } => {
                let group = program.group_of(pc).expect("if/elif marker has a group");
                if open_if_groups.last() == Some(&group) {
                    open_if_groups.pop();
                    pc = program.if_end_of(group) + 1;
                } else if eval_condition(condition, &last_check) {
                    open_if_groups.push(group);
                    pc += 1;
                } else {
                    pc = program.next_marker_of(pc);
                }
                continue;
            }
            Action::Else => {
                let group = program.group_of(pc).expect("else marker has a group");
                if open_if_groups.last() == Some(&group) {
                    open_if_groups.pop();
                    pc = program.if_end_of(group) + 1;
                } else {
                    open_if_groups.push(group);
                    pc += 1;
                }
                continue;
            }
            Action::IfEnd => {
                if let Some(group) = program.group_of(pc) {
                    if open_if_groups.last() == Some(&group) {
                        open_if_groups.pop();
                    }
                }
                pc += 1;
                continue;
            }
            Action::WhileBegin { condition } => {
                if eval_condition(condition, &last_check) {
                    pc += 1;
                } else {
                    pc = program.while_pair(pc) + 1;
                }
                continue;
            }
            Action::WhileEnd => {
                pc = program.while_pair(pc);
                continue;
            }
            Action::Break => {
                let (_, end) = program.enclosing_while(pc).ok_or_else(|| {
                    HarvestError::Config("break action outside a while block".to_string())
                })?;
                pc = end + 1;
                continue;
            }
            Action::Continue => {
                let (begin, _) = program.enclosing_while(pc).ok_or_else(|| {
                    HarvestError::Config("continue action outside a while block".to_string())
                })?;
                pc = begin;
                continue;
            }
            Action::SkipIf(fields) => {
                pc = if eval_condition(&fields.condition, &last_check) {
                    pc + 1 + fields.skip_count
                } else {
                    pc + 1
                };
                continue;
            }
            Action::ConditionalWait(fields) => {
                if eval_condition(&fields.condition, &last_check) {
                    let retries = conditional_wait_retries.entry(pc).or_insert(0);
                    if *retries < fields.max_retries {
                        *retries += 1;
                        tokio::time::sleep(Duration::from_millis(fields.wait_time_ms)).await;
                        pc = fields.retry_from_action;
                        continue;
                    }
                }
                pc += 1;
                continue;
            }
            Action::SetVariable { name, value } => {
                variables.insert(name.clone(), Variable::Text(value.clone()));
            }
            Action::IncrementVariable { name, amount } => {
                let current = match variables.get(name) {
                    Some(Variable::Int(n)) => *n,
                    Some(Variable::Text(s)) => s.parse().unwrap_or(0),
                    None => 0,
                };
                variables.insert(name.clone(), Variable::Int(current + amount));
            }
            Action::LogMessage(fields) => {
                match fields.level.as_deref() {
                    Some("warn") => warn!(message = %fields.message, "log_message"),
                    Some("error") => tracing::error!(message = %fields.message, "log_message"),
                    _ => info!(message = %fields.message, "log_message"),
                }
                if let Some(path) = &fields.log_file {
                    if let Err(e) = append_log_file(path, &fields.message).await {
                        warn!(error = %e, "failed writing log_message to log_file");
                    }
                }
            }
            Action::Wait { milliseconds } => {
                tokio::time::sleep(Duration::from_millis(*milliseconds)).await;
            }
            Action::WaitForElement { selector } => {
                wait_for_selector(driver, session, selector, Duration::from_secs(30)).await?;
            }
            Action::ClickButton { selector } => {
                if let Some(handle) = driver.query_one(session, selector).await? {
                    driver.click(&handle).await?;
                }
            }
            Action::InputText { selector, value } => {
                if let Some(handle) = driver.query_one(session, selector).await? {
                    driver.type_text(&handle, value).await?;
                }
            }
            Action::ToggleSetting { selector, value } => {
                if let Some(handle) = driver.query_one(session, selector).await? {
                    let current = driver.attr_of(&handle, "checked").await?.is_some();
                    if current != *value {
                        driver.click(&handle).await?;
                    }
                }
            }
            Action::Login(fields) => {
                if let Some(u) = driver.query_one(session, &fields.username_selector).await? {
                    driver.type_text(&u, &fields.username).await?;
                }
                if let Some(p) = driver.query_one(session, &fields.password_selector).await? {
                    driver.type_text(&p, &fields.password).await?;
                }
                if let Some(submit) = driver.query_one(session, &fields.submit_selector).await? {
                    driver.click(&submit).await?;
                }
            }
            Action::CheckElement(fields) => {
                last_check = evaluate_check(driver, session, fields).await?;
            }
            Action::RefreshPage => {
                driver.reload(session).await?;
            }
            Action::StartGenerationDownloads(fields) => {
                executed += 1;
                return Ok((ScriptOutcome::EnterHarvest(HarvestParams::from_action(config, fields)), executed));
            }
            Action::StopGenerationDownloads | Action::CheckGenerationStatus => {
                debug!(action = ?action, "no-op outside an active harvest phase");
            }
            Action::StopAutomation => {
                executed += 1;
                return Ok((ScriptOutcome::Stopped, executed));
            }
        }

        executed += 1;
        pc += 1;
    }

    Ok((ScriptOutcome::Completed, executed))
}

async fn evaluate_check(
    driver: &BrowserDriver,
    session: &Session,
    fields: &CheckElementFields,
) -> HarvestResult<CheckOutcome> {
    let handle = driver.query_one(session, &fields.selector).await?;
    Ok(match (fields.check.as_str(), handle) {
        ("exists", Some(_)) => CheckOutcome { passed: true, value: None },
        ("exists", None) | ("not_exists", Some(_)) => CheckOutcome { passed: false, value: None },
        ("not_exists", None) => CheckOutcome { passed: true, value: None },
        ("text_equals", Some(h)) => {
            let text = driver.text_of(&h).await?;
            let passed = fields.value.as_deref() == Some(text.as_str());
            CheckOutcome { passed, value: Some(text) }
        }
        ("text_contains", Some(h)) => {
            let text = driver.text_of(&h).await?;
            let passed = fields.value.as_deref().is_some_and(|v| text.contains(v));
            CheckOutcome { passed, value: Some(text) }
        }
        ("attribute_equals", Some(h)) => {
            let attr_name = fields.attribute.as_deref().unwrap_or("");
            let attr = driver.attr_of(&h, attr_name).await?;
            let passed = attr.as_deref() == fields.value.as_deref();
            CheckOutcome { passed, value: attr }
        }
        (_, None) => CheckOutcome { passed: false, value: None },
        (_, Some(_)) => CheckOutcome { passed: false, value: None },
    })
}

async fn wait_for_selector(
    driver: &BrowserDriver,
    session: &Session,
    selector: &str,
    timeout: Duration,
) -> HarvestResult<()> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if driver.query_one(session, selector).await?.is_some() {
            return Ok(());
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(HarvestError::Browser(format!("timed out waiting for selector {selector}")));
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

async fn append_log_file(path: &str, message: &str) -> HarvestResult<()> {
    use tokio::io::AsyncWriteExt;
    if let Some(parent) = std::path::Path::new(path).parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| HarvestError::Other(format!("opening log_file {path}: {e}")))?;
    file.write_all(format!("{message}\n").as_bytes())
        .await
        .map_err(|e| HarvestError::Other(format!("writing log_file {path}: {e}")))?;
    Ok(())
}

