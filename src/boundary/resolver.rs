//! Boundary Resolver: locates where a prior run left off.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::browser::{BrowserDriver, Session};
use crate::download_log::DownloadLog;
use crate::errors::HarvestResult;
use crate::extractor::{ExtractionType, MetadataExtractor};
use crate::scroll::{AdvanceOutcome, ScrollManager};
use crate::timestamp::CanonicalTimestamp;

/// Which of the two mutually exclusive resolution modes to run.
#[derive(Debug, Clone)]
pub enum BoundaryMode {
    /// Resume at a named, exact `start_from` timestamp.
    StartFrom(CanonicalTimestamp),
    /// Stop at the first container absent from the Download Log.
    FirstUnseen,
}

/// Why resolution stopped without finding a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    EndOfGallery,
    ScrollCapExceeded,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct BoundaryOutcome {
    pub found: bool,
    pub container_id: Option<String>,
    pub creation_time: Option<CanonicalTimestamp>,
    pub unresolved_reason: Option<UnresolvedReason>,
}

impl BoundaryOutcome {
    fn found(container_id: String, creation_time: CanonicalTimestamp) -> Self {
        Self {
            found: true,
            container_id: Some(container_id),
            creation_time: Some(creation_time),
            unresolved_reason: None,
        }
    }

    fn unresolved(reason: UnresolvedReason) -> Self {
        Self {
            found: false,
            container_id: None,
            creation_time: None,
            unresolved_reason: Some(reason),
        }
    }
}

/// Whether a single container's scan settled the search for this pass, and
/// if so, with what disposition.
enum ScanVerdict {
    Boundary(CanonicalTimestamp),
    Seen,
    Unknown,
}

fn judge(
    mode: &BoundaryMode,
    creation_time: &Option<CanonicalTimestamp>,
    log: &DownloadLog,
) -> ScanVerdict {
    let Some(ts) = creation_time else {
        return ScanVerdict::Unknown;
    };
    match mode {
        BoundaryMode::StartFrom(target) => {
            if ts == target {
                ScanVerdict::Boundary(ts.clone())
            } else {
                ScanVerdict::Seen
            }
        }
        BoundaryMode::FirstUnseen => {
            if log.contains(ts) {
                ScanVerdict::Seen
            } else {
                ScanVerdict::Boundary(ts.clone())
            }
        }
    }
}

/// Scan containers top-to-bottom, invoking the Scroll Manager between
/// passes, until the boundary is found or a cap/cancellation fires.
pub async fn resolve(
    mode: BoundaryMode,
    driver: &BrowserDriver,
    session: &Session,
    page_url: &str,
    extractor: &mut MetadataExtractor,
    scroll: &mut ScrollManager,
    log: &DownloadLog,
    cancel: &tokio::sync::watch::Receiver<bool>,
) -> HarvestResult<BoundaryOutcome> {
    let mut scanned: HashSet<String> = HashSet::new();
    let mut retried_once: HashSet<String> = HashSet::new();

    loop {
        if *cancel.borrow() {
            return Ok(BoundaryOutcome::unresolved(UnresolvedReason::Cancelled));
        }

        let mut visible = scroll.visible_container_ids(driver, session).await?;
        visible.retain(|id| !scanned.contains(id));

        for id in &visible {
            if *cancel.borrow() {
                return Ok(BoundaryOutcome::unresolved(UnresolvedReason::Cancelled));
            }

            let Some(handle) = driver.query_one(session, &format!("[id=\"{id}\"]")).await? else {
                // Container was virtualized away between listing and query;
                // leave it unscanned so a later pass can retry it under a
                // fresh ID list.
                continue;
            };

            let record = extractor
                .extract(driver, session, &handle, id, page_url, ExtractionType::All)
                .await?;

            let creation_time = record.and_then(|r| r.creation_time);

            match judge(&mode, &creation_time, log) {
                ScanVerdict::Boundary(ts) => {
                    info!(container_id = %id, "boundary resolved");
                    return Ok(BoundaryOutcome::found(id.clone(), ts));
                }
                ScanVerdict::Seen => {
                    scanned.insert(id.clone());
                }
                ScanVerdict::Unknown => {
                    if retried_once.contains(id) {
                        // Already retried once this phase; give up on it
                        // without treating a single extraction failure as
                        // end-of-data.
                        scanned.insert(id.clone());
                        retried_once.remove(id);
                    } else {
                        retried_once.insert(id.clone());
                    }
                }
            }
        }

        debug!(scanned = scanned.len(), "resolution pass complete without boundary");

        let before_count = scroll.state().known_container_ids.len();
        match scroll
            .advance_until(driver, session, cancel, |new_ids| !new_ids.is_empty())
            .await?
        {
            AdvanceOutcome::Cancelled => {
                return Ok(BoundaryOutcome::unresolved(UnresolvedReason::Cancelled))
            }
            AdvanceOutcome::EndOfGallery => {
                let after_count = scroll.state().known_container_ids.len();
                if after_count == before_count {
                    return Ok(BoundaryOutcome::unresolved(UnresolvedReason::EndOfGallery));
                }
            }
            AdvanceOutcome::AttemptsExhausted | AdvanceOutcome::ConsecutiveFailuresExceeded => {
                return Ok(BoundaryOutcome::unresolved(UnresolvedReason::ScrollCapExceeded))
            }
            AdvanceOutcome::PredicateSatisfied => {}
        }
    }
}
