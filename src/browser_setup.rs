//! Chrome/Chromium discovery and managed download.
//!
//! Only the two functions [`crate::browser::driver::BrowserDriver`] needs are
//! kept here; a shared browser launcher isn't, since this crate opens
//! exactly one session per run and builds its `BrowserConfig` inline in
//! `driver::Session::open` instead.

use anyhow::{Context, Result};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use std::path::PathBuf;
use std::process::Command;
use tracing::{info, warn};

/// Find Chrome/Chromium executable on the system with platform-specific search paths.
pub async fn find_browser_executable() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!(path = %path.display(), "using browser from CHROMIUM_PATH");
            return Ok(path);
        }
        warn!(path = %path.display(), "CHROMIUM_PATH points to a non-existent file");
    }

    let paths = if cfg!(target_os = "windows") {
        vec![
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files\Chromium\Application\chrome.exe",
        ]
    } else if cfg!(target_os = "macos") {
        vec![
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        vec![
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/usr/local/bin/chromium",
        ]
    };

    for path_str in paths {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!(path = %path.display(), "found browser");
            return Ok(path);
        }
    }

    if !cfg!(target_os = "windows") {
        for cmd in &["chromium", "chromium-browser", "google-chrome", "chrome"] {
            if let Ok(output) = Command::new("which").arg(cmd).output()
                && output.status.success()
            {
                let path_str = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path_str.is_empty() {
                    let path = PathBuf::from(path_str);
                    info!(path = %path.display(), "found browser via `which`");
                    return Ok(path);
                }
            }
        }
    }

    warn!("no Chrome/Chromium executable found on this system");
    Err(anyhow::anyhow!("Chrome/Chromium executable not found"))
}

/// Download and cache a managed Chromium build when no system browser is found.
pub async fn download_managed_browser() -> Result<PathBuf> {
    info!("downloading managed Chromium browser");

    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("gallery_harvester")
        .join("chromium");

    std::fs::create_dir_all(&cache_dir).context("creating Chromium cache directory")?;

    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .context("building fetcher options")?,
    );

    let revision_info = fetcher.fetch().await.context("fetching browser")?;
    info!(path = %revision_info.folder_path.display(), "downloaded Chromium");
    Ok(revision_info.executable_path)
}
