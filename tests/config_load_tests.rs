//! End-to-end coverage of loading a run configuration from disk and wiring
//! it to the Download Log and artifact naming, without driving a browser.

use gallery_harvester::config;
use gallery_harvester::download_log::DownloadLog;
use gallery_harvester::naming;
use gallery_harvester::timestamp;

#[tokio::test]
async fn loads_minimal_document_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");
    tokio::fs::write(
        &path,
        r#"{"name": "demo", "url": "https://example.com/gallery", "actions": []}"#,
    )
    .await
    .unwrap();

    let config = config::load_from_file(&path).await.unwrap();
    assert_eq!(config.gallery_url, "https://example.com/gallery");
    assert!(config.headless);
    assert!(config.action_script.is_empty());
}

#[tokio::test]
async fn loads_full_document_with_duplicate_skip_mode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");
    tokio::fs::write(
        &path,
        r#"{
            "name": "demo",
            "url": "https://example.com/gallery",
            "headless": false,
            "duplicate_mode": "skip",
            "consecutive_duplicate_threshold": 5,
            "actions": []
        }"#,
    )
    .await
    .unwrap();

    let config = config::load_from_file(&path).await.unwrap();
    assert!(!config.headless);
    assert_eq!(config.consecutive_duplicate_threshold, 5);
}

#[tokio::test]
async fn rejects_document_missing_required_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");
    tokio::fs::write(&path, r#"{"name": "demo"}"#).await.unwrap();

    let result = config::load_from_file(&path).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn downloads_folder_and_log_cooperate_across_a_simulated_run() {
    let dir = tempfile::tempdir().unwrap();
    let downloads_folder = dir.path().join("downloads");
    tokio::fs::create_dir_all(&downloads_folder).await.unwrap();

    let logs_folder = dir.path().join("logs");
    let mut log = DownloadLog::open(&logs_folder.join("download_log.txt")).await.unwrap();

    let ts = timestamp::parse_any("25 Aug 2025 02:30:47").unwrap();
    assert!(!log.contains(&ts));

    let dest = naming::canonical_destination(&downloads_folder, &ts, "mp4").unwrap();
    tokio::fs::write(&dest, b"fake artifact bytes").await.unwrap();
    log.append(ts.clone(), "a sample prompt".to_string()).await.unwrap();

    assert!(log.contains(&ts));
    assert_eq!(dest.file_name().unwrap(), "20250825-023047.mp4");

    // A second artifact claiming the exact same timestamp must disambiguate
    // on disk even though the log already considers it a duplicate.
    let dest2 = naming::canonical_destination(&downloads_folder, &ts, "mp4").unwrap();
    assert_eq!(dest2.file_name().unwrap(), "20250825-023047-1.mp4");
}
