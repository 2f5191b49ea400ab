//! End-to-end scenario tests driving [`PipelineController`] against a
//! scripted [`FakeGallery`] instead of a real browser, exercising the full
//! boundary-resolution and harvest-loop path.

use gallery_harvester::browser::{FakeContainer, FakeGallery, FakeGalleryTuning, Session};
use gallery_harvester::config::{Config, DuplicateMode};
use gallery_harvester::download_log::DownloadLog;
use gallery_harvester::pipeline::{channel, FinalizeReason, NoOpProgress, PipelineController};

const VALID_TEXT_0: &str = "Creation Time: 26 Aug 2025 10:00:00\nThe camera shows a quiet \
    landscape scene as soft light moves across the distant building and room.";
const VALID_TEXT_1: &str = "Creation Time: 25 Aug 2025 09:00:00\nA wide camera shot reveals \
    a person standing in the room as the scene begins to shift.";
const VALID_TEXT_2: &str = "Creation Time: 24 Aug 2025 08:00:00\nThe frame captures a building \
    from a low angle as the camera pans across the landscape.";
const VALID_TEXT_3: &str = "Creation Time: 23 Aug 2025 07:00:00\nA person walks through the \
    room while the camera view depicts the surrounding landscape.";
const VALID_TEXT_4: &str = "Creation Time: 22 Aug 2025 06:00:00\nThe scene shows a building \
    at dusk as gentle light moves across the quiet landscape.";

fn container(id: &str, text: &str) -> FakeContainer {
    FakeContainer::new(id, text, format!("raw_{id}.mp4"))
}

#[tokio::test]
async fn duplicate_finish_walk_stops_at_first_seen_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let downloads_folder = dir.path().join("downloads");
    let logs_folder = dir.path().join("logs");

    let ts2 = gallery_harvester::timestamp::parse_any(VALID_TEXT_2).unwrap();
    {
        let mut seed = DownloadLog::open(&logs_folder.join("download_log.txt")).await.unwrap();
        seed.append(ts2, "prior run prompt".to_string()).await.unwrap();
    }

    let gallery = FakeGallery::new(
        vec![
            container("c__0", VALID_TEXT_0),
            container("c__1", VALID_TEXT_1),
            container("c__2", VALID_TEXT_2),
        ],
        FakeGalleryTuning { reveal_step: 1, px_per_attempt: 2_500.0 },
    );
    let session = Session::fake(gallery);

    let config = Config::builder()
        .gallery_url("https://fake.example/gallery")
        .downloads_folder(downloads_folder)
        .logs_folder(logs_folder)
        .duplicate_mode(DuplicateMode::Finish)
        .dom_wait_timeout_ms(5)
        .build()
        .unwrap();

    let mut controller = PipelineController::new(config);
    let (_handle, mut signals) = channel();
    let mut progress = NoOpProgress;

    let result = controller.run_with_session(&session, &mut signals, &mut progress).await.unwrap();

    assert_eq!(result.downloads, 2);
    assert_eq!(result.reason, Some(FinalizeReason::DuplicateReached));
}

#[tokio::test]
async fn duplicate_skip_walk_skips_over_known_timestamps() {
    let dir = tempfile::tempdir().unwrap();
    let downloads_folder = dir.path().join("downloads");
    let logs_folder = dir.path().join("logs");

    let ts1 = gallery_harvester::timestamp::parse_any(VALID_TEXT_1).unwrap();
    let ts3 = gallery_harvester::timestamp::parse_any(VALID_TEXT_3).unwrap();
    {
        let mut seed = DownloadLog::open(&logs_folder.join("download_log.txt")).await.unwrap();
        seed.append(ts1, "prior prompt one".to_string()).await.unwrap();
        seed.append(ts3, "prior prompt three".to_string()).await.unwrap();
    }

    let gallery = FakeGallery::new(
        vec![
            container("c__0", VALID_TEXT_0),
            container("c__1", VALID_TEXT_1),
            container("c__2", VALID_TEXT_2),
            container("c__3", VALID_TEXT_3),
            container("c__4", VALID_TEXT_4),
        ],
        FakeGalleryTuning { reveal_step: 1, px_per_attempt: 2_500.0 },
    );
    let session = Session::fake(gallery);

    let config = Config::builder()
        .gallery_url("https://fake.example/gallery")
        .downloads_folder(downloads_folder)
        .logs_folder(logs_folder)
        .duplicate_mode(DuplicateMode::Skip)
        .consecutive_duplicate_threshold(2)
        .dom_wait_timeout_ms(5)
        .build()
        .unwrap();

    let mut controller = PipelineController::new(config);
    let (_handle, mut signals) = channel();
    let mut progress = NoOpProgress;

    let result = controller.run_with_session(&session, &mut signals, &mut progress).await.unwrap();

    // c__1 and c__3 are isolated duplicates (never two in a row), so the
    // walk skips each one and keeps going rather than stopping.
    assert_eq!(result.downloads, 3);
    assert_eq!(result.reason, Some(FinalizeReason::EndOfGalleryAssumed));
}

#[tokio::test]
async fn start_from_resumes_at_named_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let downloads_folder = dir.path().join("downloads");
    let logs_folder = dir.path().join("logs");

    let gallery = FakeGallery::new(
        vec![
            container("c__0", VALID_TEXT_0),
            container("c__1", VALID_TEXT_1),
            container("c__2", VALID_TEXT_2),
        ],
        FakeGalleryTuning { reveal_step: 1, px_per_attempt: 2_500.0 },
    );
    let session = Session::fake(gallery);

    let config = Config::builder()
        .gallery_url("https://fake.example/gallery")
        .downloads_folder(downloads_folder)
        .logs_folder(logs_folder)
        .start_from("25 Aug 2025 09:00:00")
        .dom_wait_timeout_ms(5)
        .build()
        .unwrap();

    let mut controller = PipelineController::new(config);
    let (_handle, mut signals) = channel();
    let mut progress = NoOpProgress;

    let result = controller.run_with_session(&session, &mut signals, &mut progress).await.unwrap();

    // c__0 predates the resume point and must never be downloaded.
    assert_eq!(result.downloads, 2);
    assert_eq!(result.reason, Some(FinalizeReason::EndOfGalleryAssumed));
}

#[tokio::test]
async fn small_scroll_increments_still_complete_the_gallery() {
    let dir = tempfile::tempdir().unwrap();
    let downloads_folder = dir.path().join("downloads");
    let logs_folder = dir.path().join("logs");

    let gallery = FakeGallery::new(
        vec![
            container("c__0", VALID_TEXT_0),
            container("c__1", VALID_TEXT_1),
            container("c__2", VALID_TEXT_2),
            container("c__3", VALID_TEXT_3),
            container("c__4", VALID_TEXT_4),
        ],
        // Each scroll attempt only advances 140px, well under a typical
        // min_scroll_distance, but still clears the dynamic success
        // threshold and should eventually reveal the whole gallery.
        FakeGalleryTuning { reveal_step: 1, px_per_attempt: 140.0 },
    );
    let session = Session::fake(gallery);

    let config = Config::builder()
        .gallery_url("https://fake.example/gallery")
        .downloads_folder(downloads_folder)
        .logs_folder(logs_folder)
        .dom_wait_timeout_ms(5)
        .build()
        .unwrap();

    let mut controller = PipelineController::new(config);
    let (_handle, mut signals) = channel();
    let mut progress = NoOpProgress;

    let result = controller.run_with_session(&session, &mut signals, &mut progress).await.unwrap();

    assert_eq!(result.downloads, 5);
    assert_eq!(result.reason, Some(FinalizeReason::EndOfGalleryAssumed));
}

#[tokio::test]
async fn extraction_retry_succeeds_on_second_attempt() {
    let dir = tempfile::tempdir().unwrap();
    let downloads_folder = dir.path().join("downloads");
    let logs_folder = dir.path().join("logs");

    let invalid_text = "Nothing much is happening in this placeholder content block right now.";
    let gallery = FakeGallery::new(
        vec![FakeContainer::with_text_sequence(
            "c__0",
            vec![invalid_text.to_string(), invalid_text.to_string(), VALID_TEXT_0.to_string()],
            "raw_c__0.mp4".to_string(),
        )],
        FakeGalleryTuning { reveal_step: 1, px_per_attempt: 2_500.0 },
    );
    let session = Session::fake(gallery);

    let config = Config::builder()
        .gallery_url("https://fake.example/gallery")
        .downloads_folder(downloads_folder)
        .logs_folder(logs_folder)
        .dom_wait_timeout_ms(5)
        .build()
        .unwrap();

    let mut controller = PipelineController::new(config);
    let (_handle, mut signals) = channel();
    let mut progress = NoOpProgress;

    let result = controller.run_with_session(&session, &mut signals, &mut progress).await.unwrap();

    assert_eq!(result.downloads, 1);
    assert_eq!(result.reason, Some(FinalizeReason::EndOfGalleryAssumed));
}

#[tokio::test]
async fn max_downloads_cap_stops_harvest_early() {
    let dir = tempfile::tempdir().unwrap();
    let downloads_folder = dir.path().join("downloads");
    let logs_folder = dir.path().join("logs");

    let gallery = FakeGallery::new(
        vec![
            container("c__0", VALID_TEXT_0),
            container("c__1", VALID_TEXT_1),
            container("c__2", VALID_TEXT_2),
            container("c__3", VALID_TEXT_3),
            container("c__4", VALID_TEXT_4),
        ],
        FakeGalleryTuning { reveal_step: 1, px_per_attempt: 2_500.0 },
    );
    let session = Session::fake(gallery);

    let config = Config::builder()
        .gallery_url("https://fake.example/gallery")
        .downloads_folder(downloads_folder)
        .logs_folder(logs_folder)
        .max_downloads(2)
        .dom_wait_timeout_ms(5)
        .build()
        .unwrap();

    let mut controller = PipelineController::new(config);
    let (_handle, mut signals) = channel();
    let mut progress = NoOpProgress;

    let result = controller.run_with_session(&session, &mut signals, &mut progress).await.unwrap();

    assert_eq!(result.downloads, 2);
    assert_eq!(result.reason, Some(FinalizeReason::MaxDownloadsReached));
}
