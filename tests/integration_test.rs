// tests/integration_test.rs
use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;
use tokio::time::sleep;

use dcdn_client::*;

/// Test harness for the console: one connected session with its
/// controller, board, and session-wide cancellation token.
struct TestConsole {
    session: Session,
    controller: InteractionController,
    board: StatusBoard,
    cancel: CancelToken,
}

impl TestConsole {
    async fn connect(config: AppConfig) -> Self {
        let session = Session::connect(config)
            .await
            .expect("session should connect");
        let controller = session.controller();
        let board = controller.board();
        let cancel = session.cancel_token();
        Self {
            session,
            controller,
            board,
            cancel,
        }
    }

    async fn connect_default() -> Self {
        Self::connect(AppConfig::default()).await
    }
}

fn payload_file(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file should be created");
    file.write_all(bytes).expect("payload should be written");
    file
}

fn upload_form(file: &NamedTempFile) -> UploadForm {
    UploadForm {
        file: Some(file.path().to_path_buf()),
        name: "holiday-photo".to_string(),
        content_type: "image/png".to_string(),
        owner: "alice".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn upload_succeeds_and_refreshes_metrics_once() {
    let console = TestConsole::connect_default().await;
    let file = payload_file(b"binary image bytes");

    let status = console
        .controller
        .upload_content(&upload_form(&file), &console.cancel)
        .await;

    assert!(status.is_success(), "unexpected status: {status:?}");
    assert!(status.message.contains("Content uploaded successfully!"));
    assert!(status.message.contains("mock_"));
    assert_eq!(console.board.status(StatusArea::Upload).await, Some(status));
    assert_eq!(console.board.metrics_refreshes().await, 1);
}

#[tokio::test(start_paused = true)]
async fn oversized_upload_is_rejected_with_formatted_limit() {
    let mut config = AppConfig::default();
    config.ui.max_file_size = 4;
    let console = TestConsole::connect(config).await;
    let file = payload_file(b"five!");

    let status = console
        .controller
        .upload_content(&upload_form(&file), &console.cancel)
        .await;

    assert!(!status.is_success());
    assert!(
        status.message.contains("4 Bytes"),
        "limit missing from: {}",
        status.message
    );
    assert!(!status.message.contains("mock_"));
    assert_eq!(console.board.metrics_refreshes().await, 0);
}

#[tokio::test(start_paused = true)]
async fn disallowed_content_type_lists_allowed_types() {
    let mut config = AppConfig::default();
    config.content.allowed_types =
        Some(vec!["text/plain".to_string(), "application/json".to_string()]);
    let console = TestConsole::connect(config).await;
    let file = payload_file(b"pixels");

    let status = console
        .controller
        .upload_content(&upload_form(&file), &console.cancel)
        .await;

    assert!(!status.is_success());
    assert!(status.message.contains("'image/png' is not allowed"));
    assert!(status.message.contains("text/plain, application/json"));
    assert_eq!(console.board.metrics_refreshes().await, 0);
}

#[tokio::test(start_paused = true)]
async fn upload_requires_all_fields() {
    let console = TestConsole::connect_default().await;
    let file = payload_file(b"data");

    let mut form = upload_form(&file);
    form.owner = "   ".to_string();
    let status = console
        .controller
        .upload_content(&form, &console.cancel)
        .await;

    assert!(!status.is_success());
    assert_eq!(status.message, "Please fill in all required fields");
    assert!(!status.message.contains("mock_"));
    assert_eq!(console.board.metrics_refreshes().await, 0);
}

#[tokio::test(start_paused = true)]
async fn upload_requires_a_file() {
    let console = TestConsole::connect_default().await;

    let form = UploadForm {
        file: None,
        name: "report".to_string(),
        content_type: "application/pdf".to_string(),
        owner: "alice".to_string(),
    };
    let status = console
        .controller
        .upload_content(&form, &console.cancel)
        .await;

    assert!(!status.is_success());
    assert_eq!(status.message, "Please select a file to upload");
}

#[tokio::test(start_paused = true)]
async fn unreadable_file_surfaces_as_upload_failure() {
    let console = TestConsole::connect_default().await;

    let form = UploadForm {
        file: Some("/nonexistent/dcdn/payload.bin".into()),
        name: "report".to_string(),
        content_type: "application/pdf".to_string(),
        owner: "alice".to_string(),
    };
    let status = console
        .controller
        .upload_content(&form, &console.cancel)
        .await;

    assert!(!status.is_success());
    assert!(status.message.starts_with("Upload failed:"));
}

#[tokio::test(start_paused = true)]
async fn node_registration_validates_capacity() {
    let console = TestConsole::connect_default().await;

    for capacity in ["0", "-5", "lots", ""] {
        let status = console
            .controller
            .register_node("edge-ams-01", "eu-west", capacity, &console.cancel)
            .await;
        assert!(!status.is_success(), "capacity {capacity:?} was accepted");
        assert_eq!(status.message, "Please fill in all fields with valid values");
    }
    assert_eq!(console.board.metrics_refreshes().await, 0);
}

#[tokio::test(start_paused = true)]
async fn node_registration_reports_formatted_capacity() {
    let console = TestConsole::connect_default().await;

    let status = console
        .controller
        .register_node("edge-ams-01", "eu-west", "1073741824", &console.cancel)
        .await;

    assert!(status.is_success());
    assert!(
        status
            .message
            .contains("Node edge-ams-01 registered successfully with 1 GB capacity"),
        "unexpected message: {}",
        status.message
    );
    assert_eq!(console.board.metrics_refreshes().await, 1);
}

#[tokio::test(start_paused = true)]
async fn download_requires_a_content_id() {
    let console = TestConsole::connect_default().await;

    let status = console
        .controller
        .download_content("  ", &console.cancel)
        .await;

    assert!(!status.is_success());
    assert_eq!(status.message, "Please enter a content ID");
}

#[tokio::test(start_paused = true)]
async fn download_names_the_requested_id() {
    let console = TestConsole::connect_default().await;

    let status = console
        .controller
        .download_content("mock_abc123", &console.cancel)
        .await;

    assert!(status.is_success());
    assert!(status.message.contains("mock_abc123"));
}

#[tokio::test(start_paused = true)]
async fn metadata_query_renders_the_example_record() {
    let console = TestConsole::connect_default().await;

    let status = console
        .controller
        .content_metadata("mock_abc123", &console.cancel)
        .await;

    assert!(status.is_success());
    assert_eq!(status.message, "Metadata loaded successfully");

    let record = console
        .board
        .metadata_panel()
        .await
        .expect("metadata panel should be rendered");
    assert_eq!(record.id, "mock_abc123");
    assert_eq!(record.metadata.name, "Example Content");
    assert_eq!(record.metadata.size, 1_024_000);
    assert_eq!(record.metadata.owner, "example-owner");
    assert!(record.metadata.content_hash.is_some());
}

#[tokio::test(start_paused = true)]
async fn overlapping_availability_checks_last_completion_wins() {
    let console = TestConsole::connect_default().await;
    let controller = &console.controller;

    let (first, second) = tokio::join!(
        controller.check_content_availability("content-a", &console.cancel),
        async {
            // Stagger the second check so it completes after the first.
            sleep(Duration::from_millis(10)).await;
            controller
                .check_content_availability("content-b", &console.cancel)
                .await
        }
    );

    assert_eq!(first.message, "Content available on 3 nodes");
    assert_eq!(second.message, "Content available on 3 nodes");

    let report = console
        .board
        .availability_panel()
        .await
        .expect("availability panel should be rendered");
    assert_eq!(report.content_id, "content-b");
    assert_eq!(report.nodes.len(), 3);
    assert!(report.nodes.iter().all(|node| node.starts_with("node_")));
}

#[tokio::test(start_paused = true)]
async fn metrics_start_at_zero() {
    let console = TestConsole::connect_default().await;

    let metrics = console.controller.load_metrics(&console.cancel).await;

    assert_eq!(metrics, NetworkMetrics::default());
    assert_eq!(console.board.metrics_refreshes().await, 1);
}

#[tokio::test(start_paused = true)]
async fn request_slower_than_its_timeout_reports_an_error() {
    let mut config = AppConfig::default();
    config.ui.request_timeout_ms = 100;
    let console = TestConsole::connect(config).await;

    let status = console
        .controller
        .download_content("mock_abc123", &console.cancel)
        .await;

    assert!(!status.is_success());
    assert!(
        status.message.starts_with("Download failed:"),
        "unexpected message: {}",
        status.message
    );
    assert!(status.message.contains("timed out"));
}

#[tokio::test(start_paused = true)]
async fn cancelled_request_reports_an_error() {
    let console = TestConsole::connect_default().await;
    let (handle, token) = cancel_pair();

    let controller = console.controller.clone();
    let download =
        tokio::spawn(async move { controller.download_content("mock_abc123", &token).await });

    sleep(Duration::from_millis(10)).await;
    handle.cancel();

    let status = download.await.expect("download task should finish");
    assert!(!status.is_success());
    assert!(status.message.contains("request cancelled"));
}

#[tokio::test(start_paused = true)]
async fn session_shutdown_cancels_in_flight_requests() {
    let console = TestConsole::connect_default().await;

    let controller = console.controller.clone();
    let cancel = console.cancel.clone();
    let download =
        tokio::spawn(async move { controller.download_content("mock_abc123", &cancel).await });

    sleep(Duration::from_millis(10)).await;
    console.session.shutdown();

    let status = download.await.expect("download task should finish");
    assert!(!status.is_success());
    assert!(status.message.starts_with("Download failed:"));
}

#[tokio::test(start_paused = true)]
async fn empty_faucet_url_fails_initialization() {
    let config = AppConfig {
        faucet_url: "  ".to_string(),
        ..AppConfig::default()
    };

    let err = Session::connect(config)
        .await
        .expect_err("connect should fail");
    assert!(matches!(err, ClientError::Init(_)));
}

#[tokio::test(start_paused = true)]
async fn invalid_config_fails_initialization() {
    let mut config = AppConfig::default();
    config.ui.max_file_size = 0;

    let err = Session::connect(config)
        .await
        .expect_err("connect should fail");
    assert!(matches!(err, ClientError::Config(_)));
}

#[tokio::test(start_paused = true)]
async fn announce_connection_mentions_missing_app_id() {
    let console = TestConsole::connect_default().await;
    console.controller.announce_connection().await;

    let status = console
        .board
        .status(StatusArea::Upload)
        .await
        .expect("greeting should be posted");
    assert!(status.is_success());
    assert!(status.message.contains("requires deployed app ID"));

    let deployed = TestConsole::connect(AppConfig {
        application_id: "9a6140207dec406bb0f67fb98cda7cc9".to_string(),
        ..AppConfig::default()
    })
    .await;
    deployed.controller.announce_connection().await;
    let status = deployed
        .board
        .status(StatusArea::Upload)
        .await
        .expect("greeting should be posted");
    assert_eq!(status.message, "dCDN client connected and ready!");
}
