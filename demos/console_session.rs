// demos/console_session.rs
//
// Walks through every console operation against the simulated
// backend: bootstrap, a rejected and an accepted upload, node
// registration, download, metadata lookup, and an availability check.

use dcdn_client::{
    AppConfig, ContentConfig, Session, StatusArea, StatusBoard, UploadForm,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("🚀 Starting dCDN Client Console Session");
    println!("=======================================\n");

    let mut config = AppConfig::default();
    config.content.allowed_types = Some(ContentConfig::standard_allow_list());

    let session = match Session::connect(config).await {
        Ok(session) => session,
        Err(err) => {
            eprintln!("Error connecting to dCDN: {err}");
            std::process::exit(1);
        }
    };
    println!("⛓️  Chain claimed: {}", session.chain_id());

    let controller = session.controller();
    let cancel = session.cancel_token();
    controller.announce_connection().await;
    let board = controller.board();
    print_status(&board, StatusArea::Upload, "bootstrap").await;

    controller.load_metrics(&cancel).await;

    // Stage a payload in the temp directory.
    let payload = std::env::temp_dir().join("dcdn_demo_payload.txt");
    std::fs::write(&payload, b"hello from the dCDN console demo")
        .expect("demo payload should be writable");

    // An upload with a type outside the allow-list is rejected before
    // any backend call.
    println!("\n📤 Uploading with a disallowed content type...");
    let form = UploadForm {
        file: Some(payload.clone()),
        name: "demo-notes".to_string(),
        content_type: "application/x-tar".to_string(),
        owner: "demo-operator".to_string(),
    };
    controller.upload_content(&form, &cancel).await;
    print_status(&board, StatusArea::Upload, "upload").await;

    println!("\n📤 Uploading the same file as text/plain...");
    let form = UploadForm {
        content_type: "text/plain".to_string(),
        ..form
    };
    let upload = controller.upload_content(&form, &cancel).await;
    print_status(&board, StatusArea::Upload, "upload").await;
    if upload.is_success() {
        // The shell owns the form and resets it after a success.
        drop(form);
    }

    println!("\n🗄️  Registering a storage node...");
    controller
        .register_node("edge-fra-01", "eu-central", "1073741824", &cancel)
        .await;
    print_status(&board, StatusArea::Node, "register").await;

    println!("\n📥 Requesting a download...");
    controller.download_content("mock_demo_content", &cancel).await;
    print_status(&board, StatusArea::Download, "download").await;

    println!("\n🔎 Fetching content metadata...");
    controller.content_metadata("mock_demo_content", &cancel).await;
    print_status(&board, StatusArea::Content, "metadata").await;
    if let Some(record) = board.metadata_panel().await {
        println!("    ID:    {}", record.id);
        println!("    Name:  {}", record.metadata.name);
        println!("    Size:  {}", dcdn_client::format_bytes(record.metadata.size));
        println!("    Owner: {}", record.metadata.owner);
    }

    println!("\n🌐 Checking content availability...");
    controller
        .check_content_availability("mock_demo_content", &cancel)
        .await;
    print_status(&board, StatusArea::Availability, "availability").await;
    if let Some(report) = board.availability_panel().await {
        for node in &report.nodes {
            println!("    - {node}");
        }
    }

    let metrics = board.metrics().await;
    let refreshes = board.metrics_refreshes().await;
    println!("\n📊 Dashboard: {} nodes, {} content items, refreshed {} times", metrics.node_count, metrics.content_count, refreshes);

    println!("\n🛑 Shutting down session...");
    session.shutdown();
    let _ = std::fs::remove_file(&payload);
    println!("✅ Console session complete");
}

async fn print_status(board: &StatusBoard, area: StatusArea, label: &str) {
    if let Some(status) = board.status(area).await {
        let marker = if status.is_success() { "✓" } else { "✗" };
        println!("  {marker} [{label}] {}", status.message);
    }
}
