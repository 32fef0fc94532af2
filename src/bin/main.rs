// src/bin/main.rs

use dcdn_client::{format_bytes, AppConfig, Session, StatusArea};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match AppConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
        },
        None => AppConfig::default(),
    };

    println!("dCDN Client Console");
    println!("===================");

    let session = match Session::connect(config).await {
        Ok(session) => session,
        Err(err) => {
            eprintln!("Error connecting to dCDN: {err}");
            std::process::exit(1);
        }
    };
    println!("Chain ID: {}", session.chain_id());

    let controller = session.controller();
    let cancel = session.cancel_token();
    controller.announce_connection().await;
    let metrics = controller.load_metrics(&cancel).await;

    let board = controller.board();
    if let Some(status) = board.status(StatusArea::Upload).await {
        println!("{}", status.message);
    }

    println!("\nNetwork metrics:");
    println!("  Nodes:          {}", metrics.node_count);
    println!("  Total capacity: {}", format_bytes(metrics.total_capacity));
    println!("  Data served:    {}", format_bytes(metrics.total_data_served));
    println!("  Content items:  {}", metrics.content_count);

    println!("\nRun `cargo run --example console_session` to see the full upload and registration flow");
}
