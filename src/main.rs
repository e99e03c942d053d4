// VOLTGUARD CORE - Power quality classification service

mod classifier;
mod config;
mod http;
mod telemetry;
mod types;

use std::sync::Arc;

use tokio::sync::oneshot;

use crate::config::CoreConfig;
use crate::http::ApiState;
use crate::telemetry::TelemetryStore;

fn main() {
    let _ = env_logger::try_init();

    if let Err(error) = run_console() {
        eprintln!("[VOLTGUARD] {}", error);
    }
}

fn run_console() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        tokio::spawn(async move {
            if let Err(error) = tokio::signal::ctrl_c().await {
                eprintln!("[VOLTGUARD] Failed to listen for shutdown: {}", error);
            }
            let _ = shutdown_tx.send(());
        });

        run_until_shutdown(shutdown_rx).await;
    });

    Ok(())
}

async fn run_until_shutdown(shutdown_rx: oneshot::Receiver<()>) {
    println!("==========================================");
    println!("=     VOLTGUARD CORE - INITIALIZING      =");
    println!("=    Power Quality Signal Analyzer       =");
    println!("==========================================\n");

    let config = Arc::new(CoreConfig::from_env());
    let telemetry = Arc::new(TelemetryStore::new());

    let api_addr = config.api_addr.clone();
    let state = ApiState {
        telemetry: Arc::clone(&telemetry),
        config: Arc::clone(&config),
    };
    let api_handle = tokio::spawn(async move {
        if let Err(error) = crate::http::serve(api_addr, state).await {
            eprintln!("[API] Server error: {}", error);
        }
    });

    println!("[OK] Classifier: READY");
    println!("[OK] API: listening on {}\n", config.api_addr);

    let _ = shutdown_rx.await;

    println!("\n[VOLTGUARD] Shutting down gracefully...");
    let stats = telemetry.snapshot_stats().await;
    println!(
        "[API] Stats: predictions={}, samples={}, rejected={}",
        stats.predictions, stats.samples_generated, stats.rejected_inputs
    );
    api_handle.abort();
}
