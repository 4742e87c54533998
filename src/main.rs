use axum::{
    Router,
    extract::Extension,
    routing::{get, post},
};
use collision_cluster::ingest::handlers::{handle_stats, handle_submit, handle_submit_stream};
use collision_cluster::ingest::protocol::{ENDPOINT_STATS, ENDPOINT_SUBMIT, ENDPOINT_SUBMIT_STREAM};
use collision_cluster::node::NodeContext;
use collision_cluster::topology::config::TopologyConfig;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 5 {
        eprintln!(
            "Usage: {} --bind <addr:port> --topology <path>",
            args[0]
        );
        eprintln!(
            "Example: {} --bind 0.0.0.0:50051 --topology topology.json",
            args[0]
        );

        std::process::exit(1);
    }

    let mut bind_addr: Option<SocketAddr> = None;
    let mut topology_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind_addr = Some(args[i + 1].parse()?);
                i += 2;
            }
            "--topology" => {
                topology_path = Some(args[i + 1].clone());
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let bind_addr = bind_addr.expect("--bind is required");
    let topology_path = topology_path.expect("--topology is required");

    // 1. Topology: loaded and validated before anything is served. A broken
    // routing table is fatal here, never retried.
    let config = TopologyConfig::load(&topology_path)?;
    let ctx = Arc::new(NodeContext::new(&config)?);

    tracing::info!("Starting node on {}", bind_addr);
    tracing::info!(
        "Topology: {} partitions, {} children",
        config.total_partitions,
        config.children.len()
    );
    for child in &config.children {
        tracing::info!("  - child {}", child.addr());
    }

    // 2. HTTP router:
    let app = Router::new()
        .route(ENDPOINT_SUBMIT, post(handle_submit))
        .route(ENDPOINT_SUBMIT_STREAM, post(handle_submit_stream))
        .route(ENDPOINT_STATS, get(handle_stats))
        .layer(Extension(ctx.clone()));

    // 3. Spawn stats reporter:
    let stats_ctx = ctx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(5));

        loop {
            interval.tick().await;
            let stats = stats_ctx.stats.snapshot();
            tracing::info!(
                "Node stats: {} processed, {} stored locally, {:?} forwarded per child",
                stats.processed,
                stats.stored_local,
                stats.forwarded
            );
        }
    });

    // 4. Start HTTP server:
    tracing::info!("Ingest server listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
