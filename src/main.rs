use distributed_cache::group::registry::Registry;
use distributed_cache::group::source::source_fn;
use distributed_cache::http::handlers;
use distributed_cache::http::pool::HttpPool;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

/// Sample backing store: an in-process score table standing in for whatever
/// database a real deployment would query on a cache miss.
fn sample_scores() -> HashMap<&'static str, &'static str> {
    HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} --bind <addr:port> [--peer <url>]...", args[0]);
        eprintln!("Example: {} --bind 127.0.0.1:9100", args[0]);
        eprintln!(
            "Example: {} --bind 127.0.0.1:9101 --peer http://127.0.0.1:9100",
            args[0]
        );

        std::process::exit(1);
    }

    let mut bind_addr: Option<SocketAddr> = None;
    let mut peers: Vec<String> = vec![];
    let mut base_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind_addr = Some(args[i + 1].parse()?);
                i += 2;
            }
            "--peer" => {
                peers.push(args[i + 1].clone());
                i += 2;
            }
            "--base-path" => {
                base_path = Some(args[i + 1].clone());
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let bind_addr = bind_addr.expect("--bind is required");
    let self_url = format!("http://{}", bind_addr);

    tracing::info!("Starting cache node at {}", self_url);
    if !peers.is_empty() {
        tracing::info!("Fleet peers: {:?}", peers);
    } else {
        tracing::info!("Starting as a single-node fleet");
    }

    // 1. Namespaces:
    let registry = Registry::new();
    let scores = Arc::new(sample_scores());
    let group = registry.new_group(
        "scores",
        2 << 10,
        source_fn(move |key: String| {
            let scores = scores.clone();
            async move {
                tracing::info!("backing store queried for {}", key);
                scores
                    .get(key.as_str())
                    .map(|value| value.as_bytes().to_vec())
                    .ok_or_else(|| anyhow::anyhow!("{} is not in the score table", key))
            }
        }),
    )?;

    // 2. Peer pool over the whole fleet, this node included:
    let pool = match base_path {
        Some(path) => HttpPool::with_base_path(&self_url, &path),
        None => HttpPool::new(&self_url),
    };
    let mut fleet = vec![self_url.clone()];
    fleet.extend(peers);
    pool.set_peers(fleet);
    group.register_peers(pool.clone());

    // 3. HTTP server:
    let app = handlers::router(registry, pool);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Cache endpoint listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
