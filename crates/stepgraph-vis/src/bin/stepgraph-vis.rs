//! Stepgraph Playback Server
//!
//! Seed a demo graph and serve the playback API.

use std::env;

use stepgraph_core::{Edge, Graph, Node};
use stepgraph_vis::{Session, VisConfig, VisServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Six nodes laid out left to right, with a cheap detour and an expensive shortcut.
fn demo_graph() -> Graph {
    let nodes = [
        ("A", 100.0, 200.0),
        ("B", 250.0, 100.0),
        ("C", 250.0, 300.0),
        ("D", 400.0, 100.0),
        ("E", 400.0, 300.0),
        ("F", 550.0, 200.0),
    ]
    .into_iter()
    .map(|(label, x, y)| Node::new(label.to_lowercase(), label).at(x, y))
    .collect();

    let edges = [
        ("a", "b", 4),
        ("a", "c", 2),
        ("b", "d", 5),
        ("c", "b", 1),
        ("c", "e", 10),
        ("d", "f", 3),
        ("e", "f", 1),
        ("b", "e", 12),
    ]
    .into_iter()
    .map(|(s, t, w)| Edge::new(format!("{s}{t}"), s, t, w))
    .collect();

    Graph::from_parts(nodes, edges)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stepgraph_vis=info,stepgraph_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = VisConfig::from_args(env::args());

    println!("Stepgraph Playback");
    println!("==================");
    println!();

    let mut session = Session::with_graph(demo_graph());
    session.set_default_speed(config.default_speed_ms);
    println!(
        "Demo graph: {} nodes, {} edges",
        session.graph().node_count(),
        session.graph().edge_count()
    );
    println!("Serving on http://localhost:{}", config.port);
    println!("POST /api/run to generate a trace, then /api/playback/play.");
    println!();

    VisServer::new(session).serve(&config).await?;

    Ok(())
}
