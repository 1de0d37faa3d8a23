use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use factgraph::{api, config::AppConfig, loader, render};
use factgraph_core::CachedGraph;

#[derive(Parser)]
#[command(name = "fgraph")]
#[command(about = "Content relationship graph for fact-checking reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the read-only graph API
    Serve {
        /// Port for HTTP API (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Refuse to start if the content set has consistency issues
        #[arg(long)]
        strict: bool,

        /// Content documents, merged in order
        data: Vec<PathBuf>,
    },
    /// Print the visualization export as JSON
    Export {
        #[arg(long)]
        pretty: bool,

        data: Vec<PathBuf>,
    },
    /// Show a node's connections, related content and backlinks
    Related {
        /// Node slug
        id: String,

        /// Maximum related items
        #[arg(short, long)]
        limit: Option<String>,

        data: Vec<PathBuf>,
    },
    /// List nodes carrying a tag
    Tag {
        /// Tag identifier, e.g. actor:russia
        tag: String,

        data: Vec<PathBuf>,
    },
    /// Report dangling connections and undefined tags
    Check { data: Vec<PathBuf> },
}

/// Logs go to stderr so `export` output can be piped.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(
        |_| "factgraph=debug,factgraph_core=info,tower_http=debug".into(),
    ));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = AppConfig::load();

    match cli.command {
        Commands::Serve { port, strict, data } => {
            let sources = config.data_sources(data);
            let graph = loader::load_graph(&sources, strict || config.strict)?;
            let port = port.unwrap_or(config.port);

            let app = api::create_router_with_config(
                CachedGraph::new(graph),
                api::ServeConfig::from_env(),
            );

            let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
                .await
                .with_context(|| format!("Failed to bind port {}", port))?;
            tracing::info!("factgraph listening on http://127.0.0.1:{}", port);

            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await?;
        }
        Commands::Export { pretty, data } => {
            let graph = loader::load_graph(&config.data_sources(data), config.strict)?;
            let export = graph.export_graph();
            let json = if pretty {
                serde_json::to_string_pretty(&export)?
            } else {
                serde_json::to_string(&export)?
            };
            println!("{}", json);
        }
        Commands::Related { id, limit, data } => {
            let graph = loader::load_graph(&config.data_sources(data), config.strict)?;
            let limit = match limit {
                Some(raw) => factgraph_core::RelatedLimit::parse(&raw).get(),
                None => config.related_limit,
            };
            match render::neighborhood(&graph, &id, limit) {
                Some(tree) => print!("{}", render::render_tree(&[tree])),
                None => println!("No node named '{}'", id),
            }
        }
        Commands::Tag { tag, data } => {
            let graph = loader::load_graph(&config.data_sources(data), config.strict)?;
            print!("{}", render::render_list(&graph.find_by_tag(&tag)));
        }
        Commands::Check { data } => {
            let (graph, report) = loader::load_checked(&config.data_sources(data))?;
            if report.is_clean() {
                println!("{} nodes, no issues", graph.len());
            } else {
                for issue in &report.issues {
                    println!("{}", issue);
                }
                anyhow::bail!("{} issue(s) found", report.issues.len());
            }
        }
    }

    Ok(())
}
