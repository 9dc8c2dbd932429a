//! gql-gateway entrypoint.
//!
//! Loads `.env`, parses flags (each also readable from the environment),
//! initializes logging and serves the gateway until Ctrl-C.

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use gql_gateway::config::{DEFAULT_SEVENTV_GQL_URL, DEFAULT_TWITCH_GQL_URL};
use gql_gateway::{app, AppState, ClientId, EndpointUrl, GatewayConfig, Upstreams};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "gql-gateway", version, about = "REST gateway over the Twitch and 7TV GraphQL APIs")]
struct Args {
    /// Address to listen on
    #[arg(long, env = "GATEWAY_BIND", default_value = "0.0.0.0:3000")]
    bind: SocketAddr,

    /// Twitch Client-ID sent with every Twitch request
    #[arg(long, env = "TWITCH_CLIENT_ID", hide_env_values = true)]
    twitch_client_id: String,

    /// Twitch GraphQL endpoint
    #[arg(long, env = "TWITCH_GQL_URL", default_value = DEFAULT_TWITCH_GQL_URL)]
    twitch_gql_url: String,

    /// 7TV GraphQL endpoint
    #[arg(long, env = "SEVENTV_GQL_URL", default_value = DEFAULT_SEVENTV_GQL_URL)]
    seventv_gql_url: String,

    /// Prefix for the upstream User-Agent header
    #[arg(long, env = "GATEWAY_USER_AGENT_PREFIX")]
    user_agent_prefix: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal outside development.
    let _ = dotenv::dotenv();
    setup_tracing();
    let args = Args::parse();

    let mut builder = GatewayConfig::builder()
        .twitch_client_id(ClientId::new(args.twitch_client_id).context("invalid TWITCH_CLIENT_ID")?)
        .twitch_endpoint(EndpointUrl::new(args.twitch_gql_url).context("invalid TWITCH_GQL_URL")?)
        .seventv_endpoint(EndpointUrl::new(args.seventv_gql_url).context("invalid SEVENTV_GQL_URL")?);
    if let Some(prefix) = args.user_agent_prefix {
        builder = builder.user_agent_prefix(prefix);
    }
    let config = builder.build().context("invalid gateway configuration")?;

    let upstreams = Upstreams::from_config(&config).context("could not build upstream clients")?;
    let service = app(AppState::new(upstreams));

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("could not bind {}", args.bind))?;
    info!(
        bind = %args.bind,
        twitch = %config.twitch_endpoint(),
        seventv = %config.seventv_endpoint(),
        "gql-gateway listening"
    );

    axum::serve(listener, axum::ServiceExt::<axum::extract::Request>::into_make_service(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutdown");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(?e, "failed to install Ctrl-C handler");
    }
}

fn setup_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
