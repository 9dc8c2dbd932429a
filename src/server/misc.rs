//! `/misc/misc`: liveness, uptime and resident memory.

use std::time::{Duration, Instant};

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sysinfo::{Process, ProcessRefreshKind, ProcessesToUpdate, System};

use crate::server::AppState;

const PING_PROBE: Duration = Duration::from_millis(5);

/// The `/misc/Misc` response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    /// Scheduler round-trip of a short sleep, e.g. `"5 ms"`.
    pub ping: String,
    /// Process uptime at second resolution, e.g. `"2h 5m 10s"`.
    pub uptime: String,
    pub started_at: DateTime<Utc>,
    /// Resident set size, e.g. `"42.17 MB"`; `null` where the platform
    /// cannot report it.
    #[serde(rename = "rssMB")]
    pub rss_mb: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/misc", get(misc))
}

async fn misc(State(state): State<AppState>) -> Json<ServerInfo> {
    let start = Instant::now();
    tokio::time::sleep(PING_PROBE).await;
    let ping = start.elapsed().as_millis();

    Json(ServerInfo {
        ping: format!("{ping} ms"),
        uptime: format_uptime(state.uptime()),
        started_at: state.started_at(),
        rss_mb: resident_memory().map(format_megabytes),
    })
}

fn resident_memory() -> Option<u64> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::nothing().with_memory(),
    );
    system.process(pid).map(Process::memory)
}

#[allow(clippy::cast_precision_loss)]
fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

fn format_uptime(uptime: Duration) -> String {
    humantime::format_duration(Duration::from_secs(uptime.as_secs())).to_string()
}
