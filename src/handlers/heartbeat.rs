//! Heartbeat endpoint handler.
//!
//! Returns server status: uptime, memory usage, the loaded dataset and which
//! boundary shapefiles are available.

use axum::{extract::State, Json};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::Arc;
use std::time::SystemTime;
use uuid::Uuid;

use crate::colortables;
use crate::state::{AppState, DatasetSummary};

/// Unique per process
static SERVER_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

#[derive(Serialize)]
pub struct HeartbeatResponse {
    pub server_id: String,
    /// Current timestamp (RFC 3339)
    pub timestamp: String,
    pub uptime_seconds: u64,
    /// Resident set size of the process, where the platform reports it
    pub memory_usage_bytes: Option<u64>,
    pub dataset: Option<DatasetInfo>,
    pub colortable_count: usize,
    pub boundaries: Vec<BoundaryInfo>,
    pub status: String,
}

#[derive(Serialize)]
pub struct DatasetInfo {
    #[serde(flatten)]
    pub summary: DatasetSummary,
    /// Approximate memory held by the variable arrays
    pub data_memory_bytes: usize,
}

#[derive(Serialize)]
pub struct BoundaryInfo {
    pub source: String,
    pub available: bool,
}

/// Handle GET /heartbeat requests
pub async fn heartbeat_handler(State(state): State<Arc<AppState>>) -> Json<HeartbeatResponse> {
    Json(heartbeat(&state))
}

fn heartbeat(state: &AppState) -> HeartbeatResponse {
    let timestamp = chrono::DateTime::<chrono::Utc>::from(SystemTime::now())
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    let dataset = state.dataset.as_ref().map(|dataset| DatasetInfo {
        summary: dataset.summary(),
        data_memory_bytes: dataset
            .data
            .values()
            .map(|a| a.len() * std::mem::size_of::<f32>())
            .sum(),
    });

    HeartbeatResponse {
        server_id: SERVER_ID.clone(),
        timestamp,
        uptime_seconds: state.started.elapsed().as_secs(),
        memory_usage_bytes: get_memory_usage(),
        dataset,
        colortable_count: colortables::registry().names().len(),
        boundaries: state
            .boundaries
            .sources()
            .into_iter()
            .map(|(source, available)| BoundaryInfo { source, available })
            .collect(),
        status: "healthy".to_string(),
    }
}

/// Current process memory usage
fn get_memory_usage() -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        // RSS is the second field of statm, in pages
        let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
        let pages = statm.split_whitespace().nth(1)?.parse::<u64>().ok()?;
        Some(pages * 4096)
    }

    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::grid::Grid;
    use crate::state::Dataset;

    #[test]
    fn test_heartbeat_without_dataset() {
        let state = AppState::new(Config::default(), None);
        let response = heartbeat(&state);
        assert_eq!(response.status, "healthy");
        assert!(response.dataset.is_none());
        assert!(response.colortable_count > 0);
        assert!(response.boundaries.iter().any(|b| b.source == "coastline"));
    }

    #[test]
    fn test_heartbeat_dataset_memory() {
        let grid = Grid::from_fn(vec![0.0, 1.0, 2.0], vec![0.0, 1.0], |_, _| 1.0).unwrap();
        let dataset = Dataset::from_grids(vec![("t2m", grid)]).unwrap();
        let state = AppState::new(Config::default(), Some(dataset));
        let info = heartbeat(&state).dataset.unwrap();
        assert_eq!(info.data_memory_bytes, 6 * 4);
        assert_eq!(info.summary.grid_variables, vec!["t2m".to_string()]);
    }
}
