//! Metadata endpoint handler.
//!
//! Returns JSON describing the variables, dimensions and attributes of the
//! loaded dataset.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::error_response;
use crate::error::Result;
use crate::logging::generate_request_id;
use crate::state::AppState;

/// Handle GET /metadata requests
pub async fn metadata_handler(State(state): State<Arc<AppState>>) -> Response {
    let request_id = generate_request_id();
    let start_time = Instant::now();

    debug!(
        endpoint = "/metadata",
        request_id = %request_id,
        "Processing metadata request"
    );

    match metadata_json(&state) {
        Ok(response) => {
            info!(
                endpoint = "/metadata",
                request_id = %request_id,
                duration_us = start_time.elapsed().as_micros() as u64,
                "Metadata request successful"
            );
            Json(response).into_response()
        }
        Err(error) => error_response(&error, "/metadata", &request_id, None),
    }
}

fn metadata_json(state: &AppState) -> Result<serde_json::Value> {
    let dataset = state.dataset_checked()?;
    let metadata = &dataset.metadata;
    Ok(serde_json::json!({
        "global_attributes": metadata.global_attributes,
        "dimensions": metadata.dimensions,
        "variables": metadata.variables,
        "coordinates": metadata.coordinates,
        "grid_variables": dataset.grid_variables(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::BjerknesError;
    use crate::grid::Grid;
    use crate::state::Dataset;

    #[test]
    fn test_metadata_json() {
        let grid = Grid::from_fn(vec![100.0, 110.0], vec![30.0, 40.0], |_, _| 0.0).unwrap();
        let dataset = Dataset::from_grids(vec![("t2m", grid)]).unwrap();
        let state = AppState::new(Config::default(), Some(dataset));

        let json = metadata_json(&state).unwrap();
        assert!(json["variables"].get("t2m").is_some());
        assert_eq!(json["dimensions"]["lat"]["size"], 2);
        let lons = json["coordinates"]["lon"].as_array().unwrap();
        assert_eq!(lons, &[serde_json::json!(100.0), serde_json::json!(110.0)]);
        assert_eq!(json["grid_variables"][0], "t2m");
    }

    #[test]
    fn test_metadata_without_dataset() {
        let state = AppState::new(Config::default(), None);
        assert!(matches!(
            metadata_json(&state),
            Err(BjerknesError::DataNotFound { .. })
        ));
    }
}
