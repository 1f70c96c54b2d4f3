//! Chart endpoint handler.
//!
//! Renders a field chart of one variable. Drawing runs on the blocking pool.

use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use super::{error_response, image_response};
use crate::charts::FieldRequest;
use crate::error::{BjerknesError, Result};
use crate::logging::{generate_request_id, log_chart_rendered};
use crate::render::OutputFormat;
use crate::state::AppState;

/// Query parameters for the chart endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ChartQuery {
    pub var: String,
    pub time_index: Option<usize>,
    pub level_index: Option<usize>,
    /// Level coordinate value, e.g. 500
    pub level: Option<f64>,
    /// Color table specification, e.g. `qpf_nws:6`
    pub colortable: Option<String>,
    pub resampling: Option<String>,
    /// Bounding box as "min_lon,min_lat,max_lon,max_lat"
    pub bbox: Option<String>,
    /// Named map region
    pub region: Option<String>,
    /// Boundary source to mask with
    pub mask: Option<String>,
    pub mask_attribute: Option<String>,
    /// Comma-separated attribute values
    pub mask_value: Option<String>,
    /// Comma-separated boundary sources
    pub boundaries: Option<String>,
    pub contour_var: Option<String>,
    pub contour_interval: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// png or jpeg
    pub format: Option<String>,
    pub gridlines: Option<bool>,
    pub colorbar: Option<bool>,
}

fn split_list(value: &Option<String>) -> Vec<String> {
    value
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl ChartQuery {
    /// Convert to a render request. Over HTTP only configured boundary
    /// sources are accepted, never shapefile paths.
    fn to_request(&self, state: &AppState) -> Result<FieldRequest> {
        let boundaries = split_list(&self.boundaries);
        let sources = &state.config.maps.sources;
        for source in boundaries.iter().chain(self.mask.iter()) {
            if !sources.contains_key(source) {
                return Err(BjerknesError::InvalidParameter {
                    param: "boundaries".to_string(),
                    message: format!(
                        "unknown boundary source {}; known sources: {}",
                        source,
                        sources.keys().cloned().collect::<Vec<_>>().join(", ")
                    ),
                });
            }
        }

        Ok(FieldRequest {
            var: self.var.clone(),
            time_index: self.time_index,
            level_index: self.level_index,
            level: self.level,
            colortable: self.colortable.clone(),
            resampling: self.resampling.clone(),
            region: self.region.clone(),
            bbox: self.bbox.clone(),
            mask: self.mask.clone(),
            mask_attribute: self.mask_attribute.clone(),
            mask_values: split_list(&self.mask_value),
            boundaries,
            contour_var: self.contour_var.clone(),
            contour_interval: self.contour_interval,
            width: self.width,
            height: self.height,
            gridlines: self.gridlines,
            colorbar: self.colorbar,
        })
    }

    fn format(&self, state: &AppState) -> Result<OutputFormat> {
        self.format
            .as_deref()
            .unwrap_or(&state.config.render.format)
            .parse()
    }
}

fn render_chart(state: &AppState, params: &ChartQuery) -> Result<(Vec<u8>, OutputFormat)> {
    let dataset = state.dataset_checked()?;
    let format = params.format(state)?;
    let request = params.to_request(state)?;
    let canvas = request.render(dataset, &state.boundaries, &state.config.render)?;
    Ok((canvas.encode(format)?, format))
}

/// Handle GET /chart requests
pub async fn chart_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ChartQuery>,
) -> Response {
    let request_id = generate_request_id();
    let start_time = Instant::now();

    debug!(
        endpoint = "/chart",
        request_id = %request_id,
        var = %params.var,
        colortable = ?params.colortable,
        region = ?params.region,
        bbox = ?params.bbox,
        "Processing chart request"
    );

    let worker_params = params.clone();
    let result = tokio::task::spawn_blocking(move || render_chart(&state, &worker_params))
        .await
        .unwrap_or_else(|e| {
            Err(BjerknesError::Render {
                message: format!("chart task failed: {}", e),
            })
        });

    match result {
        Ok((bytes, format)) => {
            let colortable = params.colortable.as_deref().unwrap_or("default");
            let region = params
                .region
                .as_deref()
                .or(params.bbox.as_deref())
                .unwrap_or("data");
            log_chart_rendered(&params.var, colortable, region, bytes.len(), start_time);
            image_response(bytes, format)
        }
        Err(error) => error_response(
            &error,
            "/chart",
            &request_id,
            Some(&format!("var={}", params.var)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::grid::Grid;
    use crate::state::Dataset;

    fn state() -> AppState {
        let grid = Grid::from_fn(
            (0..=20).map(|i| 100.0 + i as f64).collect(),
            (0..=10).map(|i| 20.0 + i as f64).collect(),
            |lon, lat| (lon - lat) as f32,
        )
        .unwrap();
        let dataset = Dataset::from_grids(vec![("t2m", grid)]).unwrap();
        AppState::new(Config::default(), Some(dataset))
    }

    fn query(var: &str) -> ChartQuery {
        serde_json::from_value(serde_json::json!({ "var": var, "width": 160, "height": 120 }))
            .unwrap()
    }

    #[test]
    fn test_render_chart_png() {
        let (bytes, format) = render_chart(&state(), &query("t2m")).unwrap();
        assert_eq!(format, OutputFormat::Png);
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (160, 120));
    }

    #[test]
    fn test_split_lists() {
        let mut q = query("t2m");
        q.boundaries = Some("coastline, province,".to_string());
        q.mask_value = Some("henan".to_string());
        let request = q.to_request(&state()).unwrap();
        assert_eq!(request.boundaries, vec!["coastline", "province"]);
        assert_eq!(request.mask_values, vec!["henan"]);
    }

    #[test]
    fn test_paths_are_rejected() {
        let mut q = query("t2m");
        q.mask = Some("/etc/some.shp".to_string());
        assert!(matches!(
            q.to_request(&state()),
            Err(BjerknesError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_missing_variable() {
        assert!(matches!(
            render_chart(&state(), &query("precip")),
            Err(BjerknesError::DataNotFound { .. })
        ));
        let mut q = query("t2m");
        q.format = Some("gif".to_string());
        assert!(render_chart(&state(), &q).is_err());
    }
}
