//! Color table endpoints.
//!
//! `/colortables` lists the registry; `/colortable` returns one table as
//! JSON bins or as a rendered colorbar.

use axum::{
    extract::Query,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info};

use super::{error_response, image_response};
use crate::colortables::{self, ColorTable};
use crate::error::{BjerknesError, Result};
use crate::logging::generate_request_id;
use crate::render::{colorbar_image, encode_image, OutputFormat};

const DEFAULT_LEGEND_WIDTH: u32 = 600;
const DEFAULT_LEGEND_HEIGHT: u32 = 40;

/// Handle GET /colortables requests
pub async fn colortables_handler() -> Json<serde_json::Value> {
    let tables = colortables::registry().describe();
    Json(serde_json::json!({
        "count": tables.len(),
        "colortables": tables,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ColorTableQuery {
    /// Table specification, e.g. `qpf_nws:6` or `temperature_nws_r`
    pub name: String,
    /// `json` (default) or an image format
    pub format: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Handle GET /colortable requests
pub async fn colortable_handler(Query(params): Query<ColorTableQuery>) -> Response {
    let request_id = generate_request_id();
    let start_time = Instant::now();

    debug!(
        endpoint = "/colortable",
        request_id = %request_id,
        name = %params.name,
        format = ?params.format,
        "Processing color table request"
    );

    let result = colortables::get_color_table(&params.name).and_then(|table| {
        match params.format.as_deref().unwrap_or("json") {
            "json" => Ok(Json(table_json(&table)).into_response()),
            other => {
                let format = other.parse::<OutputFormat>()?;
                let bytes = legend_bytes(&table, &params, format)?;
                Ok(image_response(bytes, format))
            }
        }
    });

    match result {
        Ok(response) => {
            info!(
                endpoint = "/colortable",
                request_id = %request_id,
                colortable = %params.name,
                duration_us = start_time.elapsed().as_micros() as u64,
                "Color table request successful"
            );
            response
        }
        Err(error) => error_response(
            &error,
            "/colortable",
            &request_id,
            Some(&format!("name={}", params.name)),
        ),
    }
}

fn table_json(table: &ColorTable) -> serde_json::Value {
    serde_json::json!({
        "table": table,
        "levels": table.levels(),
        "bins": table.bins(),
    })
}

fn legend_bytes(table: &ColorTable, params: &ColorTableQuery, format: OutputFormat) -> Result<Vec<u8>> {
    let width = params.width.unwrap_or(DEFAULT_LEGEND_WIDTH);
    let height = params.height.unwrap_or(DEFAULT_LEGEND_HEIGHT);
    if table.bins().is_empty() {
        return Err(BjerknesError::InvalidColorTable {
            name: table.name.clone(),
            message: "table has no bins to draw".to_string(),
        });
    }
    encode_image(&colorbar_image(table, width, height)?, format)
}
