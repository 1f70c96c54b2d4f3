//! Integration tests for the bjerknes HTTP server
//!
//! These tests start the router on an ephemeral port with an in-memory
//! dataset and exercise every endpoint end-to-end.

mod common;

use common::{http_client, image_utils, test_data};
use reqwest::StatusCode;
use std::net::SocketAddr;
use std::sync::Arc;

use bjerknes::{AppState, Config};

async fn start_server() -> (SocketAddr, tempfile::TempDir) {
    let maps = tempfile::tempdir().unwrap();
    test_data::write_square_shapefile(
        &maps.path().join("bou2_4p.shp"),
        &[("henan", 110.0, 30.0, 5.0), ("hubei", 120.0, 30.0, 5.0)],
    );

    let mut config = Config::default();
    config.maps.maps_dir = maps.path().to_path_buf();
    let state = Arc::new(AppState::new(config, Some(test_data::synoptic_dataset())));
    (http_client::spawn_server(state).await, maps)
}

#[tokio::test]
async fn test_heartbeat_endpoint() {
    let (addr, _maps) = start_server().await;
    let json: serde_json::Value = http_client::get_json(&addr, "/heartbeat").await.unwrap();

    assert_eq!(json["status"], "healthy");
    assert!(json["colortable_count"].as_u64().unwrap() > 10);
    let grid_vars = json["dataset"]["grid_variables"].as_array().unwrap();
    assert!(grid_vars.contains(&serde_json::json!("t2m")));

    let boundaries = json["boundaries"].as_array().unwrap();
    let province = boundaries
        .iter()
        .find(|b| b["source"] == "province")
        .unwrap();
    assert_eq!(province["available"], true);
}

#[tokio::test]
async fn test_metadata_endpoint() {
    let (addr, _maps) = start_server().await;
    let json: serde_json::Value = http_client::get_json(&addr, "/metadata").await.unwrap();

    assert!(json["variables"].get("gh").is_some());
    assert_eq!(json["dimensions"]["level"]["size"], 2);
    assert_eq!(json["coordinates"]["level"][1], 500.0);
}

#[tokio::test]
async fn test_metadata_without_dataset_is_404() {
    let state = Arc::new(AppState::new(Config::default(), None));
    let addr = http_client::spawn_server(state).await;
    let (status, json): (_, serde_json::Value) =
        http_client::get_json_with_status(&addr, "/metadata").await.unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["request_id"].is_string());
}

#[tokio::test]
async fn test_colortables_endpoints() {
    let (addr, _maps) = start_server().await;

    let list: serde_json::Value = http_client::get_json(&addr, "/colortables").await.unwrap();
    let names: Vec<&str> = list["colortables"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert!(names.contains(&"qpf_nws"));
    assert_eq!(list["count"].as_u64().unwrap() as usize, names.len());

    let table: serde_json::Value = http_client::get_json(&addr, "/colortable?name=qpf_nws:6")
        .await
        .unwrap();
    assert!(table["bins"].as_array().unwrap().len() > 3);

    let (content_type, bytes) =
        http_client::get_image(&addr, "/colortable?name=temperature_nws&format=png&width=300&height=30")
            .await
            .unwrap();
    assert_eq!(content_type, "image/png");
    let img = image_utils::decode(&bytes);
    assert_eq!((img.width(), img.height()), (300, 30));
    assert!(image_utils::distinct_colors(&img, 0, 0, 300, 30) > 10);

    let (status, json): (_, serde_json::Value) =
        http_client::get_json_with_status(&addr, "/colortable?name=no_such_table")
            .await
            .unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("no_such_table"));
}

#[tokio::test]
async fn test_chart_endpoint() {
    let (addr, _maps) = start_server().await;

    let (content_type, bytes) = http_client::get_image(
        &addr,
        "/chart?var=t2m&colortable=temperature_nws&width=300&height=240&time_index=1",
    )
    .await
    .unwrap();
    assert_eq!(content_type, "image/png");
    assert_eq!(
        image_utils::detect_image_format(&bytes),
        Some(image::ImageFormat::Png)
    );
    let img = image_utils::decode(&bytes);
    assert_eq!((img.width(), img.height()), (300, 240));
    assert!(image_utils::count_painted(&img) > 300 * 150);

    let (content_type, bytes) = http_client::get_image(
        &addr,
        "/chart?var=gh&level=500&bbox=90,20,130,50&format=jpeg&boundaries=province",
    )
    .await
    .unwrap();
    assert_eq!(content_type, "image/jpeg");
    assert_eq!(
        image_utils::detect_image_format(&bytes),
        Some(image::ImageFormat::Jpeg)
    );
}

#[tokio::test]
async fn test_chart_with_mask() {
    let (addr, _maps) = start_server().await;
    let path = "/chart?var=t2m&colortable=temperature_nws&width=200&height=150&colorbar=false\
                &gridlines=false&bbox=100,20,130,45&mask=province&mask_attribute=NAME&mask_value=henan";
    let (_, bytes) = http_client::get_image(&addr, path).await.unwrap();
    let img = image_utils::decode(&bytes);

    // henan covers 110..115E, 30..35N; the rest of the map stays white
    let painted = image_utils::count_painted(&img);
    assert!(painted > 0);
    assert!(painted < 200 * 150 / 4);
    common::assertions::assert_blank_row(&img, 5, 0..200);
}

#[tokio::test]
async fn test_chart_errors() {
    let (addr, _maps) = start_server().await;

    let cases = [
        ("/chart?var=precip", StatusCode::NOT_FOUND),
        ("/chart?var=t2m&colortable=nope", StatusCode::BAD_REQUEST),
        ("/chart?var=t2m&format=gif", StatusCode::BAD_REQUEST),
        ("/chart?var=t2m&bbox=1,2,3", StatusCode::BAD_REQUEST),
        ("/chart?var=t2m&region=atlantis", StatusCode::BAD_REQUEST),
        ("/chart?var=t2m&boundaries=/tmp/x.shp", StatusCode::BAD_REQUEST),
        ("/chart?var=t2m&time_index=7", StatusCode::BAD_REQUEST),
        ("/chart?var=t2m&boundaries=coastline", StatusCode::NOT_FOUND),
    ];
    for (path, expected) in cases {
        let (status, json): (_, serde_json::Value) =
            http_client::get_json_with_status(&addr, path).await.unwrap();
        assert_eq!(status, expected, "{}: {}", path, json);
        assert!(json["error"].is_string());
        assert!(json["request_id"].is_string());
    }
}
