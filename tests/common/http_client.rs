//! HTTP helpers for testing.
//!
//! Starts the router on an ephemeral port and makes requests against it.

use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bjerknes::AppState;

/// Default timeout for HTTP requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Serve `state` on 127.0.0.1 with an OS-assigned port.
pub async fn spawn_server(state: Arc<AppState>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, bjerknes::create_router(state))
            .await
            .expect("Server error");
    });
    addr
}

pub fn create_test_client() -> Client {
    Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .expect("Failed to build test HTTP client")
}

pub fn build_url(addr: &SocketAddr, path: &str) -> Url {
    format!("http://{}{}", addr, path)
        .parse()
        .expect("Failed to parse URL")
}

pub async fn get(addr: &SocketAddr, path: &str) -> Result<Response, Box<dyn Error>> {
    Ok(create_test_client().get(build_url(addr, path)).send().await?)
}

/// Make a GET request and parse the JSON body, whatever the status.
pub async fn get_json_with_status<T: DeserializeOwned>(
    addr: &SocketAddr,
    path: &str,
) -> Result<(StatusCode, T), Box<dyn Error>> {
    let response = get(addr, path).await?;
    let status = response.status();
    Ok((status, response.json::<T>().await?))
}

/// Make a GET request and parse the JSON body of a successful response
pub async fn get_json<T: DeserializeOwned>(addr: &SocketAddr, path: &str) -> Result<T, Box<dyn Error>> {
    let response = get(addr, path).await?;
    if response.status() != StatusCode::OK {
        return Err(format!(
            "Unexpected status code: {}, body: {:?}",
            response.status(),
            response.text().await
        )
        .into());
    }
    Ok(response.json::<T>().await?)
}

/// Download an image, returning its content type and bytes
pub async fn get_image(addr: &SocketAddr, path: &str) -> Result<(String, Vec<u8>), Box<dyn Error>> {
    let response = get(addr, path).await?;
    if response.status() != StatusCode::OK {
        return Err(format!(
            "Unexpected status code: {}, body: {:?}",
            response.status(),
            response.text().await
        )
        .into());
    }
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    Ok((content_type, response.bytes().await?.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url() {
        let addr: SocketAddr = ([127, 0, 0, 1], 8000).into();
        let url = build_url(&addr, "/chart?var=t2m");
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/chart?var=t2m");
    }
}
