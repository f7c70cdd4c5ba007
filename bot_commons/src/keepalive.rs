use std::net::SocketAddr;

use axum::{http::StatusCode, routing::any, Router};
use tokio::{net::TcpListener, task::JoinHandle};

async fn alive() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// Every request gets a 200, whatever the path or method.
pub fn router() -> Router {
    Router::new().route("/", any(alive)).fallback(alive)
}

/// Bind the liveness listener on all interfaces.
pub async fn bind(port: u16) -> std::io::Result<TcpListener> {
    TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await
}

/// Serve the liveness endpoint on an already bound listener until the process dies.
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    if let Ok(address) = listener.local_addr() {
        log::info!("Liveness endpoint listening on {address}");
    }
    axum::serve(listener, router()).await
}

/// Bind on `port` and serve in the background. Binding errors are returned
/// right away; errors while serving are only logged.
pub async fn spawn(port: u16) -> std::io::Result<JoinHandle<()>> {
    let listener = bind(port).await?;
    Ok(tokio::spawn(async move {
        if let Err(e) = serve(listener).await {
            log::error!("Liveness endpoint died: {e}");
        }
    }))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    async fn start() -> String {
        let listener = bind(0).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(serve(listener));
        format!("http://127.0.0.1:{port}")
    }

    #[tokio::test]
    async fn root_answers_ok() {
        let base = start().await;

        let response = reqwest::get(format!("{base}/")).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "OK");
    }

    #[tokio::test]
    async fn anything_else_answers_ok_too() {
        let base = start().await;
        let client = reqwest::Client::new();

        let response = client.get(format!("{base}/health/deep")).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let response = client.post(format!("{base}/")).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "OK");
    }
}
