//! Camera-source configuration client.
//!
//! The producer maps each lane to a camera source path. The dashboard
//! reads the mapping for display and can write an updated mapping
//! back; the mapping is producer state, not part of the reconciliation
//! core.

use lanewatch_types::CameraSources;

use crate::error::MonitorError;

/// Client for `GET /camera_sources` and `POST /camera_sources`.
#[derive(Debug, Clone)]
pub struct CameraSourceClient {
    http: reqwest::Client,
    base_url: String,
}

impl CameraSourceClient {
    /// Create a client for the given producer base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the current lane-to-source mapping.
    pub async fn fetch(&self) -> Result<CameraSources, MonitorError> {
        let url = self.url();
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| MonitorError::Request(format!("GET {url}: {e}")))?;
        response
            .json::<CameraSources>()
            .await
            .map_err(|e| MonitorError::Decode(format!("GET {url}: {e}")))
    }

    /// Replace the lane-to-source mapping.
    pub async fn update(&self, sources: &CameraSources) -> Result<(), MonitorError> {
        let url = self.url();
        self.http
            .post(&url)
            .json(sources)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| MonitorError::Request(format!("POST {url}: {e}")))?;
        Ok(())
    }

    fn url(&self) -> String {
        format!("{}/camera_sources", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    #[tokio::test]
    async fn fetch_decodes_the_mapping() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };
            let mut request = [0_u8; 1024];
            let _ = socket.read(&mut request).await;
            let body = r#"{"North":"videos/north.mp4","South":"videos/south.mp4"}"#;
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.flush().await;
        });

        let client = CameraSourceClient::new(format!("http://{addr}"));
        let sources = client.fetch().await.unwrap();
        assert_eq!(sources.get("North").map(String::as_str), Some("videos/north.mp4"));
        assert_eq!(sources.len(), 2);

        server.abort();
    }

    #[tokio::test]
    async fn update_posts_the_mapping() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };
            // Headers and body may arrive in separate reads.
            let mut text = String::new();
            let mut buf = [0_u8; 1024];
            for _ in 0..10 {
                let read = socket.read(&mut buf).await.unwrap_or(0);
                if read == 0 {
                    break;
                }
                text.push_str(&String::from_utf8_lossy(buf.get(..read).unwrap_or_default()));
                if text.contains("\r\n\r\n") && text.ends_with('}') {
                    break;
                }
            }
            let response = "HTTP/1.1 200 OK\r\ncontent-length: 2\r\n\r\n{}";
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.flush().await;
            text
        });

        let client = CameraSourceClient::new(format!("http://{addr}"));
        let mut sources = CameraSources::new();
        sources.insert("East".to_owned(), "videos/east.mp4".to_owned());
        client.update(&sources).await.unwrap();

        let request_text = server.await.unwrap();
        assert!(request_text.starts_with("POST /camera_sources"));
        assert!(request_text.contains("videos/east.mp4"));
    }
}
