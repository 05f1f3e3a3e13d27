#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use tryon_studio::gemini::GenerationBackend;
use tryon_studio::gemini::types::{GenerateContentRequest, GenerateContentResponse};

/// Encode a small solid image in `format`
pub fn encoded_image(format: image::ImageFormat, width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 120]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, format)
        .expect("Failed to encode test image");
    out.into_inner()
}

pub fn png_bytes() -> Vec<u8> {
    encoded_image(image::ImageFormat::Png, 4, 6)
}

pub fn jpeg_bytes() -> Vec<u8> {
    encoded_image(image::ImageFormat::Jpeg, 8, 8)
}

/// Enough of a WebP container for format detection
pub fn webp_header_bytes() -> Vec<u8> {
    b"RIFF\x24\0\0\0WEBPVP8 \x18\0\0\0".to_vec()
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write test file");
    path
}

/// Backend that replays canned responses and counts calls
pub struct StubBackend {
    responses: Mutex<Vec<tryon_studio::Result<GenerateContentResponse>>>,
    pub requests: Mutex<Vec<(String, GenerateContentRequest)>>,
}

impl StubBackend {
    pub fn new(responses: Vec<tryon_studio::Result<GenerateContentResponse>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().rev().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl GenerationBackend for StubBackend {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> tryon_studio::Result<GenerateContentResponse> {
        self.requests
            .lock()
            .push((model.to_string(), request.clone()));
        self.responses
            .lock()
            .pop()
            .unwrap_or_else(|| Ok(GenerateContentResponse::default()))
    }
}

/// Local HTTP server that answers exactly one request
pub struct OneShotServer {
    pub base_url: String,
    pub connections: Arc<AtomicUsize>,
    handle: JoinHandle<Option<String>>,
}

impl OneShotServer {
    pub async fn start(status: u16, body: String) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to read local address");
        let connections = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&connections);

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.ok()?;
            counter.fetch_add(1, Ordering::SeqCst);
            let request = read_request(&mut stream).await;
            let reason = if status == 200 { "OK" } else { "Bad Request" };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.ok()?;
            let _ = stream.shutdown().await;
            Some(request)
        });

        Self {
            base_url: format!("http://{addr}"),
            connections,
            handle,
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Raw text of the request the server received
    pub async fn received(self) -> String {
        self.handle
            .await
            .ok()
            .flatten()
            .expect("Server did not receive a request")
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
