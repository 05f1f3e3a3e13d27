//! Image ingestion
//!
//! Turns files (and, for the CLI, URLs) into [`ImageRef`]s. Batch uploads read
//! every file concurrently and report failures per file without aborting the
//! rest of the batch.

use futures::future::join_all;
use std::path::{Path, PathBuf};

use crate::error::{Result, StudioError};
use crate::image_ref::{ImageRef, is_unsniffable, mime_from_extension, sniff_mime};
use crate::log_debug;

/// Name used when a file name yields nothing displayable
pub const FALLBACK_ITEM_NAME: &str = "Uploaded Item";

/// A successfully ingested image plus the name derived from its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub name: String,
    pub image: ImageRef,
}

/// Outcome of a batch upload, in input order
#[derive(Debug, Default)]
pub struct BatchIngest {
    pub loaded: Vec<UploadedImage>,
    pub failures: Vec<StudioError>,
}

impl BatchIngest {
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty() && self.failures.is_empty()
    }

    /// All failure messages of this batch joined into one banner line
    pub fn error_summary(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        Some(
            self.failures
                .iter()
                .map(|e| format!("{e}."))
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

/// Derive a display name from a file name by dropping its last extension
///
/// `jacket.png` → `jacket`, `summer.top.webp` → `summer.top`. Names without an
/// extension, or with nothing before it, fall back to [`FALLBACK_ITEM_NAME`].
pub fn display_name_for(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .filter(|stem| !stem.is_empty())
        .unwrap_or(FALLBACK_ITEM_NAME)
        .to_string()
}

fn file_name_of(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}

/// Encode raw bytes, detecting the format from content first and the name second
pub fn encode_bytes(name: &str, hint: &Path, bytes: &[u8]) -> Result<ImageRef> {
    if bytes.is_empty() {
        return Err(StudioError::ingestion(name, "file is empty"));
    }
    let mime = match (sniff_mime(bytes), mime_from_extension(hint)) {
        (Some(mime), _) => mime,
        (None, Some(mime)) if is_unsniffable(mime) => mime,
        (None, Some(_)) => return Err(StudioError::ingestion(name, "not a valid image")),
        (None, None) => return Err(StudioError::ingestion(name, "unsupported image format")),
    };
    Ok(ImageRef::from_bytes(mime, bytes))
}

/// Read a single file into an image reference
pub async fn ingest_file(path: &Path) -> Result<ImageRef> {
    let name = file_name_of(path);
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| StudioError::ingestion(&name, e))?;
    log_debug!("Read {} ({} bytes)", path.display(), bytes.len());
    encode_bytes(&name, path, &bytes)
}

/// Read a clothing file and name it after the file
pub async fn ingest_upload(path: &Path) -> Result<UploadedImage> {
    let image = ingest_file(path).await?;
    Ok(UploadedImage {
        name: display_name_for(&file_name_of(path)),
        image,
    })
}

fn collect_batch(results: Vec<Result<UploadedImage>>) -> BatchIngest {
    let mut batch = BatchIngest::default();
    for result in results {
        match result {
            Ok(upload) => batch.loaded.push(upload),
            Err(e) => batch.failures.push(e),
        }
    }
    log_debug!(
        "Batch ingest: {} loaded, {} failed",
        batch.loaded.len(),
        batch.failures.len()
    );
    batch
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Ingest a local path or an `http(s)://` URL
pub async fn ingest_source(client: &reqwest::Client, source: &str) -> Result<UploadedImage> {
    if !is_remote(source) {
        return ingest_upload(&expand_home(source)).await;
    }

    let file_name = source
        .split(['?', '#'])
        .next()
        .and_then(|s| s.rsplit('/').next())
        .filter(|s| !s.is_empty())
        .unwrap_or(source)
        .to_string();

    let response = client
        .get(source)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| StudioError::ingestion(&file_name, e))?;

    let header_mime = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
        .filter(|m| is_unsniffable(m));

    let bytes = response
        .bytes()
        .await
        .map_err(|e| StudioError::ingestion(&file_name, e))?;

    let image = match sniff_mime(&bytes) {
        Some(mime) => ImageRef::from_bytes(mime, &bytes),
        None => match header_mime {
            Some(mime) if !bytes.is_empty() => ImageRef::from_bytes(mime, &bytes),
            _ => encode_bytes(&file_name, Path::new(&file_name), &bytes)?,
        },
    };

    Ok(UploadedImage {
        name: display_name_for(&file_name),
        image,
    })
}

/// Ingest several paths or URLs concurrently, one read per source, keeping input order
pub async fn ingest_batch(client: &reqwest::Client, sources: &[String]) -> BatchIngest {
    collect_batch(join_all(sources.iter().map(|s| ingest_source(client, s))).await)
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(raw)
}

/// Expand whitespace-separated paths, URLs and glob patterns typed by the user
///
/// Patterns that match nothing are reported as ingestion errors so the user
/// sees them in the same banner as unreadable files. URLs pass through as-is.
pub fn expand_sources(input: &str) -> (Vec<String>, Vec<StudioError>) {
    let mut sources = Vec::new();
    let mut errors = Vec::new();

    for token in input.split_whitespace() {
        if is_remote(token) || !token.contains(['*', '?', '[']) {
            sources.push(token.to_string());
            continue;
        }

        let pattern = expand_home(token).to_string_lossy().into_owned();
        match glob::glob(&pattern) {
            Ok(entries) => {
                let mut matched: Vec<PathBuf> =
                    entries.filter_map(std::result::Result::ok).collect();
                if matched.is_empty() {
                    errors.push(StudioError::ingestion(token, "no files match"));
                }
                matched.sort();
                sources.extend(matched.iter().map(|p| p.to_string_lossy().into_owned()));
            }
            Err(e) => errors.push(StudioError::ingestion(token, e)),
        }
    }

    (sources, errors)
}
