// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Replay a capture the way the command-line downloader does
//!
//! POSTs the payload with the captured cookie and headers and streams the
//! response body to a file. Useful to check a capture is complete before
//! handing it over.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_DISPOSITION, COOKIE};
use tokio::io::AsyncWriteExt;

use crate::error::{Error, ErrorContext, Result};
use crate::handoff::HandoffBundle;

/// Result of a replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcome {
    /// HTTP status
    pub status: u16,
    /// Bytes written to the output file
    pub bytes_written: u64,
    /// File name suggested by `Content-Disposition`, if any
    pub suggested_name: Option<String>,
}

/// HTTP client for replays
#[derive(Debug, Clone)]
pub struct Replayer {
    client: reqwest::Client,
}

impl Replayer {
    /// Create a replayer with a request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;
        Ok(Self { client })
    }

    /// POST `bundle` to `url` and save the response body to `output`
    pub async fn replay_to_file(
        &self,
        url: &str,
        bundle: &HandoffBundle,
        output: &Path,
    ) -> Result<ReplayOutcome> {
        let url = url::Url::parse(url)?;
        let headers = build_headers(bundle);

        tracing::info!(url = %url, headers = headers.len(), "Replaying captured request");
        let mut response = self
            .client
            .post(url.clone())
            .headers(headers)
            .body(bundle.payload.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ReplayStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let suggested_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_filename);

        let bytes_written = save_body(&mut response, output).await?;

        tracing::info!(
            status = status.as_u16(),
            bytes = bytes_written,
            output = %output.display(),
            "Replay finished"
        );

        Ok(ReplayOutcome {
            status: status.as_u16(),
            bytes_written,
            suggested_name,
        })
    }
}

/// Response body read chunk by chunk
#[async_trait]
trait ChunkSource: Send {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>>;
}

#[async_trait]
impl ChunkSource for reqwest::Response {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        Ok(self.chunk().await?)
    }
}

/// Stream a body into `output`; a failed transfer leaves no file behind
async fn save_body(source: &mut dyn ChunkSource, output: &Path) -> Result<u64> {
    let mut file = tokio::fs::File::create(output)
        .await
        .context(&format!("creating {}", output.display()))?;

    let mut bytes_written = 0u64;
    let copied: Result<()> = async {
        while let Some(chunk) = source.next_chunk().await? {
            file.write_all(&chunk).await?;
            bytes_written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(())
    }
    .await;

    if let Err(e) = copied {
        drop(file);
        if let Err(rm) = tokio::fs::remove_file(output).await {
            tracing::warn!(
                output = %output.display(),
                error = %rm,
                "Failed to remove partial download"
            );
        }
        return Err(e);
    }

    Ok(bytes_written)
}

/// Captured headers plus the cookie, skipping anything that is not a
/// valid header
fn build_headers(bundle: &HandoffBundle) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in &bundle.headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            map.insert(name, value);
        } else {
            tracing::warn!(header = %name, "Skipping invalid header");
        }
    }
    if !bundle.cookie.is_empty() {
        if let Ok(value) = HeaderValue::try_from(bundle.cookie.as_str()) {
            map.insert(COOKIE, value);
        }
    }
    map
}

/// `filename` parameter of a Content-Disposition value
fn disposition_filename(value: &str) -> Option<String> {
    value.split(';').map(str::trim).find_map(|part| {
        let (key, val) = part.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("filename") {
            Some(val.trim().trim_matches('"').to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HeaderSet;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn bundle() -> HandoffBundle {
        let mut headers = HeaderSet::new();
        headers.insert("Content-Type".into(), "application/x-www-form-urlencoded".into());
        headers.insert("X-Bad Header".into(), "ignored".into());
        HandoffBundle {
            cookie: "JSESSIONID=abc".into(),
            payload: "a=1&b=2".into(),
            headers,
        }
    }

    #[test]
    fn test_build_headers() {
        let map = build_headers(&bundle());
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(COOKIE).unwrap().to_str().unwrap(), "JSESSIONID=abc");
    }

    #[test]
    fn test_disposition_filename() {
        assert_eq!(
            disposition_filename("attachment; filename=\"src.tar.gz\"").as_deref(),
            Some("src.tar.gz")
        );
        assert_eq!(disposition_filename("inline"), None);
    }

    #[tokio::test]
    async fn test_replay_writes_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/downSrcCode"))
            .and(header("cookie", "JSESSIONID=abc"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("a=1&b=2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-disposition", "attachment; filename=\"kernel.zip\"")
                    .set_body_bytes(b"ZIPDATA".to_vec()),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.bin");
        let outcome = Replayer::new(Duration::from_secs(5))
            .unwrap()
            .replay_to_file(&format!("{}/downSrcCode", server.uri()), &bundle(), &output)
            .await
            .unwrap();

        assert_eq!(outcome.status, 200);
        assert_eq!(outcome.bytes_written, 7);
        assert_eq!(outcome.suggested_name.as_deref(), Some("kernel.zip"));
        assert_eq!(std::fs::read(&output).unwrap(), b"ZIPDATA");
    }

    struct BrokenStream(Vec<&'static [u8]>);

    #[async_trait]
    impl ChunkSource for BrokenStream {
        async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
            if self.0.is_empty() {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset",
                )));
            }
            Ok(Some(Bytes::from_static(self.0.remove(0))))
        }
    }

    #[tokio::test]
    async fn test_interrupted_body_removes_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("partial.bin");

        let mut source = BrokenStream(vec![b"ZIP", b"DATA"]);
        let err = save_body(&mut source, &output).await.unwrap_err();

        assert!(matches!(err, Error::Io(_)));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_replay_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let err = Replayer::new(Duration::from_secs(5))
            .unwrap()
            .replay_to_file(&server.uri(), &bundle(), &dir.path().join("out.bin"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ReplayStatus { status: 403, .. }));
    }
}
