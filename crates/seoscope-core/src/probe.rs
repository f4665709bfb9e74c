//! Best-effort image size probing
//!
//! Sends HEAD requests for the first few images of a page and reports which
//! ones are larger than the oversized threshold. A probe that fails, times
//! out or returns no `Content-Length` counts as "size unknown", never as an
//! error.

use reqwest::Client;
use reqwest::header::CONTENT_LENGTH;
use tokio::task::JoinSet;
use tokio::time::timeout;
use url::Url;

use crate::config::AnalyzerConfig;
use crate::extract::OversizedImages;
use crate::url_utils::resolve_resource;

/// Probe up to `config.max_image_probes` images concurrently
///
/// Returns the original `src` values of images whose size exceeds
/// `config.oversized_image_bytes`.
pub async fn probe_image_sizes(
    client: &Client,
    page_url: &Url,
    sources: &[String],
    config: &AnalyzerConfig,
) -> OversizedImages {
    let mut probes = JoinSet::new();

    for src in sources.iter().take(config.max_image_probes) {
        let Some(resolved) = resolve_resource(src, page_url) else {
            log::debug!("skipping probe for unresolvable image {}", src);
            continue;
        };

        let client = client.clone();
        let src = src.clone();
        let probe_timeout = config.probe_timeout();
        probes.spawn(async move {
            let size = match timeout(probe_timeout, content_length(&client, &resolved)).await {
                Ok(size) => size,
                Err(_) => {
                    log::debug!("image probe timed out for {}", resolved);
                    None
                }
            };
            (src, size)
        });
    }

    let mut oversized = OversizedImages::new();
    while let Some(joined) = probes.join_next().await {
        match joined {
            Ok((src, size)) => {
                if is_oversized(size, config.oversized_image_bytes) {
                    oversized.insert(src);
                }
            }
            Err(e) => log::warn!("image probe task failed: {}", e),
        }
    }

    oversized
}

/// `Content-Length` of a HEAD response, if the server reports one
async fn content_length(client: &Client, url: &Url) -> Option<u64> {
    let response = match client.head(url.as_str()).send().await {
        Ok(response) => response,
        Err(e) => {
            log::debug!("image probe failed for {}: {}", url, e);
            return None;
        }
    };

    if !response.status().is_success() {
        return None;
    }

    // Read the header directly; the body of a HEAD response is always empty
    response
        .headers()
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Unknown sizes are never oversized
pub fn is_oversized(size: Option<u64>, threshold: u64) -> bool {
    size.is_some_and(|bytes| bytes > threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::time::{Duration, Instant};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Minimal HTTP server for HEAD requests
    ///
    /// `/big.png` reports 400 000 bytes, `/small.png` 1 000 bytes,
    /// `/slow.png` never answers in time and anything else is a 404.
    async fn spawn_image_server() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(handle_connection(stream));
            }
        });

        addr
    }

    async fn handle_connection(mut stream: TcpStream) {
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => request.extend_from_slice(&chunk[..n]),
            }
        }

        let request = String::from_utf8_lossy(&request);
        let path = request.split_whitespace().nth(1).unwrap_or("/");
        let response = match path {
            "/big.png" => "HTTP/1.1 200 OK\r\nContent-Length: 400000\r\nConnection: close\r\n\r\n",
            "/small.png" => "HTTP/1.1 200 OK\r\nContent-Length: 1000\r\nConnection: close\r\n\r\n",
            "/slow.png" => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                "HTTP/1.1 200 OK\r\nContent-Length: 400000\r\nConnection: close\r\n\r\n"
            }
            _ => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        };

        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
    }

    fn local_client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    fn test_config() -> AnalyzerConfig {
        AnalyzerConfig {
            probe_timeout_secs: 1,
            ..AnalyzerConfig::default()
        }
    }

    fn sources(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|path| path.to_string()).collect()
    }

    #[tokio::test]
    async fn test_large_content_length_is_oversized() {
        let addr = spawn_image_server().await;
        let page_url = Url::parse(&format!("http://{addr}/page")).unwrap();

        let oversized = probe_image_sizes(
            &local_client(),
            &page_url,
            &sources(&["/big.png", "/small.png", "/missing.png"]),
            &test_config(),
        )
        .await;

        assert_eq!(oversized.len(), 1);
        assert!(oversized.contains("/big.png"));
    }

    #[tokio::test]
    async fn test_slow_image_times_out_as_unknown() {
        let addr = spawn_image_server().await;
        let page_url = Url::parse(&format!("http://{addr}/page")).unwrap();

        let started = Instant::now();
        let oversized = probe_image_sizes(
            &local_client(),
            &page_url,
            &sources(&["/slow.png", "/big.png"]),
            &test_config(),
        )
        .await;

        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(!oversized.contains("/slow.png"));
        assert!(oversized.contains("/big.png"));
    }

    #[tokio::test]
    async fn test_threshold_and_probe_limit_come_from_config() {
        let addr = spawn_image_server().await;
        let page_url = Url::parse(&format!("http://{addr}/page")).unwrap();

        let raised = AnalyzerConfig {
            oversized_image_bytes: 500_000,
            ..test_config()
        };
        let oversized =
            probe_image_sizes(&local_client(), &page_url, &sources(&["/big.png"]), &raised).await;
        assert!(oversized.is_empty());

        let limited = AnalyzerConfig {
            max_image_probes: 1,
            ..test_config()
        };
        let oversized = probe_image_sizes(
            &local_client(),
            &page_url,
            &sources(&["/small.png", "/big.png"]),
            &limited,
        )
        .await;
        assert!(oversized.is_empty());
    }

    #[test]
    fn test_is_oversized() {
        assert!(is_oversized(Some(300_001), 300_000));
        assert!(!is_oversized(Some(300_000), 300_000));
        assert!(!is_oversized(Some(10), 300_000));
        assert!(!is_oversized(None, 300_000));
    }

    #[tokio::test]
    async fn test_unprobeable_sources_are_not_oversized() {
        let client = Client::new();
        let page_url = Url::parse("https://example.com/").unwrap();
        let sources = vec![
            "data:image/png;base64,AAAA".to_string(),
            "javascript:void(0)".to_string(),
        ];

        let oversized =
            probe_image_sizes(&client, &page_url, &sources, &AnalyzerConfig::default()).await;
        assert!(oversized.is_empty());
    }

    #[tokio::test]
    async fn test_no_sources() {
        let client = Client::new();
        let page_url = Url::parse("https://example.com/").unwrap();

        let oversized =
            probe_image_sizes(&client, &page_url, &[], &AnalyzerConfig::default()).await;
        assert!(oversized.is_empty());
    }
}
