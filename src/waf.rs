// waf.rs - Heuristic WAF detection
// One plain-HTTP GET to the target root, classified from response headers.
// Only used to self-throttle the vulnerability scan; it is not a security control.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, SERVER};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WafVerdict {
    None,
    Cloudflare,
    Akamai,
    Sucuri,
}

impl WafVerdict {
    pub fn is_detected(self) -> bool {
        self != WafVerdict::None
    }
}

impl fmt::Display for WafVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WafVerdict::None => "None",
            WafVerdict::Cloudflare => "Cloudflare",
            WafVerdict::Akamai => "Akamai",
            WafVerdict::Sucuri => "Sucuri",
        };
        f.write_str(name)
    }
}

const AKAMAI: &[u8] = b"Akamai";

/// First matching rule wins: CF-RAY, then an Akamai Server header, then X-Sucuri-ID.
/// Header values are matched as raw bytes; they are not guaranteed to be ASCII.
pub fn classify(headers: &HeaderMap) -> WafVerdict {
    if headers.contains_key("cf-ray") {
        return WafVerdict::Cloudflare;
    }

    if headers
        .get(SERVER)
        .map(|v| v.as_bytes().windows(AKAMAI.len()).any(|w| w == AKAMAI))
        .unwrap_or(false)
    {
        return WafVerdict::Akamai;
    }

    if headers.contains_key("x-sucuri-id") {
        return WafVerdict::Sucuri;
    }

    WafVerdict::None
}

#[async_trait]
pub trait WafProbe: Send + Sync {
    /// Never fails: an unreachable target yields `WafVerdict::None`.
    async fn probe(&self, target: &str) -> WafVerdict;
}

pub struct HttpWafProber {
    client: Client,
}

impl Default for HttpWafProber {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpWafProber {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WafProbe for HttpWafProber {
    async fn probe(&self, target: &str) -> WafVerdict {
        let url = format!("http://{}", target);
        match self.client.get(&url).send().await {
            Ok(resp) => classify(resp.headers()),
            Err(e) => {
                tracing::debug!(%url, error = %e, "WAF probe failed, assuming no WAF");
                WafVerdict::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(
                HeaderName::from_bytes(k.as_bytes()).unwrap(),
                HeaderValue::from_static(*v),
            );
        }
        map
    }

    #[test]
    fn test_classify_rules() {
        assert_eq!(classify(&headers(&[("CF-RAY", "8a1b2c-AMS")])), WafVerdict::Cloudflare);
        assert_eq!(classify(&headers(&[("Server", "AkamaiGHost")])), WafVerdict::Akamai);
        assert_eq!(classify(&headers(&[("X-Sucuri-ID", "11005")])), WafVerdict::Sucuri);
        assert_eq!(classify(&headers(&[("Server", "nginx")])), WafVerdict::None);
        assert_eq!(classify(&HeaderMap::new()), WafVerdict::None);
    }

    #[test]
    fn test_cloudflare_wins_over_sucuri() {
        let h = headers(&[("X-Sucuri-ID", "1"), ("CF-RAY", "abc")]);
        assert_eq!(classify(&h), WafVerdict::Cloudflare);
    }

    #[test]
    fn test_akamai_match_is_case_sensitive_substring() {
        assert_eq!(classify(&headers(&[("Server", "akamai")])), WafVerdict::None);
        assert_eq!(classify(&headers(&[("Server", "x-Akamai-edge")])), WafVerdict::Akamai);
    }

    #[test]
    fn test_akamai_server_with_non_ascii_byte() {
        let mut h = HeaderMap::new();
        h.insert(SERVER, HeaderValue::from_bytes(b"AkamaiGHost \xe9").unwrap());
        assert_eq!(classify(&h), WafVerdict::Akamai);
    }

    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut sock, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = sock.read(&mut buf).await;
                let _ = sock.write_all(response.as_bytes()).await;
                let _ = sock.shutdown().await;
            }
        });
        addr.to_string()
    }

    fn direct_prober() -> HttpWafProber {
        let client = Client::builder()
            .timeout(PROBE_TIMEOUT)
            .no_proxy()
            .build()
            .unwrap();
        HttpWafProber::with_client(client)
    }

    #[tokio::test]
    async fn test_probe_reads_live_headers() {
        let target = serve_once(
            "HTTP/1.1 200 OK\r\nCF-RAY: 123-FRA\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        assert_eq!(direct_prober().probe(&target).await, WafVerdict::Cloudflare);
    }

    #[tokio::test]
    async fn test_unreachable_target_fails_open() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let target = listener.local_addr().unwrap().to_string();
        drop(listener);

        assert_eq!(direct_prober().probe(&target).await, WafVerdict::None);
    }
}
