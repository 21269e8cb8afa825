//! IP geolocation through an ipapi.co-compatible service.
//!
//! - own address:   `GET {base}/json/`
//! - given address: `GET {base}/{ip}/json/`

use std::net::IpAddr;

use log::{debug, warn};
use serde::Deserialize;

use super::{UNKNOWN, VisitorError};

pub const DEFAULT_GEO_BASE_URL: &str = "https://ipapi.co";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoInfo {
    pub ip: String,
    pub country: String,
}

impl GeoInfo {
    fn unknown(ip: Option<IpAddr>) -> Self {
        Self {
            ip: ip.map_or_else(|| UNKNOWN.to_string(), |ip| ip.to_string()),
            country: UNKNOWN.to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
struct IpApiResponse {
    #[serde(default)]
    ip: Option<String>,
    #[serde(default)]
    country_name: Option<String>,
    #[serde(default)]
    error: bool,
    #[serde(default)]
    reason: Option<String>,
}

pub struct GeoLookup {
    /// `None` disables network lookups entirely.
    base_url: Option<String>,
    client: reqwest::Client,
}

impl GeoLookup {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into().trim_end_matches('/').to_string()),
            client: reqwest::Client::new(),
        }
    }

    /// A lookup that never touches the network; everything resolves to "Unknown".
    pub fn offline() -> Self {
        Self {
            base_url: None,
            client: reqwest::Client::new(),
        }
    }

    /// Resolves the address and country of `ip`, or of this process when `ip` is `None`.
    ///
    /// When the address is already known a failed lookup only loses the
    /// country. Without an address there is nothing to key on, so the failure
    /// is returned.
    pub async fn lookup(&self, ip: Option<IpAddr>) -> Result<GeoInfo, VisitorError> {
        let Some(base_url) = self.base_url.as_deref() else {
            return Ok(GeoInfo::unknown(ip));
        };

        let url = match ip {
            Some(ip) => format!("{base_url}/{ip}/json/"),
            None => format!("{base_url}/json/"),
        };

        match self.fetch(&url).await {
            Ok(body) => {
                let info = GeoInfo {
                    ip: ip
                        .map(|ip| ip.to_string())
                        .or(body.ip)
                        .unwrap_or_else(|| UNKNOWN.to_string()),
                    country: body.country_name.unwrap_or_else(|| UNKNOWN.to_string()),
                };
                debug!("Geo lookup: ip={} country={}", info.ip, info.country);
                Ok(info)
            }
            Err(e) if ip.is_some() => {
                warn!("Geo lookup failed, keeping address only: {}", e);
                Ok(GeoInfo::unknown(ip))
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch(&self, url: &str) -> Result<IpApiResponse, VisitorError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| VisitorError::Lookup(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VisitorError::Lookup(format!("HTTP {}", status.as_u16())));
        }

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|e| VisitorError::Lookup(e.to_string()))?;

        if body.error {
            let reason = body.reason.unwrap_or_else(|| "unspecified".to_string());
            return Err(VisitorError::Lookup(reason));
        }
        Ok(body)
    }
}
