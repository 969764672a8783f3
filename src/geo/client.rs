//! ip2location.io Client
//!
//! Blocking lookup with a per-IP response cache so a batch never queries
//! the same address twice. No retry/backoff here; that policy belongs to
//! the caller.

use std::collections::HashMap;

use crate::constants::{get_geo_api_key, GEO_API_BASE};

use super::types::{GeoApiResponse, GeoError, GeoLookup, GeoRecord};

pub struct Ip2LocationClient {
    api_key: Option<String>,
    cache: HashMap<String, GeoRecord>,
}

impl Ip2LocationClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        Self {
            api_key: if key.is_empty() { None } else { Some(key) },
            cache: HashMap::new(),
        }
    }

    /// Build from the GEO_API_KEY environment variable.
    pub fn from_env() -> Self {
        Self {
            api_key: get_geo_api_key(),
            cache: HashMap::new(),
        }
    }

    /// Check if the client has an API key
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Number of cached lookups
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Clear the response cache
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Query the API for one IP (blocking)
    fn fetch(&self, ip: &str) -> Result<GeoRecord, GeoError> {
        let key = self.api_key.as_deref().ok_or(GeoError::NotConfigured)?;
        let url = format!("{}?key={}&ip={}", GEO_API_BASE, key, ip);

        match ureq::get(&url).call() {
            Ok(resp) => {
                let body = resp
                    .into_string()
                    .map_err(|e| GeoError::ParseError(e.to_string()))?;

                let payload: GeoApiResponse = serde_json::from_str(&body)
                    .map_err(|e| GeoError::ParseError(e.to_string()))?;

                Ok(payload.into_record(ip))
            }
            Err(ureq::Error::Status(code, _)) => Err(GeoError::BadStatus(code)),
            Err(e) => Err(GeoError::NetworkError(e.to_string())),
        }
    }
}

impl GeoLookup for Ip2LocationClient {
    fn lookup(&mut self, ip: &str) -> Result<GeoRecord, GeoError> {
        if let Some(hit) = self.cache.get(ip) {
            return Ok(hit.clone());
        }

        let record = self.fetch(ip)?;
        log::debug!("geo lookup {} -> {}, {}", ip, record.city, record.country);

        self.cache.insert(ip.to_string(), record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_is_unconfigured() {
        let client = Ip2LocationClient::new("");
        assert!(!client.is_configured());
    }

    #[test]
    fn test_unconfigured_lookup_fails_uniformly() {
        let mut client = Ip2LocationClient::new("");
        let result = client.lookup("8.8.8.8");
        assert!(matches!(result, Err(GeoError::NotConfigured)));
        assert_eq!(client.cache_len(), 0);
    }

    #[test]
    fn test_configured_client() {
        let client = Ip2LocationClient::new("demo-key");
        assert!(client.is_configured());
        assert_eq!(client.cache_len(), 0);
    }
}
