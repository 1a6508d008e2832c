//! Service, network and endpoint types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of blockchain service a pool serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    /// Full-history indexer.
    #[serde(alias = "full-history-index")]
    Hyperion,
    /// Asset index.
    #[serde(alias = "asset-index")]
    Atomic,
    /// Light account API.
    #[serde(alias = "light-api")]
    Lightapi,
    /// Content-addressed storage gateway.
    #[serde(alias = "content-gateway")]
    Ipfs,
}

impl ServiceType {
    pub const ALL: [ServiceType; 4] = [
        ServiceType::Hyperion,
        ServiceType::Atomic,
        ServiceType::Lightapi,
        ServiceType::Ipfs,
    ];

    /// Wire name used in config files and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Hyperion => "hyperion",
            ServiceType::Atomic => "atomic",
            ServiceType::Lightapi => "lightapi",
            ServiceType::Ipfs => "ipfs",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hyperion" | "full-history-index" => Ok(ServiceType::Hyperion),
            "atomic" | "asset-index" => Ok(ServiceType::Atomic),
            "lightapi" | "light-api" => Ok(ServiceType::Lightapi),
            "ipfs" | "content-gateway" => Ok(ServiceType::Ipfs),
            other => Err(format!("unknown node type '{}'", other)),
        }
    }
}

/// Chain network selecting the sub-pool within a service type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            other => Err(format!("unknown network '{}'", other)),
        }
    }
}

/// An opaque host URL. Well-formedness is not checked here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append `path` to the endpoint, avoiding a doubled slash.
    pub fn join(&self, path: &str) -> String {
        let base = self.0.trim_end_matches('/');
        if path.is_empty() {
            base.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Endpoint {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for Endpoint {
    fn from(url: String) -> Self {
        Self(url)
    }
}

/// Which list of a service type's pool set is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolTier {
    #[default]
    Primary,
    Secondary,
}

impl fmt::Display for PoolTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolTier::Primary => f.write_str("primary"),
            PoolTier::Secondary => f.write_str("secondary"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_type_aliases() {
        assert_eq!("lightapi".parse::<ServiceType>().unwrap(), ServiceType::Lightapi);
        assert_eq!("content-gateway".parse::<ServiceType>().unwrap(), ServiceType::Ipfs);
        assert!("eth".parse::<ServiceType>().is_err());

        #[derive(Deserialize)]
        struct Wrapper {
            t: ServiceType,
        }
        let w: Wrapper = toml::from_str("t = \"full-history-index\"").unwrap();
        assert_eq!(w.t, ServiceType::Hyperion);
    }

    #[test]
    fn test_endpoint_join() {
        let e = Endpoint::new("https://wax.greymass.com/");
        assert_eq!(e.join("/v2/health"), "https://wax.greymass.com/v2/health");
        assert_eq!(e.join("health"), "https://wax.greymass.com/health");
        assert_eq!(e.join(""), "https://wax.greymass.com");
    }
}
