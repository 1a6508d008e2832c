//! Built-in public endpoints for the WAX chain.

use crate::nodes::types::{Network, PoolTier, ServiceType};

/// Default endpoints for a pool, in priority order. Empty when none are known.
pub fn default_endpoints(node_type: ServiceType, network: Network, tier: PoolTier) -> &'static [&'static str] {
    match (node_type, network, tier) {
        (ServiceType::Hyperion, Network::Mainnet, PoolTier::Primary) => &[
            "https://wax.eosusa.news",
            "https://wax.greymass.com",
            "https://wax.cryptolions.io",
        ],
        (ServiceType::Hyperion, Network::Testnet, PoolTier::Primary) => &[
            "https://testnet.waxsweden.org",
            "https://testnet.wax.pink.gg",
            "https://testnet.wax.eosdetroit.io",
        ],
        (ServiceType::Atomic, Network::Mainnet, PoolTier::Primary) => &[
            "https://wax.api.atomicassets.io",
            "https://aa.wax.blacklusion.io",
            "https://wax-aa.eu.eosamsterdam.net",
        ],
        (ServiceType::Atomic, Network::Testnet, PoolTier::Primary) => &[
            "https://test.wax.api.atomicassets.io",
            "https://atomic-wax-testnet.eosphere.io",
            "https://testatomic.waxsweden.org",
        ],
        (ServiceType::Lightapi, Network::Mainnet, PoolTier::Primary) => &[
            "https://lightapi.eosamsterdam.net",
            "https://lightapi.eosrio.io",
            "https://api.light.xeos.me",
        ],
        (ServiceType::Lightapi, Network::Testnet, PoolTier::Primary) => &[
            "https://testnet.lightapi.eosamsterdam.net",
            "https://testnet.lightapi.eosrio.io",
        ],
        (ServiceType::Ipfs, Network::Mainnet, PoolTier::Primary) => &[
            "https://ipfs.io",
            "https://cloudflare-ipfs.com",
            "https://gateway.pinata.cloud",
        ],
        (ServiceType::Ipfs, Network::Testnet, PoolTier::Primary) => &[
            "https://test-ipfs.pinata.cloud",
            "https://test.ipfs.io",
        ],
        // Content is chain-independent, so both networks share the public gateways.
        (ServiceType::Ipfs, _, PoolTier::Secondary) => &[
            "https://dweb.link",
            "https://w3s.link",
            "https://nftstorage.link",
        ],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_primary_pool_is_populated() {
        for node_type in ServiceType::ALL {
            for network in [Network::Mainnet, Network::Testnet] {
                assert!(
                    !default_endpoints(node_type, network, PoolTier::Primary).is_empty(),
                    "{} {} has no defaults",
                    node_type,
                    network
                );
            }
        }
    }

    #[test]
    fn test_secondary_only_for_gateways() {
        assert!(default_endpoints(ServiceType::Hyperion, Network::Mainnet, PoolTier::Secondary).is_empty());
        assert_eq!(default_endpoints(ServiceType::Ipfs, Network::Testnet, PoolTier::Secondary).len(), 3);
    }
}
