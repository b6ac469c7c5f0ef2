//! Target Resolver - name resolution and CIDR expansion
//!
//! Turns one target string into the ordered list of addresses to probe.
//! Supported forms:
//! - single address: "1.2.3.4", "2001:db8::1"
//! - CIDR: "192.168.1.0/24" (every address, network and broadcast included)
//! - hostname: "example.com" (first IPv4 address the system resolver returns)
//!
//! Resolution never fails from the caller's point of view. Invalid or
//! unresolvable targets are logged and yield an empty list.

use favscan_common::{FavscanError, FavscanResult};
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, ToSocketAddrs};
use tracing::{debug, instrument, warn};

/// Longest target string accepted for resolution.
pub const MAX_TARGET_LEN: usize = 64;

#[derive(Debug, Clone)]
pub struct ResolverOptions {
    pub max_target_len: usize,
    /// Refuse networks with more addresses than this. `None` expands any size.
    pub max_addresses: Option<u128>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_target_len: MAX_TARGET_LEN,
            max_addresses: None,
        }
    }
}

impl ResolverOptions {
    #[must_use]
    pub fn with_max_addresses(mut self, max: u128) -> Self {
        self.max_addresses = Some(max);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct TargetResolver {
    options: ResolverOptions,
}

impl TargetResolver {
    pub fn new(options: ResolverOptions) -> Self {
        Self { options }
    }

    /// Resolve `target` into the addresses to probe, in enumeration order.
    ///
    /// DNS lookups run inside `tokio::task::spawn_blocking` so the runtime
    /// is not stalled by the system resolver.
    #[instrument(skip(self))]
    pub async fn resolve(&self, target: &str) -> Vec<IpAddr> {
        match self.try_resolve(target).await {
            Ok(addresses) => {
                debug!(count = addresses.len(), "Target resolved");
                addresses
            }
            Err(e) => {
                warn!(%target, "Skipping target: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_resolve(&self, target: &str) -> FavscanResult<Vec<IpAddr>> {
        self.check_length(target)?;

        let t = target.trim();
        if t.is_empty() {
            return Err(FavscanError::InvalidTarget("empty target".to_string()));
        }

        // CIDR
        if t.contains('/') {
            let net = parse_network(t)?;
            return self.expand(net);
        }

        // Direct IP
        if let Ok(ip) = t.parse::<IpAddr>() {
            return Ok(vec![ip]);
        }

        // Hostname
        let ip = lookup_host(t.to_string()).await?;
        Ok(vec![ip])
    }

    /// Length is measured in characters before trimming.
    fn check_length(&self, target: &str) -> FavscanResult<()> {
        if target.chars().count() > self.options.max_target_len {
            return Err(FavscanError::InvalidTarget(format!(
                "target is longer than {} characters",
                self.options.max_target_len
            )));
        }
        Ok(())
    }

    fn expand(&self, net: IpNet) -> FavscanResult<Vec<IpAddr>> {
        let count = address_count(&net);
        if let Some(max) = self.options.max_addresses {
            if count > max {
                return Err(FavscanError::InvalidTarget(format!(
                    "{} expands to {} addresses which exceeds the limit of {}",
                    net, count, max
                )));
            }
        }
        Ok(addresses(&net))
    }
}

/// Parse a CIDR, accepting host bits by truncating to the network.
fn parse_network(t: &str) -> FavscanResult<IpNet> {
    t.parse::<IpNet>()
        .map(|net| net.trunc())
        .map_err(|e| FavscanError::InvalidTarget(format!("{}: {}", t, e)))
}

/// Number of addresses in `net`, saturating for an IPv6 /0.
fn address_count(net: &IpNet) -> u128 {
    let bits = match net {
        IpNet::V4(_) => 32,
        IpNet::V6(_) => 128,
    };
    let host_bits = bits - u32::from(net.prefix_len());
    if host_bits >= 128 {
        u128::MAX
    } else {
        1u128 << host_bits
    }
}

/// Every address from the network address through the broadcast address.
fn addresses(net: &IpNet) -> Vec<IpAddr> {
    match net {
        IpNet::V4(v4) => ipv4_addresses(v4),
        IpNet::V6(v6) => ipv6_addresses(v6),
    }
}

fn ipv4_addresses(net: &Ipv4Net) -> Vec<IpAddr> {
    let start = u32::from(net.network());
    let end = u32::from(net.broadcast());
    (start..=end)
        .map(|v| IpAddr::V4(Ipv4Addr::from(v)))
        .collect()
}

fn ipv6_addresses(net: &Ipv6Net) -> Vec<IpAddr> {
    let start = u128::from(net.network());
    let end = u128::from(net.broadcast());
    (start..=end)
        .map(|v| IpAddr::V6(Ipv6Addr::from(v)))
        .collect()
}

/// First IPv4 address the system resolver returns for `host`.
async fn lookup_host(host: String) -> FavscanResult<IpAddr> {
    let name = host.clone();
    let resolved = tokio::task::spawn_blocking(move || {
        (name.as_str(), 0)
            .to_socket_addrs()
            .map(|addrs| addrs.map(|a| a.ip()).find(IpAddr::is_ipv4))
    })
    .await
    .map_err(|e| FavscanError::InvalidTarget(format!("{}: resolver task failed: {}", host, e)))?;

    match resolved {
        Ok(Some(ip)) => Ok(ip),
        Ok(None) => Err(FavscanError::InvalidTarget(format!(
            "{}: no IPv4 address",
            host
        ))),
        Err(e) => Err(FavscanError::InvalidTarget(format!("{}: {}", host, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> TargetResolver {
        TargetResolver::default()
    }

    #[tokio::test]
    async fn test_resolve_single_ip() {
        let ips = resolver().resolve("8.8.8.8").await;
        assert_eq!(ips, vec![IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8))]);
    }

    #[tokio::test]
    async fn test_resolve_single_ipv6() {
        let ips = resolver().resolve("2001:db8::1").await;
        assert_eq!(ips, vec!["2001:db8::1".parse::<IpAddr>().unwrap()]);
    }

    #[tokio::test]
    async fn test_resolve_localhost_name() {
        let ips = resolver().resolve("localhost").await;
        assert_eq!(ips, vec![IpAddr::V4(Ipv4Addr::LOCALHOST)]);
    }

    #[tokio::test]
    async fn test_resolve_cidr_includes_network_and_broadcast() {
        let ips = resolver().resolve("192.168.1.0/30").await;
        let got: Vec<String> = ips.iter().map(ToString::to_string).collect();
        assert_eq!(
            got,
            vec!["192.168.1.0", "192.168.1.1", "192.168.1.2", "192.168.1.3"]
        );
    }

    #[tokio::test]
    async fn test_resolve_cidr_sizes() {
        assert_eq!(resolver().resolve("10.0.0.0/24").await.len(), 256);
        assert_eq!(resolver().resolve("10.0.0.7/32").await.len(), 1);
        assert_eq!(resolver().resolve("2001:db8::/120").await.len(), 256);
    }

    #[tokio::test]
    async fn test_cidr_with_host_bits_is_truncated() {
        let ips = resolver().resolve("10.1.2.3/31").await;
        let got: Vec<String> = ips.iter().map(ToString::to_string).collect();
        assert_eq!(got, vec!["10.1.2.2", "10.1.2.3"]);
    }

    #[tokio::test]
    async fn test_too_long_target_is_empty() {
        let long = format!("{}.example.com", "a".repeat(64));
        assert!(long.len() > MAX_TARGET_LEN);
        assert!(resolver().resolve(&long).await.is_empty());

        let long_ip = format!("10.0.0.1{}", " ".repeat(60));
        assert!(resolver().resolve(&long_ip).await.is_empty());
    }

    #[tokio::test]
    async fn test_target_of_exactly_max_len_is_resolved() {
        let padded = format!("{:<64}", "10.0.0.1");
        assert_eq!(padded.chars().count(), MAX_TARGET_LEN);
        assert_eq!(
            resolver().resolve(&padded).await,
            vec![IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))]
        );

        let cidr = format!("{:<64}", "10.0.0.0/30");
        assert_eq!(resolver().resolve(&cidr).await.len(), 4);

        let over = format!("{:<65}", "10.0.0.1");
        assert!(resolver().resolve(&over).await.is_empty());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let r = resolver();
        let wide = "\u{00e9}".repeat(40);
        assert_eq!(wide.len(), 80);
        assert!(r.check_length(&wide).is_ok());

        assert!(r.check_length(&"\u{00e9}".repeat(64)).is_ok());
        assert!(matches!(
            r.check_length(&"\u{00e9}".repeat(65)),
            Err(FavscanError::InvalidTarget(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_targets_are_empty() {
        let r = resolver();
        assert!(r.resolve("").await.is_empty());
        assert!(r.resolve("1254.5445454.54.57").await.is_empty());
        assert!(r.resolve("10.0.0.0/33").await.is_empty());
        assert!(r.resolve("not a host/24").await.is_empty());
        assert!(r.resolve("ww.as.eededede.invalid").await.is_empty());
    }

    #[tokio::test]
    async fn test_large_cidr_rejected_when_capped() {
        let r = TargetResolver::new(ResolverOptions::default().with_max_addresses(4096));
        assert!(r.resolve("10.0.0.0/16").await.is_empty());
        assert_eq!(r.resolve("10.0.0.0/20").await.len(), 4096);
    }

    #[test]
    fn test_address_count() {
        assert_eq!(address_count(&"10.0.0.0/8".parse().unwrap()), 1 << 24);
        assert_eq!(address_count(&"::/0".parse().unwrap()), u128::MAX);
    }
}
