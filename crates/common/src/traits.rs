//! Core traits for favscan components

use crate::types::ProbeResult;
use async_trait::async_trait;
use std::net::IpAddr;

/// Probe a single address for a fingerprintable favicon.
///
/// Implementations never fail: transport errors, non-success statuses and
/// unmatched digests are logged and reported as `None`.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe one address
    async fn probe(&self, address: IpAddr) -> Option<ProbeResult>;

    /// Probe addresses one after another, keeping enumeration order.
    async fn probe_sequence(&self, addresses: &[IpAddr]) -> Vec<ProbeResult> {
        let mut results = Vec::new();
        for address in addresses {
            if let Some(result) = self.probe(*address).await {
                results.push(result);
            }
        }
        results
    }

    /// Prober name/identifier
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchRecord;
    use std::net::Ipv4Addr;

    /// Matches only even last octets.
    struct EvenProber;

    #[async_trait]
    impl Prober for EvenProber {
        async fn probe(&self, address: IpAddr) -> Option<ProbeResult> {
            match address {
                IpAddr::V4(v4) if v4.octets()[3] % 2 == 0 => Some(ProbeResult::new(
                    address,
                    vec![MatchRecord {
                        description: "even".to_string(),
                        examples: Vec::new(),
                        params: Vec::new(),
                    }],
                )),
                _ => None,
            }
        }

        fn name(&self) -> &str {
            "even"
        }
    }

    #[tokio::test]
    async fn probe_sequence_skips_absent_and_keeps_order() {
        let addresses: Vec<IpAddr> = (1..=6)
            .map(|i| IpAddr::V4(Ipv4Addr::new(10, 0, 0, i)))
            .collect();
        let results = EvenProber.probe_sequence(&addresses).await;
        let got: Vec<String> = results.iter().map(|r| r.address.to_string()).collect();
        assert_eq!(got, vec!["10.0.0.2", "10.0.0.4", "10.0.0.6"]);
    }
}
