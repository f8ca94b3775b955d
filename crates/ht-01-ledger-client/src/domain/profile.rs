//! Connection profile describing the ledger network topology.
//!
//! The profile names the channel and chaincode every transaction binds to,
//! the member organizations with their endorsing peers, and the certificate
//! authority used for enrollment. Defaults describe the five-organization
//! herbionyx network; every endpoint is overridable through configuration.

use serde::{Deserialize, Serialize};

use shared_types::ConnectError;

/// An endorsing peer endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerEndpoint {
    /// Peer hostname as registered with the network.
    pub name: String,
    /// Base URL the client reaches the peer on.
    pub url: String,
}

/// A certificate authority endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaEndpoint {
    /// CA name as registered with the network.
    pub name: String,
    /// Base URL of the CA.
    pub url: String,
}

/// One member organization with its endorsing peer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Membership service provider identifier.
    pub msp_id: String,
    /// The organization's endorsing peer.
    pub peer: PeerEndpoint,
}

/// Full network topology the client connects against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionProfile {
    /// Ledger network name.
    pub network_name: String,
    /// Channel all transactions are committed on.
    pub channel: String,
    /// Chaincode all transactions address.
    pub chaincode: String,
    /// Member organizations, first entry is the client's own organization.
    pub organizations: Vec<Organization>,
    /// Certificate authority for identity enrollment.
    pub certificate_authority: CaEndpoint,
}

impl Default for ConnectionProfile {
    fn default() -> Self {
        let orgs = [
            ("FarmersCoopMSP", "peer0.farmers.herbionyx.com", 7051),
            ("LabsOrgMSP", "peer0.labs.herbionyx.com", 8051),
            ("ProcessorsOrgMSP", "peer0.processors.herbionyx.com", 9051),
            ("ManufacturersOrgMSP", "peer0.manufacturers.herbionyx.com", 10051),
            ("NMPBOrgMSP", "peer0.nmpb.herbionyx.com", 11051),
        ];

        Self {
            network_name: "herbionyx-network".to_string(),
            channel: "ayurveda-channel".to_string(),
            chaincode: "herbtraceability".to_string(),
            organizations: orgs
                .iter()
                .map(|(msp, peer, port)| Organization {
                    msp_id: (*msp).to_string(),
                    peer: PeerEndpoint {
                        name: (*peer).to_string(),
                        url: format!("http://localhost:{}", port),
                    },
                })
                .collect(),
            certificate_authority: CaEndpoint {
                name: "ca.farmers.herbionyx.com".to_string(),
                url: "http://localhost:7054".to_string(),
            },
        }
    }
}

impl ConnectionProfile {
    /// Validate the profile before any connection attempt.
    pub fn validate(&self) -> Result<(), ConnectError> {
        if self.channel.is_empty() {
            return Err(ConnectError::Profile("channel name is empty".into()));
        }
        if self.chaincode.is_empty() {
            return Err(ConnectError::Profile("chaincode name is empty".into()));
        }
        if self.organizations.is_empty() {
            return Err(ConnectError::Profile(
                "at least one organization with an endorsing peer is required".into(),
            ));
        }

        let mut urls: Vec<&str> = self
            .organizations
            .iter()
            .map(|o| o.peer.url.as_str())
            .collect();
        urls.sort_unstable();
        urls.dedup();
        if urls.len() != self.organizations.len() {
            return Err(ConnectError::Profile("duplicate peer endpoints".into()));
        }

        Ok(())
    }

    /// The client's own organization (first profile entry).
    pub fn own_organization(&self) -> &Organization {
        &self.organizations[0]
    }

    /// All endorsing peer endpoints.
    pub fn peers(&self) -> impl Iterator<Item = &PeerEndpoint> {
        self.organizations.iter().map(|o| &o.peer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_valid() {
        let profile = ConnectionProfile::default();
        assert!(profile.validate().is_ok());
        assert_eq!(profile.channel, "ayurveda-channel");
        assert_eq!(profile.chaincode, "herbtraceability");
        assert_eq!(profile.organizations.len(), 5);
        assert_eq!(profile.own_organization().msp_id, "FarmersCoopMSP");
    }

    #[test]
    fn test_validate_rejects_empty_channel() {
        let mut profile = ConnectionProfile::default();
        profile.channel.clear();
        assert!(matches!(
            profile.validate(),
            Err(ConnectError::Profile(_))
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_peers() {
        let mut profile = ConnectionProfile::default();
        let first = profile.organizations[0].peer.url.clone();
        profile.organizations[1].peer.url = first;
        assert!(matches!(
            profile.validate(),
            Err(ConnectError::Profile(_))
        ));
    }

    #[test]
    fn test_peer_ports_span_the_network() {
        let profile = ConnectionProfile::default();
        let urls: Vec<_> = profile.peers().map(|p| p.url.clone()).collect();
        assert!(urls.contains(&"http://localhost:7051".to_string()));
        assert!(urls.contains(&"http://localhost:11051".to_string()));
    }
}
