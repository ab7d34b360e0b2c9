// Target-level fingerprinting that has to happen before a stateful checker
// can be bound. Each probe runs once per target.

use serde::{Deserialize, Serialize};

use crate::cracker::primitives::{RdpNegotiator, TelnetDialer};

/// Security layer selected during RDP connection negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RdpProtocol {
    /// Standard RDP security.
    Rdp,
    Ssl,
    /// CredSSP (NLA).
    Hybrid,
    Rdstls,
    HybridEx,
}

impl RdpProtocol {
    /// Map the `selectedProtocol` field of a negotiation response.
    pub fn from_selected(value: u32) -> Self {
        match value {
            0x01 => RdpProtocol::Ssl,
            0x02 => RdpProtocol::Hybrid,
            0x04 => RdpProtocol::Rdstls,
            0x08 => RdpProtocol::HybridEx,
            _ => RdpProtocol::Rdp,
        }
    }
}

impl std::fmt::Display for RdpProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RdpProtocol::Rdp => write!(f, "PROTOCOL_RDP"),
            RdpProtocol::Ssl => write!(f, "PROTOCOL_SSL"),
            RdpProtocol::Hybrid => write!(f, "PROTOCOL_HYBRID"),
            RdpProtocol::Rdstls => write!(f, "PROTOCOL_RDSTLS"),
            RdpProtocol::HybridEx => write!(f, "PROTOCOL_HYBRID_EX"),
        }
    }
}

/// How a Telnet server asks for credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TelnetServerType {
    /// Connection failed during probing.
    Closed,
    /// Shell without any login prompt.
    UnauthorizedAccess,
    OnlyPassword,
    UsernameAndPassword,
}

pub async fn probe_rdp(negotiator: &dyn RdpNegotiator, host: &str, port: u16) -> RdpProtocol {
    let target = format!("{}:{}", host, port);
    let protocol = negotiator.verify_protocol(&target).await;
    tracing::debug!("rdp protocol for {} is {}", target, protocol);
    protocol
}

/// Classify a Telnet server. A failed connect is reported as
/// [`TelnetServerType::Closed`] and the server is never queried; a connected
/// client is always closed before returning.
pub async fn probe_telnet(dialer: &dyn TelnetDialer, host: &str, port: u16) -> TelnetServerType {
    let mut client = dialer.client(host, port);
    if let Err(e) = client.connect().await {
        tracing::debug!("telnet probe {}:{} failed: {}", host, port, e);
        return TelnetServerType::Closed;
    }

    let server_type = client.make_server_type().await;
    // Cancellation before this point leaves cleanup to the client's Drop.
    client.close().await;
    tracing::debug!("telnet server type for {}:{} is {:?}", host, port, server_type);
    server_type
}
