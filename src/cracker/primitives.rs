// Collaborators the engine plugs into the cracker: one login primitive per
// protocol plus the two target-level fingerprint primitives.

use async_trait::async_trait;

use crate::cracker::fingerprint::{RdpProtocol, TelnetServerType};
use crate::error::{CheckError, ProbeError};

/// Raw result of one login primitive call.
#[derive(Debug, Default)]
pub struct CheckOutcome {
    pub authenticated: bool,
    pub error: Option<CheckError>,
}

impl CheckOutcome {
    pub fn denied() -> Self {
        Self::default()
    }

    pub fn success() -> Self {
        Self {
            authenticated: true,
            error: None,
        }
    }

    /// Success reported together with an error.
    pub fn anomaly(error: CheckError) -> Self {
        Self {
            authenticated: true,
            error: Some(error),
        }
    }
}

/// Wire-level login primitives, one per supported service.
#[async_trait]
pub trait ProtocolChecks: Send + Sync {
    async fn ftp(&self, host: &str, username: &str, password: &str, port: u16) -> CheckOutcome;

    async fn ssh(&self, host: &str, username: &str, password: &str, port: u16) -> CheckOutcome;

    async fn telnet(
        &self,
        host: &str,
        username: &str,
        password: &str,
        port: u16,
        server_type: TelnetServerType,
    ) -> CheckOutcome;

    async fn mysql(&self, host: &str, username: &str, password: &str, port: u16) -> CheckOutcome;

    async fn mssql(&self, host: &str, username: &str, password: &str, port: u16) -> CheckOutcome;

    async fn postgresql(&self, host: &str, username: &str, password: &str, port: u16) -> CheckOutcome;

    async fn oracle(
        &self,
        host: &str,
        username: &str,
        password: &str,
        port: u16,
        sid: &str,
    ) -> CheckOutcome;

    async fn mongodb(&self, host: &str, username: &str, password: &str, port: u16) -> CheckOutcome;

    async fn redis(&self, host: &str, password: &str, port: u16) -> CheckOutcome;

    async fn smb(
        &self,
        host: &str,
        domain: &str,
        username: &str,
        password: &str,
        port: u16,
    ) -> CheckOutcome;

    async fn rdp(
        &self,
        host: &str,
        domain: &str,
        username: &str,
        password: &str,
        port: u16,
        protocol: RdpProtocol,
    ) -> CheckOutcome;
}

/// Negotiates the RDP security layer with `host:port`.
#[async_trait]
pub trait RdpNegotiator: Send + Sync {
    async fn verify_protocol(&self, target: &str) -> RdpProtocol;
}

/// A single Telnet connection used for server classification.
///
/// Implementations must release the underlying connection in `Drop`. A
/// classification that is cancelled (for example by an outer timeout) drops
/// the client without reaching `close`.
#[async_trait]
pub trait TelnetClient: Send {
    async fn connect(&mut self) -> Result<(), ProbeError>;
    async fn make_server_type(&mut self) -> TelnetServerType;
    async fn close(&mut self);
}

pub trait TelnetDialer: Send + Sync {
    fn client(&self, host: &str, port: u16) -> Box<dyn TelnetClient>;
}
