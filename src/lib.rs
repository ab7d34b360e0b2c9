//! Protocol dispatch and result normalization for credential auditing.
//!
//! A [`Cracker`] hands out one bound [`Checker`] per target and service. The
//! surrounding engine then feeds every candidate [`AuthInfo`] through
//! [`Checker::check`] and keeps the records that come back.

pub mod auth;
pub mod config;
pub mod cracker;
pub mod error;
pub mod logging;
pub mod service;

pub use auth::{Auth, AuthInfo, PasswordMaker, UserPlaceholder};
pub use config::{AnomalyPolicy, CrackerConfig};
pub use cracker::checker::{Attempt, Checker, CheckerKind};
pub use cracker::fingerprint::{probe_rdp, probe_telnet, RdpProtocol, TelnetServerType};
pub use cracker::primitives::{CheckOutcome, ProtocolChecks, RdpNegotiator, TelnetClient, TelnetDialer};
pub use cracker::reporter::{DiagnosticSink, TracingSink};
pub use cracker::Cracker;
pub use error::{CheckError, DispatchError, ProbeError};
pub use service::Service;
