// Checker factory: turns a service (plus any target fingerprint) into a bound
// checker the engine can call once per candidate credential.

pub mod checker;
pub mod fingerprint;
pub mod mock;
pub mod primitives;
pub mod reporter;

use std::sync::Arc;

use crate::auth::{PasswordMaker, UserPlaceholder};
use crate::config::CrackerConfig;
use crate::error::DispatchError;
use crate::service::Service;
use checker::{Checker, CheckerKind, Collaborators};
use fingerprint::{probe_rdp, probe_telnet, RdpProtocol, TelnetServerType};
use primitives::{ProtocolChecks, RdpNegotiator, TelnetDialer};
use reporter::{DiagnosticSink, TracingSink};

pub struct Cracker {
    deps: Arc<Collaborators>,
    config: CrackerConfig,
    rdp_negotiator: Option<Arc<dyn RdpNegotiator>>,
    telnet_dialer: Option<Arc<dyn TelnetDialer>>,
}

impl Cracker {
    /// Cracker with `%user%` password expansion, `tracing` diagnostics and
    /// the default configuration.
    pub fn new(checks: Arc<dyn ProtocolChecks>) -> Self {
        Self {
            deps: Arc::new(Collaborators {
                checks,
                passwords: Arc::new(UserPlaceholder),
                sink: Arc::new(TracingSink),
            }),
            config: CrackerConfig::default(),
            rdp_negotiator: None,
            telnet_dialer: None,
        }
    }

    pub fn with_config(mut self, config: CrackerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_password_maker(mut self, passwords: Arc<dyn PasswordMaker>) -> Self {
        Arc::make_mut(&mut self.deps).passwords = passwords;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        Arc::make_mut(&mut self.deps).sink = sink;
        self
    }

    pub fn with_rdp_negotiator(mut self, negotiator: Arc<dyn RdpNegotiator>) -> Self {
        self.rdp_negotiator = Some(negotiator);
        self
    }

    pub fn with_telnet_dialer(mut self, dialer: Arc<dyn TelnetDialer>) -> Self {
        self.telnet_dialer = Some(dialer);
        self
    }

    pub fn config(&self) -> &CrackerConfig {
        &self.config
    }

    fn bind(&self, kind: CheckerKind) -> Checker {
        Checker::new(kind, self.deps.clone())
    }

    /// Checker for a service that needs no per-target state.
    pub fn stateless(&self, service: Service) -> Result<Checker, DispatchError> {
        let kind = match service {
            Service::Ftp => CheckerKind::Ftp {
                anomaly: self.config.ftp_anomaly,
            },
            Service::Ssh => CheckerKind::Ssh,
            Service::Mysql => CheckerKind::Mysql,
            Service::Mssql => CheckerKind::Mssql,
            Service::Postgresql => CheckerKind::Postgresql,
            Service::Mongodb => CheckerKind::Mongodb,
            Service::Redis => CheckerKind::Redis,
            Service::Smb => CheckerKind::Smb {
                domain: self.config.domain.clone(),
            },
            Service::Telnet | Service::Oracle | Service::Rdp => {
                return Err(DispatchError::NeedsBinding(service))
            }
        };
        Ok(self.bind(kind))
    }

    pub fn rdp(&self, protocol: RdpProtocol) -> Checker {
        self.bind(CheckerKind::Rdp {
            protocol,
            domain: self.config.domain.clone(),
        })
    }

    pub fn telnet(&self, server_type: TelnetServerType) -> Checker {
        self.bind(CheckerKind::Telnet { server_type })
    }

    pub fn oracle(&self, sid: impl Into<String>) -> Checker {
        self.bind(CheckerKind::Oracle { sid: sid.into() })
    }

    /// Fingerprint the target if the service needs it and bind a checker.
    /// The probe runs once here, never per credential.
    pub async fn for_target(&self, service: Service, host: &str, port: u16) -> Result<Checker, DispatchError> {
        let checker = match service {
            Service::Rdp => {
                let negotiator = self
                    .rdp_negotiator
                    .as_ref()
                    .ok_or(DispatchError::MissingProbe(service))?;
                self.rdp(probe_rdp(negotiator.as_ref(), host, port).await)
            }
            Service::Telnet => {
                let dialer = self
                    .telnet_dialer
                    .as_ref()
                    .ok_or(DispatchError::MissingProbe(service))?;
                self.telnet(probe_telnet(dialer.as_ref(), host, port).await)
            }
            Service::Oracle => self.oracle(self.config.oracle_sid.clone()),
            other => self.stateless(other)?,
        };

        tracing::debug!("bound {:?} for {}:{}", checker.kind(), host, port);
        Ok(checker)
    }
}
