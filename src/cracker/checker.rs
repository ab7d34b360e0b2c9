use std::sync::Arc;

use crate::auth::{AuthInfo, PasswordMaker};
use crate::config::AnomalyPolicy;
use crate::cracker::fingerprint::{RdpProtocol, TelnetServerType};
use crate::cracker::primitives::{CheckOutcome, ProtocolChecks};
use crate::cracker::reporter::{report_anomaly, DiagnosticSink};
use crate::service::Service;

pub const SID_KEY: &str = "SID";

/// A checker variant together with the target state it was bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckerKind {
    Ftp { anomaly: AnomalyPolicy },
    Ssh,
    Telnet { server_type: TelnetServerType },
    Mysql,
    Mssql,
    Postgresql,
    Oracle { sid: String },
    Mongodb,
    Redis,
    Smb { domain: String },
    Rdp { protocol: RdpProtocol, domain: String },
}

impl CheckerKind {
    pub fn service(&self) -> Service {
        match self {
            CheckerKind::Ftp { .. } => Service::Ftp,
            CheckerKind::Ssh => Service::Ssh,
            CheckerKind::Telnet { .. } => Service::Telnet,
            CheckerKind::Mysql => Service::Mysql,
            CheckerKind::Mssql => Service::Mssql,
            CheckerKind::Postgresql => Service::Postgresql,
            CheckerKind::Oracle { .. } => Service::Oracle,
            CheckerKind::Mongodb => Service::Mongodb,
            CheckerKind::Redis => Service::Redis,
            CheckerKind::Smb { .. } => Service::Smb,
            CheckerKind::Rdp { .. } => Service::Rdp,
        }
    }

    pub fn anomaly_policy(&self) -> AnomalyPolicy {
        match self {
            CheckerKind::Ftp { anomaly } => *anomaly,
            _ => AnomalyPolicy::Discard,
        }
    }
}

/// Result of one login attempt. Only `Confirmed` records have `status` set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    Confirmed(AuthInfo),
    Rejected(AuthInfo),
}

impl Attempt {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Attempt::Confirmed(_))
    }

    pub fn record(&self) -> &AuthInfo {
        match self {
            Attempt::Confirmed(info) | Attempt::Rejected(info) => info,
        }
    }

    pub fn into_record(self) -> AuthInfo {
        match self {
            Attempt::Confirmed(info) | Attempt::Rejected(info) => info,
        }
    }

    pub fn into_confirmed(self) -> Option<AuthInfo> {
        match self {
            Attempt::Confirmed(info) => Some(info),
            Attempt::Rejected(_) => None,
        }
    }
}

#[derive(Clone)]
pub(crate) struct Collaborators {
    pub(crate) checks: Arc<dyn ProtocolChecks>,
    pub(crate) passwords: Arc<dyn PasswordMaker>,
    pub(crate) sink: Arc<dyn DiagnosticSink>,
}

/// A checker bound to one service (and, where needed, one target's
/// fingerprint). Cheap to clone and safe to share between tasks.
#[derive(Clone)]
pub struct Checker {
    kind: CheckerKind,
    deps: Arc<Collaborators>,
}

impl std::fmt::Debug for Checker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checker").field("kind", &self.kind).finish()
    }
}

impl Checker {
    pub(crate) fn new(kind: CheckerKind, deps: Arc<Collaborators>) -> Self {
        Self { kind, deps }
    }

    pub fn kind(&self) -> &CheckerKind {
        &self.kind
    }

    pub fn service(&self) -> Service {
        self.kind.service()
    }

    /// Attempt one login and hand the record back either way, so a rejected
    /// record still shows the password and extras that were tried.
    pub async fn attempt(&self, mut info: AuthInfo) -> Attempt {
        self.deps.passwords.make_password(&mut info.auth);
        if let CheckerKind::Oracle { sid } = &self.kind {
            info.auth.other.insert(SID_KEY.to_string(), sid.clone());
        }

        let outcome = self.call_primitive(&info).await;
        if !outcome.authenticated {
            return Attempt::Rejected(info);
        }

        if let Some(error) = outcome.error {
            report_anomaly(self.deps.sink.as_ref(), self.service(), &info, &error);
            if self.kind.anomaly_policy() == AnomalyPolicy::Discard {
                return Attempt::Rejected(info);
            }
        }

        info.status = true;
        Attempt::Confirmed(info)
    }

    /// Returns the record with `status` set on a confirmed success and
    /// `None` otherwise.
    pub async fn check(&self, info: AuthInfo) -> Option<AuthInfo> {
        self.attempt(info).await.into_confirmed()
    }

    async fn call_primitive(&self, info: &AuthInfo) -> CheckOutcome {
        let checks = self.deps.checks.as_ref();
        let host = info.ip_addr.as_str();
        let username = info.auth.username.as_str();
        let password = info.auth.password.as_str();
        let port = info.port;

        match &self.kind {
            CheckerKind::Ftp { .. } => checks.ftp(host, username, password, port).await,
            CheckerKind::Ssh => checks.ssh(host, username, password, port).await,
            CheckerKind::Telnet { server_type } => {
                checks.telnet(host, username, password, port, *server_type).await
            }
            CheckerKind::Mysql => checks.mysql(host, username, password, port).await,
            CheckerKind::Mssql => checks.mssql(host, username, password, port).await,
            CheckerKind::Postgresql => checks.postgresql(host, username, password, port).await,
            CheckerKind::Oracle { sid } => checks.oracle(host, username, password, port, sid).await,
            CheckerKind::Mongodb => checks.mongodb(host, username, password, port).await,
            CheckerKind::Redis => checks.redis(host, password, port).await,
            CheckerKind::Smb { domain } => checks.smb(host, domain, username, password, port).await,
            CheckerKind::Rdp { protocol, domain } => {
                checks.rdp(host, domain, username, password, port, *protocol).await
            }
        }
    }
}
