//! In-memory collaborators for exercising checkers without live services.
//!
//! Every mock records what it was asked so tests (and dry runs of an
//! engine) can assert on call counts, arguments and ordering.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::Level;

use crate::auth::{Auth, PasswordMaker, UserPlaceholder};
use crate::cracker::fingerprint::{RdpProtocol, TelnetServerType};
use crate::cracker::primitives::{
    CheckOutcome, ProtocolChecks, RdpNegotiator, TelnetClient, TelnetDialer,
};
use crate::cracker::reporter::DiagnosticSink;
use crate::error::{CheckError, ProbeError};
use crate::service::Service;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn record(&self, entry: impl Into<String>) {
        lock(self.0.as_ref()).push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        lock(self.0.as_ref()).clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Denied,
    Success,
    /// Success with an error attached.
    Anomaly,
}

/// Arguments of one primitive call. `username`, `domain` and `extra` are
/// `None` for primitives that do not take them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub service: Service,
    pub host: String,
    pub domain: Option<String>,
    pub username: Option<String>,
    pub password: String,
    pub port: u16,
    pub extra: Option<String>,
}

impl MockCall {
    fn new(service: Service, host: &str, username: Option<&str>, password: &str, port: u16) -> Self {
        Self {
            service,
            host: host.to_string(),
            domain: None,
            username: username.map(str::to_string),
            password: password.to_string(),
            port,
            extra: None,
        }
    }

    fn domain(mut self, domain: &str) -> Self {
        self.domain = Some(domain.to_string());
        self
    }

    fn extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }
}

pub struct MockChecks {
    verdict: Mutex<Verdict>,
    calls: Mutex<Vec<MockCall>>,
    journal: Journal,
}

impl MockChecks {
    pub fn new(verdict: Verdict) -> Self {
        Self::with_journal(verdict, Journal::default())
    }

    pub fn with_journal(verdict: Verdict, journal: Journal) -> Self {
        Self {
            verdict: Mutex::new(verdict),
            calls: Mutex::new(Vec::new()),
            journal,
        }
    }

    pub fn set_verdict(&self, verdict: Verdict) {
        *lock(&self.verdict) = verdict;
    }

    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    fn answer(&self, call: MockCall) -> CheckOutcome {
        self.journal.record(format!("check:{}", call.service));
        lock(&self.calls).push(call);
        match *lock(&self.verdict) {
            Verdict::Denied => CheckOutcome::denied(),
            Verdict::Success => CheckOutcome::success(),
            Verdict::Anomaly => CheckOutcome::anomaly(CheckError::Protocol("mock anomaly".to_string())),
        }
    }
}

#[async_trait]
impl ProtocolChecks for MockChecks {
    async fn ftp(&self, host: &str, username: &str, password: &str, port: u16) -> CheckOutcome {
        self.answer(MockCall::new(Service::Ftp, host, Some(username), password, port))
    }

    async fn ssh(&self, host: &str, username: &str, password: &str, port: u16) -> CheckOutcome {
        self.answer(MockCall::new(Service::Ssh, host, Some(username), password, port))
    }

    async fn telnet(
        &self,
        host: &str,
        username: &str,
        password: &str,
        port: u16,
        server_type: TelnetServerType,
    ) -> CheckOutcome {
        self.answer(
            MockCall::new(Service::Telnet, host, Some(username), password, port)
                .extra(format!("{:?}", server_type)),
        )
    }

    async fn mysql(&self, host: &str, username: &str, password: &str, port: u16) -> CheckOutcome {
        self.answer(MockCall::new(Service::Mysql, host, Some(username), password, port))
    }

    async fn mssql(&self, host: &str, username: &str, password: &str, port: u16) -> CheckOutcome {
        self.answer(MockCall::new(Service::Mssql, host, Some(username), password, port))
    }

    async fn postgresql(&self, host: &str, username: &str, password: &str, port: u16) -> CheckOutcome {
        self.answer(MockCall::new(Service::Postgresql, host, Some(username), password, port))
    }

    async fn oracle(
        &self,
        host: &str,
        username: &str,
        password: &str,
        port: u16,
        sid: &str,
    ) -> CheckOutcome {
        self.answer(MockCall::new(Service::Oracle, host, Some(username), password, port).extra(sid))
    }

    async fn mongodb(&self, host: &str, username: &str, password: &str, port: u16) -> CheckOutcome {
        self.answer(MockCall::new(Service::Mongodb, host, Some(username), password, port))
    }

    async fn redis(&self, host: &str, password: &str, port: u16) -> CheckOutcome {
        self.answer(MockCall::new(Service::Redis, host, None, password, port))
    }

    async fn smb(
        &self,
        host: &str,
        domain: &str,
        username: &str,
        password: &str,
        port: u16,
    ) -> CheckOutcome {
        self.answer(MockCall::new(Service::Smb, host, Some(username), password, port).domain(domain))
    }

    async fn rdp(
        &self,
        host: &str,
        domain: &str,
        username: &str,
        password: &str,
        port: u16,
        protocol: RdpProtocol,
    ) -> CheckOutcome {
        self.answer(
            MockCall::new(Service::Rdp, host, Some(username), password, port)
                .domain(domain)
                .extra(protocol.to_string()),
        )
    }
}

/// Counts invocations and delegates to [`UserPlaceholder`].
#[derive(Default)]
pub struct MockPasswordMaker {
    calls: Mutex<usize>,
    journal: Journal,
}

impl MockPasswordMaker {
    pub fn with_journal(journal: Journal) -> Self {
        Self {
            calls: Mutex::new(0),
            journal,
        }
    }

    pub fn calls(&self) -> usize {
        *lock(&self.calls)
    }
}

impl PasswordMaker for MockPasswordMaker {
    fn make_password(&self, auth: &mut Auth) {
        *lock(&self.calls) += 1;
        self.journal.record("make_password");
        UserPlaceholder.make_password(auth);
    }
}

#[derive(Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<(Level, String)>>,
}

impl RecordingSink {
    pub fn entries(&self) -> Vec<(Level, String)> {
        lock(&self.entries).clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn log(&self, level: Level, message: String) {
        lock(&self.entries).push((level, message));
    }
}

pub struct MockRdpNegotiator {
    protocol: RdpProtocol,
    targets: Mutex<Vec<String>>,
}

impl MockRdpNegotiator {
    pub fn new(protocol: RdpProtocol) -> Self {
        Self {
            protocol,
            targets: Mutex::new(Vec::new()),
        }
    }

    pub fn targets(&self) -> Vec<String> {
        lock(&self.targets).clone()
    }
}

#[async_trait]
impl RdpNegotiator for MockRdpNegotiator {
    async fn verify_protocol(&self, target: &str) -> RdpProtocol {
        lock(&self.targets).push(target.to_string());
        self.protocol
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TelnetStats {
    pub dials: usize,
    pub connects: usize,
    pub server_type_queries: usize,
    pub closes: usize,
    pub drops: usize,
}

/// Hands out clients that either refuse to connect or report a fixed
/// server type.
pub struct MockTelnetDialer {
    answer: Option<TelnetServerType>,
    hang: bool,
    stats: Arc<Mutex<TelnetStats>>,
}

impl MockTelnetDialer {
    pub fn refusing() -> Self {
        Self {
            answer: None,
            hang: false,
            stats: Arc::default(),
        }
    }

    pub fn answering(server_type: TelnetServerType) -> Self {
        Self {
            answer: Some(server_type),
            hang: false,
            stats: Arc::default(),
        }
    }

    /// Connects, then never answers the server type query.
    pub fn hanging() -> Self {
        Self {
            answer: Some(TelnetServerType::UsernameAndPassword),
            hang: true,
            stats: Arc::default(),
        }
    }

    pub fn stats(&self) -> TelnetStats {
        *lock(self.stats.as_ref())
    }
}

impl TelnetDialer for MockTelnetDialer {
    fn client(&self, host: &str, port: u16) -> Box<dyn TelnetClient> {
        lock(self.stats.as_ref()).dials += 1;
        Box::new(MockTelnetClient {
            target: format!("{}:{}", host, port),
            answer: self.answer,
            hang: self.hang,
            stats: self.stats.clone(),
        })
    }
}

struct MockTelnetClient {
    target: String,
    answer: Option<TelnetServerType>,
    hang: bool,
    stats: Arc<Mutex<TelnetStats>>,
}

impl Drop for MockTelnetClient {
    fn drop(&mut self) {
        lock(self.stats.as_ref()).drops += 1;
    }
}

#[async_trait]
impl TelnetClient for MockTelnetClient {
    async fn connect(&mut self) -> Result<(), ProbeError> {
        lock(self.stats.as_ref()).connects += 1;
        match self.answer {
            Some(_) => Ok(()),
            None => Err(ProbeError::Refused(self.target.clone())),
        }
    }

    async fn make_server_type(&mut self) -> TelnetServerType {
        lock(self.stats.as_ref()).server_type_queries += 1;
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.answer.unwrap_or(TelnetServerType::Closed)
    }

    async fn close(&mut self) {
        lock(self.stats.as_ref()).closes += 1;
    }
}
