use tracing::Level;

use crate::auth::AuthInfo;
use crate::error::CheckError;
use crate::service::Service;

pub trait DiagnosticSink: Send + Sync {
    fn log(&self, level: Level, message: String);
}

/// Forwards diagnostics to `tracing` under the `authscope::anomaly` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log(&self, level: Level, message: String) {
        match level {
            Level::ERROR => tracing::error!(target: "authscope::anomaly", "{}", message),
            Level::WARN => tracing::warn!(target: "authscope::anomaly", "{}", message),
            Level::INFO => tracing::info!(target: "authscope::anomaly", "{}", message),
            Level::DEBUG => tracing::debug!(target: "authscope::anomaly", "{}", message),
            _ => tracing::trace!(target: "authscope::anomaly", "{}", message),
        }
    }
}

pub(crate) fn anomaly_message(service: Service, info: &AuthInfo, error: &CheckError) -> String {
    match service {
        Service::Redis => format!(
            "redis://{}:{}/auth:{},{}",
            info.ip_addr, info.port, info.auth.password, error
        ),
        _ => format!(
            "{}://{}:{}@{}:{}:{}",
            service.scheme(),
            info.auth.username,
            info.auth.password,
            info.ip_addr,
            info.port,
            error
        ),
    }
}

/// Log a success that came back with an error attached.
pub fn report_anomaly(sink: &dyn DiagnosticSink, service: Service, info: &AuthInfo, error: &CheckError) {
    sink.log(Level::DEBUG, anomaly_message(service, info, error));
}
