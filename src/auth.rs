use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Candidate credential for a single attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth {
    pub username: String,
    pub password: String,
    /// Protocol-specific extras, e.g. the Oracle `SID`.
    #[serde(default)]
    pub other: HashMap<String, String>,
}

impl Auth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            other: HashMap::new(),
        }
    }

    /// Password-only credential, as used by Redis.
    pub fn password_only(password: impl Into<String>) -> Self {
        Self::new(String::new(), password)
    }
}

/// One verification attempt against one target.
///
/// Built by the engine for each `(target, candidate)` pair and handed to a
/// checker by value. `status` is set only on confirmed successes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthInfo {
    pub ip_addr: String,
    pub port: u16,
    pub auth: Auth,
    pub status: bool,
}

impl AuthInfo {
    pub fn new(ip_addr: impl Into<String>, port: u16, auth: Auth) -> Self {
        Self {
            ip_addr: ip_addr.into(),
            port,
            auth,
            status: false,
        }
    }

    pub fn target(&self) -> String {
        format!("{}:{}", self.ip_addr, self.port)
    }
}

/// Turns a candidate password into the concrete value sent on the wire.
///
/// Checkers call this exactly once per attempt, before any network traffic.
pub trait PasswordMaker: Send + Sync {
    fn make_password(&self, auth: &mut Auth);
}

/// Expands `%user%` in the password to the username.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserPlaceholder;

impl UserPlaceholder {
    pub const PLACEHOLDER: &'static str = "%user%";
}

impl PasswordMaker for UserPlaceholder {
    fn make_password(&self, auth: &mut Auth) {
        if auth.username.is_empty() || !auth.password.contains(Self::PLACEHOLDER) {
            return;
        }
        auth.password = auth.password.replace(Self::PLACEHOLDER, &auth.username);
    }
}
