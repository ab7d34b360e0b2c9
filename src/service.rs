use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DispatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Ftp,
    Ssh,
    Telnet,
    Mysql,
    Mssql,
    Postgresql,
    Oracle,
    Mongodb,
    Redis,
    Smb,
    Rdp,
}

impl Service {
    pub const ALL: [Service; 11] = [
        Service::Ftp,
        Service::Ssh,
        Service::Telnet,
        Service::Mysql,
        Service::Mssql,
        Service::Postgresql,
        Service::Oracle,
        Service::Mongodb,
        Service::Redis,
        Service::Smb,
        Service::Rdp,
    ];

    pub fn default_port(&self) -> u16 {
        match self {
            Service::Ftp => 21,
            Service::Ssh => 22,
            Service::Telnet => 23,
            Service::Mysql => 3306,
            Service::Mssql => 1433,
            Service::Postgresql => 5432,
            Service::Oracle => 1521,
            Service::Mongodb => 27017,
            Service::Redis => 6379,
            Service::Smb => 445,
            Service::Rdp => 3389,
        }
    }

    /// URL scheme used when a credential/target pair is written to the log.
    pub fn scheme(&self) -> &'static str {
        match self {
            Service::Postgresql => "postgres",
            other => other.name(),
        }
    }

    /// Services whose checker depends on a per-target fingerprint.
    /// Oracle is bound to a SID instead and needs no network round trip.
    pub fn requires_probe(&self) -> bool {
        matches!(self, Service::Rdp | Service::Telnet)
    }

    /// Services with no stateless checker: every fingerprinted service plus
    /// Oracle.
    pub fn requires_binding(&self) -> bool {
        self.requires_probe() || *self == Service::Oracle
    }

    fn name(&self) -> &'static str {
        match self {
            Service::Ftp => "ftp",
            Service::Ssh => "ssh",
            Service::Telnet => "telnet",
            Service::Mysql => "mysql",
            Service::Mssql => "mssql",
            Service::Postgresql => "postgresql",
            Service::Oracle => "oracle",
            Service::Mongodb => "mongodb",
            Service::Redis => "redis",
            Service::Smb => "smb",
            Service::Rdp => "rdp",
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Service {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let service = match s.trim().to_ascii_lowercase().as_str() {
            "ftp" => Service::Ftp,
            "ssh" => Service::Ssh,
            "telnet" => Service::Telnet,
            "mysql" => Service::Mysql,
            "mssql" | "sqlserver" => Service::Mssql,
            "postgresql" | "postgres" | "pgsql" => Service::Postgresql,
            "oracle" => Service::Oracle,
            "mongodb" | "mongo" => Service::Mongodb,
            "redis" => Service::Redis,
            "smb" | "cifs" => Service::Smb,
            "rdp" => Service::Rdp,
            _ => return Err(DispatchError::UnknownService(s.to_string())),
        };
        Ok(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("postgres".parse::<Service>().unwrap(), Service::Postgresql);
        assert_eq!("PgSQL".parse::<Service>().unwrap(), Service::Postgresql);
        assert_eq!(" mongo ".parse::<Service>().unwrap(), Service::Mongodb);
        assert_eq!("SQLServer".parse::<Service>().unwrap(), Service::Mssql);
        assert_eq!("cifs".parse::<Service>().unwrap(), Service::Smb);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "vnc".parse::<Service>().unwrap_err();
        assert!(matches!(err, DispatchError::UnknownService(ref name) if name == "vnc"));
        assert!("3389".parse::<Service>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for service in Service::ALL {
            assert_eq!(service.to_string().parse::<Service>().unwrap(), service);
        }
    }

    #[test]
    fn test_scheme() {
        assert_eq!(Service::Postgresql.scheme(), "postgres");
        assert_eq!(Service::Mongodb.scheme(), "mongodb");
        assert_eq!(Service::Rdp.scheme(), "rdp");
    }

    #[test]
    fn test_default_ports() {
        assert_eq!(Service::Ssh.default_port(), 22);
        assert_eq!(Service::Oracle.default_port(), 1521);
        assert_eq!(Service::Rdp.default_port(), 3389);
        assert_eq!(Service::Redis.default_port(), 6379);
    }

    #[test]
    fn test_requires_probe() {
        let probed: Vec<_> = Service::ALL.iter().filter(|s| s.requires_probe()).collect();
        assert_eq!(probed, vec![&Service::Telnet, &Service::Rdp]);
    }

    #[test]
    fn test_requires_binding() {
        let bound: Vec<_> = Service::ALL.iter().filter(|s| s.requires_binding()).collect();
        assert_eq!(bound, vec![&Service::Telnet, &Service::Oracle, &Service::Rdp]);
        assert!(Service::ALL.iter().filter(|s| s.requires_probe()).all(|s| s.requires_binding()));
    }
}
