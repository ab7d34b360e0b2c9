use authscope::cracker::mock::{MockChecks, MockRdpNegotiator, MockTelnetDialer, RecordingSink, Verdict};
use authscope::{
    AnomalyPolicy, Auth, AuthInfo, CheckerKind, Cracker, CrackerConfig, RdpProtocol, Service,
    TelnetServerType,
};
use futures::future::join_all;
use std::sync::Arc;

fn setup(verdict: Verdict) -> (Cracker, Arc<MockChecks>, Arc<RecordingSink>) {
    let checks = Arc::new(MockChecks::new(verdict));
    let sink = Arc::new(RecordingSink::default());
    let cracker = Cracker::new(checks.clone()).with_sink(sink.clone());
    (cracker, checks, sink)
}

#[tokio::test]
async fn test_ssh_confirmed_login() {
    let (cracker, checks, _) = setup(Verdict::Success);
    let checker = cracker.stateless(Service::Ssh).unwrap();

    let info = checker
        .check(AuthInfo::new("10.0.0.5", 22, Auth::new("root", "toor")))
        .await
        .expect("ssh login confirmed");

    assert!(info.status);
    assert_eq!(info.auth.username, "root");
    assert_eq!(info.ip_addr, "10.0.0.5");
    assert_eq!(checks.calls().len(), 1);
}

#[tokio::test]
async fn test_mysql_wrong_password() {
    let (cracker, _, sink) = setup(Verdict::Denied);
    let checker = cracker.stateless(Service::Mysql).unwrap();

    let result = checker
        .check(AuthInfo::new("10.0.0.5", 3306, Auth::new("root", "wrongpass")))
        .await;

    assert!(result.is_none());
    assert!(sink.entries().is_empty());
}

#[tokio::test]
async fn test_oracle_sid_on_success() {
    let (cracker, _, _) = setup(Verdict::Success);
    let checker = cracker.oracle("ORCL");

    let info = checker
        .check(AuthInfo::new("10.0.0.9", 1521, Auth::new("system", "manager")))
        .await
        .expect("oracle login confirmed");

    assert!(info.status);
    assert_eq!(info.auth.other.get("SID").map(String::as_str), Some("ORCL"));
}

#[tokio::test]
async fn test_oracle_sid_overrides_prepopulated_value() {
    let (cracker, checks, _) = setup(Verdict::Denied);
    let checker = cracker.oracle("ORCL");

    for password in ["manager", "oracle", "change_on_install"] {
        let mut auth = Auth::new("system", password);
        auth.other.insert("SID".to_string(), "XE".to_string());
        assert!(checker.check(AuthInfo::new("10.0.0.9", 1521, auth)).await.is_none());
    }

    checks.set_verdict(Verdict::Success);
    let mut auth = Auth::new("system", "welcome1");
    auth.other.insert("SID".to_string(), "XE".to_string());
    let info = checker.check(AuthInfo::new("10.0.0.9", 1521, auth)).await.unwrap();
    assert_eq!(info.auth.other["SID"], "ORCL");

    let sids: Vec<_> = checks.calls().into_iter().map(|c| c.extra).collect();
    assert_eq!(sids, vec![Some("ORCL".to_string()); 4]);
}

#[tokio::test]
async fn test_rdp_probed_once_per_target() {
    let negotiator = Arc::new(MockRdpNegotiator::new(RdpProtocol::Hybrid));
    let (cracker, checks, _) = setup(Verdict::Denied);
    let cracker = cracker.with_rdp_negotiator(negotiator.clone());

    let checker = cracker.for_target(Service::Rdp, "10.0.0.4", 3389).await.unwrap();
    for (user, pass) in [("administrator", "admin"), ("admin", "123456"), ("guest", "")] {
        checker.check(AuthInfo::new("10.0.0.4", 3389, Auth::new(user, pass))).await;
    }

    assert_eq!(negotiator.targets().len(), 1);
    let protocols: Vec<_> = checks.calls().into_iter().map(|c| c.extra).collect();
    assert_eq!(protocols, vec![Some("PROTOCOL_HYBRID".to_string()); 3]);
}

#[tokio::test]
async fn test_closed_telnet_still_dispatches() {
    let dialer = Arc::new(MockTelnetDialer::refusing());
    let (cracker, checks, _) = setup(Verdict::Denied);
    let cracker = cracker.with_telnet_dialer(dialer.clone());

    let checker = cracker.for_target(Service::Telnet, "10.0.0.8", 23).await.unwrap();
    assert_eq!(checker.kind(), &CheckerKind::Telnet { server_type: TelnetServerType::Closed });
    assert_eq!(dialer.stats().server_type_queries, 0);

    assert!(checker.check(AuthInfo::new("10.0.0.8", 23, Auth::new("root", "root"))).await.is_none());
    assert_eq!(checks.calls()[0].extra.as_deref(), Some("Closed"));
}

#[tokio::test]
async fn test_ftp_anomaly_follows_config() {
    let (cracker, _, sink) = setup(Verdict::Anomaly);
    let trusting = cracker.stateless(Service::Ftp).unwrap();
    let info = trusting
        .check(AuthInfo::new("10.0.0.5", 21, Auth::new("anonymous", "anonymous")))
        .await
        .expect("default policy keeps anomalous ftp success");
    assert!(info.status);

    let cracker = cracker.with_config(CrackerConfig {
        ftp_anomaly: AnomalyPolicy::Discard,
        ..CrackerConfig::default()
    });
    let strict = cracker.stateless(Service::Ftp).unwrap();
    assert!(strict
        .check(AuthInfo::new("10.0.0.5", 21, Auth::new("anonymous", "anonymous")))
        .await
        .is_none());

    assert_eq!(sink.entries().len(), 2);
}

#[tokio::test]
async fn test_redis_password_only() {
    let (cracker, checks, _) = setup(Verdict::Success);
    let checker = cracker.stateless(Service::Redis).unwrap();

    let info = checker
        .check(AuthInfo::new("10.0.0.3", 6379, Auth::password_only("foobared")))
        .await
        .unwrap();

    assert!(info.status);
    assert!(info.auth.username.is_empty());
    assert_eq!(checks.calls()[0].username, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_checker_across_tasks() {
    let negotiator = Arc::new(MockRdpNegotiator::new(RdpProtocol::Ssl));
    let (cracker, checks, _) = setup(Verdict::Success);
    let cracker = cracker.with_rdp_negotiator(negotiator.clone());
    let checker = cracker.for_target(Service::Rdp, "10.0.0.4", 3389).await.unwrap();

    let tasks = (0..32).map(|i| {
        let checker = checker.clone();
        tokio::spawn(async move {
            let auth = Auth::new(format!("user{}", i), "%user%!");
            checker.check(AuthInfo::new("10.0.0.4", 3389, auth)).await
        })
    });

    let results = join_all(tasks).await;
    for (i, result) in results.into_iter().enumerate() {
        let info = result.unwrap().expect("mock confirms every login");
        assert!(info.status);
        assert_eq!(info.auth.password, format!("user{}!", i));
    }

    assert_eq!(negotiator.targets().len(), 1);
    assert_eq!(checks.calls().len(), 32);
}

#[tokio::test]
async fn test_for_target_parses_service_names() {
    let (cracker, _, _) = setup(Verdict::Denied);
    for name in ["postgres", "mongo", "smb", "ftp"] {
        let service: Service = name.parse().unwrap();
        let checker = cracker.for_target(service, "10.0.0.1", service.default_port()).await.unwrap();
        assert_eq!(checker.service(), service);
    }
}

#[tokio::test]
async fn test_oracle_rejected_record_carries_sid() {
    let (cracker, checks, sink) = setup(Verdict::Denied);
    let checker = cracker.oracle("ORCL");

    let input = AuthInfo::new("10.0.0.9", 1521, Auth::new("system", "wrongpass"));
    let denied = checker.attempt(input.clone()).await;
    assert!(!denied.is_confirmed());
    assert_eq!(denied.record().auth.other.get("SID").map(String::as_str), Some("ORCL"));

    checks.set_verdict(Verdict::Anomaly);
    let anomalous = checker.attempt(input).await;
    assert!(!anomalous.is_confirmed());
    assert_eq!(anomalous.record().auth.other.get("SID").map(String::as_str), Some("ORCL"));
    assert_eq!(sink.entries().len(), 1);
}
