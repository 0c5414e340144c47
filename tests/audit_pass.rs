use appaudit::{audit, AuditSnapshot, AuditorConfig, CheckId, Severity};
use appaudit_types::{
    Application, AuditContext, Container, Instance, Node, RedisInstance, TimeSeries,
};

const NAN: f64 = f64::NAN;

fn ctx() -> AuditContext {
    AuditContext::new(1_700_000_000, 60, 3)
}

fn ts(values: &[f64]) -> TimeSeries {
    TimeSeries::new(values.to_vec())
}

fn container(name: &str, last_usage: f64, limit: f64) -> Container {
    Container::new(name)
        .cpu_usage(ts(&[0.2, 0.3, last_usage]))
        .cpu_limit(ts(&[limit, limit, limit]))
        .cpu_delay(ts(&[0.0, 0.01, 0.02]))
        .throttled_time(ts(&[0.0, 0.0, 0.1]))
}

#[test]
fn container_above_threshold_is_flagged() {
    let app = Application::new("checkout")
        .instance(Instance::new("checkout-1").container(container("app", 0.9, 1.0)));

    let report = audit(&ctx(), &app, &AuditorConfig::default());
    let check = report.check(CheckId::ContainerCpu).unwrap();
    assert_eq!(check.severity, Severity::Warning);
    assert_eq!(check.message, "high CPU usage of 1 container");
}

#[test]
fn redis_without_liveness_is_down_despite_healthy_metrics() {
    let redis = RedisInstance::new()
        .up(ts(&[1.0, 1.0, 0.0]))
        .role("master")
        .command("get", ts(&[100.0, 100.0, 100.0]), ts(&[0.1, 0.1, 0.1]));
    let app = Application::new("cache").instance(
        Instance::new("redis-0")
            .container(container("redis", 0.1, 1.0))
            .redis(redis),
    );

    let report = audit(&ctx(), &app, &AuditorConfig::default());
    let status = report.tables[0].rows[0][2].status.as_ref().unwrap();
    assert_eq!(status.severity, Severity::Warning);
    assert_eq!(status.message, "down (no metrics)");
    assert_eq!(
        report.check(CheckId::ContainerCpu).unwrap().severity,
        Severity::Ok
    );
}

#[test]
fn misaligned_redis_calls_do_not_skew_latency() {
    let redis = RedisInstance::new()
        .up(ts(&[1.0, 1.0, 1.0]))
        .command("get", ts(&[1.0]), ts(&[1.0, 1.0, 1.0]))
        .command("set", ts(&[10.0, 10.0, 10.0]), ts(&[1.0, 1.0, 1.0]));
    let app = Application::new("cache").instance(Instance::new("redis-0").redis(redis));

    let report = audit(&ctx(), &app, &AuditorConfig::default());
    let latency = report
        .charts
        .iter()
        .find(|c| c.key.title == "Redis latency, seconds")
        .and_then(|c| c.get("redis-0"))
        .unwrap();
    assert_eq!(latency, &ts(&[0.1, 0.1, 0.1]));
}

#[test]
fn two_overloaded_containers_use_plural() {
    let app = Application::new("checkout").instance(
        Instance::new("checkout-1")
            .container(container("app", 0.95, 1.0))
            .container(container("sidecar", 0.5, 0.5)),
    );

    let report = audit(&ctx(), &app, &AuditorConfig::default());
    let check = report.check(CheckId::ContainerCpu).unwrap();
    assert_eq!(check.severity, Severity::Warning);
    assert_eq!(check.message, "high CPU usage of 2 containers");
}

#[test]
fn configured_threshold_applies() {
    let mut config = AuditorConfig::default();
    config.checks.container_cpu.threshold = 95.0;
    let app = Application::new("checkout")
        .instance(Instance::new("checkout-1").container(container("app", 0.9, 1.0)));

    let report = audit(&ctx(), &app, &config);
    assert_eq!(
        report.check(CheckId::ContainerCpu).unwrap().severity,
        Severity::Ok
    );
}

#[test]
fn audit_is_idempotent() {
    let node = Node::new("node-a")
        .cpu_usage_percent(ts(&[70.0, 85.0, 90.0]))
        .cpu_capacity(ts(&[4.0, 4.0, 4.0]))
        .cpu_mode("user", ts(&[50.0, 60.0, 70.0]))
        .cpu_consumer("checkout", ts(&[1.0, 2.0, 3.0]));
    let app = Application::new("checkout")
        .instance(
            Instance::new("checkout-1")
                .container(container("app", 0.9, 1.0))
                .node(node.clone()),
        )
        .instance(
            Instance::new("checkout-2")
                .container(container("app", NAN, 1.0))
                .node(node),
        );
    let config = AuditorConfig::default();

    let first = audit(&ctx(), &app, &config);
    let second = audit(&ctx(), &app, &config);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn degraded_snapshot_still_produces_a_report() {
    let snapshot = AuditSnapshot::parse(
        r#"{
            "context": { "from": 1700000000, "step": 60, "points": 3 },
            "applications": [{
                "name": "legacy",
                "instances": [
                    { "name": "legacy-1", "containers": [{ "name": "app" }] },
                    {
                        "name": "legacy-2",
                        "containers": [
                            {
                                "name": "app",
                                "cpu_usage": [null, null, null],
                                "cpu_limit": [0, 0, 0]
                            },
                            { "name": "short", "cpu_usage": [0.1], "cpu_limit": [1.0] }
                        ],
                        "node": { "name": "node-b" },
                        "redis": { "calls": { "get": [1, 2, 3] } }
                    }
                ]
            }]
        }"#,
    )
    .unwrap();

    let report = audit(
        &snapshot.context,
        &snapshot.applications[0],
        &AuditorConfig::default(),
    );

    assert_eq!(
        report.check(CheckId::ContainerCpu).unwrap().severity,
        Severity::Ok
    );
    assert_eq!(report.check(CheckId::NodeCpu).unwrap().severity, Severity::Ok);
    assert_eq!(
        report.check(CheckId::RedisAvailability).unwrap().message,
        "1 Redis instance down"
    );
    // every charted value is either a sample or missing
    for chart in &report.charts {
        for series in &chart.series {
            assert_eq!(series.data.len(), 3);
            assert!(series.data.iter().all(|v| v.is_nan() || v.is_finite()));
        }
    }
}
