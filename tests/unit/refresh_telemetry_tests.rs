use healthy_route_client::telemetry::refresh::RefreshTelemetry;

#[test]
fn telemetry_preserves_context_and_id() {
    let telemetry = RefreshTelemetry::new("ctx");
    assert_eq!(telemetry.context(), "ctx");
    let first = telemetry.attempt_id();
    assert_eq!(first, telemetry.attempt_id());
}

#[test]
fn each_attempt_gets_its_own_id() {
    let a = RefreshTelemetry::new("auth.refresh");
    let b = RefreshTelemetry::new("auth.refresh");
    assert_ne!(a.attempt_id(), b.attempt_id());
}
