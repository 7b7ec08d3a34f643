use healthy_route_client::dispatch::RequestDispatcher;
use healthy_route_client::{AuthenticatedClient, Config, Error, TokenStore};

#[test]
fn invalid_base_url_fails_fast() {
    let cfg = Config::from_values("://not-a-valid-url", None, None);

    let err = match AuthenticatedClient::new(&cfg) {
        Ok(_) => panic!("expected invalid URL error"),
        Err(err) => err,
    };

    match err {
        Error::Config(msg) => {
            assert!(msg.contains("Invalid base URL"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn paths_join_under_the_api_prefix() {
    let cfg = Config::from_values("http://localhost:9090/api/", None, None);
    let dispatcher = RequestDispatcher::from_config(&cfg, TokenStore::in_memory()).unwrap();
    assert_eq!(
        dispatcher.url_for("/auth/refresh"),
        "http://localhost:9090/api/auth/refresh"
    );
}
