use std::path::PathBuf;
use std::sync::Arc;

use healthy_route_client::token::{ACCESS_TOKEN_KEY, FileStorage, Storage};
use healthy_route_client::{AuthenticatedClient, Config, CredentialPair, TokenStore};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn storage_dir(name: &str) -> PathBuf {
    let mut dir = PathBuf::from("target");
    dir.push(format!("contract-{}-{}", name, std::process::id()));
    std::fs::remove_dir_all(&dir).ok();
    dir
}

#[tokio::test]
async fn credentials_persist_across_clients_for_the_same_origin() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"token": "T1", "refreshToken": "R1"})),
        )
        .mount(&server)
        .await;

    let dir = storage_dir("persist");
    let cfg = Config::from_values(server.uri(), None, Some(dir.clone()));

    let first = AuthenticatedClient::new(&cfg).unwrap();
    first.login("a@x.com", "pw").await.expect("login");

    let second = AuthenticatedClient::new(&cfg).unwrap();
    assert_eq!(
        second.token_store().get().unwrap(),
        Some(CredentialPair::new("T1", "R1"))
    );

    second.logout().unwrap();
    assert!(!first.is_authenticated());
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn lone_token_in_storage_file_is_not_a_session() {
    let dir = storage_dir("lone");
    let origin = reqwest::Url::parse("http://localhost:9090/api").unwrap();
    let storage = Arc::new(FileStorage::for_origin(&dir, &origin).unwrap());
    storage.set_items(&[(ACCESS_TOKEN_KEY, "T1")]).unwrap();

    let store = TokenStore::new(storage);
    assert!(store.get().unwrap().is_none());
    assert!(!store.is_authenticated());
    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn login_without_refresh_token_stores_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "T1"})))
        .mount(&server)
        .await;

    let client = AuthenticatedClient::new(&Config::from_values(server.uri(), None, None)).unwrap();
    let resp = client.login("a@x.com", "pw").await.expect("login");
    assert_eq!(resp.token.as_deref(), Some("T1"));
    assert!(client.token_store().get().unwrap().is_none());
}
