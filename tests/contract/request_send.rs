use healthy_route_client::types::{HealthProfile, RegisterRequest};
use healthy_route_client::{AuthenticatedClient, Config, CredentialPair, PendingRequest};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client(server: &MockServer) -> AuthenticatedClient {
    AuthenticatedClient::new(&Config::from_values(server.uri(), None, None)).expect("client")
}

#[tokio::test]
async fn authenticated_request_carries_bearer_and_json_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test/auth"))
        .and(header("Authorization", "Bearer T1"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello a@x.com"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client
        .token_store()
        .set(&CredentialPair::new("T1", "R1"))
        .unwrap();
    let body = client.test_auth().await.expect("auth test");
    assert_eq!(body, "hello a@x.com");
}

#[tokio::test]
async fn signed_out_request_omits_authorization() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test/public"))
        .respond_with(|req: &Request| {
            assert!(
                !req.headers.contains_key("Authorization"),
                "no credential should be attached when signed out"
            );
            ResponseTemplate::new(200).set_body_string("public")
        })
        .expect(1)
        .mount(&server)
        .await;

    let body = client(&server).test_public().await.expect("public test");
    assert_eq!(body, "public");
}

#[tokio::test]
async fn caller_headers_are_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/profile"))
        .and(header("X-Request-Source", "map"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"age": 20})))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client(&server)
        .request(PendingRequest::get("/profile").header("X-Request-Source", "map"))
        .await
        .expect("request");
    assert_eq!(resp.status, reqwest::StatusCode::OK);
}

#[tokio::test]
async fn profile_and_register_bodies_use_backend_field_names() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({"email": "a@x.com", "password": "pw", "firstName": "Ada"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let mut profile = HealthProfile::default();
    profile.age = Some(29);
    profile.has_respiratory_issues = true;
    Mock::given(method("POST"))
        .and(path("/profile"))
        .and(body_json(json!({
            "age": 29,
            "sensitivityLevel": "MODERATE",
            "healthConditions": [],
            "hasRespiratoryIssues": true,
            "hasCardiovascularIssues": false,
            "isPregnant": false,
            "hasAllergies": false,
            "preferredMaxAqi": 100,
            "avoidOutbreakZones": true,
            "preferGreenRoutes": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "age": 29,
            "hasRespiratoryIssues": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let mut extra = serde_json::Map::new();
    extra.insert("firstName".into(), json!("Ada"));
    let created = client
        .register(&RegisterRequest {
            email: "a@x.com".into(),
            password: "pw".into(),
            extra,
        })
        .await
        .expect("register");
    assert_eq!(created["id"], 1);

    let saved = client.save_profile(&profile).await.expect("save profile");
    assert_eq!(saved, profile);
    assert_eq!(client.cached_profile().unwrap(), Some(profile));
}
