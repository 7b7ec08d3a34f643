use healthy_route_client::types::RouteRequest;
use healthy_route_client::{AuthenticatedClient, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional: enable basic logging for the example
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    // ROUTE_API_URL, ROUTE_API_TIMEOUT_MS, ROUTE_API_STORAGE_DIR
    let cfg = Config::from_env()?;
    let client = AuthenticatedClient::new(&cfg)?;

    if !client.is_authenticated() {
        client.login("a@x.com", "pw").await?;
    }
    let profile = client.get_profile().await?.unwrap_or_default();
    println!("max AQI: {}", profile.preferred_max_aqi);

    let routes = client
        .recommend_routes(&RouteRequest {
            origin_lat: 6.9271,
            origin_lon: 79.8612,
            dest_lat: 6.9147,
            dest_lon: 79.9733,
            travel_mode: "walking".into(),
            user_email: "a@x.com".into(),
        })
        .await?;
    println!("{routes}");
    Ok(())
}
