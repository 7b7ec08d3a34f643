
use super::*;

#[ignore]
#[tokio::test]
async fn it_works() {
    let client = AuthenticatedClient::new(&Config::from_env().expect("config from env"))
        .expect("Failed to create client");
    client
        .login("a@x.com", "pw")
        .await
        .expect("Failed to log in");
    let profile = client.get_profile().await.expect("Failed to load profile");
    println!("{profile:?}");
    client.logout().unwrap();
}
