use crate::{
    AuthenticatedClient,
    dispatch::PendingRequest,
    errors::Error,
    types::{HealthProfile, RegisterRequest, RouteRequest},
};

impl AuthenticatedClient {
    pub async fn register(&self, request: &RegisterRequest) -> Result<serde_json::Value, Error> {
        self.request_json(PendingRequest::post("/auth/register").json(request)?)
            .await
    }

    /// Fetch the health profile and cache it locally. `None` when the user has none yet.
    pub async fn get_profile(&self) -> Result<Option<HealthProfile>, Error> {
        let profile: Option<HealthProfile> =
            self.request_json(PendingRequest::get("/profile")).await?;
        if let Some(profile) = profile.as_ref() {
            self.token_store().cache_profile(profile)?;
        }
        Ok(profile)
    }

    pub async fn save_profile(&self, profile: &HealthProfile) -> Result<HealthProfile, Error> {
        let saved: HealthProfile = self
            .request_json(PendingRequest::post("/profile").json(profile)?)
            .await?;
        self.token_store().cache_profile(&saved)?;
        Ok(saved)
    }

    pub fn cached_profile(&self) -> Result<Option<HealthProfile>, Error> {
        self.token_store().cached_profile()
    }

    /// Candidate routes from the scoring service, returned as-is.
    pub async fn recommend_routes(&self, request: &RouteRequest) -> Result<serde_json::Value, Error> {
        self.request_json(PendingRequest::post("/route/recommend").json(request)?)
            .await
    }

    pub async fn route_details(&self, route_id: &str) -> Result<serde_json::Value, Error> {
        let path = format!("/route/{}", urlencoding::encode(route_id));
        self.request_json(PendingRequest::get(path)).await
    }

    /// Raw body of the authenticated diagnostics endpoint.
    pub async fn test_auth(&self) -> Result<String, Error> {
        Ok(self.request(PendingRequest::get("/test/auth")).await?.body)
    }

    pub async fn test_public(&self) -> Result<String, Error> {
        Ok(self.request(PendingRequest::get("/test/public")).await?.body)
    }
}
