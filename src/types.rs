use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login answer; token fields are optional because the backend may answer 2xx without them.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshResponse {
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthProfile {
    pub age: Option<u32>,
    pub sensitivity_level: String,
    pub health_conditions: Vec<String>,
    pub has_respiratory_issues: bool,
    pub has_cardiovascular_issues: bool,
    pub is_pregnant: bool,
    pub has_allergies: bool,
    pub preferred_max_aqi: u32,
    pub avoid_outbreak_zones: bool,
    pub prefer_green_routes: bool,
}

impl Default for HealthProfile {
    fn default() -> Self {
        Self {
            age: None,
            sensitivity_level: "MODERATE".to_string(),
            health_conditions: Vec::new(),
            has_respiratory_issues: false,
            has_cardiovascular_issues: false,
            is_pregnant: false,
            has_allergies: false,
            preferred_max_aqi: 100,
            avoid_outbreak_zones: true,
            prefer_green_routes: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub origin_lat: f64,
    pub origin_lon: f64,
    pub dest_lat: f64,
    pub dest_lon: f64,
    pub travel_mode: String,
    pub user_email: String,
}
