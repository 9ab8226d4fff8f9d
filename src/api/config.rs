//! Upstream endpoint configuration
//!
//! Base URL, endpoint paths and credential lookup names are injected into the
//! session instead of hard-coded at the call sites, so the whole access layer
//! can be pointed at a fake server in tests.

use once_cell::sync::Lazy;

/// Upstream API configuration for one deployment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL all request paths are appended to
    pub base_url: String,
    /// Absolute login-page URL; a redirect here means the token expired
    pub login_url: String,
    /// Paginated centre listing endpoint (POST)
    pub centres_endpoint: String,
    /// Month-level availability endpoint (POST)
    pub monthly_availability_endpoint: String,
    /// Day-level slot listing endpoint (POST)
    pub day_slots_endpoint: String,
    /// County listing endpoint (GET)
    pub counties_endpoint: String,
    /// Server-side sort expression for the centre listing
    pub centres_sort: String,
    /// Environment variable consulted when no explicit token is configured
    pub token_env: String,
    /// File name under the cache path holding a token, the last resort
    pub token_file: String,
}

static VACCINARE: Lazy<ApiConfig> = Lazy::new(|| {
    let base_url = "https://programare.vaccinare-covid.gov.ro".to_string();
    ApiConfig {
        login_url: format!("{base_url}/login"),
        base_url,
        centres_endpoint: "/scheduling/api/centres".to_string(),
        monthly_availability_endpoint: "/scheduling/api/time_slots/month_available_places"
            .to_string(),
        day_slots_endpoint: "/scheduling/api/time_slots/day_slots".to_string(),
        counties_endpoint: "/nomenclatures/api/county".to_string(),
        centres_sort: "countyName,localityName,name".to_string(),
        token_env: "VACCINARE_TOKEN".to_string(),
        token_file: "vaccinare_token".to_string(),
    }
});

/// Configuration for the production vaccination scheduling deployment.
pub fn vaccinare_config() -> ApiConfig {
    VACCINARE.clone()
}
