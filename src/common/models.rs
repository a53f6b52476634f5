use crate::config::Config;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize, Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    #[serde(rename = "appName")]
    pub app_name: String,
    pub deployment: String,
    pub version: String,
}

impl ServiceInfo {
    pub fn from_config(config: &Config) -> Self {
        Self {
            app_name: config.app_name.clone(),
            deployment: config.deployment.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(ToSchema, Deserialize, Serialize)]
pub struct HealthCheck {
    pub status: String,
}
