//! Named history-cleansing profiles: how outliers are detected and how
//! missing periods are filled. Profiles are authored here and stored by a
//! [`ProfileStore`]. Missing settings in a stored profile fall back to the
//! defaults when it is loaded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::collaborator::ProfileStore;
use crate::error::{Result, SearchError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutlierMethod {
    #[default]
    #[serde(rename = "Z-Score")]
    ZScore,
    #[serde(rename = "IQR")]
    Iqr,
    #[serde(rename = "MAD")]
    Mad,
    Hampel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingMethod {
    #[serde(rename = "Drop Rows")]
    DropRows,
    #[default]
    #[serde(rename = "Forward Fill")]
    ForwardFill,
    #[serde(rename = "Backward Fill")]
    BackwardFill,
    Zero,
    Mean,
    Median,
    #[serde(rename = "Linear Interpolate")]
    LinearInterpolate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutlierParams {
    pub z_threshold: f64,
    pub iqr_k: f64,
    pub mad_k: f64,
    pub hampel_window: u32,
    pub hampel_k: f64,
}

impl Default for OutlierParams {
    fn default() -> Self {
        Self { z_threshold: 3.0, iqr_k: 1.5, mad_k: 3.0, hampel_window: 7, hampel_k: 3.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MissingParams {
    pub interpolate_order: u32,
    pub fill_constant: f64,
}

impl Default for MissingParams {
    fn default() -> Self {
        Self { interpolate_order: 1, fill_constant: 0.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CleanseConfig {
    pub outlier_method: OutlierMethod,
    pub outlier_params: OutlierParams,
    pub missing_method: MissingMethod,
    pub missing_params: MissingParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanseProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub config: CleanseConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Store a profile under `name`, which must not be blank.
pub async fn save_profile(store: &dyn ProfileStore, name: &str, config: &CleanseConfig) -> Result<CleanseProfile> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SearchError::Validation("Please enter a profile name.".to_string()));
    }
    let profile = store.create(name, config).await.map_err(|error| match error {
        SearchError::Collaborator(detail) if detail.trim().is_empty() => {
            SearchError::Collaborator("Failed to save profile.".to_string())
        }
        other => other,
    })?;
    info!(name, id = ?profile.id, "cleanse profile saved");
    Ok(profile)
}
