use std::path::PathBuf;

use super::Category;

/// Mutable form state for a report being composed. Owned by the active
/// report session; discarded after a successful submission.
#[derive(Debug, Clone, Default)]
pub struct IssueDraft {
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: String,
    pub photo: Option<PathBuf>,
}

impl IssueDraft {
    /// Latitude as a multipart text value: formatted number or empty.
    pub fn latitude_field(&self) -> String {
        self.latitude.map(|v| v.to_string()).unwrap_or_default()
    }

    pub fn longitude_field(&self) -> String {
        self.longitude.map(|v| v.to_string()).unwrap_or_default()
    }
}
