//! Search form filters.

use serde::{Deserialize, Serialize};

/// Region / province / municipality selection for one extraction session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub region: String,
    pub province: String,
    /// `None` searches every municipality in the province.
    #[serde(default)]
    pub municipality: Option<String>,
}

impl SearchFilters {
    pub fn new(region: impl Into<String>, province: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            province: province.into(),
            municipality: None,
        }
    }

    pub fn with_municipality(mut self, municipality: impl Into<String>) -> Self {
        self.municipality = Some(municipality.into());
        self
    }

    /// Human-readable description for logs.
    pub fn describe(&self) -> String {
        format!(
            "{} / {} / {}",
            self.region,
            self.province,
            self.municipality.as_deref().unwrap_or("all")
        )
    }
}
