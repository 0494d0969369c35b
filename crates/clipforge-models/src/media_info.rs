//! Source media metadata captured at info-lookup time.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Metadata returned by the info-lookup collaborator before acquisition
/// starts. All fields are best-effort.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct MediaInfo {
    /// Source title
    pub title: String,

    /// Duration in seconds, when the extractor reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,

    /// Thumbnail URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl MediaInfo {
    /// Serialize into the opaque metadata blob stored on the project.
    pub fn to_metadata_blob(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_blob_shape() {
        let info = MediaInfo {
            title: "Talk".to_string(),
            duration_seconds: Some(1800.0),
            thumbnail_url: None,
        };
        let blob = info.to_metadata_blob();
        assert_eq!(blob["title"], "Talk");
        assert_eq!(blob["duration_seconds"], 1800.0);
    }
}
