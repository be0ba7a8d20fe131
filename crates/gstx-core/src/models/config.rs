//! Configuration structures for the extraction engine.

use serde::{Deserialize, Serialize};

/// Main configuration for the gstx pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GstxConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Spatial matching thresholds for region labeling.
    pub spatial: SpatialConfig,
}

/// Invoice field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Read line items from geometry tables when present, before falling
    /// back to the per-line regex.
    pub use_geometry_tables: bool,

    /// Template-specific patterns tried before the built-in cascades.
    pub extra_patterns: ExtraPatterns,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            use_geometry_tables: true,
            extra_patterns: ExtraPatterns::default(),
        }
    }
}

/// Additional per-field regex patterns loaded from configuration, so new
/// invoice template variants don't require a rebuild.
///
/// Each entry must carry exactly one capture group holding the value. The
/// document text is upper-cased before matching.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraPatterns {
    pub invoice_number: Vec<String>,
    pub invoice_date: Vec<String>,
    pub buyer_name: Vec<String>,
    pub total_tax: Vec<String>,
    pub grand_total: Vec<String>,
}

/// Distance thresholds for nearest-neighbor label/value matching.
///
/// Distances are Euclidean between box centers in the normalized 0-1000
/// coordinate frame. The values were tuned on scanned GST invoice templates;
/// GSTIN labels sit farther from their values on printed layouts, hence the
/// wider threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Maximum label-to-value distance for invoice number matching.
    pub invoice_no_max_dist: f64,

    /// Default maximum label-to-value distance (dates, amounts).
    pub default_max_dist: f64,

    /// Maximum label-to-value distance for GSTIN matching.
    pub gstin_max_dist: f64,

    /// Horizontal window when searching for section headers above a GSTIN.
    pub header_horizontal_range: f64,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            invoice_no_max_dist: 150.0,
            default_max_dist: 200.0,
            gstin_max_dist: 300.0,
            header_horizontal_range: 150.0,
        }
    }
}

impl GstxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
