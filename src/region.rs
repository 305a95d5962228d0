//! Snapshot comparison regions
//!
//! A region scopes part of a snapshot to a diffing algorithm and its
//! thresholds. Building one is a pure transform over the supplied
//! parameters; keys whose inputs were absent never appear in the output.

use serde::Serialize;
use serde_json::Value;

/// Algorithms that accept tunable configuration
const CONFIGURABLE_ALGORITHMS: [&str; 2] = ["standard", "intelliignore"];

/// Parameters for building a [`Region`]
#[derive(Debug, Clone, Default)]
pub struct RegionParams {
    /// Bounding box of the region
    pub bounding_box: Option<Value>,
    /// XPath of the element
    pub element_xpath: Option<String>,
    /// CSS selector of the element
    pub element_css: Option<String>,
    /// Padding around the region
    pub padding: Option<Value>,
    /// Diffing algorithm, defaults to `ignore`
    pub algorithm: Option<String>,
    /// Diff sensitivity
    pub diff_sensitivity: Option<f64>,
    /// Image ignore threshold
    pub image_ignore_threshold: Option<f64>,
    /// Carousel handling toggle
    pub carousels_enabled: Option<bool>,
    /// Banner handling toggle
    pub banners_enabled: Option<bool>,
    /// Ad handling toggle
    pub ads_enabled: Option<bool>,
    /// Diff ignore threshold asserted on the comparison
    pub diff_ignore_threshold: Option<f64>,
}

/// Element addressed by a region
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSelector {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_xpath: Option<String>,
    #[serde(rename = "elementCSS", skip_serializing_if = "Option::is_none")]
    pub element_css: Option<String>,
}

/// Tunables for the configurable algorithms
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_sensitivity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ignore_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carousels_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banners_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ads_enabled: Option<bool>,
}

impl RegionConfiguration {
    fn is_empty(&self) -> bool {
        self.diff_sensitivity.is_none()
            && self.image_ignore_threshold.is_none()
            && self.carousels_enabled.is_none()
            && self.banners_enabled.is_none()
            && self.ads_enabled.is_none()
    }
}

/// Threshold asserted on the comparison result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionAssertion {
    pub diff_ignore_threshold: f64,
}

/// A snapshot comparison region
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub algorithm: String,
    pub element_selector: ElementSelector,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<RegionConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertion: Option<RegionAssertion>,
}

impl Region {
    /// Build a region from parameters
    pub fn build(params: &RegionParams) -> Region {
        let element_selector = ElementSelector {
            bounding_box: params.bounding_box.clone(),
            element_xpath: params.element_xpath.clone(),
            element_css: params.element_css.clone(),
        };

        let algorithm = params
            .algorithm
            .clone()
            .unwrap_or_else(|| "ignore".to_string());

        let configuration = if CONFIGURABLE_ALGORITHMS.contains(&algorithm.as_str()) {
            let configuration = RegionConfiguration {
                diff_sensitivity: params.diff_sensitivity,
                image_ignore_threshold: params.image_ignore_threshold,
                carousels_enabled: params.carousels_enabled,
                banners_enabled: params.banners_enabled,
                ads_enabled: params.ads_enabled,
            };
            if configuration.is_empty() {
                None
            } else {
                Some(configuration)
            }
        } else {
            None
        };

        let assertion = params
            .diff_ignore_threshold
            .map(|diff_ignore_threshold| RegionAssertion {
                diff_ignore_threshold,
            });

        Region {
            algorithm,
            element_selector,
            padding: params.padding.clone(),
            configuration,
            assertion,
        }
    }
}
