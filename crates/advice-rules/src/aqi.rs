//! AQI Classification

use serde::{Deserialize, Serialize};

/// AQI bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    /// Classify an AQI value. Upper bounds are inclusive.
    pub fn from_aqi(aqi: f64) -> Self {
        if aqi <= 50.0 {
            AqiCategory::Good
        } else if aqi <= 100.0 {
            AqiCategory::Moderate
        } else if aqi <= 150.0 {
            AqiCategory::UnhealthyForSensitiveGroups
        } else if aqi <= 200.0 {
            AqiCategory::Unhealthy
        } else if aqi <= 300.0 {
            AqiCategory::VeryUnhealthy
        } else {
            // NaN lands here too
            AqiCategory::Hazardous
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    /// Health implications for the bracket
    pub fn health_statement(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Air quality is satisfactory",
            AqiCategory::Moderate => "Acceptable for most people",
            AqiCategory::UnhealthyForSensitiveGroups => {
                "People with respiratory conditions may experience symptoms"
            }
            AqiCategory::Unhealthy => "Everyone may begin to experience health effects",
            AqiCategory::VeryUnhealthy => "Health alert - everyone may experience serious effects",
            AqiCategory::Hazardous => "Health warnings of emergency conditions",
        }
    }

    /// Dashboard colour band
    pub fn color(&self) -> &'static str {
        match self {
            AqiCategory::Good => "green",
            AqiCategory::Moderate => "yellow",
            AqiCategory::UnhealthyForSensitiveGroups => "orange",
            AqiCategory::Unhealthy => "red",
            AqiCategory::VeryUnhealthy => "purple",
            AqiCategory::Hazardous => "maroon",
        }
    }
}

/// Return `(category_label, health_statement)` for an AQI value
pub fn classify_aqi(aqi: f64) -> (&'static str, &'static str) {
    let category = AqiCategory::from_aqi(aqi);
    (category.label(), category.health_statement())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bracket_boundaries() {
        assert_eq!(classify_aqi(50.0).0, "Good");
        assert_eq!(classify_aqi(50.1).0, "Moderate");
        assert_eq!(classify_aqi(100.0).0, "Moderate");
        assert_eq!(classify_aqi(150.0).0, "Unhealthy for Sensitive Groups");
        assert_eq!(classify_aqi(200.0).0, "Unhealthy");
        assert_eq!(classify_aqi(300.0).0, "Very Unhealthy");
        assert_eq!(classify_aqi(300.5).0, "Hazardous");
    }

    #[test]
    fn test_negative_is_good() {
        let (label, health) = classify_aqi(-20.0);
        assert_eq!(label, "Good");
        assert_eq!(health, "Air quality is satisfactory");
    }

    #[test]
    fn test_nan_is_hazardous() {
        assert_eq!(AqiCategory::from_aqi(f64::NAN), AqiCategory::Hazardous);
    }

    #[test]
    fn test_colors() {
        assert_eq!(AqiCategory::from_aqi(10.0).color(), "green");
        assert_eq!(AqiCategory::from_aqi(175.0).color(), "red");
        assert_eq!(AqiCategory::from_aqi(450.0).color(), "maroon");
    }

    proptest! {
        #[test]
        fn prop_good_up_to_50(aqi in -1000.0f64..=50.0) {
            prop_assert_eq!(AqiCategory::from_aqi(aqi), AqiCategory::Good);
        }

        #[test]
        fn prop_hazardous_above_300(aqi in 300.0001f64..1.0e9) {
            prop_assert_eq!(AqiCategory::from_aqi(aqi), AqiCategory::Hazardous);
        }

        #[test]
        fn prop_monotonic(a in -100.0f64..600.0, b in -100.0f64..600.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(AqiCategory::from_aqi(lo) <= AqiCategory::from_aqi(hi));
        }
    }
}
