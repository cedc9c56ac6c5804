//! Human-readable labels for ideology coordinates.
//!
//! Each axis is classified on its own: rounded, clamped to [-10, 10], given a
//! "Strongly" prefix past the strength threshold, and then named by sign.

use crate::model::Coordinates;

const AXIS_MIN: f64 = -10.0;
const AXIS_MAX: f64 = 10.0;
pub const DEFAULT_STRONG_THRESHOLD: f64 = 7.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabels {
    pub axis: String,
    pub negative: String,
    pub positive: String,
    pub neutral: String,
    pub strong: String,
    pub strong_threshold: f64,
}

impl AxisLabels {
    pub fn new(
        axis: impl Into<String>,
        negative: impl Into<String>,
        positive: impl Into<String>,
    ) -> Self {
        Self {
            axis: axis.into(),
            negative: negative.into(),
            positive: positive.into(),
            neutral: "Neutral".to_string(),
            strong: "Strongly".to_string(),
            strong_threshold: DEFAULT_STRONG_THRESHOLD,
        }
    }

    pub fn with_strong_threshold(mut self, threshold: f64) -> Self {
        self.strong_threshold = threshold;
        self
    }

    pub fn with_neutral(mut self, label: impl Into<String>) -> Self {
        self.neutral = label.into();
        self
    }

    pub fn with_strong(mut self, label: impl Into<String>) -> Self {
        self.strong = label.into();
        self
    }

    pub fn economic() -> Self {
        Self::new("Economic", "Left", "Right")
    }

    pub fn social() -> Self {
        Self::new("Social", "Libertarian", "Authoritarian")
    }

    /// Describes a single axis value, e.g. `"Strongly Economic Right"`.
    pub fn describe(&self, value: f64) -> String {
        let value = normalize(value);
        let mut parts: Vec<&str> = Vec::with_capacity(3);

        if value.abs() > self.strong_threshold {
            parts.push(&self.strong);
        }
        parts.push(&self.axis);
        if value == 0.0 {
            parts.push(&self.neutral);
        } else if value > 0.0 {
            parts.push(&self.positive);
        } else {
            parts.push(&self.negative);
        }
        parts.join(" ")
    }
}

/// Label tables for both axes of the plane.
#[derive(Debug, Clone, PartialEq)]
pub struct IdeologyLabels {
    pub economic: AxisLabels,
    pub social: AxisLabels,
}

impl Default for IdeologyLabels {
    fn default() -> Self {
        Self {
            economic: AxisLabels::economic(),
            social: AxisLabels::social(),
        }
    }
}

impl IdeologyLabels {
    pub fn describe(&self, coordinates: Coordinates) -> String {
        format!(
            "{}, {}",
            self.economic.describe(coordinates.economic),
            self.social.describe(coordinates.social)
        )
    }
}

/// Describes a coordinate pair with the default label tables.
pub fn describe_coordinates(coordinates: Coordinates) -> String {
    IdeologyLabels::default().describe(coordinates)
}

/// Rounds half toward positive infinity (the rounding the backend's own
/// clients use) and clamps into the axis range. NaN collapses to neutral.
fn normalize(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    let rounded = (value + 0.5).floor();
    let clamped = rounded.clamp(AXIS_MIN, AXIS_MAX);
    // -0.0 would otherwise fail the sign checks in surprising ways
    if clamped == 0.0 {
        0.0
    } else {
        clamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe(x: f64, y: f64) -> String {
        describe_coordinates(Coordinates::new(x, y))
    }

    #[test_timeout::timeout]
    fn origin_is_neutral_on_both_axes() {
        assert_eq!(describe(0.0, 0.0), "Economic Neutral, Social Neutral");
    }

    #[test_timeout::timeout]
    fn strong_prefix_only_past_threshold() {
        assert_eq!(describe(7.0, -7.0), "Economic Right, Social Libertarian");
        assert_eq!(
            describe(8.0, -8.0),
            "Strongly Economic Right, Strongly Social Libertarian"
        );
        assert_eq!(describe(-10.0, 9.0), "Strongly Economic Left, Strongly Social Authoritarian");
    }

    #[test_timeout::timeout]
    fn out_of_range_values_are_clamped() {
        for y in [-12.0, -3.0, 0.0, 4.0, 30.0] {
            assert_eq!(describe(11.0, y), describe(10.0, y));
            assert_eq!(describe(-250.0, y), describe(-10.0, y));
        }
        assert_eq!(describe(f64::INFINITY, 0.0), describe(10.0, 0.0));
    }

    #[test_timeout::timeout]
    fn rounding_follows_half_up() {
        assert_eq!(describe(0.4, -0.4), "Economic Neutral, Social Neutral");
        assert_eq!(describe(0.5, 0.0), "Economic Right, Social Neutral");
        // -0.5 rounds up to zero
        assert_eq!(describe(-0.5, 0.0), "Economic Neutral, Social Neutral");
        assert_eq!(describe(7.5, 0.0), "Strongly Economic Right, Social Neutral");
        assert_eq!(describe(-7.5, 0.0), "Economic Left, Social Neutral");
    }

    #[test_timeout::timeout]
    fn nan_is_neutral() {
        assert_eq!(describe(f64::NAN, f64::NAN), "Economic Neutral, Social Neutral");
    }

    #[test_timeout::timeout]
    fn every_label_comes_from_the_vocabulary() {
        let vocabulary = [
            "Strongly",
            "Economic",
            "Social",
            "Left",
            "Right",
            "Libertarian",
            "Authoritarian",
            "Neutral",
        ];
        for x in -10..=10 {
            for y in -10..=10 {
                let text = describe(x as f64, y as f64);
                let segments: Vec<&str> = text.split(", ").collect();
                assert_eq!(segments.len(), 2, "{text}");
                for word in segments.iter().flat_map(|s| s.split(' ')) {
                    assert!(vocabulary.contains(&word), "unexpected word {word} in {text}");
                }
            }
        }
    }

    #[test_timeout::timeout]
    fn custom_labels_and_threshold() {
        let labels = AxisLabels::new("Tax", "Low", "High")
            .with_strong_threshold(2.0)
            .with_strong("Very")
            .with_neutral("Flat");
        assert_eq!(labels.describe(3.0), "Very Tax High");
        assert_eq!(labels.describe(0.0), "Tax Flat");
        assert_eq!(labels.describe(-2.0), "Tax Low");
    }
}
