use crate::error::{KinematicsError, Result};

/// Mechanical range of a single joint, in the joint's own unit (degrees or millimetres).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "allow_filesystem", derive(serde::Serialize, serde::Deserialize))]
pub struct JointLimits {
    /// Lower limit, inclusive.
    pub min: f64,

    /// Upper limit, inclusive.
    pub max: f64,
}

impl JointLimits {
    /// Limits are reordered if given the wrong way round.
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            JointLimits { min, max }
        } else {
            JointLimits { min: max, max: min }
        }
    }

    /// Symmetric range `[-half_range, half_range]`.
    pub fn symmetric(half_range: f64) -> Self {
        JointLimits::new(-half_range, half_range)
    }

    pub fn compliant(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Nearest value inside the range. NaN is mapped to the lower limit.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    /// Strict validation for callers that prefer rejecting to clamping.
    pub fn check(&self, joint: &str, value: f64) -> Result<f64> {
        if self.compliant(value) {
            Ok(value)
        } else {
            Err(KinematicsError::OutOfRangeJointValue {
                joint: joint.to_string(),
                value,
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Mechanical zero if reachable, otherwise the closest limit.
    pub fn zero(&self) -> f64 {
        self.clamp(0.0)
    }

    pub fn contains_zero(&self) -> bool {
        self.compliant(0.0)
    }
}

impl Default for JointLimits {
    fn default() -> Self {
        JointLimits::symmetric(180.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inside_and_outside() {
        let limits = JointLimits::new(-90.0, 90.0);
        assert!(limits.compliant(0.0));
        assert!(limits.compliant(90.0));
        assert!(!limits.compliant(90.5));
        assert!(!limits.compliant(-180.0));
    }

    #[test]
    fn test_swapped_limits() {
        let limits = JointLimits::new(30.0, -30.0);
        assert_eq!(limits.min, -30.0);
        assert_eq!(limits.max, 30.0);
    }

    #[test]
    fn test_clamp() {
        let limits = JointLimits::new(-45.0, 120.0);
        assert_eq!(limits.clamp(200.0), 120.0);
        assert_eq!(limits.clamp(-46.0), -45.0);
        assert_eq!(limits.clamp(10.0), 10.0);
        assert_eq!(limits.clamp(f64::NAN), -45.0);
    }

    #[test]
    fn test_zero_outside_range() {
        let limits = JointLimits::new(10.0, 20.0);
        assert!(!limits.contains_zero());
        assert_eq!(limits.zero(), 10.0);
        assert_eq!(JointLimits::default().zero(), 0.0);
    }

    #[test]
    fn test_check() {
        let limits = JointLimits::symmetric(5.0);
        assert_eq!(limits.check("A1", 4.0), Ok(4.0));
        assert_eq!(
            limits.check("A1", 6.0),
            Err(KinematicsError::OutOfRangeJointValue { joint: "A1".into(), value: 6.0, min: -5.0, max: 5.0 })
        );
    }
}
