use crate::models::error::MixerError;

/// Values visited by one sweep: `min`, `min + step`, ... and finally `max`
/// exactly once, even when `step` does not divide the range.
#[derive(Debug, Clone)]
pub struct SweepSteps {
    next: Option<i64>,
    max: i64,
    step: i64,
}

impl SweepSteps {
    pub fn new(min: i64, max: i64, step: i64) -> Result<Self, MixerError> {
        if step <= 0 {
            return Err(MixerError::InvalidStep(step));
        }
        Ok(Self {
            next: (min <= max).then_some(min),
            max,
            step,
        })
    }
}

impl Iterator for SweepSteps {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let current = self.next?;
        self.next = if current >= self.max {
            None
        } else {
            Some(current.checked_add(self.step).map_or(self.max, |v| v.min(self.max)))
        };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(min: i64, max: i64, step: i64) -> Vec<i64> {
        SweepSteps::new(min, max, step).unwrap().collect()
    }

    #[test]
    fn exact_division_ends_on_max_once() {
        assert_eq!(steps(10, 90, 20), vec![10, 30, 50, 70, 90]);
    }

    #[test]
    fn final_step_is_clamped() {
        assert_eq!(steps(0, 10, 3), vec![0, 3, 6, 9, 10]);
        assert_eq!(steps(-5, 5, 100), vec![-5, 5]);
    }

    #[test]
    fn single_point_range() {
        assert_eq!(steps(7, 7, 1), vec![7]);
    }

    #[test]
    fn empty_range_yields_nothing() {
        assert!(steps(8, 7, 1).is_empty());
    }

    #[test]
    fn overflow_clamps_to_max() {
        assert_eq!(steps(i64::MAX - 1, i64::MAX, i64::MAX), vec![i64::MAX - 1, i64::MAX]);
    }

    #[test]
    fn non_positive_step_is_rejected() {
        assert_eq!(SweepSteps::new(0, 10, 0).unwrap_err(), MixerError::InvalidStep(0));
        assert!(SweepSteps::new(0, 10, -1).is_err());
    }

    #[test]
    fn values_are_monotonic_and_bounded() {
        for (min, max, step) in [(-12, 24, 5), (0, 127, 16), (3, 4, 2)] {
            let values = steps(min, max, step);
            assert_eq!(values.first(), Some(&min));
            assert_eq!(values.last(), Some(&max));
            assert!(values.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
