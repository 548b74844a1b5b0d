//! Step conditions applied to a state vector as a time stepper advances.

/// A condition applied to the state vector at each time step.
///
/// Implementations may rewrite the values in place (early-exercise
/// floors, barriers) or merely observe them (snapshots).
pub trait StepCondition {
    /// Apply the condition to `values` at evolution time `t`.
    fn apply_to(&mut self, values: &mut [f64], t: f64);
}

/// Captures a copy of the state vector when the stepper lands on the
/// trigger time.
///
/// Useful for reading an intermediate solution out of a rollback, e.g.
/// the value surface at a forward-start date.
#[derive(Debug, Clone)]
pub struct SnapshotCondition {
    trigger_time: f64,
    values: Option<Vec<f64>>,
}

impl SnapshotCondition {
    /// Time tolerance for matching the trigger against a step time.
    const TIME_EPSILON: f64 = 1e-12;

    /// Creates a snapshot that fires at `trigger_time`.
    #[must_use]
    pub fn new(trigger_time: f64) -> Self {
        Self {
            trigger_time,
            values: None,
        }
    }

    /// The time this condition fires at.
    #[must_use]
    pub fn trigger_time(&self) -> f64 {
        self.trigger_time
    }

    /// The captured state vector, or `None` if the trigger time has not
    /// been stepped onto yet.
    #[must_use]
    pub fn values(&self) -> Option<&[f64]> {
        self.values.as_deref()
    }
}

impl StepCondition for SnapshotCondition {
    fn apply_to(&mut self, values: &mut [f64], t: f64) {
        if (t - self.trigger_time).abs() < Self::TIME_EPSILON {
            self.values = Some(values.to_vec());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_only_at_trigger_time() {
        let mut snapshot = SnapshotCondition::new(0.5);
        let mut state = vec![1.0, 2.0, 3.0];

        snapshot.apply_to(&mut state, 1.0);
        assert!(snapshot.values().is_none());

        snapshot.apply_to(&mut state, 0.5);
        assert_eq!(snapshot.values(), Some(&[1.0, 2.0, 3.0][..]));
    }

    #[test]
    fn snapshot_is_a_copy_not_a_view() {
        let mut snapshot = SnapshotCondition::new(0.25);
        let mut state = vec![10.0, 20.0];

        snapshot.apply_to(&mut state, 0.25);
        state[0] = -1.0;

        assert_eq!(snapshot.values(), Some(&[10.0, 20.0][..]));
    }

    #[test]
    fn does_not_mutate_the_state() {
        let mut snapshot = SnapshotCondition::new(0.0);
        let mut state = vec![5.0; 4];

        snapshot.apply_to(&mut state, 0.0);

        assert_eq!(state, vec![5.0; 4]);
    }
}
