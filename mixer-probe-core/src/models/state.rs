/// Per-control sweep state machine.
///
/// ```text
/// not-started → clamped → stepping → completed
///                  │          ├────→ failed
///                  │          └────→ cancelled
///                  ├→ cancelled
///                  └→ skipped
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    NotStarted,
    Clamped { min: i64, max: i64 },
    Stepping { value: i64 },
    Completed,
    Skipped,
    Failed,
    Cancelled,
}

impl SweepState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Skipped | Self::Failed | Self::Cancelled
        )
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Whether `next` is a legal successor of this state.
    pub fn can_transition_to(&self, next: &SweepState) -> bool {
        match (self, next) {
            (Self::NotStarted, Self::Clamped { .. }) => true,
            (Self::Clamped { .. }, Self::Skipped) => true,
            (Self::Clamped { .. }, Self::Stepping { .. } | Self::Cancelled) => true,
            (Self::Stepping { .. }, Self::Stepping { .. }) => true,
            (Self::Stepping { .. }, Self::Completed | Self::Failed | Self::Cancelled) => true,
            _ => false,
        }
    }
}
