//! Position in the multi-step flow

/// Active step index and total step count
///
/// Invariant: `active < total`, and `total >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepProgress {
    active: usize,
    total: usize,
}

impl StepProgress {
    /// Progress positioned on the first step; `None` if there are no steps
    pub fn new(total: usize) -> Option<Self> {
        (total > 0).then_some(Self { active: 0, total })
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_final(&self) -> bool {
        self.active + 1 == self.total
    }

    /// Move to the next step; returns false (and stays put) on the final step
    pub fn advance(&mut self) -> bool {
        if self.is_final() {
            return false;
        }
        self.active += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_steps() {
        assert!(StepProgress::new(0).is_none());
    }

    #[test]
    fn test_advance_until_final() {
        let mut progress = StepProgress::new(2).unwrap();
        assert_eq!(progress.active(), 0);
        assert!(!progress.is_final());
        assert!(progress.advance());
        assert_eq!(progress.active(), 1);
        assert!(progress.is_final());
        assert!(!progress.advance());
        assert_eq!(progress.active(), 1);
    }

    #[test]
    fn test_single_step_is_final() {
        let progress = StepProgress::new(1).unwrap();
        assert!(progress.is_final());
        assert_eq!(progress.total(), 1);
    }
}
