// src/core/progress.rs

/// Cosmetic scan progress shown while a simulated scan is running.
///
/// The percentage only ever moves forward and saturates at 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanProgress {
    percent: u8,
}

impl ScanProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn is_complete(&self) -> bool {
        self.percent >= 100
    }

    /// Moves to `target` if it is ahead of the current value; never moves backwards.
    pub fn advance_to(&mut self, target: u8) -> u8 {
        self.percent = self.percent.max(target.min(100));
        self.percent
    }

    pub fn complete(&mut self) -> u8 {
        self.percent = 100;
        self.percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_only_after_reaching_100() {
        let mut p = ScanProgress::new();
        assert_eq!(p.advance_to(99), 99);
        assert!(!p.is_complete());
        assert_eq!(p.complete(), 100);
        assert!(p.is_complete());
        assert_eq!(p.advance_to(255), 100);
    }

    #[test]
    fn advance_to_never_goes_backwards() {
        let mut p = ScanProgress::new();
        p.advance_to(40);
        assert_eq!(p.advance_to(25), 40);
        assert_eq!(p.advance_to(200), 100);
    }

    #[test]
    fn sequence_is_monotonic() {
        let mut p = ScanProgress::new();
        let mut last = 0;
        for target in [3, 1, 10, 9, 50, 49, 99, 100, 80] {
            let now = p.advance_to(target);
            assert!(now >= last);
            last = now;
        }
        assert!(p.is_complete());
    }
}
