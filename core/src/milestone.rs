//! Score milestones: fixed tile thresholds that stay reached once hit.

use std::collections::BTreeMap;

/// Tile values that count as milestones, in ascending order.
pub const THRESHOLDS: [u32; 3] = [2048, 4096, 8192];

/// Reached flags for each of [`THRESHOLDS`].
///
/// Flags only ever go from false to true; the sole way to clear them is to
/// start a new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Milestones {
    reached: [bool; THRESHOLDS.len()],
}

impl Milestones {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `threshold` has been reached. Unknown thresholds never are.
    pub fn is_reached(&self, threshold: u32) -> bool {
        THRESHOLDS
            .iter()
            .position(|&t| t == threshold)
            .is_some_and(|i| self.reached[i])
    }

    /// Mark every threshold `value` meets. Returns the thresholds that were
    /// not reached before this call.
    pub fn record(&mut self, value: u32) -> Vec<u32> {
        let mut newly = Vec::new();
        for (flag, &threshold) in self.reached.iter_mut().zip(THRESHOLDS.iter()) {
            if value >= threshold && !*flag {
                *flag = true;
                newly.push(threshold);
            }
        }
        newly
    }

    /// Every threshold with its reached flag, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (u32, bool)> + '_ {
        THRESHOLDS.iter().copied().zip(self.reached.iter().copied())
    }

    /// Reached thresholds missing from the caller's `claimed` list.
    ///
    /// Claims are tracked outside the engine; this only combines the two.
    pub fn claimable(&self, claimed: &[u32]) -> Vec<u32> {
        self.iter()
            .filter(|&(threshold, reached)| reached && !claimed.contains(&threshold))
            .map(|(threshold, _)| threshold)
            .collect()
    }

    pub fn to_map(&self) -> BTreeMap<u32, bool> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_nothing_reached() {
        let m = Milestones::new();
        assert!(THRESHOLDS.iter().all(|&t| !m.is_reached(t)));
        assert_eq!(
            m.to_map(),
            BTreeMap::from([(2048, false), (4096, false), (8192, false)])
        );
    }

    #[test]
    fn test_record_below_first_threshold() {
        let mut m = Milestones::new();
        assert!(m.record(1024).is_empty());
        assert_eq!(m, Milestones::new());
    }

    #[test]
    fn test_record_sets_every_threshold_met() {
        let mut m = Milestones::new();
        assert_eq!(m.record(4096), vec![2048, 4096]);
        assert!(m.is_reached(2048));
        assert!(m.is_reached(4096));
        assert!(!m.is_reached(8192));
    }

    #[test]
    fn test_record_is_sticky_and_reports_only_new() {
        let mut m = Milestones::new();
        m.record(2048);
        assert!(m.record(2048).is_empty());
        assert!(m.record(16).is_empty());
        assert!(m.is_reached(2048));
        assert_eq!(m.record(16384), vec![4096, 8192]);
    }

    #[test]
    fn test_unknown_threshold_is_never_reached() {
        let mut m = Milestones::new();
        m.record(8192);
        assert!(!m.is_reached(1024));
        assert!(!m.is_reached(3000));
    }

    #[test]
    fn test_claimable_excludes_claimed_and_unreached() {
        let mut m = Milestones::new();
        assert!(m.claimable(&[]).is_empty());

        m.record(4096);
        assert_eq!(m.claimable(&[]), vec![2048, 4096]);
        assert_eq!(m.claimable(&[2048]), vec![4096]);
        assert!(m.claimable(&[2048, 4096]).is_empty());
        assert_eq!(m.claimable(&[8192]), vec![2048, 4096]);
    }
}
