//! Player Titles
//!
//! Titles are derived from cumulative points at read time and never stored.
//! The single player at the top of the ledger is "THE ONE" regardless of tier.

use super::config::TitleTier;

/// Title held by the leader of the ledger.
pub const THE_ONE: &str = "THE ONE";

/// Highest tier reached with `points`, if any.
///
/// `tiers` must be sorted by ascending threshold.
pub fn title_for(tiers: &[TitleTier], points: u64) -> Option<&str> {
    tiers
        .iter()
        .rev()
        .find(|tier| points >= tier.threshold)
        .map(|tier| tier.name.as_str())
}

/// Number of tiers reached with `points` (0 = untitled).
pub fn tier_rank(tiers: &[TitleTier], points: u64) -> usize {
    tiers.iter().take_while(|tier| points >= tier.threshold).count()
}

/// Title to display, applying the leader override.
pub fn display_title(tiers: &[TitleTier], points: u64, is_leader: bool) -> Option<String> {
    if is_leader {
        return Some(THE_ONE.to_string());
    }
    title_for(tiers, points).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::default_titles;
    use proptest::prelude::*;

    #[test]
    fn test_thresholds() {
        let tiers = default_titles();
        assert_eq!(title_for(&tiers, 0), None);
        assert_eq!(title_for(&tiers, 99), None);
        assert_eq!(title_for(&tiers, 100), Some("Newbie"));
        assert_eq!(title_for(&tiers, 499), Some("Newbie"));
        assert_eq!(title_for(&tiers, 500), Some("Rookie"));
        assert_eq!(title_for(&tiers, 2500), Some("Pro"));
        assert_eq!(title_for(&tiers, 5000), Some("Legend"));
        assert_eq!(title_for(&tiers, 10000), Some("Champion"));
        assert_eq!(title_for(&tiers, u64::MAX), Some("Champion"));
    }

    #[test]
    fn test_leader_override() {
        let tiers = default_titles();
        assert_eq!(display_title(&tiers, 3, true).as_deref(), Some(THE_ONE));
        assert_eq!(display_title(&tiers, 600, false).as_deref(), Some("Rookie"));
        assert_eq!(display_title(&tiers, 3, false), None);
    }

    #[test]
    fn test_empty_ladder() {
        assert_eq!(title_for(&[], 1_000_000), None);
        assert_eq!(tier_rank(&[], 1_000_000), 0);
    }

    proptest! {
        #[test]
        fn prop_title_rank_is_monotonic(a in 0u64..20_000, b in 0u64..20_000) {
            let tiers = default_titles();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(tier_rank(&tiers, lo) <= tier_rank(&tiers, hi));
        }

        #[test]
        fn prop_title_matches_rank(points in 0u64..20_000) {
            let tiers = default_titles();
            let rank = tier_rank(&tiers, points);
            let expected = if rank == 0 { None } else { Some(tiers[rank - 1].name.as_str()) };
            prop_assert_eq!(title_for(&tiers, points), expected);
        }
    }
}
