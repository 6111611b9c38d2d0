//! Composite health scoring over memory, CPU, and disk utilization.
//!
//! Each dimension deducts the penalty of the single highest tier it exceeds;
//! tiers are not cumulative. The status label uses its own boundaries, which
//! intentionally differ from the deduction tiers.

const MEM_CPU_TIERS: [(f64, u32); 4] = [(90.0, 40), (75.0, 30), (60.0, 15), (50.0, 5)];
const DISK_TIERS: [(f64, u32); 3] = [(90.0, 20), (75.0, 15), (60.0, 7)];

/// Score overall health on a 0-100 scale. Pure; callers pass 0.0 for an
/// unavailable disk reading (treated as 0% used, a known approximation).
pub fn score(mem_pct: f64, cpu_pct: f64, disk_pct: f64) -> u8 {
    let deductions = tier_penalty(mem_pct, &MEM_CPU_TIERS)
        + tier_penalty(cpu_pct, &MEM_CPU_TIERS)
        + tier_penalty(disk_pct, &DISK_TIERS);
    100u32.saturating_sub(deductions) as u8
}

fn tier_penalty(value: f64, tiers: &[(f64, u32)]) -> u32 {
    // Tiers are ordered highest first; strict comparison, first match wins.
    tiers
        .iter()
        .find(|(threshold, _)| value > *threshold)
        .map(|(_, penalty)| *penalty)
        .unwrap_or(0)
}

/// Status label for a health score.
pub fn status(score: u8) -> &'static str {
    match score {
        85..=u8::MAX => "excellent",
        70..=84 => "good",
        50..=69 => "warning",
        _ => "critical",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_system_is_excellent() {
        assert_eq!(score(0.0, 0.0, 0.0), 100);
        assert_eq!(status(100), "excellent");
    }

    #[test]
    fn high_memory_alone_lands_in_warning() {
        let s = score(91.0, 0.0, 0.0);
        assert_eq!(s, 60);
        assert_eq!(status(s), "warning");
    }

    #[test]
    fn everything_pegged_is_critical() {
        let s = score(91.0, 91.0, 91.0);
        assert_eq!(s, 0);
        assert_eq!(status(s), "critical");
    }

    #[test]
    fn only_highest_tier_applies() {
        // 80% memory exceeds 75, 60, and 50 but deducts only the 75-tier's 30.
        assert_eq!(score(80.0, 0.0, 0.0), 70);
    }

    #[test]
    fn thresholds_are_strict() {
        // Exactly 90 does not cross the >90 tier.
        assert_eq!(score(90.0, 0.0, 0.0), 70);
        assert_eq!(score(50.0, 0.0, 0.0), 100);
    }

    #[test]
    fn disk_tiers_are_lighter() {
        assert_eq!(score(0.0, 0.0, 95.0), 80);
        assert_eq!(score(0.0, 0.0, 80.0), 85);
        assert_eq!(score(0.0, 0.0, 65.0), 93);
    }

    #[test]
    fn status_boundaries() {
        assert_eq!(status(85), "excellent");
        assert_eq!(status(84), "good");
        assert_eq!(status(70), "good");
        assert_eq!(status(69), "warning");
        assert_eq!(status(50), "warning");
        assert_eq!(status(49), "critical");
        assert_eq!(status(0), "critical");
    }

    #[test]
    fn scorer_is_pure() {
        assert_eq!(score(63.2, 41.0, 71.5), score(63.2, 41.0, 71.5));
    }
}
