//! Delta clamping and context-sensitive amplification.
//!
//! The generator is deliberately conservative with numbers, so committed
//! deltas are amplified relative to where the stat currently sits in its
//! range: small nudges near the edges, big swings through the middle. The
//! final value never leaves the authored range.
use crate::config::EngineConfig;
use crate::scenario::StatDef;

/// Clamps a raw requested delta to the symmetric per-turn bound.
pub fn clamp_raw(delta: i64) -> i64 {
    delta.clamp(-EngineConfig::MAX_RAW_DELTA, EngineConfig::MAX_RAW_DELTA)
}

/// Amplifies a clamped delta for a defined stat.
///
/// The multiplier depends on the current value's position in the range:
/// within the outer bands (at or below 25%, at or above 75%) it is
/// [`EngineConfig::EDGE_MULTIPLIER`], in between it is
/// [`EngineConfig::MID_MULTIPLIER`]. The amplified delta is then clamped so
/// that `current + result` stays inside `min..=max`.
pub fn amplify(def: &StatDef, current: i64, raw: i64) -> i64 {
    let pct = def.range_pct(current);
    let multiplier = if pct <= EngineConfig::LOW_BAND_PCT || pct >= EngineConfig::HIGH_BAND_PCT {
        EngineConfig::EDGE_MULTIPLIER
    } else {
        EngineConfig::MID_MULTIPLIER
    };
    let amplified = (raw as f64 * multiplier).round() as i64;
    amplified.clamp(def.min - current, def.max - current)
}

/// Flat amplification for a delta that references no defined stat. With no
/// definition there is no range to clamp against.
pub fn amplify_unknown(raw: i64) -> i64 {
    (raw as f64 * EngineConfig::FALLBACK_MULTIPLIER).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::StatPolarity;

    fn stat(min: i64, max: i64) -> StatDef {
        StatDef {
            id: "morale".into(),
            name: "사기".into(),
            min,
            max,
            initial: min,
            polarity: StatPolarity::HigherBetter,
        }
    }

    #[test]
    fn clamp_is_symmetric_at_forty() {
        assert_eq!(clamp_raw(100), 40);
        assert_eq!(clamp_raw(-100), -40);
        assert_eq!(clamp_raw(40), 40);
        assert_eq!(clamp_raw(-39), -39);
        assert_eq!(clamp_raw(0), 0);
    }

    #[test]
    fn midrange_value_amplifies_three_x() {
        // 50 in 0..=100 sits mid-range: +4 becomes +12.
        assert_eq!(amplify(&stat(0, 100), 50, 4), 12);
    }

    #[test]
    fn edge_value_amplifies_one_point_five_x() {
        // 10 in 0..=100 is inside the low band: +4 becomes +6.
        assert_eq!(amplify(&stat(0, 100), 10, 4), 6);
        // 90 is inside the high band.
        assert_eq!(amplify(&stat(0, 100), 90, -4), -6);
    }

    #[test]
    fn band_boundaries_belong_to_the_edge() {
        assert_eq!(amplify(&stat(0, 100), 25, 4), 6);
        assert_eq!(amplify(&stat(0, 100), 75, 4), 6);
        assert_eq!(amplify(&stat(0, 100), 26, 4), 12);
        assert_eq!(amplify(&stat(0, 100), 74, 4), 12);
    }

    #[test]
    fn amplified_delta_never_escapes_the_range() {
        // 90 + (8 * 1.5) would be 102; clamps to the max.
        assert_eq!(amplify(&stat(0, 100), 90, 8), 10);
        // 10 - (8 * 1.5) would be -2; clamps to the min.
        assert_eq!(amplify(&stat(0, 100), 10, -8), -10);
    }

    #[test]
    fn nonzero_min_shifts_the_bands() {
        // 60 in 20..=120 is 40% through the range, so mid band.
        assert_eq!(amplify(&stat(20, 120), 60, 4), 12);
        // 40 is 20% through, so edge band.
        assert_eq!(amplify(&stat(20, 120), 40, 4), 6);
    }

    #[test]
    fn unknown_stat_amplifies_flat_two_x() {
        assert_eq!(amplify_unknown(4), 8);
        assert_eq!(amplify_unknown(-3), -6);
        assert_eq!(amplify_unknown(0), 0);
    }

    #[test]
    fn negative_mid_band_delta_rounds_like_positive() {
        assert_eq!(amplify(&stat(0, 100), 50, -4), -12);
    }
}
