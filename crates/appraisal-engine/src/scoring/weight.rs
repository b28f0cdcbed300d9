//! Fixed six-band weight scale shared by target rows and soft-skill ratings,
//! plus the rounding helpers every calculation goes through.

/// Upper bound (inclusive) of each band, lowest first. Anything above the
/// last bound lands in the top band.
const BAND_CEILINGS: [f64; 5] = [70.0, 80.0, 90.0, 100.0, 110.0];

/// Maps a percentage or rating onto the 1..=6 weight scale.
///
/// `<=70 -> 1`, `71-80 -> 2`, `81-90 -> 3`, `91-100 -> 4`, `101-110 -> 5`,
/// `>110 -> 6`. Zero, negative and NaN inputs fall in the lowest band.
pub fn resolve_weight(value: f64) -> u8 {
    if value.is_nan() {
        return 1;
    }

    let band = BAND_CEILINGS
        .iter()
        .take_while(|ceiling| value > **ceiling)
        .count();
    band as u8 + 1
}

/// Rounds half away from negative infinity (`2.5 -> 3`, `-2.5 -> -2`), the
/// way spreadsheet and browser forms round.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Rounds to a fixed number of decimal places using [`round_half_up`].
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    round_half_up(value * factor) / factor
}

/// Whole-number percentage; non-finite values collapse to zero.
pub(crate) fn round_percent(value: f64) -> i64 {
    if value.is_finite() {
        round_half_up(value) as i64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_follow_threshold_table() {
        let cases = [
            (-15.0, 1),
            (0.0, 1),
            (70.0, 1),
            (71.0, 2),
            (80.0, 2),
            (81.0, 3),
            (90.0, 3),
            (95.0, 4),
            (100.0, 4),
            (101.0, 5),
            (110.0, 5),
            (111.0, 6),
            (250.0, 6),
        ];
        for (value, expected) in cases {
            assert_eq!(resolve_weight(value), expected, "value {value}");
        }
    }

    #[test]
    fn fractional_values_between_bands_round_up_a_band() {
        assert_eq!(resolve_weight(70.4), 2);
        assert_eq!(resolve_weight(100.01), 5);
    }

    #[test]
    fn weight_is_monotonic() {
        let mut previous = resolve_weight(-100.0);
        let mut value = -100.0;
        while value <= 200.0 {
            let weight = resolve_weight(value);
            assert!(weight >= previous, "weight dropped at {value}");
            previous = weight;
            value += 0.25;
        }
    }

    #[test]
    fn nan_falls_in_lowest_band() {
        assert_eq!(resolve_weight(f64::NAN), 1);
    }

    #[test]
    fn rounding_matches_form_behavior() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(49.6), 50.0);
        assert_eq!(round_to(380.0, 2), 380.0);
        assert_eq!(round_to(12.345, 1), 12.3);
        assert_eq!(round_percent(f64::INFINITY), 0);
        assert_eq!(round_percent(94.5), 95);
    }
}
