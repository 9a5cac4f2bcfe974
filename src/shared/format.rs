//! Magnitude-aware number formatting
//!
//! Every converter page renders results with the same idea: very small
//! values get extra fractional digits (so nothing collapses to scientific
//! notation), large values get thousands separators with a tight decimal
//! cap, and everything else gets a fixed default precision. The thresholds
//! are tuned per domain, so the banding ladder is data, not code: each
//! domain supplies a [`FormatBands`] and this module walks it.

/// One rung of a banding ladder, checked in declaration order.
#[derive(Debug, Clone, Copy)]
pub enum Tier {
    /// Fixed-precision output (trailing zeros kept) when the magnitude is
    /// below `below`.
    Fixed {
        below: f64,
        dp: u32,
        /// Skip exact zero (it falls through to a later tier)
        nonzero_only: bool,
        /// Only match strictly positive values
        positive_only: bool,
    },
    /// Thousands-grouped output (trailing fractional zeros stripped) when
    /// the magnitude is at least `at_least`.
    Grouped { at_least: f64, max_dp: u32 },
}

/// A domain's banding policy.
#[derive(Debug, Clone, Copy)]
pub struct FormatBands {
    /// Compare the raw signed value instead of the absolute value. The
    /// length and data-storage pages do signed comparisons; the rest use
    /// the absolute value.
    pub signed: bool,
    pub tiers: &'static [Tier],
    pub default_dp: u32,
}

impl FormatBands {
    pub fn format(&self, value: f64) -> String {
        let magnitude = if self.signed { value } else { value.abs() };
        for tier in self.tiers {
            match *tier {
                Tier::Fixed {
                    below,
                    dp,
                    nonzero_only,
                    positive_only,
                } => {
                    if magnitude < below
                        && (!nonzero_only || value != 0.0)
                        && (!positive_only || value > 0.0)
                    {
                        return format_fixed(value, dp);
                    }
                }
                Tier::Grouped { at_least, max_dp } => {
                    if magnitude >= at_least {
                        return format_grouped(value, max_dp);
                    }
                }
            }
        }
        format_fixed(value, self.default_dp)
    }
}

/// Fixed-precision rendering, trailing zeros kept.
pub fn format_fixed(value: f64, dp: u32) -> String {
    format!("{:.*}", dp as usize, value)
}

/// Grouped rendering: round to `max_dp`, strip trailing fractional zeros,
/// insert thousands separators into the integer part.
pub fn format_grouped(value: f64, max_dp: u32) -> String {
    let rendered = format_fixed(value, max_dp);
    let trimmed = if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.')
    } else {
        rendered.as_str()
    };

    let (sign, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", trimmed),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let grouped = add_thousands_separators(int_part);
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

// Helper to add thousands separators to a digit string
pub fn add_thousands_separators(s: &str) -> String {
    let mut result = String::new();
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, ch) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*ch);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEIGHT_BANDS: FormatBands = FormatBands {
        signed: false,
        tiers: &[
            Tier::Fixed {
                below: 0.001,
                dp: 8,
                nonzero_only: true,
                positive_only: false,
            },
            Tier::Fixed {
                below: 1.0,
                dp: 6,
                nonzero_only: false,
                positive_only: false,
            },
            Tier::Grouped {
                at_least: 1_000_000.0,
                max_dp: 1,
            },
            Tier::Grouped {
                at_least: 1000.0,
                max_dp: 2,
            },
        ],
        default_dp: 3,
    };

    #[test]
    fn fixed_keeps_trailing_zeros() {
        assert_eq!(format_fixed(0.5, 6), "0.500000");
        assert_eq!(format_fixed(12.0, 3), "12.000");
    }

    #[test]
    fn grouped_strips_trailing_zeros() {
        assert_eq!(format_grouped(130_000.0, 2), "130,000");
        assert_eq!(format_grouped(1234.5, 2), "1,234.5");
        assert_eq!(format_grouped(1234.567, 2), "1,234.57");
    }

    #[test]
    fn grouped_handles_negative_values() {
        assert_eq!(format_grouped(-1234.5, 2), "-1,234.5");
    }

    #[test]
    fn band_ladder_selects_by_magnitude() {
        assert_eq!(WEIGHT_BANDS.format(0.0005), "0.00050000");
        assert_eq!(WEIGHT_BANDS.format(0.5), "0.500000");
        assert_eq!(WEIGHT_BANDS.format(0.0), "0.000000");
        assert_eq!(WEIGHT_BANDS.format(12.3456), "12.346");
        assert_eq!(WEIGHT_BANDS.format(1500.0), "1,500");
        assert_eq!(WEIGHT_BANDS.format(2_500_000.25), "2,500,000.3");
    }

    #[test]
    fn separator_groups_of_three() {
        assert_eq!(add_thousands_separators("1234567"), "1,234,567");
        assert_eq!(add_thousands_separators("999"), "999");
    }
}
