//! Number formatting for the result area and for committed buffers.

/// Significant digits kept when formatting non-integers.
pub const DEFAULT_PRECISION: usize = 12;

/// How numbers are rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumberFormat {
    /// Significant digits for non-integers, clamped to `1..=17`.
    pub precision: usize,
    /// Insert thousand separators in [`NumberFormat::format_display`].
    pub group_digits: bool,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            group_digits: false,
        }
    }
}

impl NumberFormat {
    /// Canonical text for a value: integers without a decimal point,
    /// non-integers rounded to `precision` significant digits with trailing
    /// zeros stripped, and `None` as `"0"`.
    ///
    /// The output always parses back as a buffer.
    pub fn format(&self, value: Option<f64>) -> String {
        let Some(value) = value else {
            return "0".to_string();
        };

        let value = if value.fract() == 0.0 {
            value
        } else {
            round_to_precision(value, self.precision.clamp(1, 17))
        };

        // Also folds -0 into 0.
        if value == 0.0 {
            return "0".to_string();
        }

        format!("{value}")
    }

    /// Text for the result area. Same as [`NumberFormat::format`], with
    /// thousand separators when `group_digits` is set.
    pub fn format_display(&self, value: f64) -> String {
        let canonical = self.format(Some(value));
        if self.group_digits {
            group_thousands(&canonical)
        } else {
            canonical
        }
    }
}

/// Format a number with the default settings.
pub fn format_number(value: Option<f64>) -> String {
    NumberFormat::default().format(value)
}

/// Round to `digits` significant digits, suppressing binary noise such as
/// `0.1 + 0.2 = 0.30000000000000004`.
fn round_to_precision(value: f64, digits: usize) -> f64 {
    format!("{:.*e}", digits - 1, value)
        .parse()
        .unwrap_or(value)
}

/// Insert `,` every three digits of the integer part.
fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.find('.') {
        Some(dot) => unsigned.split_at(dot),
        None => (unsigned, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{sign}{grouped}{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(format_number(Some(19.0)), "19");
        assert_eq!(format_number(Some(-4.0)), "-4");
        assert_eq!(format_number(Some(0.0)), "0");
        assert_eq!(format_number(Some(-0.0)), "0");
        assert_eq!(format_number(Some(1e21)), "1000000000000000000000");
    }

    #[test]
    fn test_absent() {
        assert_eq!(format_number(None), "0");
    }

    #[test]
    fn test_decimals() {
        assert_eq!(format_number(Some(0.5)), "0.5");
        assert_eq!(format_number(Some(-2.25)), "-2.25");
        assert_eq!(format_number(Some(0.1 + 0.2)), "0.3");
        assert_eq!(format_number(Some(1.0 / 3.0)), "0.333333333333");
        assert_eq!(format_number(Some(2.0 / 3.0)), "0.666666666667");
    }

    #[test]
    fn test_rounding_to_integer() {
        assert_eq!(format_number(Some(0.9999999999999999)), "1");
    }

    #[test]
    fn test_custom_precision() {
        let format = NumberFormat {
            precision: 4,
            group_digits: false,
        };
        assert_eq!(format.format(Some(1.0 / 3.0)), "0.3333");
        assert_eq!(format.format(Some(123.456)), "123.5");
    }

    #[test]
    fn test_grouping() {
        assert_eq!(group_thousands("1000000"), "1,000,000");
        assert_eq!(group_thousands("-1234.5678"), "-1,234.5678");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("0.25"), "0.25");
    }

    #[test]
    fn test_display_without_grouping() {
        assert_eq!(NumberFormat::default().format_display(1234567.0), "1234567");
    }
}
