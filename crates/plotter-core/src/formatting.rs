/// Format a case count with thousands separators.
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Format a daily change with an explicit sign, e.g. `+1,204` or `-37`.
pub fn format_delta(value: i64) -> String {
    let body = group_thousands(&value.unsigned_abs().to_string());
    match value.signum() {
        -1 => format!("-{}", body),
        1 => format!("+{}", body),
        _ => body,
    }
}

/// Compact axis label: `950`, `12.5k`, `3.2M`.
///
/// # Examples
///
/// ```
/// use plotter_core::formatting::format_axis;
///
/// assert_eq!(format_axis(950.0), "950");
/// assert_eq!(format_axis(12_500.0), "12.5k");
/// assert_eq!(format_axis(-3_200_000.0), "-3.2M");
/// ```
pub fn format_axis(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    if abs >= 1_000_000.0 {
        format!("{}{}M", sign, trim_zero(abs / 1_000_000.0))
    } else if abs >= 1_000.0 {
        format!("{}{}k", sign, trim_zero(abs / 1_000.0))
    } else {
        format!("{:.0}", value)
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// One decimal, dropping a trailing `.0`.
fn trim_zero(v: f64) -> String {
    let s = format!("{:.1}", v);
    s.strip_suffix(".0").map(str::to_string).unwrap_or(s)
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_delta_signs() {
        assert_eq!(format_delta(1_204), "+1,204");
        assert_eq!(format_delta(-37), "-37");
        assert_eq!(format_delta(0), "0");
    }

    #[test]
    fn test_format_axis_ranges() {
        assert_eq!(format_axis(0.0), "0");
        assert_eq!(format_axis(999.0), "999");
        assert_eq!(format_axis(1_000.0), "1k");
        assert_eq!(format_axis(2_500_000.0), "2.5M");
    }

    #[test]
    fn test_group_thousands_seven_digits() {
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }
}
