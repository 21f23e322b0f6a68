//! Number and series formatting for terminal widgets

const SPARK_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_WIDTH: usize = 60;

/// Format a price with thousands separators and a currency marker
///
/// USD gets the `$` prefix, everything else a trailing currency code.
pub fn format_money(value: f64, currency: &str) -> String {
    let formatted = with_separators(value, 2);
    if currency.eq_ignore_ascii_case("usd") {
        format!("${formatted}")
    } else {
        format!("{formatted} {currency}")
    }
}

/// Format a large value compactly: 2.95T, 1.20B, 345.60M, 12.30K
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e12 {
        format!("{:.2}T", value / 1e12)
    } else if abs >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{value:.2}")
    }
}

/// Format a percentage delta with an explicit sign
pub fn format_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value:.2}%")
    } else {
        format!("{value:.2}%")
    }
}

/// Signed change between a price and its previous close, as "(+1.23, +0.85%)"
pub fn format_change(price: f64, previous_close: f64) -> String {
    let change = price - previous_close;
    let percent = if previous_close.abs() > f64::EPSILON {
        change / previous_close * 100.0
    } else {
        0.0
    };
    let sign = if change >= 0.0 { "+" } else { "" };
    format!("{sign}{change:.2} ({})", format_percent(percent))
}

/// Render a price series as a one-line block sparkline
///
/// Gaps (None) are skipped; long series are downsampled to fit the
/// terminal. Returns an empty string for series without enough data.
pub fn sparkline(values: &[Option<f64>]) -> String {
    let points: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    if points.len() < 2 {
        return String::new();
    }

    let sampled = sample(&points, SPARK_WIDTH);
    let min = sampled.iter().copied().fold(f64::INFINITY, f64::min);
    let max = sampled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    sampled
        .iter()
        .map(|v| {
            let level = if span > f64::EPSILON {
                (((v - min) / span) * (SPARK_CHARS.len() - 1) as f64).round() as usize
            } else {
                0
            };
            SPARK_CHARS[level.min(SPARK_CHARS.len() - 1)]
        })
        .collect()
}

fn sample(points: &[f64], width: usize) -> Vec<f64> {
    if points.len() <= width {
        return points.to_vec();
    }
    (0..width)
        .map(|i| {
            let idx = i * (points.len() - 1) / (width - 1);
            points[idx]
        })
        .collect()
}

fn with_separators(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(1234.5, "USD"), "$1,234.50");
        assert_eq!(format_money(0.58, "USD"), "$0.58");
        assert_eq!(format_money(92.416, "EUR"), "92.42 EUR");
        assert_eq!(format_money(-12.0, "USD"), "$-12.00");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(2_950_000_000_000.0), "2.95T");
        assert_eq!(format_compact(1_200_000_000.0), "1.20B");
        assert_eq!(format_compact(345_600_000.0), "345.60M");
        assert_eq!(format_compact(12_300.0), "12.30K");
        assert_eq!(format_compact(187.42), "187.42");
    }

    #[test]
    fn test_format_percent_signs() {
        assert_eq!(format_percent(1.234), "+1.23%");
        assert_eq!(format_percent(-0.456), "-0.46%");
        assert_eq!(format_percent(0.0), "+0.00%");
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(101.0, 100.0), "+1.00 (+1.00%)");
        assert_eq!(format_change(99.0, 100.0), "-1.00 (-1.00%)");
        // Degraded payloads carry zeros, avoid dividing by them
        assert_eq!(format_change(0.0, 0.0), "+0.00 (+0.00%)");
    }

    #[test]
    fn test_sparkline_shape() {
        let series: Vec<Option<f64>> = vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        assert_eq!(sparkline(&series), "▁▃▆█");

        let flat: Vec<Option<f64>> = vec![Some(5.0), Some(5.0), Some(5.0)];
        assert_eq!(sparkline(&flat), "▁▁▁");
    }

    #[test]
    fn test_sparkline_skips_gaps_and_short_series() {
        let gappy: Vec<Option<f64>> = vec![None, Some(1.0), None, Some(3.0), None];
        assert_eq!(sparkline(&gappy).chars().count(), 2);

        assert_eq!(sparkline(&[Some(1.0)]), "");
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn test_sparkline_downsamples_long_series() {
        let long: Vec<Option<f64>> = (0..500).map(|i| Some(f64::from(i))).collect();
        assert_eq!(sparkline(&long).chars().count(), 60);
    }
}
