//! Line parser for the metrics feed.
//!
//! Each feed line is matched independently against the fixed metric table
//! ([`Metric::ALL`]); the table replaces the per-line regex compilation and
//! reflection-driven field lookup a naive port would reach for. Lines that
//! match nothing are skipped silently, so the parser never fails.

use airkit_types::{Metric, ParseError, ParseResult};
use tracing::debug;

/// Parse a whole feed body into `(metric, value)` pairs, in line order.
///
/// Lines that match no known metric contribute nothing, as do matched lines
/// with a malformed number. Duplicate lines for the same metric all appear in
/// the output; applying them in order makes the last one win.
#[must_use]
pub fn parse_metrics(body: &str) -> Vec<(Metric, f64)> {
    body.lines().filter_map(parse_line).collect()
}

/// Parse a single feed line.
///
/// A line matches when it begins with a known metric name, immediately
/// followed by whitespace and a signed decimal number (`900`, `21.5`, `-3`,
/// `.5`). Text after the number is ignored.
///
/// # Examples
///
/// ```
/// use airkit_core::parse_line;
/// use airkit_types::Metric;
///
/// assert_eq!(parse_line("co2 900"), Some((Metric::Co2, 900.0)));
/// assert_eq!(parse_line("ambient_temperature 21.5"), Some((Metric::Temperature, 21.5)));
/// assert_eq!(parse_line("# HELP co2 CO2 in ppm"), None);
/// assert_eq!(parse_line("co2 n/a"), None);
/// ```
#[must_use]
pub fn parse_line(line: &str) -> Option<(Metric, f64)> {
    for metric in Metric::ALL {
        let Some(rest) = line.strip_prefix(metric.name()) else {
            continue;
        };

        // The name must end at a delimiter: "co2_total 5" is not a co2 line.
        if !rest.chars().next().is_some_and(char::is_whitespace) {
            continue;
        }

        return match parse_number(rest.trim_start()) {
            Ok(value) => Some((metric, value)),
            Err(err) => {
                debug!(line, %err, "skipping metric line with malformed number");
                None
            }
        };
    }

    None
}

/// Parse the leading signed decimal from `payload`, ignoring trailing text.
fn parse_number(payload: &str) -> ParseResult<f64> {
    let bytes = payload.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let int_digits = end - int_start;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut i = frac_start;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        frac_digits = i - frac_start;
        // A bare trailing dot ("21.") is not part of the number.
        if frac_digits > 0 {
            end = i;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return Err(ParseError::InvalidNumber(payload.to_string()));
    }

    payload[..end]
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidNumber(payload.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_lines_extract_exactly() {
        assert_eq!(parse_line("co2 900"), Some((Metric::Co2, 900.0)));
        assert_eq!(
            parse_line("ambient_temperature 21.5"),
            Some((Metric::Temperature, 21.5))
        );
        assert_eq!(
            parse_line("ambient_humidity 40.2"),
            Some((Metric::Humidity, 40.2))
        );
    }

    #[test]
    fn test_signed_and_fractional_forms() {
        assert_eq!(parse_line("ambient_temperature -3"), Some((Metric::Temperature, -3.0)));
        assert_eq!(parse_line("ambient_temperature +4.25"), Some((Metric::Temperature, 4.25)));
        assert_eq!(parse_line("ambient_temperature -.5"), Some((Metric::Temperature, -0.5)));
        assert_eq!(parse_line("ambient_humidity .5"), Some((Metric::Humidity, 0.5)));
    }

    #[test]
    fn test_trailing_text_after_number_is_ignored() {
        assert_eq!(parse_line("co2 900 ppm"), Some((Metric::Co2, 900.0)));
        assert_eq!(parse_line("co2 900abc"), Some((Metric::Co2, 900.0)));
        // The fractional part stops at the second dot.
        assert_eq!(parse_line("co2 1.2.3"), Some((Metric::Co2, 1.2)));
    }

    #[test]
    fn test_name_must_end_at_whitespace() {
        assert_eq!(parse_line("co2_total 5"), None);
        assert_eq!(parse_line("ambient_temperature_max 99"), None);
        assert_eq!(parse_line("co2"), None);
        assert_eq!(parse_line("co2900"), None);
    }

    #[test]
    fn test_name_must_anchor_at_line_start() {
        assert_eq!(parse_line(" co2 900"), None);
        assert_eq!(parse_line("# co2 900"), None);
        assert_eq!(parse_line("total_co2 900"), None);
    }

    #[test]
    fn test_malformed_numbers_are_skipped() {
        assert_eq!(parse_line("co2 n/a"), None);
        assert_eq!(parse_line("co2 -"), None);
        assert_eq!(parse_line("co2 ."), None);
        assert_eq!(parse_line("co2 "), None);
        assert_eq!(parse_line("ambient_temperature NaN"), None);
    }

    #[test]
    fn test_unknown_lines_extract_nothing() {
        let body = "# HELP co2 CO2 concentration\n\
                    scd4x_uptime_seconds 4211\n\
                    \n\
                    pressure 1013.2\n";
        assert!(parse_metrics(body).is_empty());
    }

    #[test]
    fn test_body_parses_in_line_order() {
        let body = "ambient_temperature 21.5\nambient_humidity 40.2\nco2 900\n";
        assert_eq!(
            parse_metrics(body),
            vec![
                (Metric::Temperature, 21.5),
                (Metric::Humidity, 40.2),
                (Metric::Co2, 900.0),
            ]
        );
    }

    #[test]
    fn test_duplicate_lines_all_appear_in_order() {
        // Last match wins once the pairs are applied in order.
        let body = "co2 800\nco2 950\n";
        assert_eq!(
            parse_metrics(body),
            vec![(Metric::Co2, 800.0), (Metric::Co2, 950.0)]
        );
    }

    #[test]
    fn test_mixed_body_keeps_only_matches() {
        let body = "# comment\nco2 912\njunk line\nambient_humidity bad\nambient_temperature 19.75\n";
        assert_eq!(
            parse_metrics(body),
            vec![(Metric::Co2, 912.0), (Metric::Temperature, 19.75)]
        );
    }

    #[test]
    fn test_parse_number_bare_trailing_dot() {
        // "21." parses as 21; the dot is trailing text.
        assert_eq!(parse_line("co2 21."), Some((Metric::Co2, 21.0)));
    }
}
