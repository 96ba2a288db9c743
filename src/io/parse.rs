//! Comma-separated number lists, as typed into a text box.
//!
//! `"0, 0.5, 1, 2"` parses to `[0.0, 0.5, 1.0, 2.0]`. Every entry must be a
//! number; empty entries are rejected rather than skipped so a stray comma
//! cannot silently shift the pairing of x and y.

use crate::error::AppError;

/// Parse a comma-separated list of numbers.
pub fn parse_number_list(text: &str, label: &str) -> Result<Vec<f64>, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::new(2, format!("No values given for {label}.")));
    }

    text.split(',')
        .enumerate()
        .map(|(i, token)| {
            let token = token.trim();
            if token.is_empty() {
                return Err(AppError::new(
                    2,
                    format!("Empty entry at position {} in {label}.", i + 1),
                ));
            }
            token.parse::<f64>().map_err(|_| {
                AppError::new(
                    2,
                    format!("Invalid number '{token}' at position {} in {label}.", i + 1),
                )
            })
        })
        .collect()
}

/// Inverse of `parse_number_list`, for printing generated samples.
pub fn format_number_list(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v}")).collect();
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_sample_text() {
        let v = parse_number_list("0, 0.5, 1, 2, 5, 10, 20, 50, 100", "x").unwrap();
        assert_eq!(v, vec![0.0, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0]);
    }

    #[test]
    fn tolerates_whitespace_and_scientific_notation() {
        let v = parse_number_list("  1e-3 ,2.5E1,\t-4 ", "y").unwrap();
        assert_eq!(v, vec![0.001, 25.0, -4.0]);
    }

    #[test]
    fn rejects_bad_token_with_position() {
        let err = parse_number_list("1, two, 3", "x").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("'two' at position 2"));
    }

    #[test]
    fn rejects_trailing_comma() {
        let err = parse_number_list("1, 2,", "y").unwrap_err();
        assert!(err.to_string().contains("position 3"));
    }

    #[test]
    fn rejects_blank_input() {
        assert!(parse_number_list("   ", "x").is_err());
    }

    #[test]
    fn format_then_parse_preserves_values() {
        let values = [0.0, 0.125, 1.02, 100.0];
        let text = format_number_list(&values);
        assert_eq!(parse_number_list(&text, "x").unwrap(), values);
    }
}
