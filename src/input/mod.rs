use thiserror::Error;

use crate::elimination::matrix::SystemShape;

// anything closer to zero than this is refused as a denominator
const MIN_DENOMINATOR: f64 = 1e-18;

#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("'{0}' is not a number or a fraction")]
    Malformed(String),
    #[error("'{0}' divides by zero")]
    ZeroDenominator(String),
}

/// Reads a decimal (`-1.5`, `2e3`) or a fraction (`-3/4`, `1/-2`). Blank
/// text counts as `0`.
pub fn parse_number(text: &str) -> Result<f64, InputError> {
    let trimmed = text.trim_matches(|c: char| c == ' ' || c == '\t');
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    let malformed = || InputError::Malformed(trimmed.to_string());
    match trimmed.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator.trim().parse().map_err(|_| malformed())?;
            let denominator: f64 = denominator.trim().parse().map_err(|_| malformed())?;
            if denominator.abs() < MIN_DENOMINATOR {
                return Err(InputError::ZeroDenominator(trimmed.to_string()));
            }
            Ok(numerator / denominator)
        }
        None => trimmed.parse().map_err(|_| malformed()),
    }
}

/// Picks the shape for a `rows x cols` request, falling back to 2x3 with a
/// warning when the pair is not supported.
pub fn resolve_shape(rows: usize, cols: usize) -> SystemShape {
    SystemShape::from_dimensions(rows, cols).unwrap_or_else(|| {
        log::warn!("only 2x3 or 3x4 allowed, got {rows}x{cols}; using 2x3");
        SystemShape::TwoByThree
    })
}

/// Prompt for cell `(r, c)` of an augmented matrix of the given shape, 1-based.
pub fn cell_prompt(shape: SystemShape, r: usize, c: usize) -> String {
    if c == shape.cols() - 1 {
        format!("Enter b[{}]: ", r + 1)
    } else {
        format!("Enter A[{},{}]: ", r + 1, c + 1)
    }
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn parses_decimals() {
        assert_eq!(parse_number("2"), Ok(2.0));
        assert_eq!(parse_number("  -1.25\t"), Ok(-1.25));
        assert_eq!(parse_number("+3e2"), Ok(300.0));
        assert_eq!(parse_number(""), Ok(0.0));
        assert_eq!(parse_number("   "), Ok(0.0));
    }

    #[test]
    fn parses_fractions_with_signs_on_either_side() {
        assert_eq!(parse_number("3/4"), Ok(0.75));
        assert_eq!(parse_number("-3/4"), Ok(-0.75));
        assert_eq!(parse_number("3/-4"), Ok(-0.75));
        assert_eq!(parse_number("-3/-4"), Ok(0.75));
        assert_abs_diff_eq!(parse_number("1/3").unwrap(), 1.0 / 3.0);
    }

    #[test]
    fn rejects_bad_text() {
        assert_eq!(
            parse_number("abc"),
            Err(InputError::Malformed("abc".to_string()))
        );
        assert!(matches!(parse_number("1/2/3"), Err(InputError::Malformed(_))));
        assert!(matches!(parse_number("/2"), Err(InputError::Malformed(_))));
        assert_eq!(
            parse_number("5/0"),
            Err(InputError::ZeroDenominator("5/0".to_string()))
        );
        assert!(matches!(parse_number("1/1e-19"), Err(InputError::ZeroDenominator(_))));
    }

    #[test]
    fn unsupported_dimensions_fall_back_to_two_by_three() {
        assert_eq!(resolve_shape(3, 4), SystemShape::ThreeByFour);
        assert_eq!(resolve_shape(2, 3), SystemShape::TwoByThree);
        assert_eq!(resolve_shape(3, 3), SystemShape::TwoByThree);
        assert_eq!(resolve_shape(7, 8), SystemShape::TwoByThree);
    }

    #[test]
    fn prompts_name_the_cell() {
        assert_eq!(cell_prompt(SystemShape::TwoByThree, 0, 1), "Enter A[1,2]: ");
        assert_eq!(cell_prompt(SystemShape::TwoByThree, 1, 2), "Enter b[2]: ");
    }
}
