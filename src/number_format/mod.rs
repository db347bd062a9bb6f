// Renders f64 values the way a person would write them on paper: integers,
// small fractions, or a short decimal when no small fraction is close enough.

const ZERO_CUTOFF: f64 = 1e-14;
const INTEGER_TOLERANCE: f64 = 1e-12;
const DISPLAY_CLAMP: f64 = 1e-12;
const MAX_EXPANSION_STEPS: usize = 32;
const ACCEPTED_ERROR: f64 = 5e-8;
const REMAINDER_CUTOFF: f64 = 1e-15;
const SIGNIFICANT_DIGITS: usize = 6;

/// Largest denominator a fraction may be printed with.
pub const MAX_DENOMINATOR: i64 = 1000;
/// Longest text a single matrix cell or step value may take.
pub const CELL_CHARS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Convergent {
    numerator: i64,
    denominator: i64,
}

impl Convergent {
    fn value(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

/// Formats `x` as an integer (`"3"`), a fraction (`"-22/7"`) or, failing
/// both, a 6 significant digit decimal (`"3.14159"`).
pub fn format_fraction(x: f64) -> String {
    if !x.is_finite() {
        return if x.is_nan() { "NaN" } else { "inf" }.to_string();
    }
    if x.abs() < ZERO_CUTOFF {
        return "0".to_string();
    }
    let nearest = x.round();
    if (x - nearest).abs() < INTEGER_TOLERANCE {
        return format_integer(nearest);
    }
    match best_convergent(x.abs()) {
        Some(Convergent {
            numerator,
            denominator,
        }) => {
            let numerator = if x < 0.0 { -numerator } else { numerator };
            if denominator == 1 {
                numerator.to_string()
            } else {
                format!("{numerator}/{denominator}")
            }
        }
        None => general_decimal(x, SIGNIFICANT_DIGITS),
    }
}

/// Formats a value that is about to be shown inside a matrix or a step
/// description: round-off noise becomes a plain `0` and the text is capped
/// at [`CELL_CHARS`].
pub fn format_cell(v: f64) -> String {
    let v = if v.abs() < DISPLAY_CLAMP { 0.0 } else { v };
    truncate_chars(&format_fraction(v), CELL_CHARS)
}

/// Cuts `text` down to at most `max_chars` characters, never splitting one.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

fn format_integer(nearest: f64) -> String {
    if nearest == 0.0 {
        // covers -0.0 as well
        "0".to_string()
    } else {
        format!("{nearest:.0}")
    }
}

// Walks the continued fraction of `target` (which must be positive) and
// returns the first convergent that is close enough, or None when the
// denominator cap or the step budget is reached first.
fn best_convergent(target: f64) -> Option<Convergent> {
    let (mut p_prev, mut q_prev) = (0_i64, 1_i64);
    let (mut p_last, mut q_last) = (1_i64, 0_i64);
    let mut v = target;
    for _ in 0..MAX_EXPANSION_STEPS {
        let whole = v.floor();
        let a = whole as i64;
        let q = a.checked_mul(q_last)?.checked_add(q_prev)?;
        if q > MAX_DENOMINATOR {
            // no close fraction under the cap: print a decimal, not the last convergent
            return None;
        }
        let p = a.checked_mul(p_last)?.checked_add(p_prev)?;
        let candidate = Convergent {
            numerator: p,
            denominator: q,
        };
        if (candidate.value() - target).abs() < ACCEPTED_ERROR {
            return Some(candidate);
        }
        let remainder = v - whole;
        if remainder < REMAINDER_CUTOFF {
            // the expansion terminated, candidate is exact
            return Some(candidate);
        }
        (p_prev, q_prev, p_last, q_last) = (p_last, q_last, p, q);
        v = 1.0 / remainder;
    }
    None
}

// Same output as printf's `%.{significant}g`.
fn general_decimal(x: f64, significant: usize) -> String {
    let precision = significant.saturating_sub(1);
    let scientific = format!("{x:.precision$e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };
    if exponent < -4 || exponent >= significant as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            strip_trailing_zeros(mantissa),
            exponent.abs()
        )
    } else {
        let decimals = (significant as i32 - 1 - exponent).max(0) as usize;
        strip_trailing_zeros(&format!("{x:.decimals$}")).to_string()
    }
}

fn strip_trailing_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
