//! # Display Formatting and Answer Normalisation
//!
//! Dispensing notation is rigid: powers carry a sign and two decimals
//! (`+3.00`, `-1.50`), axes are three digits (`090`) and the horizontal
//! meridian is written `180`, never `000`. The bank's literal answers are
//! written in that notation, so every formatted result goes through here.
//!
//! [`normalize_answer`] folds a user's typed answer into the same canonical
//! form so `-2.00-1.50x180`, `-2 -1.5 x 180` and `-2.00 -1.50 × 180` all
//! compare equal.

use crate::formulas::prism::Direction;

/// Format a dioptric power with explicit sign and two decimals.
///
/// Zero (including `-0.0` and anything that rounds to zero) prints as
/// `0.00` so a plano meridian never shows a stray sign.
///
/// ```rust
/// use optics_core::format::format_power;
///
/// assert_eq!(format_power(3.0), "+3.00");
/// assert_eq!(format_power(-1.5), "-1.50");
/// assert_eq!(format_power(-0.0), "0.00");
/// ```
pub fn format_power(power: f64) -> String {
    if (power * 100.0).round() == 0.0 {
        "0.00".to_string()
    } else {
        format!("{:+.2}", power)
    }
}

/// Format a cylinder axis as three zero-padded digits, printing 0 as `180`.
///
/// ```rust
/// use optics_core::format::format_axis;
///
/// assert_eq!(format_axis(90), "090");
/// assert_eq!(format_axis(0), "180");
/// assert_eq!(format_axis(5), "005");
/// ```
pub fn format_axis(axis: u16) -> String {
    match axis % 180 {
        0 => "180".to_string(),
        a => format!("{:03}", a),
    }
}

/// Leniently read a numeric answer.
///
/// Accepts a leading `+`, a Unicode minus, and a trailing unit glued to the
/// number (`-5.60D`, `1.136×`, `2Δ`). Only the first whitespace-separated
/// token is read.
pub fn parse_numeric_answer(input: &str) -> Option<f64> {
    let cleaned = input.replace('\u{2212}', "-");
    let token = cleaned.split_whitespace().next()?;
    let trimmed = token
        .trim_start_matches('+')
        .trim_end_matches(|c: char| !(c.is_ascii_digit() || c == '.'));
    let value: f64 = trimmed.parse().ok()?;
    value.is_finite().then_some(value)
}

/// Fold a text answer into canonical comparison form.
///
/// - lower case, single spaces, trailing period dropped
/// - `×` read as `x`; an `x` between two numbers is split out as its own token,
///   as is a sign glued to the end of a previous number and a prism base
///   glued to its amount (`2.60bi`)
/// - numbers rewritten as signed two-decimal powers, `pl`/`plano` as `0.00`
/// - the token after `x` rewritten as a three-digit axis
pub fn normalize_answer(input: &str) -> String {
    let lowered = input
        .trim()
        .trim_end_matches('.')
        .to_lowercase()
        .replace('×', "x")
        .replace('\u{2212}', "-");

    let chars: Vec<char> = lowered.chars().collect();
    let mut spaced = String::with_capacity(lowered.len() + 8);
    for (i, c) in chars.iter().enumerate() {
        if *c == 'x' && is_axis_marker(&chars, i) {
            spaced.push_str(" x ");
        } else if (*c == '+' || *c == '-') && i > 0 && (chars[i - 1].is_ascii_digit() || chars[i - 1] == '.') {
            // "-2.00-1.50": sign glued to the previous number starts a new token
            spaced.push(' ');
            spaced.push(*c);
        } else {
            spaced.push(*c);
        }
    }

    let mut tokens: Vec<String> = Vec::new();
    let mut after_axis_marker = false;
    let pieces = spaced
        .split_whitespace()
        .map(|raw| raw.trim_end_matches([',', ';']))
        .filter(|token| !token.is_empty())
        .flat_map(split_base_suffix);
    for token in pieces {
        let normalized = if after_axis_marker {
            match token.parse::<u16>() {
                Ok(axis) if axis <= 180 => format_axis(axis),
                _ => token.to_string(),
            }
        } else if token == "pl" || token == "plano" {
            format_power(0.0)
        } else {
            match token.trim_start_matches('+').parse::<f64>() {
                Ok(value) if value.is_finite() => format_power(value),
                _ => token.to_string(),
            }
        };
        after_axis_marker = token == "x";
        tokens.push(normalized);
    }
    tokens.join(" ")
}

/// Split a prism base glued to its amount: `2.60bi` -> `2.60`, `bi`.
fn split_base_suffix(token: &str) -> Vec<&str> {
    for base in ["bi", "bo", "bu", "bd"] {
        if let Some(amount) = token.strip_suffix(base) {
            if amount.trim_start_matches('+').parse::<f64>().is_ok() {
                return vec![amount, base];
            }
        }
    }
    vec![token]
}

/// Horizontal direction word in an answer (`3 mm in`, `2 mm outward`).
///
/// Returns `In` for in/inward/nasal and `Out` for out/outward/temporal, or
/// `None` when the answer names neither.
pub fn horizontal_direction(input: &str) -> Option<Direction> {
    input
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphabetic()))
        .find_map(|word| match word {
            "in" | "inward" | "inwards" | "nasal" | "nasally" => Some(Direction::In),
            "out" | "outward" | "outwards" | "temporal" | "temporally" => Some(Direction::Out),
            _ => None,
        })
}

/// True when the `x` at `index` sits between two numbers (`-1.50x180`).
fn is_axis_marker(chars: &[char], index: usize) -> bool {
    let before = chars[..index].iter().rev().find(|c| !c.is_whitespace());
    let after = chars[index + 1..].iter().find(|c| !c.is_whitespace());
    matches!(before, Some(c) if c.is_ascii_digit() || *c == '.')
        && matches!(after, Some(c) if c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_power_rounding() {
        assert_eq!(format_power(0.375), "+0.38");
        assert_eq!(format_power(-5.597), "-5.60");
        assert_eq!(format_power(0.004), "0.00");
        assert_eq!(format_power(-0.004), "0.00");
    }

    #[test]
    fn test_format_axis_wraps() {
        assert_eq!(format_axis(180), "180");
        assert_eq!(format_axis(179), "179");
        assert_eq!(format_axis(45), "045");
    }

    #[test]
    fn test_parse_numeric_answer() {
        assert_eq!(parse_numeric_answer("+3.00"), Some(3.0));
        assert_eq!(parse_numeric_answer("-5.60 D"), Some(-5.6));
        assert_eq!(parse_numeric_answer("-5.60D"), Some(-5.6));
        assert_eq!(parse_numeric_answer("2Δ"), Some(2.0));
        assert_eq!(parse_numeric_answer("1.136×"), Some(1.136));
        assert_eq!(parse_numeric_answer("\u{2212}4.72"), Some(-4.72));
        assert_eq!(parse_numeric_answer("about four"), None);
        assert_eq!(parse_numeric_answer(""), None);
        assert_eq!(parse_numeric_answer("-"), None);
    }

    #[test]
    fn test_normalize_prescription_variants() {
        let canonical = normalize_answer("-2.00 -1.50 x 180");
        assert_eq!(canonical, "-2.00 -1.50 x 180");
        assert_eq!(normalize_answer("-2.00-1.50x180"), canonical);
        assert_eq!(normalize_answer("-2 -1.5 x 180"), canonical);
        assert_eq!(normalize_answer("-2.00 -1.50 × 0"), canonical);
        assert_eq!(normalize_answer("  -2.00   -1.50 X 180. "), canonical);
    }

    #[test]
    fn test_normalize_plano_and_prism() {
        assert_eq!(normalize_answer("pl +0.75 x 30"), normalize_answer("0.00 +0.75 x 030"));
        assert_eq!(normalize_answer("2.6 BI, 1.5 BU"), "+2.60 bi +1.50 bu");
    }

    #[test]
    fn test_normalize_splits_glued_base() {
        assert_eq!(normalize_answer("2.60BI 1.50BU"), normalize_answer("2.60 BI 1.50 BU"));
        assert_eq!(normalize_answer("1.8bo"), "+1.80 bo");
        // words ending in a base suffix are not numbers
        assert_eq!(normalize_answer("abd"), "abd");
    }

    #[test]
    fn test_horizontal_direction() {
        assert_eq!(horizontal_direction("3 mm in"), Some(Direction::In));
        assert_eq!(horizontal_direction("3mm Inward."), Some(Direction::In));
        assert_eq!(horizontal_direction("2 mm out"), Some(Direction::Out));
        assert_eq!(horizontal_direction("2, temporally"), Some(Direction::Out));
        assert_eq!(horizontal_direction("3 mm"), None);
        assert_eq!(horizontal_direction("inside"), None);
    }

    #[test]
    fn test_normalize_leaves_words_alone() {
        assert_eq!(
            normalize_answer("Poly is about 15% thinner."),
            "poly is about 15% thinner"
        );
        // the x in "max" is not an axis marker
        assert_eq!(normalize_answer("max 6"), "max +6.00");
    }
}
