//! Numeric figure extraction and summation over OCR fragments.

use regex::Regex;
use std::sync::LazyLock;

use crate::errors::ExtractionError;
use crate::models::{ExtractionResult, RecognizedFragment};

/// Integers and simple decimals. No sign, no exponent, at most one decimal point.
static FIGURE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("figure pattern is valid")
});

pub const FORMULA_SEPARATOR: &str = " + ";

/// Scan every fragment for numeric figures, in fragment order then match order.
///
/// Commas are stripped first so thousands separators do not split a number
/// ("1,234" is read as 1234). Confidence is not used.
pub fn extract_figures(fragments: &[RecognizedFragment]) -> Vec<f64> {
    fragments
        .iter()
        .flat_map(|fragment| figures_in_text(&fragment.text))
        .collect()
}

fn figures_in_text(text: &str) -> Vec<f64> {
    let without_commas = text.replace(',', "");
    FIGURE_PATTERN
        .find_iter(&without_commas)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

/// Build the `formula`/`result` pair, or [`ExtractionError::NoFiguresFound`] for no figures.
pub fn build_result(figures: &[f64]) -> Result<ExtractionResult, ExtractionError> {
    if figures.is_empty() {
        return Err(ExtractionError::NoFiguresFound);
    }

    let formula = figures
        .iter()
        .map(|figure| format_figure(*figure))
        .collect::<Vec<_>>()
        .join(FORMULA_SEPARATOR);
    let total: f64 = figures.iter().fold(0.0, |acc, figure| acc + figure);

    Ok(ExtractionResult {
        formula,
        result: format_figure(total),
    })
}

/// Render a float in its shortest round-trip form.
///
/// Integral values keep a trailing `.0` ("12.0"). Decimal exponents in `-4..16`
/// use plain notation; anything else switches to scientific notation with a
/// signed, two-digit minimum exponent ("1e+16", "2.5e-07").
pub fn format_figure(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. "-1.2345e3"
    let scientific = format!("{:e}", value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value.to_string();
    };

    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if (-4..16).contains(&exponent) {
        if exponent >= 0 {
            let integer_len = exponent as usize + 1;
            if digits.len() <= integer_len {
                format!("{}{}{}.0", sign, digits, "0".repeat(integer_len - digits.len()))
            } else {
                let (integer, fraction) = digits.split_at(integer_len);
                format!("{}{}.{}", sign, integer, fraction)
            }
        } else {
            let leading_zeros = "0".repeat((-exponent - 1) as usize);
            format!("{}0.{}{}", sign, leading_zeros, digits)
        }
    } else {
        let (head, tail) = digits.split_at(1);
        let fraction = if tail.is_empty() {
            String::new()
        } else {
            format!(".{}", tail)
        };
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        format!("{}{}{}e{}{:02}", sign, head, fraction, exponent_sign, exponent.abs())
    }
}
