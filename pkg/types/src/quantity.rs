//! Kubernetes resource quantities (`100m`, `1`, `512Mi`, `1e3`).
//!
//! Literals are parsed into an exact decimal `mantissa * 10^scale` so that
//! validation can inspect the sign and the builder can emit the canonical
//! string the API server would store.

use k8s_openapi::apimachinery::pkg::api::resource::Quantity as ApiQuantity;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while parsing a quantity literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("quantities must match the regular expression '^([+-]?[0-9.]+)([eEinumkKMGTP]*[-+]?[0-9]*)$'")]
    Format,
    #[error("unable to parse quantity's suffix")]
    Suffix,
    #[error("quantity is too large")]
    TooLarge,
}

/// Notation a quantity was written in; it decides the canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityFormat {
    /// `Ki`, `Mi`, ... `Ei`
    BinarySI,
    /// `n`, `u`, `m`, ``, `k`, `M`, ... `E`
    DecimalSI,
    /// `e3`, `E-6`, ...
    DecimalExponent,
}

const BINARY_SUFFIXES: [&str; 7] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];

// (suffix, power of ten), ordered by power.
const DECIMAL_SUFFIXES: [(&str, i32); 10] = [
    ("n", -9),
    ("u", -6),
    ("m", -3),
    ("", 0),
    ("k", 3),
    ("M", 6),
    ("G", 9),
    ("T", 12),
    ("P", 15),
    ("E", 18),
];

// Characters the suffix grammar admits; anything else is a format error.
const SUFFIX_ALPHABET: &str = "eEinumkKMGTP+-0123456789";

// Sub-nano precision is rounded up to this scale.
const MIN_SCALE: i32 = -9;
const MAX_SI_SCALE: i32 = 18;
const MAX_DIGITS: usize = 38;

/// A parsed resource quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantity {
    negative: bool,
    mantissa: u128,
    format: QuantityFormat,
    canonical: String,
}

impl Quantity {
    /// Parse a quantity literal such as `250m`, `1.5`, `128Mi` or `2e3`.
    pub fn parse(input: &str) -> Result<Self, QuantityError> {
        let (negative, rest) = match input.as_bytes().first() {
            Some(b'-') => (true, &input[1..]),
            Some(b'+') => (false, &input[1..]),
            Some(_) => (false, input),
            None => return Err(QuantityError::Format),
        };

        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_digits, mut rest) = rest.split_at(int_len);
        let mut frac_digits = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
            (frac_digits, rest) = after_dot.split_at(frac_len);
        }
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(QuantityError::Format);
        }

        let (format, exponent) = parse_suffix(rest)?;
        let (mut mantissa, mut scale) = parse_number(int_digits, frac_digits)?;

        match format {
            QuantityFormat::BinarySI => {
                mantissa = mantissa
                    .checked_mul(1u128 << exponent)
                    .ok_or(QuantityError::TooLarge)?;
            }
            QuantityFormat::DecimalSI | QuantityFormat::DecimalExponent => {
                scale = scale.checked_add(exponent).ok_or(QuantityError::TooLarge)?;
            }
        }

        let (mantissa, scale) = normalize(mantissa, scale)
            .and_then(round_to_nano)
            .ok_or(QuantityError::TooLarge)?;
        let (negative, scale) = if mantissa == 0 { (false, 0) } else { (negative, scale) };
        let canonical =
            canonicalize(negative, mantissa, scale, format).ok_or(QuantityError::TooLarge)?;

        Ok(Self {
            negative,
            mantissa,
            format,
            canonical,
        })
    }

    /// Sign of the value: `Less` for negative, `Equal` for zero, `Greater` for positive.
    pub fn sign(&self) -> Ordering {
        if self.mantissa == 0 {
            Ordering::Equal
        } else if self.negative {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    pub fn is_positive(&self) -> bool {
        self.sign() == Ordering::Greater
    }

    pub fn format(&self) -> QuantityFormat {
        self.format
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl From<&Quantity> for ApiQuantity {
    fn from(q: &Quantity) -> Self {
        ApiQuantity(q.canonical.clone())
    }
}

/// Returns the notation and the exponent (power of ten, or power of two for binary SI).
fn parse_suffix(suffix: &str) -> Result<(QuantityFormat, i32), QuantityError> {
    if let Some(idx) = BINARY_SUFFIXES[1..].iter().position(|s| *s == suffix) {
        return Ok((QuantityFormat::BinarySI, 10 * (idx as i32 + 1)));
    }
    if let Some((_, power)) = DECIMAL_SUFFIXES.iter().find(|(s, _)| *s == suffix) {
        return Ok((QuantityFormat::DecimalSI, *power));
    }
    if let Some(exp) = suffix.strip_prefix(['e', 'E']) {
        let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            let power = exp.parse::<i32>().map_err(|_| QuantityError::TooLarge)?;
            return Ok((QuantityFormat::DecimalExponent, power));
        }
    }
    if suffix.chars().all(|c| SUFFIX_ALPHABET.contains(c)) {
        Err(QuantityError::Suffix)
    } else {
        Err(QuantityError::Format)
    }
}

fn parse_number(int_digits: &str, frac_digits: &str) -> Result<(u128, i32), QuantityError> {
    let frac_digits = frac_digits.trim_end_matches('0');
    let digits = format!("{}{}", int_digits, frac_digits);
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok((0, 0));
    }
    // Trailing integer zeros only remain when there is no fraction.
    let significant = digits.trim_end_matches('0');
    if significant.len() > MAX_DIGITS {
        return Err(QuantityError::TooLarge);
    }
    let zeros = i32::try_from(digits.len() - significant.len()).map_err(|_| QuantityError::TooLarge)?;
    let frac_len = i32::try_from(frac_digits.len()).map_err(|_| QuantityError::TooLarge)?;
    let mantissa = significant.parse::<u128>().map_err(|_| QuantityError::TooLarge)?;
    Ok((mantissa, zeros - frac_len))
}

/// Strip trailing decimal zeros from the mantissa into the scale.
/// `None` when the scale leaves the `i32` range.
fn normalize(mut mantissa: u128, mut scale: i32) -> Option<(u128, i32)> {
    if mantissa == 0 {
        return Some((0, 0));
    }
    while mantissa % 10 == 0 {
        mantissa /= 10;
        scale = scale.checked_add(1)?;
    }
    Some((mantissa, scale))
}

/// Round the magnitude up to whole nano units.
fn round_to_nano((mantissa, scale): (u128, i32)) -> Option<(u128, i32)> {
    if mantissa == 0 || scale >= MIN_SCALE {
        return Some((mantissa, scale));
    }
    let shift = (MIN_SCALE - scale) as u32;
    let rounded = match 10u128.checked_pow(shift) {
        Some(divisor) => mantissa / divisor + u128::from(mantissa % divisor != 0),
        None => 1,
    };
    normalize(rounded, MIN_SCALE)
}

fn canonicalize(negative: bool, mantissa: u128, scale: i32, format: QuantityFormat) -> Option<String> {
    if mantissa == 0 {
        return Some("0".to_string());
    }
    let sign = if negative { "-" } else { "" };

    if format == QuantityFormat::BinarySI && scale >= 0 {
        let mut value = mantissa.checked_mul(10u128.checked_pow(scale as u32)?)?;
        if value >= 1024 {
            let mut idx = 0;
            while idx + 1 < BINARY_SUFFIXES.len() && value % 1024 == 0 {
                value /= 1024;
                idx += 1;
            }
            return Some(format!("{}{}{}", sign, value, BINARY_SUFFIXES[idx]));
        }
    }

    let mut exponent = scale.div_euclid(3) * 3;
    if format != QuantityFormat::DecimalExponent {
        exponent = exponent.clamp(MIN_SCALE, MAX_SI_SCALE);
    }
    let shift = u32::try_from(scale - exponent).ok()?;
    let value = mantissa.checked_mul(10u128.checked_pow(shift)?)?;

    let suffix = match format {
        QuantityFormat::DecimalExponent if exponent != 0 => format!("e{}", exponent),
        QuantityFormat::DecimalExponent => String::new(),
        _ => DECIMAL_SUFFIXES
            .iter()
            .find(|(_, power)| *power == exponent)
            .map(|(s, _)| s.to_string())?,
    };
    Some(format!("{}{}{}", sign, value, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(s: &str) -> String {
        Quantity::parse(s).unwrap().to_string()
    }

    #[test]
    fn test_canonical_round_trip() {
        assert_eq!(canonical("1"), "1");
        assert_eq!(canonical("100m"), "100m");
        assert_eq!(canonical("512Mi"), "512Mi");
        assert_eq!(canonical("128Mi"), "128Mi");
        assert_eq!(canonical("2k"), "2k");
        assert_eq!(canonical("1Gi"), "1Gi");
    }

    #[test]
    fn test_canonical_rescaling() {
        assert_eq!(canonical("1000m"), "1");
        assert_eq!(canonical("0.5"), "500m");
        assert_eq!(canonical("1.5"), "1500m");
        assert_eq!(canonical("1500"), "1500");
        assert_eq!(canonical("+250m"), "250m");
        assert_eq!(canonical(".5"), "500m");
        assert_eq!(canonical("1."), "1");
    }

    #[test]
    fn test_binary_canonical() {
        assert_eq!(canonical("1.5Ki"), "1536");
        assert_eq!(canonical("1024Mi"), "1Gi");
        assert_eq!(canonical("1.5Gi"), "1536Mi");
        assert_eq!(canonical("0.5Ki"), "512");
    }

    #[test]
    fn test_exponent_canonical() {
        assert_eq!(canonical("1e3"), "1e3");
        assert_eq!(canonical("1E6"), "1e6");
        assert_eq!(canonical("10e3"), "10e3");
        assert_eq!(canonical("1e-3"), "1e-3");
    }

    #[test]
    fn test_sub_nano_rounds_up() {
        assert_eq!(canonical("0.0000000001"), "1n");
        assert_eq!(canonical("1.0000000001"), "1000000001n");
    }

    #[test]
    fn test_sign() {
        assert_eq!(Quantity::parse("1").unwrap().sign(), Ordering::Greater);
        assert_eq!(Quantity::parse("0").unwrap().sign(), Ordering::Equal);
        assert_eq!(Quantity::parse("-0").unwrap().sign(), Ordering::Equal);
        assert_eq!(Quantity::parse("0Mi").unwrap().sign(), Ordering::Equal);
        assert_eq!(Quantity::parse("-1").unwrap().sign(), Ordering::Less);
        assert_eq!(Quantity::parse("-128Mi").unwrap().to_string(), "-128Mi");
        assert!(!Quantity::parse("-100m").unwrap().is_positive());
    }

    #[test]
    fn test_format_errors() {
        for bad in ["", "abc", "-", ".", "1.5.5", "1 ", " 1", "1Kb", "1KiB", "Mi", "1x"] {
            assert_eq!(Quantity::parse(bad), Err(QuantityError::Format), "input {:?}", bad);
        }
    }

    #[test]
    fn test_suffix_errors() {
        for bad in ["1K", "1mi", "1e", "1Mm"] {
            assert_eq!(Quantity::parse(bad), Err(QuantityError::Suffix), "input {:?}", bad);
        }
    }

    #[test]
    fn test_too_large() {
        assert_eq!(
            Quantity::parse(&"9".repeat(40)),
            Err(QuantityError::TooLarge)
        );
        assert_eq!(Quantity::parse("1e99999999999"), Err(QuantityError::TooLarge));
    }

    #[test]
    fn test_exponent_overflow_after_normalizing() {
        assert_eq!(canonical("1e2147483647"), "10e2147483646");
        assert_eq!(
            Quantity::parse("10e2147483647"),
            Err(QuantityError::TooLarge)
        );
        assert_eq!(
            Quantity::parse("1000e2147483646"),
            Err(QuantityError::TooLarge)
        );
    }

    #[test]
    fn test_trailing_integer_zeros_fold_into_scale() {
        let big = format!("1{}", "0".repeat(39));
        assert_eq!(canonical(&big), format!("1{}E", "0".repeat(21)));
        assert_eq!(canonical(&format!("{}e-30", big)), "1e9");
        assert_eq!(canonical("1500000"), "1500k");
    }

    #[test]
    fn test_api_quantity_conversion() {
        let q = Quantity::parse("1000m").unwrap();
        assert_eq!(ApiQuantity::from(&q).0, "1");
    }
}
