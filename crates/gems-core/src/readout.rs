//! Readout text formatting
//!
//! Readouts show a value with exactly two decimals. The value is taken in
//! its shortest decimal form (what `f32::to_string` prints) and rounded half
//! away from zero on those digits, so `0.125` reads `0.13` and `-0.005`
//! reads `-0.01` regardless of how the float is stored in binary.
//! A result of zero never carries a sign.

/// Format a value for a readout
pub fn format_readout(value: f32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    // Display for floats never uses exponent notation.
    let repr = value.abs().to_string();
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let frac = frac_part.as_bytes();
    let frac_digit = |i: usize| frac.get(i).map_or(0, |b| b - b'0');

    let mut digits: Vec<u8> = int_part.bytes().map(|b| b - b'0').collect();
    digits.push(frac_digit(0));
    digits.push(frac_digit(1));

    if frac_digit(2) >= 5 {
        round_up(&mut digits);
    }

    let negative = value.is_sign_negative() && digits.iter().any(|&d| d != 0);
    let split = digits.len() - 2;

    let mut out = String::with_capacity(digits.len() + 2);
    if negative {
        out.push('-');
    }
    out.extend(digits[..split].iter().map(|&d| char::from(b'0' + d)));
    out.push('.');
    out.extend(digits[split..].iter().map(|&d| char::from(b'0' + d)));
    out
}

fn round_up(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == 9 {
            *d = 0;
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_readout_basic() {
        assert_eq!(format_readout(0.12345), "0.12");
        assert_eq!(format_readout(15.0), "15.00");
        assert_eq!(format_readout(-10.0), "-10.00");
        assert_eq!(format_readout(0.0), "0.00");
        assert_eq!(format_readout(1.0), "1.00");
        assert_eq!(format_readout(0.5), "0.50");
    }

    #[test]
    fn test_readout_half_away_from_zero() {
        assert_eq!(format_readout(-0.005), "-0.01");
        assert_eq!(format_readout(0.005), "0.01");
        assert_eq!(format_readout(0.125), "0.13");
        assert_eq!(format_readout(-2.675), "-2.68");
    }

    #[test]
    fn test_readout_carry() {
        assert_eq!(format_readout(0.995), "1.00");
        assert_eq!(format_readout(9.999), "10.00");
        assert_eq!(format_readout(-99.996), "-100.00");
    }

    #[test]
    fn test_readout_no_negative_zero() {
        assert_eq!(format_readout(-0.0), "0.00");
        assert_eq!(format_readout(-0.004), "0.00");
    }

    #[test]
    fn test_readout_no_exponent() {
        assert_eq!(format_readout(1e-7), "0.00");
        assert_eq!(format_readout(1e7), "10000000.00");
    }

    proptest! {
        #[test]
        fn prop_readout_two_decimals_and_close(value in -1000.0f32..1000.0) {
            let text = format_readout(value);
            let (_, frac) = text.split_once('.').unwrap();
            prop_assert_eq!(frac.len(), 2);

            let parsed: f64 = text.parse().unwrap();
            prop_assert!((parsed - value as f64).abs() <= 0.005 + 1e-4);
        }
    }
}
