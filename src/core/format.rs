//! Purpose: Render doubles the way C's `%g` conversion does (six significant digits).
//! Exports: `format_general`.
//! Role: Number rendering for `Value::to_debug_string`; not a JSON number serializer.
//! Invariants: Output never carries trailing fractional zeros or a dangling decimal point.
//! Invariants: Exponent form is used when the decimal exponent is < -4 or >= the precision.

const GENERAL_PRECISION: i32 = 6;

pub fn format_general(n: f64) -> String {
    if n.is_nan() {
        return if n.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if n.is_infinite() {
        return if n < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if n == 0.0 {
        return if n.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Round to the target precision first so the exponent reflects carries (999999.5 -> 1e+06).
    let scientific = format!("{:.*e}", (GENERAL_PRECISION - 1) as usize, n);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= GENERAL_PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exponent.abs())
    } else {
        let decimals = (GENERAL_PRECISION - 1 - exponent) as usize;
        trim_fraction(&format!("{n:.decimals$}")).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::format_general;

    #[test]
    fn fixed_notation_trims_zeros() {
        assert_eq!(format_general(42.4), "42.4");
        assert_eq!(format_general(42.0), "42");
        assert_eq!(format_general(-2.5), "-2.5");
        assert_eq!(format_general(0.0001), "0.0001");
        assert_eq!(format_general(123456.0), "123456");
    }

    #[test]
    fn precision_is_six_significant_digits() {
        assert_eq!(format_general(3.14159265), "3.14159");
        assert_eq!(format_general(1234567.0), "1.23457e+06");
    }

    #[test]
    fn exponent_form_for_small_and_large_magnitudes() {
        assert_eq!(format_general(0.00001), "1e-05");
        assert_eq!(format_general(1e21), "1e+21");
        assert_eq!(format_general(-2.5e-7), "-2.5e-07");
        assert_eq!(format_general(999999.5), "1e+06");
    }

    #[test]
    fn non_finite_and_zero() {
        assert_eq!(format_general(f64::NAN), "nan");
        assert_eq!(format_general(f64::INFINITY), "inf");
        assert_eq!(format_general(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_general(0.0), "0");
        assert_eq!(format_general(-0.0), "-0");
    }
}
