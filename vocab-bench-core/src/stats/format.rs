/// Formats a number for reports.
///
/// - integral values print bare (`42`, `-3`)
/// - magnitudes in `(0.001, 1000)` keep 3 significant digits (`0.123`, `12.3`)
/// - everything else uses scientific notation with 3 decimals (`2.656e-05`)
/// - NaN and infinities print as `nan`, `inf`, `-inf`
pub fn custom_format(num: f64) -> String {
	if num.is_nan() {
		return "nan".to_owned();
	}
	if num.is_infinite() {
		return if num > 0.0 { "inf" } else { "-inf" }.to_owned();
	}
	if num == 0.0 {
		return "0".to_owned();
	}
	if num == num.trunc() {
		return format!("{num:.0}");
	}
	if 0.001 < num.abs() && num.abs() < 1000.0 {
		return general(num, 3);
	}
	scientific(num, 3)
}

/// Splits Rust's `{:e}` output into mantissa and exponent.
fn split_exp(formatted: &str) -> (&str, i32) {
	match formatted.split_once('e') {
		Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or(0)),
		None => (formatted, 0),
	}
}

fn strip_zeros(s: &str) -> &str {
	if s.contains('.') {
		s.trim_end_matches('0').trim_end_matches('.')
	} else {
		s
	}
}

fn exponent_suffix(exp: i32) -> String {
	let sign = if exp < 0 { '-' } else { '+' };
	format!("e{sign}{:02}", exp.abs())
}

/// Scientific notation with `decimals` digits after the point and a
/// signed, two-digit exponent.
fn scientific(num: f64, decimals: usize) -> String {
	let formatted = format!("{num:.decimals$e}");
	let (mantissa, exp) = split_exp(&formatted);
	format!("{mantissa}{}", exponent_suffix(exp))
}

/// `%g`-style formatting with `digits` significant digits.
fn general(num: f64, digits: usize) -> String {
	let formatted = format!("{num:.prec$e}", prec = digits - 1);
	let (mantissa, exp) = split_exp(&formatted);
	if exp < -4 || exp >= digits as i32 {
		return format!("{}{}", strip_zeros(mantissa), exponent_suffix(exp));
	}
	let decimals = (digits as i32 - 1 - exp).max(0) as usize;
	strip_zeros(&format!("{num:.decimals$}")).to_owned()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn integers_print_bare() {
		assert_eq!(custom_format(42.0), "42");
		assert_eq!(custom_format(-3.0), "-3");
		assert_eq!(custom_format(0.0), "0");
		assert_eq!(custom_format(-0.0), "0");
		assert_eq!(custom_format(1e6), "1000000");
	}

	#[test]
	fn moderate_values_keep_three_digits() {
		assert_eq!(custom_format(0.12345), "0.123");
		assert_eq!(custom_format(12.345), "12.3");
		assert_eq!(custom_format(123.45), "123");
		assert_eq!(custom_format(0.0012345), "0.00123");
		assert_eq!(custom_format(-0.5), "-0.5");
		assert_eq!(custom_format(999.7), "1e+03");
	}

	#[test]
	fn extreme_values_use_scientific_notation() {
		assert_eq!(custom_format(2.6561e-5), "2.656e-05");
		assert_eq!(custom_format(0.000_5), "5.000e-04");
		assert_eq!(custom_format(1234.56), "1.235e+03");
	}

	#[test]
	fn non_finite_values() {
		assert_eq!(custom_format(f64::NAN), "nan");
		assert_eq!(custom_format(f64::INFINITY), "inf");
	}
}
