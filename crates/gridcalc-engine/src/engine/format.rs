/// Format a number for display.
///
/// Integral values are shown without a fractional part; everything else
/// uses the shortest decimal form that round-trips.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

/// Format a number as it is substituted into an arithmetic expression.
pub(crate) fn format_operand(n: f64) -> String {
    if n == 0.0 { "0".to_string() } else { n.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-12.25), "-12.25");
        assert_eq!(format_number(f64::INFINITY), "#INF!");
    }

    #[test]
    fn test_format_operand_has_no_exponent() {
        assert_eq!(format_operand(1e21), "1000000000000000000000");
        assert_eq!(format_operand(-3.0), "-3");
    }
}
