/// Parses a report money cell.
///
/// Comma thousands separators are removed, then the longest leading decimal
/// number is read, so trailing text such as a currency code is ignored.
/// Missing, blank, non-numeric and non-finite values all read as `0.0`.
pub fn parse_amount(raw: Option<&str>) -> f64 {
    let Some(value) = raw else {
        return 0.0;
    };

    let cleaned = value.replace(',', "");
    let number = leading_number(cleaned.trim_start());
    if number.is_empty() {
        return 0.0;
    }

    match number.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => parsed,
        _ => 0.0,
    }
}

/// Longest prefix shaped like `[+-]digits[.digits][e[+-]digits]` holding at
/// least one digit in its mantissa. Empty when there is none.
fn leading_number(text: &str) -> &str {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let integer_digits = count_digits(&bytes[end..]);
    end += integer_digits;

    let mut fraction_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction_digits = count_digits(&bytes[end + 1..]);
        if integer_digits > 0 || fraction_digits > 0 {
            end += 1 + fraction_digits;
        }
    }

    if integer_digits == 0 && fraction_digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_digits = count_digits(&bytes[exponent..]);
        if exponent_digits > 0 {
            end = exponent + exponent_digits;
        }
    }

    &text[..end]
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}
