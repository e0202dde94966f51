use crate::{ErrorKind, ExtractError};

/// Reconstruct a `d,dd` decimal-comma number embedded in markup.
///
/// Only the character right before the first comma is read as the integer
/// digit; the two characters right after it are the fraction. Anything else
/// in the fragment (tags, attributes, whitespace) is ignored.
///
/// `"<td class=xl2525883>1,23</td>"` yields `1.23`.
pub fn parse_decimal(fragment: &str) -> Result<f64, ExtractError> {
    let (head, tail) = fragment
        .split_once(',')
        .ok_or_else(|| malformed(fragment, "no decimal comma"))?;

    let integer = expect_digit(head.chars().next_back())
        .ok_or_else(|| malformed(fragment, "no digit before the comma"))?;

    let mut fraction = tail.chars();
    let tenths = expect_digit(fraction.next());
    let hundredths = expect_digit(fraction.next());
    let (Some(tenths), Some(hundredths)) = (tenths, hundredths) else {
        return Err(malformed(fragment, "expected two digits after the comma"));
    };

    format!("{integer}.{tenths}{hundredths}")
        .parse::<f64>()
        .map_err(|err| malformed(fragment, &err.to_string()))
}

fn expect_digit(c: Option<char>) -> Option<char> {
    c.filter(char::is_ascii_digit)
}

fn malformed(fragment: &str, reason: &str) -> ExtractError {
    ExtractError::new(
        ErrorKind::DecimalParseMalformed,
        format!("{reason} in {:?}", abbreviate(fragment)),
    )
}

fn abbreviate(text: &str) -> String {
    const MAX_CHARS: usize = 60;
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_CHARS {
        return trimmed.to_string();
    }
    let mut short: String = trimmed.chars().take(MAX_CHARS).collect();
    short.push('…');
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviate_keeps_short_fragments() {
        assert_eq!(abbreviate("  <td>1,2</td> "), "<td>1,2</td>");
        let long = "x".repeat(100);
        assert_eq!(abbreviate(&long).chars().count(), 61);
    }
}
