use forecast_core::{parse_decimal, ErrorKind};

#[test]
fn reads_digit_before_and_two_digits_after_comma() {
    assert_eq!(parse_decimal("1,23").unwrap(), 1.23);
    assert_eq!(parse_decimal("…>5,67<…").unwrap(), 5.67);
    assert_eq!(
        parse_decimal("\n  <td class=xl2525883 x:num=\"2.87\">2,87</td>\n  ").unwrap(),
        2.87
    );
}

#[test]
fn ignores_noise_around_the_number() {
    assert_eq!(parse_decimal("xl>1,23<td").unwrap(), 1.23);
    assert_eq!(parse_decimal("0,059 trailing").unwrap(), 0.05);
    assert_eq!(parse_decimal("0,00").unwrap(), 0.0);
}

#[test]
fn only_last_integer_character_is_used() {
    assert_eq!(parse_decimal("12,34").unwrap(), 2.34);
}

#[test]
fn missing_comma_is_malformed() {
    let err = parse_decimal("<td>123</td>").unwrap_err();
    assert_eq!(err.kind, ErrorKind::DecimalParseMalformed);
}

#[test]
fn missing_integer_digit_is_malformed() {
    for fragment in [",23", "<td>,23", "x,23"] {
        let err = parse_decimal(fragment).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DecimalParseMalformed, "{fragment:?}");
    }
}

#[test]
fn short_fraction_is_malformed() {
    for fragment in ["1,", "1,2", "1,2<", "1,<td>"] {
        let err = parse_decimal(fragment).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DecimalParseMalformed, "{fragment:?}");
    }
}
