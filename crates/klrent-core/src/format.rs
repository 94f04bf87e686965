// ── Input masks ──
//
// Progressive masks for Brazilian document numbers, postcodes, phone
// numbers, and dates. Each mask accepts partially typed input and only
// inserts a separator once a digit follows it. Input with more digits
// than the mask holds is returned unchanged.

/// Strip everything but ASCII digits.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Insert `sep` before the digit at each `(index, sep)` position.
fn mask(value: &str, max_digits: usize, separators: &[(usize, char)]) -> String {
    let digits = digits_only(value);
    if digits.len() > max_digits {
        return value.to_owned();
    }

    let mut out = String::with_capacity(digits.len() + separators.len());
    for (i, c) in digits.chars().enumerate() {
        if let Some((_, sep)) = separators.iter().find(|(at, _)| *at == i) {
            out.push(*sep);
        }
        out.push(c);
    }
    out
}

/// `000.000.000-00`
pub fn format_cpf(value: &str) -> String {
    mask(value, 11, &[(3, '.'), (6, '.'), (9, '-')])
}

/// `00.000.000/0000-00`
pub fn format_cnpj(value: &str) -> String {
    mask(value, 14, &[(2, '.'), (5, '.'), (8, '/'), (12, '-')])
}

/// `00000-000`
pub fn format_cep(value: &str) -> String {
    mask(value, 8, &[(5, '-')])
}

/// Local number without area code: `0000-0000` or `00000-0000`.
///
/// A nine-digit mobile number is only split once complete.
pub fn format_phone(value: &str) -> String {
    let digits = digits_only(value);
    match digits.len() {
        0..=8 => mask(value, 8, &[(4, '-')]),
        9 => mask(value, 9, &[(5, '-')]),
        _ => value.to_owned(),
    }
}

/// `dd/mm/yyyy`
pub fn format_date_input(value: &str) -> String {
    mask(value, 8, &[(2, '/'), (4, '/')])
}

/// Convert `dd/mm/yyyy` to `yyyy-mm-dd`; malformed input yields an empty
/// string.
pub fn br_date_to_iso(value: &str) -> String {
    let parts: Vec<&str> = value.split('/').collect();
    match parts.as_slice() {
        [day, month, year]
            if day.len() == 2
                && month.len() == 2
                && year.len() == 4
                && [day, month, year]
                    .iter()
                    .all(|p| p.chars().all(|c| c.is_ascii_digit())) =>
        {
            format!("{year}-{month}-{day}")
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_mask_is_progressive() {
        assert_eq!(format_cpf("123"), "123");
        assert_eq!(format_cpf("1234"), "123.4");
        assert_eq!(format_cpf("1234567"), "123.456.7");
        assert_eq!(format_cpf("12345678901"), "123.456.789-01");
        assert_eq!(format_cpf("123.456.789-01"), "123.456.789-01");
    }

    #[test]
    fn overlong_input_is_left_alone() {
        assert_eq!(format_cpf("123456789012"), "123456789012");
        assert_eq!(format_cep("123456789"), "123456789");
    }

    #[test]
    fn cnpj_mask() {
        assert_eq!(format_cnpj("12345678000190"), "12.345.678/0001-90");
        assert_eq!(format_cnpj("123456789"), "12.345.678/9");
    }

    #[test]
    fn cep_mask() {
        assert_eq!(format_cep("69000"), "69000");
        assert_eq!(format_cep("69000123"), "69000-123");
    }

    #[test]
    fn phone_mask_handles_landline_and_mobile() {
        assert_eq!(format_phone("3234"), "3234");
        assert_eq!(format_phone("32345678"), "3234-5678");
        assert_eq!(format_phone("991234567"), "99123-4567");
        assert_eq!(format_phone("99123-4567"), "99123-4567");
        assert_eq!(format_phone("9912345678"), "9912345678");
    }

    #[test]
    fn date_mask() {
        assert_eq!(format_date_input("0103"), "01/03");
        assert_eq!(format_date_input("01032030"), "01/03/2030");
    }

    #[test]
    fn br_dates_convert_to_iso() {
        assert_eq!(br_date_to_iso("01/03/2030"), "2030-03-01");
        assert_eq!(br_date_to_iso("1/3/2030"), "");
        assert_eq!(br_date_to_iso("01/03"), "");
        assert_eq!(br_date_to_iso("aa/bb/cccc"), "");
    }

    #[test]
    fn digits_are_extracted() {
        assert_eq!(digits_only("(92) 99123-4567"), "92991234567");
    }
}
