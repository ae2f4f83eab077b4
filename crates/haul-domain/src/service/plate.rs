//! Car plate normalisation for the trip form

fn is_plate_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || ('\u{0600}'..='\u{06FF}').contains(&c)
}

/// Space out a plate: after every letter, and between a digit and a letter
///
/// `"نقل1234"` becomes `"ن ق ل 1234"`; existing whitespace is discarded first.
pub fn format_car_plate(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let mut formatted = String::with_capacity(chars.len() * 2);
    for (i, &c) in chars.iter().enumerate() {
        formatted.push(c);
        let Some(&next) = chars.get(i + 1) else {
            continue;
        };
        if is_plate_letter(c) || (c.is_ascii_digit() && is_plate_letter(next)) {
            formatted.push(' ');
        }
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arabic_letters_then_digits() {
        assert_eq!(format_car_plate("نقل1234"), "ن ق ل 1234");
    }

    #[test]
    fn test_digits_then_letters() {
        assert_eq!(format_car_plate("123ab"), "123 a b");
    }

    #[test]
    fn test_existing_spacing_is_normalised() {
        assert_eq!(format_car_plate("  ن   ق 12 "), "ن ق 12");
    }

    #[test]
    fn test_empty() {
        assert_eq!(format_car_plate(""), "");
    }
}
