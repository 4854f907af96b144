//! ISBN-13 checksum validation.
//!
//! Only decimal digits are considered, so `978-0-306-40615-7` and
//! `9780306406157` are equivalent.

const ISBN13_LEN: usize = 13;

/// Checksum verdict for an ISBN-13.
///
/// Returns `None` when the input does not contain exactly 13 digits: no
/// checksum claim can be made in that case.
pub fn check(isbn: &str) -> Option<bool> {
    let digits: Vec<u32> = isbn.chars().filter_map(|c| c.to_digit(10)).collect();
    let [body @ .., check_digit] = digits.as_slice() else {
        return None;
    };
    if digits.len() != ISBN13_LEN {
        return None;
    }

    let sum: u32 = body
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { *d } else { d * 3 })
        .sum();
    let remainder = sum % 10;
    let expected = if remainder == 0 { 0 } else { 10 - remainder };

    Some(*check_digit == expected)
}

/// Whether `isbn` is a valid ISBN-13. Inputs without exactly 13 digits are invalid.
pub fn validate(isbn: &str) -> bool {
    check(isbn) == Some(true)
}
