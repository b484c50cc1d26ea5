/// Bijective base-26 letters: 0 → `A`, 25 → `Z`, 26 → `AA`, 27 → `AB`, …
pub fn ordinal_letters(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index;
    loop {
        letters.push(char::from(b'A' + (n % 26) as u8));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// `Section A`, `Section B`, … for a 0-based section position.
pub fn ordinal_label(index: usize) -> String {
    format!("Section {}", ordinal_letters(index))
}
