const KEYCAPS: [&str; 10] = [
    "0\u{fe0f}\u{20e3}",
    "1\u{fe0f}\u{20e3}",
    "2\u{fe0f}\u{20e3}",
    "3\u{fe0f}\u{20e3}",
    "4\u{fe0f}\u{20e3}",
    "5\u{fe0f}\u{20e3}",
    "6\u{fe0f}\u{20e3}",
    "7\u{fe0f}\u{20e3}",
    "8\u{fe0f}\u{20e3}",
    "9\u{fe0f}\u{20e3}",
];

/// Render a number as keycap digits, e.g. `12` -> `1️⃣2️⃣`.
pub fn keycap_number(n: usize) -> String {
    n.to_string()
        .chars()
        .filter_map(|digit| digit.to_digit(10))
        .map(|digit| KEYCAPS[digit as usize])
        .collect()
}

/// Length used for every page-size decision: Unicode scalar values.
pub fn text_len(text: &str) -> usize {
    text.chars().count()
}
