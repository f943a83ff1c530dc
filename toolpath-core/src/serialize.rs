use crate::words::{WordValue, Words};

pub const DEFAULT_PRECISION: usize = 5;

// Letters not listed follow in word order.
pub const LETTER_ORDER: [char; 15] = [
    'N', 'G', 'M', 'X', 'Y', 'Z', 'A', 'B', 'C', 'I', 'J', 'K', 'F', 'S', 'T',
];

pub fn format_number(value: f64, precision: usize) -> String {
    let tolerance = 10f64.powi(-(precision as i32));
    if (value - value.trunc()).abs() < tolerance {
        // + 0.0 folds -0 into 0
        return format!("{:.0}", value.trunc() + 0.0);
    }
    let fixed = format!("{value:.precision$}");
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    }
}

fn push_tokens(parts: &mut Vec<String>, letter: char, value: &WordValue, precision: usize) {
    match value {
        WordValue::CodeList(codes) => {
            parts.extend(codes.iter().map(|code| format!("{letter}{code}")));
        }
        WordValue::Scalar(v) => parts.push(format!("{letter}{}", format_number(*v, precision))),
    }
}

pub fn render(words: &Words, comment: &str, precision: usize) -> String {
    let mut parts = Vec::with_capacity(words.len());

    for letter in LETTER_ORDER {
        if let Some(value) = words.get(letter) {
            push_tokens(&mut parts, letter, value, precision);
        }
    }
    for (letter, value) in words.iter() {
        if !LETTER_ORDER.contains(&letter) {
            push_tokens(&mut parts, letter, value, precision);
        }
    }

    let mut line = parts.join(" ");
    // The separating space is emitted even when there are no words.
    let comment = comment.trim();
    if !comment.is_empty() {
        if comment.starts_with(['(', ';', '#']) {
            line.push(' ');
            line.push_str(comment);
        } else {
            line.push_str(&format!(" ({comment})"));
        }
    }
    line
}
