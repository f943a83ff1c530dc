use serde::Serialize;

use crate::error::{FixError, Result};

// Only G and M accumulate codes; every other letter keeps its last scalar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WordValue {
    CodeList(Vec<i64>),
    Scalar(f64),
}

// Kept in first-appearance order; equality ignores that order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Words {
    entries: Vec<(char, WordValue)>,
}

impl Words {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, letter: char) -> bool {
        self.get(letter).is_some()
    }

    pub fn get(&self, letter: char) -> Option<&WordValue> {
        self.entries.iter().find(|(l, _)| *l == letter).map(|(_, v)| v)
    }

    pub fn scalar(&self, letter: char) -> Option<f64> {
        match self.get(letter) {
            Some(WordValue::Scalar(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn codes(&self, letter: char) -> &[i64] {
        match self.get(letter) {
            Some(WordValue::CodeList(codes)) => codes,
            _ => &[],
        }
    }

    // An existing letter keeps its slot.
    pub fn set_scalar(&mut self, letter: char, value: f64) {
        match self.entries.iter_mut().find(|(l, _)| *l == letter) {
            Some((_, slot)) => *slot = WordValue::Scalar(value),
            None => self.entries.push((letter, WordValue::Scalar(value))),
        }
    }

    pub fn push_code(&mut self, letter: char, code: i64) {
        match self.entries.iter_mut().find(|(l, _)| *l == letter) {
            Some((_, WordValue::CodeList(codes))) => codes.push(code),
            Some((_, slot)) => *slot = WordValue::CodeList(vec![code]),
            None => self.entries.push((letter, WordValue::CodeList(vec![code]))),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &WordValue)> {
        self.entries.iter().map(|(l, v)| (*l, v))
    }
}

impl PartialEq for Words {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(l, v)| other.get(l) == Some(v))
    }
}

pub fn is_code_letter(letter: char) -> bool {
    matches!(letter, 'G' | 'M')
}

// Truncated integer part, or None when it does not fit an i64.
pub fn whole_number(value: f64) -> Option<i64> {
    let t = value.trunc();
    let limit = 2f64.powi(63);
    if t >= -limit && t < limit {
        Some(t as i64)
    } else {
        None
    }
}

// Letter, optional whitespace, number literal. Anything else is skipped.
pub fn tokenize(text: &str) -> Result<Words> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Words::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if !c.is_ascii_alphabetic() {
            i += 1;
            continue;
        }

        let mut start = i + 1;
        while start < chars.len() && chars[start].is_whitespace() {
            start += 1;
        }
        let Some(end) = scan_number(&chars, start) else {
            i += 1;
            continue;
        };

        let literal: String = chars[start..end].iter().collect();
        let value: f64 = literal.parse().map_err(|_| FixError::number(&literal))?;
        let letter = c.to_ascii_uppercase();
        if is_code_letter(letter) {
            // G90.1 truncates to 90.
            let code = whole_number(value).ok_or_else(|| FixError::number(&literal))?;
            words.push_code(letter, code);
        } else if letter == 'T' && whole_number(value).is_none() {
            return Err(FixError::number(&literal));
        } else {
            words.set_scalar(letter, value);
        }
        i = end;
    }

    Ok(words)
}

// `[+-]` then digits with an optional fraction, or `.` and digits.
fn scan_number(chars: &[char], start: usize) -> Option<usize> {
    let digit_at = |k: usize| chars.get(k).is_some_and(|c| c.is_ascii_digit());
    let mut k = start;
    if matches!(chars.get(k), Some('+') | Some('-')) {
        k += 1;
    }

    if digit_at(k) {
        while digit_at(k) {
            k += 1;
        }
        if chars.get(k) == Some(&'.') {
            k += 1;
            while digit_at(k) {
                k += 1;
            }
        }
        Some(k)
    } else if chars.get(k) == Some(&'.') && digit_at(k + 1) {
        k += 1;
        while digit_at(k) {
            k += 1;
        }
        Some(k)
    } else {
        None
    }
}
