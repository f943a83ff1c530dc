use serde::Serialize;

use crate::comment::split_comment;
use crate::error::Result;
use crate::words::{tokenize, whole_number, Words};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Plane {
    XY,
    XZ,
    YZ,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    fn axis_mut(&mut self, axis: char) -> Option<&mut f64> {
        match axis {
            'X' => Some(&mut self.x),
            'Y' => Some(&mut self.y),
            'Z' => Some(&mut self.z),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModalState {
    pub units_mm: bool,     // G21(true)/G20(false)
    pub abs_distance: bool, // G90/G91
    pub abs_ijk: Option<bool>, // arc centre mode, None = controller default
    pub plane: Plane,       // G17/G18/G19
    pub feed: Option<f64>,
    pub spindle: Option<f64>,
    pub tool: Option<i64>,
    // Always absolute, whatever the distance mode.
    pub position: Position,
}

impl Default for ModalState {
    fn default() -> Self {
        Self {
            units_mm: true,
            abs_distance: true,
            abs_ijk: None,
            plane: Plane::XY,
            feed: None,
            spindle: None,
            tool: None,
            position: Position::default(),
        }
    }
}

impl ModalState {
    pub fn new() -> Self {
        Self::default()
    }

    // G codes first so the distance mode of this block applies to its axes.
    pub fn apply(&mut self, words: &Words) {
        for &g in words.codes('G') {
            match g {
                20 => self.units_mm = false,
                21 => self.units_mm = true,
                90 => self.abs_distance = true,
                91 => self.abs_distance = false,
                // G90.1/G91.1 reach here truncated to 90/91; only the packed
                // spelling selects the arc centre mode.
                901 => self.abs_ijk = Some(true),
                911 => self.abs_ijk = Some(false),
                17 => self.plane = Plane::XY,
                18 => self.plane = Plane::XZ,
                19 => self.plane = Plane::YZ,
                _ => {}
            }
        }

        if let Some(f) = words.scalar('F') {
            self.feed = Some(f);
        }
        if let Some(s) = words.scalar('S') {
            self.spindle = Some(s);
        }
        if let Some(t) = words.scalar('T').and_then(whole_number) {
            self.tool = Some(t);
        }

        for axis in ['X', 'Y', 'Z'] {
            let Some(v) = words.scalar(axis) else {
                continue;
            };
            if let Some(p) = self.position.axis_mut(axis) {
                if self.abs_distance {
                    *p = v;
                } else {
                    *p += v;
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedLine {
    pub raw: String,
    pub executable: String,
    pub comment: String,
    pub words: Words,
}

fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

pub fn parse_line(raw: &str) -> Result<ParsedLine> {
    let raw = trim_line_ending(raw);
    let (executable, comment) = split_comment(raw);
    let executable = executable.trim().to_string();
    let words = tokenize(&executable)?;
    Ok(ParsedLine {
        raw: raw.to_string(),
        executable,
        comment,
        words,
    })
}

pub fn step(state: &mut ModalState, raw: &str) -> Result<ParsedLine> {
    let line = parse_line(raw)?;
    state.apply(&line.words);
    Ok(line)
}

pub struct Program<I> {
    lines: I,
    state: ModalState,
}

impl<I> Program<I> {
    pub fn state(&self) -> &ModalState {
        &self.state
    }
}

impl<I, S> Iterator for Program<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Result<ParsedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.lines.next()?;
        Some(step(&mut self.state, raw.as_ref()))
    }
}

pub fn parse_program<I, S>(lines: I) -> Program<I::IntoIter>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Program {
        lines: lines.into_iter(),
        state: ModalState::new(),
    }
}
