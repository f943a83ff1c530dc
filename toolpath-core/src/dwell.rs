use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::ops::Range;
use std::path::Path;

use crate::error::{FixError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DwellStats {
    pub lines: usize,
    pub rewritten: usize,
}

// Byte range of the literal in the last `G04<ws>P<digits/dots>` group.
fn dwell_literal(line: &str) -> Option<Range<usize>> {
    for (pos, code) in line.rmatch_indices("G04") {
        let after = &line[pos + code.len()..];
        let gap = after.len() - after.trim_start().len();
        if gap == 0 {
            continue;
        }
        let Some(value) = after[gap..].strip_prefix('P') else {
            continue;
        };
        let len = value
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(value.len());
        if len == 0 {
            continue;
        }
        let start = pos + code.len() + gap + 1;
        return Some(start..start + len);
    }
    None
}

// Rounds only, halves to even; the value is not converted between units.
pub fn round_dwell(line: &str) -> Result<Option<String>> {
    let Some(range) = dwell_literal(line) else {
        return Ok(None);
    };
    let literal = &line[range.clone()];
    let seconds: f64 = literal.parse().map_err(|_| FixError::number(literal))?;
    let rounded = format!("{:.0}", seconds.round_ties_even());
    console_log!("G04 P{literal} -> P{rounded}");
    Ok(Some(format!("{}{rounded}{}", &line[..range.start], &line[range.end..])))
}

// Untouched lines keep their content; every line ending becomes LF.
pub fn fix_dwell_stream<R, W>(mut input: R, mut output: W) -> Result<DwellStats>
where
    R: BufRead,
    W: Write,
{
    let mut stats = DwellStats::default();
    let mut buf = String::new();
    loop {
        buf.clear();
        if input.read_line(&mut buf)? == 0 {
            break;
        }
        stats.lines += 1;

        let terminated = buf.ends_with('\n');
        let body = buf.strip_suffix('\n').unwrap_or(buf.as_str());
        let body = body.strip_suffix('\r').unwrap_or(body);

        match round_dwell(body)? {
            Some(fixed) => {
                stats.rewritten += 1;
                writeln!(output, "{fixed}")?;
            }
            None if terminated => writeln!(output, "{body}")?,
            None => write!(output, "{body}")?,
        }
    }
    output.flush()?;
    Ok(stats)
}

pub fn fix_dwell_file(input: &Path, output: &Path) -> Result<DwellStats> {
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);
    let stats = fix_dwell_stream(reader, writer)?;
    tracing::info!(
        lines = stats.lines,
        rewritten = stats.rewritten,
        "dwell values rounded into {}",
        output.display()
    );
    Ok(stats)
}
