use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::config::ShearConfig;
use crate::error::Result;
use crate::modal::{step, ModalState};
use crate::serialize::render;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectionStats {
    pub lines: usize,
    pub corrected: usize,
}

// X is rewritten from the position reached after this block, not before.
pub fn correct_line(
    state: &mut ModalState,
    config: &ShearConfig,
    raw: &str,
) -> Result<(String, bool)> {
    let mut line = step(state, raw)?;
    let corrected = line.words.contains('X');
    if corrected {
        let pos = state.position;
        let x = config.correct_x(pos.x, pos.y);
        console_log!("X {:.5} -> {:.5} at Y {:.5}", pos.x, x, pos.y);
        line.words.set_scalar('X', x);
    }
    Ok((render(&line.words, &line.comment, config.precision), corrected))
}

pub fn correct_stream<R, W>(input: R, mut output: W, config: &ShearConfig) -> Result<CorrectionStats>
where
    R: BufRead,
    W: Write,
{
    let mut state = ModalState::new();
    let mut stats = CorrectionStats::default();
    for line in input.lines() {
        let line = line?;
        let (text, corrected) = correct_line(&mut state, config, &line)?;
        writeln!(output, "{text}")?;
        stats.lines += 1;
        if corrected {
            stats.corrected += 1;
        }
    }
    output.flush()?;
    Ok(stats)
}

pub fn correct_file(input: &Path, output: &Path, config: &ShearConfig) -> Result<CorrectionStats> {
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);
    let stats = correct_stream(reader, writer, config)?;
    tracing::info!(
        lines = stats.lines,
        corrected = stats.corrected,
        y_align = config.y_align,
        "orthogonality correction written to {}",
        output.display()
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn correct(program: &str, config: &ShearConfig) -> String {
        let mut out = Vec::new();
        correct_stream(program.as_bytes(), &mut out, config).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn x_is_sheared_by_distance_from_alignment() {
        let out = correct("G1 X10 Y52\n", &ShearConfig::with_y_align(0.0));
        assert_eq!(out, "G1 X9.5 Y52\n");
    }

    #[test]
    fn correction_uses_position_after_the_block() {
        // The Y on the same block already counts.
        let out = correct("G1 Y0\nG1 X10 Y104\n", &ShearConfig::default());
        assert_eq!(out, "G1 Y0\nG1 X9 Y104\n");
    }

    #[test]
    fn lines_without_x_are_only_normalized() {
        let out = correct("G0 Y52 (rapid)\nM5\n", &ShearConfig::default());
        assert_eq!(out, "G0 Y52 (rapid)\nM5\n");
    }

    #[test]
    fn incremental_x_is_replaced_by_corrected_absolute_x() {
        let out = correct("G1 X10 Y52\nG91\nG1 X5\n", &ShearConfig::default());
        assert_eq!(out, "G1 X9.5 Y52\nG91\nG1 X14.5\n");
    }

    #[test]
    fn state_keeps_uncorrected_positions() {
        let mut state = ModalState::new();
        let config = ShearConfig::default();
        correct_line(&mut state, &config, "G1 X10 Y52").unwrap();
        assert_eq!(state.position.x, 10.0);
        assert_eq!(state.position.y, 52.0);
    }

    #[test]
    fn comments_and_blank_lines_survive() {
        let out = correct("(start)\n\nG1 X1 ; cut\r\n", &ShearConfig::default());
        assert_eq!(out, " (start)\n\nG1 X1 ; cut\n");
    }

    #[test]
    fn comment_only_lines_keep_leading_space() {
        let out = correct("(header)\n; note\n", &ShearConfig::default());
        assert_eq!(out, " (header)\n ; note\n");
    }

    #[test]
    fn stats_count_lines_and_corrections() {
        let mut out = Vec::new();
        let stats = correct_stream(&b"G0 X1\nY2\nX3"[..], &mut out, &ShearConfig::default()).unwrap();
        assert_eq!(stats, CorrectionStats { lines: 3, corrected: 2 });
    }

    #[test]
    fn file_pipeline_writes_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.gcode");
        let output = dir.path().join("out.gcode");
        fs::write(&input, "G21 G90\nG1 X10 Y52 F500\n").unwrap();

        correct_file(&input, &output, &ShearConfig::with_y_align(26.0)).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "G21 G90\nG1 X9.75 Y52 F500\n");
    }

    #[test]
    fn missing_input_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.gcode");
        let err = correct_file(&dir.path().join("nope.gcode"), &output, &ShearConfig::default());
        assert!(matches!(err, Err(crate::error::FixError::Io(_))));
        assert!(!output.exists());
    }
}
