use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::ShearConfig;
use crate::dwell::{fix_dwell_file, DwellStats};
use crate::error::{FixError, Result};
use crate::pipeline::{correct_file, CorrectionStats};

pub const DWELL_USAGE: &str = "Usage: fix_dwell_units <input.gcode> <output.gcode>";
pub const ORTHOGONALITY_USAGE: &str =
    "Usage: fix_orthogonality <y_align> <input.gcode> <output.gcode>";

#[derive(Debug, Clone, PartialEq)]
pub struct DwellArgs {
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrthogonalityArgs {
    pub config: ShearConfig,
    pub input: PathBuf,
    pub output: PathBuf,
}

fn usage(text: &str) -> FixError {
    FixError::Usage { usage: text.to_string() }
}

// `args` excludes the program name.
pub fn parse_dwell_args(args: &[String]) -> Result<DwellArgs> {
    match args {
        [input, output] => Ok(DwellArgs {
            input: PathBuf::from(input),
            output: PathBuf::from(output),
        }),
        _ => Err(usage(DWELL_USAGE)),
    }
}

// y_align is converted before any file is touched.
pub fn parse_orthogonality_args(args: &[String]) -> Result<OrthogonalityArgs> {
    let [y_align, input, output] = args else {
        return Err(usage(ORTHOGONALITY_USAGE));
    };
    let y_align: f64 = y_align
        .trim()
        .parse()
        .map_err(|_| FixError::number(y_align))?;
    Ok(OrthogonalityArgs {
        config: ShearConfig::with_y_align(y_align),
        input: PathBuf::from(input),
        output: PathBuf::from(output),
    })
}

pub fn run_dwell(args: &[String]) -> Result<DwellStats> {
    let args = parse_dwell_args(args)?;
    fix_dwell_file(&args.input, &args.output)
}

pub fn run_orthogonality(args: &[String]) -> Result<CorrectionStats> {
    let args = parse_orthogonality_args(args)?;
    tracing::debug!(config = ?args.config, "starting orthogonality correction");
    correct_file(&args.input, &args.output, &args.config)
}

// stdout only ever carries the usage text
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
}

pub fn exit_code<T>(result: Result<T>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(FixError::Usage { usage }) => {
            println!("{usage}");
            ExitCode::from(1)
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn wrong_argument_count_is_a_usage_error() {
        assert!(matches!(parse_dwell_args(&strings(&["in"])), Err(FixError::Usage { .. })));
        assert!(matches!(
            parse_orthogonality_args(&strings(&["1", "in"])),
            Err(FixError::Usage { .. })
        ));
        assert!(matches!(
            parse_orthogonality_args(&strings(&["1", "in", "out", "extra"])),
            Err(FixError::Usage { .. })
        ));
    }

    #[test]
    fn usage_error_displays_usage_text() {
        let err = parse_dwell_args(&[]).unwrap_err();
        assert_eq!(err.to_string(), DWELL_USAGE);
    }

    #[test]
    fn y_align_is_parsed_into_config() {
        let args = parse_orthogonality_args(&strings(&["-12.5", "a.gcode", "b.gcode"])).unwrap();
        assert_eq!(args.config.y_align, -12.5);
        assert_eq!(args.input, PathBuf::from("a.gcode"));
        assert_eq!(args.output, PathBuf::from("b.gcode"));
    }

    #[test]
    fn bad_y_align_is_a_number_error() {
        let err = parse_orthogonality_args(&strings(&["abc", "a", "b"])).unwrap_err();
        assert!(matches!(err, FixError::Number { .. }));
    }

    #[test]
    fn usage_error_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.gcode");
        let args = vec!["in.gcode".to_string(), output.display().to_string()];
        assert!(run_orthogonality(&args).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn orthogonality_run_end_to_end() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.gcode");
        let output = dir.path().join("out.gcode");
        fs::write(&input, "G90\nG1 X10 Y52 (edge)\n").unwrap();

        let args = vec!["0".to_string(), input.display().to_string(), output.display().to_string()];
        let stats = run_orthogonality(&args).unwrap();
        assert_eq!(stats.corrected, 1);
        assert_eq!(fs::read_to_string(&output).unwrap(), "G90\nG1 X9.5 Y52 (edge)\n");
    }

    #[test]
    fn dwell_run_end_to_end() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.gcode");
        let output = dir.path().join("out.gcode");
        fs::write(&input, "G04 P1.6\nG04 P1.4\n").unwrap();

        let args = vec![input.display().to_string(), output.display().to_string()];
        run_dwell(&args).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "G04 P2\nG04 P1\n");
    }
}
