use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::{PoseError, RawPose};

/// Number of values in one pose record.
pub const POSE_RECORD_LEN: usize = 12;

/// Read a pose file and return one [`RawPose`] per frame.
///
/// Each line holds 12 whitespace separated floats, the row-major `[R | t]` matrix of the
/// frame with the same index. Trailing blank lines are ignored; any other line that does
/// not parse fails the whole read.
///
/// Values are kept in double precision, so decompositions do not match outputs computed
/// from single precision poses bit for bit.
///
/// # Arguments
///
/// * `path` - The path to the pose file.
///
/// # Returns
///
/// The poses in frame order.
pub fn read_poses_txt(path: impl AsRef<Path>) -> Result<Vec<RawPose>, PoseError> {
    // open the file and create a buffered reader
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| parse_pose_line(line, i + 1))
        .collect()
}

/// Write poses to a file, one record per line.
///
/// # Arguments
///
/// * `path` - The path to the pose file.
/// * `poses` - The poses in frame order.
pub fn write_poses_txt(path: impl AsRef<Path>, poses: &[RawPose]) -> Result<(), PoseError> {
    let mut writer = BufWriter::new(File::create(path)?);
    for pose in poses {
        let line = pose
            .as_array()
            .iter()
            .map(|v| format!("{:e}", v))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse one pose record.
///
/// # Arguments
///
/// * `line` - The text of the record.
/// * `line_no` - 1-based position of the record, used in error messages.
pub fn parse_pose_line(line: &str, line_no: usize) -> Result<RawPose, PoseError> {
    let parts = line.split_whitespace().collect::<Vec<_>>();

    if parts.len() != POSE_RECORD_LEN {
        return Err(PoseError::MalformedPoseRecord {
            line: line_no,
            reason: format!(
                "expected {} values, found {}",
                POSE_RECORD_LEN,
                parts.len()
            ),
        });
    }

    let mut values = [0.0; POSE_RECORD_LEN];
    for (value, part) in values.iter_mut().zip(parts.iter()) {
        *value = parse_part(part, line_no)?;
    }

    Ok(RawPose(values))
}

fn parse_part(s: &str, line_no: usize) -> Result<f64, PoseError> {
    let value = s
        .parse::<f64>()
        .map_err(|e| PoseError::MalformedPoseRecord {
            line: line_no,
            reason: format!("{}: {}", s, e),
        })?;

    if !value.is_finite() {
        return Err(PoseError::MalformedPoseRecord {
            line: line_no,
            reason: format!("{}: value is not finite", s),
        });
    }

    Ok(value)
}
