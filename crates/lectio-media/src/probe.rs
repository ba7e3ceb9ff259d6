//! Duration probing from FFmpeg's textual output.

use std::path::Path;
use std::process::Stdio;
use std::sync::OnceLock;

use regex::Regex;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

fn duration_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Duration: (\d{2}):(\d{2}):(\d{2})").unwrap())
}

/// Probe a media file's duration in whole seconds.
///
/// Runs `ffmpeg -i INPUT` with no output file and parses the
/// `Duration: HH:MM:SS` marker from its textual output. Returns 0 when
/// no marker is found; callers treat 0 as "duration unknown".
pub async fn probe_duration(input: impl AsRef<Path>) -> MediaResult<u64> {
    let input = input.as_ref();

    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

    // ffmpeg exits non-zero when invoked without an output file; the
    // duration marker is still printed, so the exit status is ignored.
    let result = Command::new("ffmpeg")
        .arg("-i")
        .arg(input)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    let mut combined = String::from_utf8_lossy(&result.stdout).to_string();
    combined.push_str(&String::from_utf8_lossy(&result.stderr));

    let duration = parse_duration_marker(&combined);
    debug!(input = %input.display(), duration, "Probed media duration");
    Ok(duration)
}

/// Parse the first `Duration: HH:MM:SS` marker out of FFmpeg output.
///
/// Returns 0 if no marker is present.
pub fn parse_duration_marker(output: &str) -> u64 {
    match duration_marker().captures(output) {
        Some(caps) => {
            let hours: u64 = caps[1].parse().unwrap_or(0);
            let minutes: u64 = caps[2].parse().unwrap_or(0);
            let seconds: u64 = caps[3].parse().unwrap_or(0);
            hours * 3600 + minutes * 60 + seconds
        }
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_marker() {
        let output = "Input #0, mov,mp4, from 'input.mp4':\n  Duration: 00:05:23.45, start: 0.0";
        assert_eq!(parse_duration_marker(output), 323);
    }

    #[test]
    fn test_parse_duration_marker_hours() {
        assert_eq!(parse_duration_marker("Duration: 01:02:03.99, bitrate"), 3723);
    }

    #[test]
    fn test_parse_duration_marker_absent() {
        assert_eq!(parse_duration_marker("no duration here"), 0);
        assert_eq!(parse_duration_marker(""), 0);
    }

    #[test]
    fn test_parse_duration_marker_uses_first_match() {
        let output = "Duration: 00:01:00.00\nDuration: 00:02:00.00";
        assert_eq!(parse_duration_marker(output), 60);
    }
}
