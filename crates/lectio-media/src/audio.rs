//! Audio extraction from lecture video.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};

/// Extract an analysis-ready MP3 audio stream from a video file.
///
/// Runs `ffmpeg -i INPUT -vn -acodec libmp3lame -b:a 128k -y OUTPUT`.
/// A non-zero exit aborts the caller's pipeline; the combined
/// stdout/stderr is carried in the error for diagnostics.
pub async fn extract_audio(input: impl AsRef<Path>, output: impl AsRef<Path>) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

    debug!(input = %input.display(), output = %output.display(), "Extracting audio");

    let result = Command::new("ffmpeg")
        .arg("-i")
        .arg(input)
        .args(["-vn", "-acodec", "libmp3lame", "-b:a", "128k", "-y"])
        .arg(output)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !result.status.success() {
        let mut combined = String::from_utf8_lossy(&result.stdout).to_string();
        combined.push_str(&String::from_utf8_lossy(&result.stderr));
        return Err(MediaError::ffmpeg_failed(
            "audio extraction failed",
            Some(combined),
            result.status.code(),
        ));
    }

    info!(output = %output.display(), "Audio extracted");
    Ok(())
}
