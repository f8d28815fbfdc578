//! Video encoding sink: raw RGBA frames piped into an ffmpeg child
//! process.

use crate::error::{Error, Result};
use std::io::{BufWriter, Write};
use std::process::{Child, ChildStdin, Command, Stdio};

/// Sink for raw RGBA frames. `Send` so the capture thread can own it.
pub trait VideoWriter: Send {
    fn write_frame(&mut self, frame: &[u8]) -> std::io::Result<()>;
    fn flush(&mut self) -> std::io::Result<()>;
    fn finish(&mut self) -> std::io::Result<()>;
}

pub struct FfmpegWriter {
    process: Child,
    writer: Option<BufWriter<ChildStdin>>,
}

impl FfmpegWriter {
    pub fn new(args: &[String]) -> Result<Self> {
        let args_ref: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
        let mut process = Command::new("ffmpeg")
            .args(&args_ref)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Encoder(format!("failed to start ffmpeg: {e}")))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| Error::Encoder("failed to open ffmpeg stdin".to_string()))?;
        let writer = BufWriter::with_capacity(8 * 1024 * 1024, stdin);
        Ok(Self {
            process,
            writer: Some(writer),
        })
    }
}

impl VideoWriter for FfmpegWriter {
    fn write_frame(&mut self, frame: &[u8]) -> std::io::Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.write_all(frame)
        } else {
            Ok(())
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()
        } else {
            Ok(())
        }
    }

    fn finish(&mut self) -> std::io::Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            drop(writer);
        }
        let status = self.process.wait()?;
        if !status.success() {
            return Err(std::io::Error::other(format!("ffmpeg exited with {status}")));
        }
        Ok(())
    }
}
