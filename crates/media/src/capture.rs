//! Scoped camera/microphone acquisition.

use async_trait::async_trait;
use thiserror::Error;

/// Camera/microphone acquisition failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("camera or microphone unavailable: {0}")]
    DeviceUnavailable(String),
}

impl CaptureError {
    pub fn device_unavailable(msg: impl Into<String>) -> Self {
        Self::DeviceUnavailable(msg.into())
    }
}

/// An opaque captured or uploaded video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoBlob {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Platform media handle backing a capture session.
pub trait MediaStream: Send {
    /// Stop every acquired track, releasing the device.
    fn stop_all_tracks(&mut self);

    /// Hand over the bytes recorded so far.
    fn take_recording(&mut self) -> Vec<u8>;
}

/// Acquires the capture resource.
#[async_trait]
pub trait MediaGateway: Send + Sync {
    async fn open(&self) -> Result<CaptureSession, CaptureError>;
}

/// A live capture, scoped to the capture view.
///
/// Tracks are stopped exactly once: on [`CaptureSession::finish`], on
/// [`CaptureSession::release`], or on drop — whichever comes first.
pub struct CaptureSession {
    stream: Box<dyn MediaStream>,
    released: bool,
}

impl CaptureSession {
    pub fn new(stream: Box<dyn MediaStream>) -> Self {
        Self {
            stream,
            released: false,
        }
    }

    /// Complete the capture: stop the tracks and yield the recording.
    pub fn finish(mut self, filename: impl Into<String>) -> VideoBlob {
        let bytes = self.stream.take_recording();
        self.release_tracks();
        VideoBlob {
            filename: filename.into(),
            bytes,
        }
    }

    /// Release the device without keeping the recording.
    pub fn release(mut self) {
        self.release_tracks();
    }

    fn release_tracks(&mut self) {
        if !self.released {
            self.stream.stop_all_tracks();
            self.released = true;
            tracing::debug!("capture tracks stopped");
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.release_tracks();
    }
}

impl core::fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CaptureSession")
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

/// Always-succeeding gateway yielding a canned recording (dev/demo shell).
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedMediaGateway;

impl SimulatedMediaGateway {
    pub fn new() -> Self {
        Self
    }
}

struct SimulatedStream {
    recording: Vec<u8>,
}

impl MediaStream for SimulatedStream {
    fn stop_all_tracks(&mut self) {}

    fn take_recording(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.recording)
    }
}

#[async_trait]
impl MediaGateway for SimulatedMediaGateway {
    async fn open(&self) -> Result<CaptureSession, CaptureError> {
        Ok(CaptureSession::new(Box::new(SimulatedStream {
            recording: b"simulated-webm-recording".to_vec(),
        })))
    }
}
