//! Camera capture.
//!
//! A [`CameraDevice`] hands out live [`CameraStream`]s. The app keeps at most
//! one stream in a [`CameraController`]; attaching a new stream always stops
//! the previous one first.

pub mod command;
pub mod frame;

use std::fmt;

use async_trait::async_trait;
use tracing::debug;

pub use command::CommandCamera;
pub use frame::Frame;

/// File name the server sees for captured stills.
pub const CAPTURE_FILE_NAME: &str = "camera.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// The device could not be opened (missing program, device busy, denied).
    Access(String),
    /// A frame could not be read from the stream.
    Capture(String),
    /// The frame could not be encoded as PNG.
    Encode(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::Access(detail) => write!(f, "camera access failed: {detail}"),
            CameraError::Capture(detail) => write!(f, "frame capture failed: {detail}"),
            CameraError::Encode(detail) => write!(f, "image encoding failed: {detail}"),
        }
    }
}

impl std::error::Error for CameraError {}

#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Acquire a live video stream.
    async fn open(&self) -> Result<Box<dyn CameraStream>, CameraError>;
}

#[async_trait]
pub trait CameraStream: Send {
    /// Native frame size as (width, height).
    fn dimensions(&self) -> (u32, u32);

    /// Read the current frame.
    async fn grab_frame(&mut self) -> Result<Frame, CameraError>;

    /// Release the device. Calling it twice is harmless.
    fn stop(&mut self);
}

/// Capture one still from `stream`, stop it regardless of the outcome and
/// return the PNG bytes.
pub async fn capture_png(mut stream: Box<dyn CameraStream>) -> Result<Vec<u8>, CameraError> {
    let frame = stream.grab_frame().await;
    stream.stop();
    let frame = frame?;
    debug!(width = frame.width(), height = frame.height(), "captured frame");
    frame.encode_png()
}

/// Tracks the single stream the UI is previewing.
#[derive(Default)]
pub struct CameraController {
    available: bool,
    active: Option<Box<dyn CameraStream>>,
}

impl CameraController {
    pub fn new(available: bool) -> Self {
        Self {
            available,
            active: None,
        }
    }

    /// Whether a capture device is configured at all.
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Preview and capture control are shown exactly while a stream is held.
    pub fn is_previewing(&self) -> bool {
        self.active.is_some()
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.active.as_ref().map(|stream| stream.dimensions())
    }

    /// Stop and drop the held stream. Returns whether one was held.
    pub fn release(&mut self) -> bool {
        match self.active.take() {
            Some(mut stream) => {
                stream.stop();
                debug!("released camera stream");
                true
            }
            None => false,
        }
    }

    pub fn attach(&mut self, stream: Box<dyn CameraStream>) {
        self.release();
        self.active = Some(stream);
    }

    /// Hand the held stream to a capture, hiding the preview immediately.
    pub fn take_for_capture(&mut self) -> Option<Box<dyn CameraStream>> {
        self.active.take()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// In-memory stream that counts how often it was stopped.
    pub struct FakeStream {
        pub width: u32,
        pub height: u32,
        pub stops: Arc<AtomicUsize>,
        pub fail_grab: bool,
    }

    impl FakeStream {
        pub fn boxed(stops: Arc<AtomicUsize>) -> Box<dyn CameraStream> {
            Box::new(Self {
                width: 4,
                height: 3,
                stops,
                fail_grab: false,
            })
        }
    }

    #[async_trait]
    impl CameraStream for FakeStream {
        fn dimensions(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        async fn grab_frame(&mut self) -> Result<Frame, CameraError> {
            if self.fail_grab {
                return Err(CameraError::Capture("device unplugged".into()));
            }
            Frame::from_rgb(
                self.width,
                self.height,
                vec![128; Frame::byte_len(self.width, self.height)],
            )
        }

        fn stop(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }
}
