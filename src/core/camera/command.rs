use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStdout, Command};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{CameraDevice, CameraError, CameraStream, Frame};

/// How long a freshly spawned capture process gets to fail before the
/// stream is considered live.
const STARTUP_GRACE: Duration = Duration::from_millis(250);

/// How long a capture waits for a frame newer than the request.
const FRAME_WAIT: Duration = Duration::from_secs(2);

/// Camera backed by an external program that streams raw RGB24 frames to
/// stdout (for example ffmpeg reading a v4l2 device).
pub struct CommandCamera {
    argv: Vec<String>,
    width: u32,
    height: u32,
}

impl CommandCamera {
    pub fn new(argv: Vec<String>, width: u32, height: u32) -> Option<Self> {
        if argv.is_empty() || width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            argv,
            width,
            height,
        })
    }

    fn expand_args(&self) -> Vec<String> {
        let width = self.width.to_string();
        let height = self.height.to_string();
        self.argv
            .iter()
            .map(|arg| arg.replace("{width}", &width).replace("{height}", &height))
            .collect()
    }
}

#[async_trait]
impl CameraDevice for CommandCamera {
    async fn open(&self) -> Result<Box<dyn CameraStream>, CameraError> {
        let args = self.expand_args();
        let Some((program, rest)) = args.split_first() else {
            return Err(CameraError::Access("no capture command".to_string()));
        };

        let mut child = Command::new(program)
            .args(rest)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| CameraError::Access(format!("{program}: {err}")))?;

        if let Ok(status) = tokio::time::timeout(STARTUP_GRACE, child.wait()).await {
            let detail = match status {
                Ok(status) => format!("{program} exited early ({status})"),
                Err(err) => format!("{program}: {err}"),
            };
            return Err(CameraError::Access(detail));
        }

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| CameraError::Access("capture output is not readable".to_string()))?;

        debug!(
            program = %program,
            width = self.width,
            height = self.height,
            "camera stream open"
        );
        Ok(Box::new(CommandStream::start(
            child,
            stdout,
            self.width,
            self.height,
        )))
    }
}

/// What the frame pump last saw on the capture process's stdout.
#[derive(Clone)]
enum Latest {
    Waiting,
    Frame(Frame),
    Ended(String),
}

/// A running capture process. A background task keeps its stdout drained so
/// the process never blocks on a full pipe, and only the newest frame is kept.
pub struct CommandStream {
    child: Option<Child>,
    latest: watch::Receiver<Latest>,
    pump: JoinHandle<()>,
    width: u32,
    height: u32,
}

impl CommandStream {
    fn start(child: Child, stdout: ChildStdout, width: u32, height: u32) -> Self {
        let (tx, latest) = watch::channel(Latest::Waiting);
        let pump = tokio::spawn(pump_frames(stdout, width, height, tx));
        Self {
            child: Some(child),
            latest,
            pump,
            width,
            height,
        }
    }
}

async fn pump_frames(
    mut stdout: ChildStdout,
    width: u32,
    height: u32,
    tx: watch::Sender<Latest>,
) {
    let len = Frame::byte_len(width, height);
    loop {
        let mut buffer = vec![0u8; len];
        let next = match stdout.read_exact(&mut buffer).await {
            Ok(_) => match Frame::from_rgb(width, height, buffer) {
                Ok(frame) => Latest::Frame(frame),
                Err(err) => Latest::Ended(err.to_string()),
            },
            Err(err) => Latest::Ended(err.to_string()),
        };
        let ended = matches!(next, Latest::Ended(_));
        if tx.send(next).is_err() || ended {
            break;
        }
    }
    debug!("camera frame pump finished");
}

#[async_trait]
impl CameraStream for CommandStream {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Wait for a frame that completes after this call. A source that stalls
    /// for longer than `FRAME_WAIT` yields its newest frame instead.
    async fn grab_frame(&mut self) -> Result<Frame, CameraError> {
        if self.child.is_none() {
            return Err(CameraError::Capture("stream already stopped".to_string()));
        }
        let _ = self.latest.borrow_and_update();
        if tokio::time::timeout(FRAME_WAIT, self.latest.changed())
            .await
            .is_err()
        {
            debug!("no fresh frame in time; using the newest one");
        }

        let latest = self.latest.borrow().clone();
        match latest {
            Latest::Frame(frame) => Ok(frame),
            Latest::Waiting => Err(CameraError::Capture(
                "capture process produced no frame".to_string(),
            )),
            Latest::Ended(detail) => Err(CameraError::Capture(detail)),
        }
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            self.pump.abort();
            if let Err(err) = child.start_kill() {
                warn!(%err, "failed to stop capture process");
            }
        }
    }
}

impl Drop for CommandStream {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_placeholders_are_expanded() {
        let camera = CommandCamera::new(
            vec!["cap".into(), "-s".into(), "{width}x{height}".into()],
            320,
            240,
        )
        .unwrap();
        assert_eq!(
            camera.expand_args(),
            vec!["cap".to_string(), "-s".to_string(), "320x240".to_string()]
        );
    }

    #[test]
    fn degenerate_configs_are_rejected() {
        assert!(CommandCamera::new(Vec::new(), 640, 480).is_none());
        assert!(CommandCamera::new(vec!["cap".into()], 0, 480).is_none());
    }

    #[tokio::test]
    async fn missing_program_is_an_access_error() {
        let camera = CommandCamera::new(vec!["parley-no-such-camera".into()], 2, 2).unwrap();
        assert!(matches!(camera.open().await, Err(CameraError::Access(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn early_exit_is_an_access_error() {
        let camera = CommandCamera::new(vec!["false".into()], 2, 2).unwrap();
        assert!(matches!(camera.open().await, Err(CameraError::Access(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn reads_one_frame_from_a_live_stream() {
        // 2x2 RGB24 is 12 bytes per frame; `yes` keeps the pipe full.
        let camera = CommandCamera::new(vec!["yes".into(), "abcdefghijk".into()], 2, 2).unwrap();
        let mut stream = camera.open().await.unwrap();

        let frame = stream.grab_frame().await.unwrap();
        stream.stop();

        assert_eq!((frame.width(), frame.height()), (2, 2));
        assert!(stream.grab_frame().await.is_err());
    }

    /// Decode the 12-digit counter a 2x2 frame carries.
    #[cfg(unix)]
    fn frame_counter(frame: Frame) -> u64 {
        let png = frame.encode_png().unwrap();
        let rgb = image::load_from_memory(&png).unwrap().into_rgb8().into_raw();
        String::from_utf8(rgb).unwrap().parse().unwrap()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn capture_returns_the_current_frame_not_the_first() {
        let counting = "i=0; while true; do printf '%012d' $i; i=$((i+1)); done";
        let camera =
            CommandCamera::new(vec!["sh".into(), "-c".into(), counting.into()], 2, 2).unwrap();
        let mut stream = camera.open().await.unwrap();

        tokio::time::sleep(Duration::from_millis(300)).await;
        let first = frame_counter(stream.grab_frame().await.unwrap());
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = frame_counter(stream.grab_frame().await.unwrap());
        stream.stop();

        assert!(first > 0, "capture returned the frame from open time");
        assert!(second > first, "second capture {second} not newer than {first}");
    }
}
