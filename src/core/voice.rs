//! Single-shot speech recognition.
//!
//! Recognition itself is delegated to an external program: it is started
//! once per activation, records one utterance, prints the transcript on
//! stdout and exits.

use std::fmt;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Session parameters. Sessions are never continuous, never report interim
/// results and keep a single alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionSettings {
    pub locale: String,
    pub continuous: bool,
    pub interim_results: bool,
    pub max_alternatives: u32,
}

impl RecognitionSettings {
    pub fn single_shot(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            continuous: false,
            interim_results: false,
            max_alternatives: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceError {
    /// The recognizer finished without hearing anything.
    NoSpeech,
    /// The recognizer could not be started.
    AudioCapture(String),
    /// The recognizer ran and reported a failure.
    Recognizer(String),
}

impl VoiceError {
    pub fn code(&self) -> &'static str {
        match self {
            VoiceError::NoSpeech => "no-speech",
            VoiceError::AudioCapture(_) => "audio-capture",
            VoiceError::Recognizer(_) => "recognizer",
        }
    }
}

impl fmt::Display for VoiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoiceError::NoSpeech => f.write_str(self.code()),
            VoiceError::AudioCapture(detail) | VoiceError::Recognizer(detail) => {
                write!(f, "{} ({})", self.code(), detail)
            }
        }
    }
}

impl std::error::Error for VoiceError {}

#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Run one recognition session and return the best transcript.
    async fn recognize(&self, settings: &RecognitionSettings) -> Result<String, VoiceError>;
}

pub struct CommandRecognizer {
    argv: Vec<String>,
}

impl CommandRecognizer {
    pub fn new(argv: Vec<String>) -> Option<Self> {
        if argv.is_empty() {
            return None;
        }
        Some(Self { argv })
    }

    fn expand_args(&self, settings: &RecognitionSettings) -> Vec<String> {
        self.argv
            .iter()
            .map(|arg| arg.replace("{locale}", &settings.locale))
            .collect()
    }
}

#[async_trait]
impl SpeechRecognizer for CommandRecognizer {
    async fn recognize(&self, settings: &RecognitionSettings) -> Result<String, VoiceError> {
        let args = self.expand_args(settings);
        let Some((program, rest)) = args.split_first() else {
            return Err(VoiceError::AudioCapture("no recognizer command".to_string()));
        };

        debug!(program = %program, locale = %settings.locale, "starting speech recognizer");
        let output = Command::new(program)
            .args(rest)
            .env("PARLEY_VOICE_LOCALE", &settings.locale)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| VoiceError::AudioCapture(format!("{program}: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr
                .lines()
                .map(str::trim)
                .rfind(|line| !line.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| output.status.to_string());
            return Err(VoiceError::Recognizer(detail));
        }

        first_transcript(&String::from_utf8_lossy(&output.stdout)).ok_or(VoiceError::NoSpeech)
    }
}

/// The first non-blank line is the single alternative we keep.
fn first_transcript(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
