//! Speech capture for voice task entry
//!
//! Recognition itself is an external program configured under `[speech]`;
//! its stdout is taken as the recognized text.

use std::process::{Command, Stdio};
use tracing::{debug, warn};

use crate::config::SpeechConfig;

/// Yields the spoken text, or `None` when nothing could be understood.
pub trait SpeechCapture: Send + Sync {
    fn capture(&self) -> Option<String>;
}

/// Runs a recognizer command once per capture.
pub struct CommandCapture {
    program: String,
    args: Vec<String>,
}

impl CommandCapture {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `None` when no command is configured.
    pub fn from_config(config: &SpeechConfig) -> Option<Self> {
        if !config.is_configured() {
            return None;
        }
        let (program, args) = config.command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }
}

impl SpeechCapture for CommandCapture {
    fn capture(&self) -> Option<String> {
        debug!("running speech recognizer: {}", self.program);
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output();

        match output {
            Ok(output) if output.status.success() => {
                let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if text.is_empty() {
                    warn!("speech recognizer returned no text");
                    None
                } else {
                    Some(text)
                }
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                warn!("could not understand audio: {}", stderr);
                None
            }
            Err(e) => {
                warn!("could not run speech recognizer '{}': {}", self.program, e);
                None
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandCapture {
        CommandCapture::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[test]
    fn test_capture_returns_trimmed_stdout() {
        let capture = sh("printf '  buy groceries \\n'");
        assert_eq!(capture.capture(), Some("buy groceries".to_string()));
    }

    #[test]
    fn test_capture_empty_output_is_not_understood() {
        assert_eq!(sh("true").capture(), None);
    }

    #[test]
    fn test_capture_failure_is_not_understood() {
        assert_eq!(sh("echo noise >&2; exit 1").capture(), None);
    }

    #[test]
    fn test_capture_missing_program() {
        let capture = CommandCapture::new("donezo-no-such-recognizer", Vec::new());
        assert_eq!(capture.capture(), None);
    }

    #[test]
    fn test_from_config() {
        assert!(CommandCapture::from_config(&SpeechConfig::default()).is_none());

        let config = SpeechConfig {
            command: vec!["listen".to_string(), "--once".to_string()],
        };
        let capture = CommandCapture::from_config(&config).unwrap();
        assert_eq!(capture.program, "listen");
        assert_eq!(capture.args, vec!["--once"]);
    }
}
