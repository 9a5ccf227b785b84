use std::time::{Duration, Instant};

use crate::errors::ClipboardError;

/// How long the "copied" acknowledgment stays up.
pub const COPY_ACK_WINDOW: Duration = Duration::from_secs(2);

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard. Construction never fails; an unavailable clipboard
/// surfaces on the first write instead.
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self { inner: arboard::Clipboard::new().ok() }
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        match &mut self.inner {
            Some(cb) => cb
                .set_text(text.to_string())
                .map_err(|e| ClipboardError::Write(e.to_string())),
            None => Err(ClipboardError::Unavailable),
        }
    }
}

/// Transient "copied" flag. Every trigger restarts the window.
#[derive(Debug, Default, Clone, Copy)]
pub struct CopyIndicator {
    copied_at: Option<Instant>,
}

impl CopyIndicator {
    pub fn trigger(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.copied_at
            .map(|at| now.saturating_duration_since(at) < COPY_ACK_WINDOW)
            .unwrap_or(false)
    }
}

/// Copy the artifact and arm the indicator. The indicator is only armed
/// when the write succeeded.
pub fn copy_artifact(
    clipboard: &mut dyn Clipboard,
    indicator: &mut CopyIndicator,
    text: &str,
    now: Instant,
) -> Result<(), ClipboardError> {
    clipboard.set_text(text)?;
    indicator.trigger(now);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MemoryClipboard {
        contents: Option<String>,
        broken: bool,
    }

    impl Clipboard for MemoryClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.broken {
                return Err(ClipboardError::Unavailable);
            }
            self.contents = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn indicator_expires_after_window() {
        let t0 = Instant::now();
        let mut ind = CopyIndicator::default();
        assert!(!ind.is_active(t0));
        ind.trigger(t0);
        assert!(ind.is_active(t0));
        assert!(ind.is_active(t0 + Duration::from_millis(1999)));
        assert!(!ind.is_active(t0 + COPY_ACK_WINDOW));
    }

    #[test]
    fn retrigger_restarts_window() {
        let t0 = Instant::now();
        let mut ind = CopyIndicator::default();
        ind.trigger(t0);
        ind.trigger(t0 + Duration::from_millis(1500));
        assert!(ind.is_active(t0 + Duration::from_millis(3000)));
        assert!(!ind.is_active(t0 + Duration::from_millis(3500)));
    }

    #[test]
    fn copy_writes_text_and_arms_indicator() {
        let now = Instant::now();
        let mut cb = MemoryClipboard::default();
        let mut ind = CopyIndicator::default();
        copy_artifact(&mut cb, &mut ind, "You are...", now).unwrap();
        assert_eq!(cb.contents.as_deref(), Some("You are..."));
        assert!(ind.is_active(now));
    }

    #[test]
    fn failed_copy_leaves_indicator_off() {
        let now = Instant::now();
        let mut cb = MemoryClipboard { broken: true, ..Default::default() };
        let mut ind = CopyIndicator::default();
        assert!(copy_artifact(&mut cb, &mut ind, "x", now).is_err());
        assert!(!ind.is_active(now));
    }
}
