//! User-facing notices raised by the playback engine.

use std::sync::atomic::{AtomicBool, Ordering};

/// Sink for transient user notices.
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Routes notices into the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn info(&self, message: &str) {
        tracing::info!(target: "notice", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::warn!(target: "notice", "{}", message);
    }
}

/// Prints notices to stderr, for the CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }
}

/// A flag that fires once per process.
#[derive(Debug, Default)]
pub struct OnceFlag(AtomicBool);

impl OnceFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Returns `true` the first time only.
    pub fn fire(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }
}

/// Guards the "last played" notice shown when state is restored.
pub static RESUME_NOTICE: OnceFlag = OnceFlag::new();

#[cfg(test)]
pub mod mocks {
    use super::*;
    use parking_lot::Mutex;

    /// Collects notices for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        pub infos: Mutex<Vec<String>>,
        pub errors: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        pub fn infos(&self) -> Vec<String> {
            self.infos.lock().clone()
        }

        pub fn errors(&self) -> Vec<String> {
            self.errors.lock().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn info(&self, message: &str) {
            self.infos.lock().push(message.to_string());
        }

        fn error(&self, message: &str) {
            self.errors.lock().push(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_once_flag_fires_once() {
        let flag = OnceFlag::new();
        assert!(flag.fire());
        assert!(!flag.fire());
        assert!(!flag.fire());
    }
}
