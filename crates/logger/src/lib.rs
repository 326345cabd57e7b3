use std::{fmt::Display, sync::Mutex};

use anyhow::anyhow;

/// Sink for user-facing diagnostics.
///
/// Library internals trace through `tracing`; this trait is for messages the
/// person running a transform is expected to read (progress, rebinding
/// warnings, per-file failures).
pub trait Logger: Clone {
    fn log(&self, message: impl Display);
    fn warn(&self, message: impl Display) {
        self.log(format!("WARN: {}", message));
    }
    fn error(&self, message: impl Display) {
        self.log(format!("ERROR: {}", message));
    }
}

#[macro_export]
macro_rules! debug_logf {
    ($logger:expr, $fmt:expr $(, $arg:expr)*) => {
        if cfg!(debug_assertions) {
            $logger.log(format!($fmt $(, $arg)*));
        }
    };
}

impl<T: Logger> Logger for &T {
    fn log(&self, message: impl Display) {
        (*self).log(message);
    }
    fn warn(&self, message: impl Display) {
        (*self).warn(message);
    }
    fn error(&self, message: impl Display) {
        (*self).error(message);
    }
}

/// Logs to stdout, prefixed with the seconds elapsed since construction.
/// Warnings and errors go to stderr so rewritten source printed on stdout
/// stays clean.
pub struct StdioLogger {
    zero_time: std::time::Instant,
}
impl StdioLogger {
    pub fn new() -> Self {
        Self {
            zero_time: std::time::Instant::now(),
        }
    }

    fn elapsed(&self) -> f64 {
        std::time::Instant::now()
            .duration_since(self.zero_time)
            .as_secs_f64()
    }
}
impl Logger for &StdioLogger {
    fn log(&self, message: impl Display) {
        println!("[{:.04}] {}", self.elapsed(), message);
    }
    fn warn(&self, message: impl Display) {
        eprintln!("[{:.04}] WARN: {}", self.elapsed(), message);
    }
    fn error(&self, message: impl Display) {
        eprintln!("[{:.04}] ERROR: {}", self.elapsed(), message);
    }
}
impl Default for StdioLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects every message in memory. Used by tests to assert on diagnostics.
pub struct VecLogger {
    logs: Mutex<Vec<String>>,
}

impl Logger for &VecLogger {
    fn log(&self, message: impl Display) {
        self.logs
            .lock()
            .expect("locking the logger array should not fail!")
            .push(format!("{}", message));
    }
}
impl VecLogger {
    pub fn new() -> Self {
        Self {
            logs: Mutex::new(Vec::new()),
        }
    }

    pub fn get_logs(self) -> Result<Vec<String>, anyhow::Error> {
        self.logs
            .into_inner()
            .map_err(|err| anyhow!("error unlocking VecLogger logs:{err}"))
    }
}
impl Default for VecLogger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::{Logger, VecLogger};

    #[test]
    fn test_vec_logger_prefixes_levels() {
        let logger = VecLogger::new();
        (&logger).log("materialized uilib/lib/button");
        (&logger).warn("rebound Button");
        (&logger).error("bad path");
        assert_eq!(
            logger.get_logs().unwrap(),
            vec![
                "materialized uilib/lib/button".to_string(),
                "WARN: rebound Button".to_string(),
                "ERROR: bad path".to_string(),
            ]
        );
    }
}
