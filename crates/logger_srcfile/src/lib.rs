use std::{borrow::Borrow, fmt::Display};

use logger::Logger;
use swc_common::{SourceMap, Span};

pub trait HasSourceMap {
    fn source_map(&self) -> &SourceMap;
}

/// A logger that can point diagnostics at a location in the unit being
/// transformed.
pub trait SrcFileLogger: Logger {
    fn src_warn(&self, location: &Span, message: impl Display);
    fn src_error(&self, location: &Span, message: impl Display);
}

/// Wraps a plain [Logger] with the [SourceMap] of the unit, so spans can be
/// rendered as `file:line:col`.
#[derive(Clone)]
pub struct WrapFileLogger<TSrcMap, TLogger> {
    source_map: TSrcMap,
    inner_logger: TLogger,
}
impl<TSourceMap: Borrow<SourceMap> + Clone, TLogger: Logger> WrapFileLogger<TSourceMap, TLogger> {
    pub fn new(source_map: TSourceMap, inner_logger: TLogger) -> Self {
        Self {
            source_map,
            inner_logger,
        }
    }

    fn locate(&self, location: &Span, message: impl Display) -> String {
        // synthesized nodes have no position in the source file
        if location.is_dummy() {
            return format!("<generated> :: {}", message);
        }
        let loc = self.source_map().lookup_char_pos(location.lo);
        format!(
            "{}:{}:{} :: {}",
            loc.file.name, loc.line, loc.col_display, message,
        )
    }
}
impl<TSourceMap: Borrow<SourceMap> + Clone, TLogger: Logger> Logger
    for WrapFileLogger<TSourceMap, TLogger>
{
    fn log(&self, message: impl Display) {
        self.inner_logger.log(message);
    }
    fn error(&self, message: impl Display) {
        self.inner_logger.error(message);
    }
    fn warn(&self, message: impl Display) {
        self.inner_logger.warn(message);
    }
}
impl<TSourceMap: Borrow<SourceMap> + Clone, TLogger: Logger> HasSourceMap
    for WrapFileLogger<TSourceMap, TLogger>
{
    fn source_map(&self) -> &SourceMap {
        self.source_map.borrow()
    }
}
impl<TSourceMap: Borrow<SourceMap> + Clone, TLogger: Logger> SrcFileLogger
    for WrapFileLogger<TSourceMap, TLogger>
{
    fn src_warn(&self, location: &Span, message: impl Display) {
        self.warn(self.locate(location, message));
    }
    fn src_error(&self, location: &Span, message: impl Display) {
        self.error(self.locate(location, message));
    }
}

#[cfg(test)]
mod test {
    use logger::VecLogger;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use swc_common::sync::Lrc;
    use swc_common::{BytePos, FileName, SourceMap, Span, DUMMY_SP};

    use crate::{SrcFileLogger, WrapFileLogger};

    #[test]
    fn test_src_warn_points_at_line_and_column() {
        let cm = Lrc::<SourceMap>::default();
        let fm = cm.new_source_file(
            Lrc::new(FileName::Real(PathBuf::from("app.ts"))),
            "import { Button } from 'uilib';\nButton();\n".to_string(),
        );
        let vec_logger = VecLogger::new();
        {
            let logger = WrapFileLogger::new(cm.clone(), &vec_logger);
            let second_line = fm.start_pos + BytePos(32);
            logger.src_warn(&Span::new(second_line, second_line), "rebound");
            logger.src_warn(&DUMMY_SP, "injected");
        }
        assert_eq!(
            vec_logger.get_logs().unwrap(),
            vec![
                "WARN: app.ts:2:0 :: rebound".to_string(),
                "WARN: <generated> :: injected".to_string(),
            ]
        );
    }
}
