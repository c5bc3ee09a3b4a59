use std::io::Write;

use flexi_logger::{DeferredNow, Record};
use log::Level;

/// Plain messages for info, prefixed warnings and errors, module paths for
/// debug output.
pub fn cli_format(
    w: &mut dyn Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    match record.level() {
        Level::Error => write!(w, "error: {}", record.args()),
        Level::Warn => write!(w, "warning: {}", record.args()),
        Level::Info => write!(w, "{}", record.args()),
        level => write!(
            w,
            "[{level}] {}: {}",
            record.module_path().unwrap_or("<unnamed>"),
            record.args()
        ),
    }
}
