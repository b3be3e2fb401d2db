//! Run report output.

mod console;
mod json;

pub use console::render_console;
pub use json::{ReportWriteError, write_json_report};
