pub mod commands;
pub mod menu;
pub mod session;
pub mod task;

pub use commands::*;

use crate::error::TodoError;
use crate::output;

pub fn report_error(e: &TodoError, json_output: bool) {
    if json_output {
        output::json::print(&output::json::error(e));
    } else {
        eprintln!("Error: {}", e.message);
    }
}
