//! Command implementations

pub mod check;
pub mod list;
pub mod status;
pub mod transfer;

pub use check::run_check;
pub use list::run_list;
pub use status::{run_audit, run_status};
pub use transfer::{run_auto, run_paths, run_tracked};

use share_core::BatchReport;

/// Map a batch outcome onto the process exit code.
///
/// 0 when every path succeeded, 1 when some paths succeeded and some
/// failed, 2 when nothing succeeded.
pub fn exit_code(report: &BatchReport) -> i32 {
    if report.failures.is_empty() {
        0
    } else if report.entries.is_empty() {
        2
    } else {
        1
    }
}
