//! @acp:module "Commands"
//! @acp:summary "CLI command implementations"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Each command is in its own submodule.

pub mod check;
pub mod compute;
pub mod init;
pub mod output;
pub mod watch;

pub use check::{check_fields, execute_check, CheckOptions};
pub use compute::{compute_file, execute_compute, ComputeOptions};
pub use init::{execute_init, template, InitOptions};
pub use output::{format_stage, print_issues, print_notifications, print_report};
pub use watch::{execute_watch, WatchOptions};
