//! Output formatting for stage plans.
//!
//! This module handles formatting and outputting plans:
//! - [`csv`] - CSV subnet table
//! - [`terminal`] - colored summaries
//! - [`json`] - plan file for the provisioning engine
//! - [`logging`] - log4rs setup with a console fallback

mod csv;
mod json;
mod logging;
mod terminal;

pub use csv::{subnet_print, subnet_rows, SubnetPrintRow};
pub use json::{plan_file_name, read_plan, write_plan};
pub use logging::{console_config, init_logging, LOG_CONFIG_FILE};
pub use terminal::{describe_decision, format_field, print_summary};
