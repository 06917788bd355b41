mod common;
mod init;
mod list;
mod show;

pub use init::{InitArgs, init_config};
pub use list::{ListArgs, list_projects};
pub use show::{ShowArgs, show_project};
