pub mod ops;

mod app;
pub mod commands;
pub mod config;
pub mod error;
pub mod logs;
mod preconditions;
pub mod push;
pub mod remote_spec;
pub mod store;
mod validate;

pub use app::App;
pub use config::Config;
pub use error::DeployError;

// Disable colors for all tests to get clean output
#[cfg(test)]
#[ctor::ctor]
fn init_tests() {
    colored::control::set_override(false);
}
