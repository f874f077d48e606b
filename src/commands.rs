//! CLI commands, each an `impl App` block.

mod add;
mod delete;
mod list;
mod push;

pub(crate) use list::format_target;
