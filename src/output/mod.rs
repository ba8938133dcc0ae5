pub mod formatter;

pub use formatter::{format_branch, format_error, format_resolution, should_use_colors};
