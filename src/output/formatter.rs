use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::error::OpenError;
use crate::open::Resolution;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

fn url_text(url: &str, use_colors: bool) -> String {
    if use_colors {
        url.blue().to_string()
    } else {
        url.to_string()
    }
}

/// The "Current branch: ..." line, shown as soon as the branch is known.
pub fn format_branch(branch: &str, use_colors: bool) -> String {
    if use_colors {
        format!("Current branch: {}", branch.green())
    } else {
        format!("Current branch: {}", branch)
    }
}

/// Format the outcome of a lookup for the terminal.
///
/// With `print` the found URL is shown on its own line instead of the
/// "Opening ..." notice.
pub fn format_resolution(resolution: &Resolution, print: bool, use_colors: bool) -> String {
    match resolution {
        Resolution::Request { url, .. } => {
            let url = url_text(url, use_colors);
            if print {
                url
            } else {
                format!("Opening {}", url)
            }
        }
        Resolution::HomePage { url, .. } => format!(
            "Looks like you are on the main branch. Opening home page.\n{}",
            url_text(url, use_colors)
        ),
        Resolution::NoRequest {
            provider,
            create_url,
            ..
        } => format!(
            "No open {noun} found for current branch\nCreate {noun} at {}",
            url_text(create_url, use_colors),
            noun = provider.request_noun()
        ),
        Resolution::DetachedHead => {
            let headline = "No active branch found.";
            if use_colors {
                format!("{}\nSwitch to a branch and try again.", headline.red())
            } else {
                format!("{}\nSwitch to a branch and try again.", headline)
            }
        }
    }
}

/// Format an error with its follow-up hint.
pub fn format_error(err: &OpenError, use_colors: bool) -> String {
    let message = err.to_string();
    let message = if use_colors {
        message.red().to_string()
    } else {
        message
    };

    match err.hint() {
        Some(hint) => format!("{}\n{}", message, hint),
        None => message,
    }
}
