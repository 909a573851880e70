//! Terminal status output.
//!
//! Short, colored one-line messages on stderr for the things a developer
//! watches for while the tool runs: build finished, server listening,
//! rebuild failed. Detailed records go through `tracing` instead.
//!
//! ```no_run
//! use frontdev_cli::ui;
//!
//! ui::init_colors(false);
//! ui::success("Built dist/index.js in 42ms");
//! ui::error("Build failed");
//! ```

mod format;
mod messages;

pub use format::format_duration;
pub use messages::{error, info, success, warning};

use std::sync::atomic::{AtomicBool, Ordering};

static COLORS_ENABLED: AtomicBool = AtomicBool::new(true);

/// Whether status messages are currently colored.
pub fn colors_enabled() -> bool {
    COLORS_ENABLED.load(Ordering::Relaxed)
}

/// Check if color output should be enabled.
///
/// `NO_COLOR` wins over `FORCE_COLOR`; otherwise colors are used when stderr
/// is attended by a user.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::user_attended_stderr()
}

/// Initialize color support for status messages.
///
/// Call once at startup. `no_color` (the `--no-color` flag) turns colors off
/// regardless of the environment.
pub fn init_colors(no_color: bool) {
    COLORS_ENABLED.store(!no_color && should_use_color(), Ordering::Relaxed);
}
