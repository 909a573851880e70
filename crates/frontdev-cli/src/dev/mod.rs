//! Watch mode and development server.
//!
//! - [`DevBuilder`] runs one build with the project's bundler options
//! - [`FileWatcher`] turns file system events into debounced change events
//! - [`RebuildHandler`] reacts to each build outcome (log errors, link assets)
//! - [`DevServer`] serves the output directory and proxies `/api/*` through
//!   [`ApiProxy`]

pub mod builder;
pub mod proxy;
pub mod rebuild;
pub mod server;
pub mod watcher;

pub use builder::DevBuilder;
pub use proxy::ApiProxy;
pub use rebuild::{RebuildHandler, RebuildStatus};
pub use server::DevServer;
pub use watcher::{FileChange, FileWatcher};
