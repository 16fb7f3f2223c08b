//! tfsetup core library: file layout, shared-directory discovery, rendering
//! context, errors.
//!
//! Public API surface:
//! - [`layout`]: fixed names and the [`Layout`] settings struct
//! - [`locate`]: upward search for the shared configuration directory
//! - [`context`]: [`RenderingContext`] and [`load_context`]
//! - [`error`]: [`CoreError`]

pub mod context;
pub mod error;
pub mod layout;
pub mod locate;

pub use context::{load_context, RenderingContext};
pub use error::CoreError;
pub use layout::Layout;
pub use locate::{find_dir, find_dir_from, Located};
