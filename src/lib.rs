//! overview-nav - Spatial keyboard navigation for a desktop overview
//!
//! While a desktop shell shows its overview of scaled window thumbnails,
//! overview-nav lets the user walk between thumbnails with the arrow keys,
//! zooms the highlighted one, and acts on it from the keyboard:
//!
//! - **Spatial navigation**: arrow keys pick the nearest thumbnail in their
//!   direction, and a navigation memory makes every move reversible
//! - **Window actions**: activate, close, or move the selected window to
//!   another workspace, switch workspaces with Page Up/Down, Home and End
//! - **Lifecycle tracking**: navigation pauses while thumbnails animate and
//!   resumes on a refreshed snapshot once they settled
//!
//! # Architecture
//!
//! The shell implements [`host::HostAdapter`] and forwards its signals as
//! [`event::Event`]s into one [`controller::KeyController`] per open
//! overview:
//!
//! - [`controller`]: Event handling and the overview lifecycle
//! - [`selection`]: Session, highlight and selection state machine
//! - [`navigation`]: Neighbor search and navigation memory
//! - [`geometry`]: Rectangles, snapshots and zoom computation
//! - [`keybindings`]: Key classification and pointer motion tracking
//! - [`subscription`]: Bookkeeping of signal connections
//! - [`scheduler`]: The deferred refresh after reposition animations
//! - [`config`]: Tunables loaded from a config file
//! - [`backend`]: A simulated shell with an ASCII renderer for testing

#![warn(rust_2018_idioms)]

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod geometry;
pub mod host;
pub mod keybindings;
pub mod navigation;
pub mod scheduler;
pub mod selection;
pub mod subscription;
pub mod test_mode;
pub mod window;

pub use controller::KeyController;
pub use error::{NavError, NavResult};
pub use host::HostAdapter;
