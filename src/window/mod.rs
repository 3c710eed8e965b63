//! Window identity as seen by the navigation controller
//!
//! The host owns every window; the controller refers to them by [`WindowId`]
//! and by their position in the ordered list captured at refresh time.

mod id;

pub use id::WindowId;
