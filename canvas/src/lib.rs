//! Section layout engine for the invitation editor canvas.
//!
//! An invitation is a vertical stack of sections. Each positioned element
//! stores coordinates local to the section that owns it, so whenever an
//! element is dragged the editor has to work out which section the new
//! absolute position falls in and what the element's local coordinates
//! become. This crate owns that mapping plus the small document store the
//! editor mutates with the results.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`units`] | Pixel and viewport-height section heights |
//! | [`doc`] | Sections, elements, and the in-memory store |
//! | [`offset`] | Cumulative section offsets and total canvas height |
//! | [`resolve`] | Maps an absolute Y back to a section and local Y |
//! | [`drag`] | Per-gesture drag session context |
//! | [`engine`] | Editor core applying drag results to the store |
//! | [`config`] | Layout configuration from the environment |
//! | [`error`] | Error type shared by the modules above |
//! | [`consts`] | Shared numeric constants |

pub mod config;
pub mod consts;
pub mod doc;
pub mod drag;
pub mod engine;
pub mod error;
pub mod offset;
pub mod resolve;
pub mod units;

pub use error::LayoutError;
