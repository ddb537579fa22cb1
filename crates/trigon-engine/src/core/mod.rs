//! Engine-facing contracts.
//!
//! The runtime talks to application code only through [`ViewDelegate`].
//! [`TriangleDelegate`] is the delegate the viewer installs.

mod delegate;
mod triangle;

pub use delegate::ViewDelegate;
pub use triangle::TriangleDelegate;
