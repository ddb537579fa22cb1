//! Drawable providers.
//!
//! A `View` hands out one `Drawable` per frame and presents it afterwards. It is
//! either bound to a window surface or backed by an offscreen texture; delegates
//! and the renderer do not see the difference.

mod drawable;
mod state;
mod target;

pub use drawable::Drawable;
pub use state::View;
