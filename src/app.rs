//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the bound track list, the
//! list selection and which screen is showing.

mod model;

pub use model::*;
