//! Application state: catalog, selection, focus and transport-facing model.

mod model;

pub use model::{App, Pane, PlaybackState};
