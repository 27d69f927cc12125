//! Presentation layer with UI components and event handling.

/// Event handling.
pub mod events;
/// Route handling.
pub mod router;
/// UI screens.
pub mod ui;
/// Reusable widgets.
pub mod widgets;

pub use router::{ChannelNavigator, Route};
pub use ui::App;
