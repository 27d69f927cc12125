//! UI screens.

mod app;
mod sign_in_screen;
mod todo_screen;

pub use app::App;
pub use sign_in_screen::{SignInAction, SignInScreen, SignInState};
pub use todo_screen::{TodoAction, TodoFocus, TodoScreen};
