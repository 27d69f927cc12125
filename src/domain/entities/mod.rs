//! Domain entity definitions.

mod todo;
mod token;
mod user;

pub use todo::{NewTodo, TodoId, TodoItem, TodoStatus};
pub use token::{Credentials, IdToken, RefreshToken, Session};
pub use user::{User, UserId};
