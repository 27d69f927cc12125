mod input;
mod status_bar;
mod todo_list;

pub use input::TextInput;
pub use status_bar::{StatusBar, StatusLevel};
pub use todo_list::{TodoList, TodoListSelection};
