mod todo_list_controller;

pub use todo_list_controller::{MountHandle, TodoListController, TodoListState};
