pub mod todo_item;
pub mod todo_list;
pub mod user;

pub use todo_item::{NewTodoItem, TodoItem, TodoItemPatch};
pub use todo_list::{NewTodoList, TodoList, TodoListPatch};
pub use user::{NewUser, User};
