pub mod account;
pub mod task;

pub use account::{Account, AccountResponse, NewAccount};
pub use task::{ListQuery, NewTask, Page, Task, TaskPatch, TaskStatus, MAX_PAGE_SIZE};
