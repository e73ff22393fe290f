pub mod project;
pub mod task;
pub mod user;

pub use project::{NewProject, Project, ProjectDetail, ProjectPatch};
pub use task::{NewTask, Task, TaskPatch, TaskPriority, TaskStatus};
pub use user::User;
