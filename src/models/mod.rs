pub mod access_token;
pub mod page;
pub mod task;
pub mod user;

pub use access_token::AccessToken;
pub use page::Page;
pub use task::{Task, TaskFields, TaskInput, TaskWithUsers};
pub use user::{NewUser, User, UserInput, UserRecord, UserSummary, UserTasks};
