pub mod id;
pub mod todo;
pub mod user;

pub use id::{is_valid_record_id, parse_record_id};
pub use todo::{Todo, TodoChanges, TodoInput, TodoPatch};
pub use user::{AuthToken, NewUser, PublicUser, User, UserInput, AUTH_ACCESS};
