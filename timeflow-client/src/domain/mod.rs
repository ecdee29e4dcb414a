mod leave;
mod notification;
mod task;
mod timesheet;
mod user;

pub use leave::*;
pub use notification::*;
pub use task::*;
pub use timesheet::*;
pub use user::*;
