mod error;
mod id;
mod user;

pub use error::Error;
pub use id::{InvalidUserId, UserId};
pub use user::UserView;
