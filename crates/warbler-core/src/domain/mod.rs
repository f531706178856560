//! Domain entities - the core business objects.

mod follow;
mod message;
mod user;

pub use follow::Follow;
pub use message::{MAX_MESSAGE_LEN, Message, NewMessage};
pub use user::{DEFAULT_HEADER_IMAGE_URL, DEFAULT_IMAGE_URL, NewUser, User, UserRelations};
