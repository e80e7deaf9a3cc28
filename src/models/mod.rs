mod like;
mod message;
mod photo;
mod user;

pub use like::Like;
pub use message::{Message, NewMessage, UpdateMessage};
pub use photo::{NewPhoto, Photo};
pub use user::{Gender, NewUser, UpdateUser, User, age_on};
