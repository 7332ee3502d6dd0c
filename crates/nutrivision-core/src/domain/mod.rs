//! Domain entities - the core business objects.

mod profile;
mod user;

pub use profile::{ChatMessage, ChatRole, DietProfile};
pub use user::User;
