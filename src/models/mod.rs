//! Shipped record types

mod event;
mod user;

pub use event::Event;
pub use user::User;
