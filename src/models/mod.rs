pub mod category;
pub mod event;
pub mod organizer;
pub mod question;
pub mod user;
