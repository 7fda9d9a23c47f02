pub mod account;
pub mod category;
pub mod event;
pub mod question;
