pub mod application;
pub mod interview;
pub mod status;
pub mod user;
