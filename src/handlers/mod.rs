pub mod admin;
pub mod applications;
pub mod auth;
pub mod interviews;
pub mod notifications;
