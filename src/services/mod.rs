pub mod analytics;
pub mod notification;
pub mod reports;
pub mod templates;
pub mod workflow;
