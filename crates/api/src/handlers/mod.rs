pub mod notifications;
pub mod rules;
pub mod settings;
pub mod stats;
