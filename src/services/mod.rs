pub mod auth;
pub mod idea;
