pub mod idea;
pub mod user;

pub use idea::IdeaRepository;
pub use user::UserRepository;
