pub mod error;
pub mod ids;
pub mod sessions;
pub mod users;

pub use users::User;
