//! Repository traits for metadata operations.

pub mod overrides;
pub mod users;

pub use overrides::OverrideRepo;
pub use users::UserRepo;
