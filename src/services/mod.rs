pub mod approval;
pub mod attendance;
pub mod auth;
pub mod claims;
pub mod confirmation;
pub mod directory;
pub mod hierarchy;
pub mod leave;
pub mod lifecycle;
pub mod notifications;
pub mod payroll;
pub mod salary;
pub mod settings;
pub mod user_context;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::AuthService;
pub use user_context::UserContext;
