pub mod approval;
pub mod attendance;
pub mod auth;
pub mod employee;
pub mod leave;
pub(crate) mod macros;
pub mod notification;
pub mod payroll;
pub mod settings;
pub mod workflow;

// Re-export all models for easy importing
pub use approval::*;
pub use attendance::*;
pub use auth::*;
pub use employee::*;
pub use leave::*;
pub use notification::*;
pub use payroll::*;
pub use settings::*;
pub use workflow::*;
