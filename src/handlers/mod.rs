pub mod attendance;
pub mod auth;
pub mod claims;
pub mod confirmations;
pub mod employees;
pub mod hierarchy;
pub mod leave;
pub mod notifications;
pub mod payroll;
pub mod salary;
pub mod settings;
pub mod shared;
pub mod workflows;
