pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;
pub use database::{Store, init_store};
pub use error::AppError;
pub use services::{AuthService, UserContext};
