pub mod catalog;
pub mod checkout;
pub mod customers;
pub mod error;
pub mod reports;
pub mod staff;
pub mod state;
pub mod telemetry;

pub use error::{AppError, AppResult, ErrorKind};
pub use state::AppState;
