//! # Shared Helpers
//!
//! Validation rules, rent-date arithmetic and display formatting shared by
//! the API handlers, the seeders and the CLI client.

pub mod dates;
pub mod format;
pub mod validation;

pub use dates::{calculate_next_rent_due, is_payment_late};
pub use format::format_currency;
pub use validation::{is_valid_email, is_valid_password, is_valid_phone};
