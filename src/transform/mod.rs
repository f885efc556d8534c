//! Reusable record batch transforms

mod currency;
mod uppercase;

pub use currency::CurrencyConversion;
pub use uppercase::FieldUppercase;
