use thiserror::Error;

use crate::models::Currency;

/// Rejections raised while turning form input into a line item.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be a number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("quantity must be at least 1")]
    ZeroQuantity,

    #[error("unit price must be a non-negative number, got {0}")]
    InvalidPrice(f64),

    #[error("discount must be between 0 and 100%, got {0}%")]
    DiscountOutOfRange(u32),

    #[error("fee must be between 0 and 20%, got {0}%")]
    FeeOutOfRange(f64),

    #[error("invoice is in {expected}, a line in {found} cannot be added")]
    CurrencyMismatch { expected: Currency, found: Currency },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvoiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no line at position {index} (invoice has {len} lines)")]
    NoSuchLine { index: usize, len: usize },

    #[error("invoice has no lines")]
    EmptyInvoice,
}
