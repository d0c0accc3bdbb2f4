mod invoice;
mod line_item;

pub use invoice::{InvoiceHeader, Recipient};
pub use line_item::{Currency, LineDraft, LineItem, PricingMode, ServiceType, DEFAULT_FEE_PERCENT};
