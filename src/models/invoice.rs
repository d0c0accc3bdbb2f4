use chrono::{Local, NaiveDate};

/// Details typed into the top of the invoice form.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceHeader {
    pub number: String,
    pub concept: String,
    pub issuer_name: String,
    pub issuer_tax_id: String,
    pub issuer_address: String,
    pub date: NaiveDate,
}

impl InvoiceHeader {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            number: String::new(),
            concept: String::new(),
            issuer_name: String::new(),
            issuer_tax_id: String::new(),
            issuer_address: String::new(),
            date,
        }
    }
}

impl Default for InvoiceHeader {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

/// The bill-to party. Comes from configuration, not from the form.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipient {
    pub name: String,
    pub tax_id: String,
    pub address: String,
}
