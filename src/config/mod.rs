use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

use crate::models::Recipient;

/// Configuration for the application, read from `INVOICE_*` variables
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Directory exported invoices are written to
    #[serde(default = "default_export_dir")]
    pub export_dir: String,

    /// The terminal is taken by the UI, so logs go to a file
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// `tracing_subscriber::EnvFilter` directive
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default = "default_recipient_name")]
    pub recipient_name: String,
    #[serde(default = "default_recipient_tax_id")]
    pub recipient_tax_id: String,
    #[serde(default = "default_recipient_address")]
    pub recipient_address: String,
}

fn default_export_dir() -> String {
    "invoices".to_string()
}

fn default_log_file() -> String {
    "invoice-creator.log".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_recipient_name() -> String {
    "Spathioslink 14 S.L.".to_string()
}

fn default_recipient_tax_id() -> String {
    "B67599241".to_string()
}

fn default_recipient_address() -> String {
    "Carrer del Doctor Francesc Darder, 8-10, 3º 2ª A, 08034, Barcelona".to_string()
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables from a `.env` file are picked up first when one exists.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::prefixed("INVOICE_").from_env::<Config>()?;

        Ok(config)
    }

    pub fn recipient(&self) -> Recipient {
        Recipient {
            name: self.recipient_name.clone(),
            tax_id: self.recipient_tax_id.clone(),
            address: self.recipient_address.clone(),
        }
    }
}
