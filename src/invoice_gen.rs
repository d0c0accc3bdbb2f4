use anyhow::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

use crate::error::InvoiceError;
use crate::format;
use crate::models::Recipient;
use crate::state::InvoiceState;

/// Files written for one export. `pdf` is only set when pandoc succeeded.
#[derive(Debug)]
pub struct ExportedInvoice {
    pub markdown: PathBuf,
    pub pdf: Option<PathBuf>,
}

/// Writes the invoice on screen to Markdown, and to PDF when pandoc is installed
pub struct InvoiceGenerator {
    output_dir: PathBuf,
}

impl InvoiceGenerator {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let path = output_dir.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        Ok(Self {
            output_dir: path.to_path_buf(),
        })
    }

    pub fn generate_invoice(
        &self,
        invoice: &InvoiceState,
        recipient: &Recipient,
    ) -> Result<ExportedInvoice> {
        let markdown = generate_markdown(invoice, recipient)?;

        let stem = format!("invoice_{}", file_stem(invoice));
        let md_path = self.output_dir.join(format!("{stem}.md"));
        let pdf_path = self.output_dir.join(format!("{stem}.pdf"));

        let mut file = File::create(&md_path)?;
        file.write_all(markdown.as_bytes())?;
        info!(path = %md_path.display(), lines = invoice.lines().len(), "invoice exported");

        let pandoc = Command::new("pandoc").arg(&md_path).arg("-o").arg(&pdf_path).output();
        let pdf = match pandoc {
            Ok(output) if output.status.success() => Some(pdf_path),
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                warn!(stderr = %stderr, "pandoc failed, keeping markdown only");
                None
            }
            Err(e) => {
                warn!(error = %e, "could not run pandoc, keeping markdown only");
                None
            }
        };

        Ok(ExportedInvoice { markdown: md_path, pdf })
    }
}

/// Invoice number reduced to characters safe in a file name; the date when no
/// number was typed.
fn file_stem(invoice: &InvoiceState) -> String {
    let cleaned: String = invoice
        .header
        .number
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();

    if cleaned.is_empty() {
        invoice.header.date.format("%Y%m%d").to_string()
    } else {
        cleaned
    }
}

fn generate_markdown(
    invoice: &InvoiceState,
    recipient: &Recipient,
) -> Result<String, InvoiceError> {
    let totals = invoice.totals();
    let summary = format::totals(&totals).ok_or(InvoiceError::EmptyInvoice)?;
    let header = &invoice.header;

    let mut content = String::new();

    content.push_str("# Invoice");
    if !header.number.is_empty() {
        content.push_str(&format!(" {}", header.number));
    }
    content.push_str("\n\n");
    content.push_str(&format!("Date: {}\n\n", header.date.format("%d/%m/%Y")));

    if !header.concept.is_empty() {
        content.push_str(&format!("**Concept:** {}\n\n", header.concept));
    }

    content.push_str("| To | From |\n|---|---|\n");
    content.push_str(&format!("| {} | {} |\n", recipient.name, header.issuer_name));
    content.push_str(&format!("| {} | {} |\n", recipient.tax_id, header.issuer_tax_id));
    content.push_str(&format!("| {} | {} |\n\n", recipient.address, header.issuer_address));

    content.push_str("| Product provider | Processing fee | Subtotal | VAT | Total |\n");
    content.push_str("|---|---:|---:|---:|---:|\n");

    for (item, result) in invoice.lines().iter().zip(invoice.line_results()) {
        let currency = item.currency();
        content.push_str(&format!(
            "| {}<br>*{}* | {} | {} | {} | {} |\n",
            format::line_caption(item),
            format::line_detail(item, &result),
            format::amount(result.platform_fee, currency),
            format::amount(result.subtotal, currency),
            format::amount(result.vat_amount, currency),
            format::amount(result.total, currency),
        ));
    }
    content.push('\n');

    for (label, value) in summary {
        content.push_str(&format!("**{}:** {}  \n", label, value));
    }

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currency, LineDraft};
    use crate::state::{apply, Event};

    fn recipient() -> Recipient {
        Recipient {
            name: "Acme Events".to_string(),
            tax_id: "B00000000".to_string(),
            address: "1 Main Street".to_string(),
        }
    }

    fn invoice_with_line() -> InvoiceState {
        let mut state = InvoiceState::default();
        state.header.number = "INV 7/2024".to_string();
        let draft = LineDraft {
            quantity: 10,
            unit_price: 50.0,
            currency: Currency::Euro,
            discount_percent: 0,
            fee_percent: 14.5,
        };
        apply(&state, Event::AddLine(draft)).unwrap()
    }

    #[test]
    fn markdown_lists_lines_and_totals() {
        let markdown = generate_markdown(&invoice_with_line(), &recipient()).unwrap();
        assert!(markdown.starts_with("# Invoice INV 7/2024"));
        assert!(markdown.contains("Acme Events"));
        assert!(markdown.contains("| 15.00 € | 500.00 € | 105.00 € | 605.00 € |"));
        assert!(markdown.contains("**Total:** 605.00 €"));
    }

    #[test]
    fn empty_invoice_is_refused() {
        let err = generate_markdown(&InvoiceState::default(), &recipient()).unwrap_err();
        assert_eq!(err, InvoiceError::EmptyInvoice);
    }

    #[test]
    fn invoice_number_is_sanitized_for_file_names() {
        assert_eq!(file_stem(&invoice_with_line()), "INV_7_2024");
    }

    #[test]
    fn writes_markdown_into_output_dir() {
        let dir = std::env::temp_dir().join(format!("invoice-gen-test-{}", std::process::id()));
        let generator = InvoiceGenerator::new(&dir).unwrap();

        let exported = generator.generate_invoice(&invoice_with_line(), &recipient()).unwrap();
        assert_eq!(exported.markdown, dir.join("invoice_INV_7_2024.md"));
        assert!(fs::read_to_string(&exported.markdown).unwrap().contains("605.00 €"));

        fs::remove_dir_all(&dir).ok();
    }
}
