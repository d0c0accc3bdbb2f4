//! Session state of one invoice and the transitions the form can trigger.
//!
//! The UI owns an [`InvoiceState`] and replaces it with whatever [`apply`]
//! returns, so every interaction can be replayed without a terminal.

use tracing::{debug, info};

use crate::calc::{self, AggregateResult, LineResult, PriceBasis};
use crate::error::{InvoiceError, ValidationError};
use crate::models::{InvoiceHeader, LineDraft, LineItem, PricingMode, ServiceType};

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceState {
    pub header: InvoiceHeader,
    pub service_type: ServiceType,
    pub pricing_mode: PricingMode,
    pub vat_included: bool,
    lines: Vec<LineItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SelectService(ServiceType),
    SelectPricing(PricingMode),
    SetVatIncluded(bool),
    AddLine(LineDraft),
    DeleteLine(usize),
    UpdateHeader(InvoiceHeader),
}

impl InvoiceState {
    pub fn new(header: InvoiceHeader) -> Self {
        Self {
            header,
            service_type: ServiceType::Venue,
            pricing_mode: PricingMode::ByHour,
            vat_included: false,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Figures for every stored line, in order.
    pub fn line_results(&self) -> Vec<LineResult> {
        self.lines
            .iter()
            .map(|item| calc::compute_line(item, PriceBasis::VatExclusive))
            .collect()
    }

    pub fn totals(&self) -> AggregateResult {
        calc::aggregate(&self.lines)
    }

    /// Builds the line the form would add with the current selections.
    /// VAT-inclusive prices are stored net of VAT.
    fn build_line(&self, draft: &LineDraft) -> Result<LineItem, ValidationError> {
        if let Some(first) = self.lines.first() {
            if first.currency() != draft.currency {
                return Err(ValidationError::CurrencyMismatch {
                    expected: first.currency(),
                    found: draft.currency,
                });
            }
        }

        let net = LineDraft {
            unit_price: calc::net_unit_price(
                draft.unit_price,
                PriceBasis::from_vat_included(self.vat_included),
            ),
            ..draft.clone()
        };
        LineItem::new(self.service_type, self.pricing_mode, &net)
    }
}

impl Default for InvoiceState {
    fn default() -> Self {
        Self::new(InvoiceHeader::default())
    }
}

/// Returns the state that results from `event`. On error `state` is left
/// as it was and the caller keeps using it.
pub fn apply(state: &InvoiceState, event: Event) -> Result<InvoiceState, InvoiceError> {
    let mut next = state.clone();

    match event {
        Event::SelectService(service_type) => {
            debug!(service = %service_type, "service type selected");
            next.service_type = service_type;
        }
        Event::SelectPricing(pricing_mode) => {
            debug!(pricing = %pricing_mode, "pricing mode selected");
            next.pricing_mode = pricing_mode;
        }
        Event::SetVatIncluded(vat_included) => {
            next.vat_included = vat_included;
        }
        Event::AddLine(draft) => {
            let item = state.build_line(&draft)?;
            info!(
                service = %item.service_type(),
                quantity = item.quantity(),
                unit_price = item.unit_price(),
                "line added"
            );
            next.lines.push(item);
        }
        Event::DeleteLine(index) => {
            if index >= next.lines.len() {
                return Err(InvoiceError::NoSuchLine {
                    index,
                    len: next.lines.len(),
                });
            }
            let removed = next.lines.remove(index);
            info!(index, service = %removed.service_type(), "line removed");
        }
        Event::UpdateHeader(header) => {
            next.header = header;
        }
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currency, DEFAULT_FEE_PERCENT};

    fn draft(quantity: u32, unit_price: f64) -> LineDraft {
        LineDraft {
            quantity,
            unit_price,
            currency: Currency::Euro,
            discount_percent: 0,
            fee_percent: DEFAULT_FEE_PERCENT,
        }
    }

    fn with_lines(drafts: &[LineDraft]) -> InvoiceState {
        drafts.iter().fold(InvoiceState::default(), |state, d| {
            apply(&state, Event::AddLine(d.clone())).unwrap()
        })
    }

    #[test]
    fn add_line_uses_current_selections() {
        let state = InvoiceState::default();
        let state = apply(&state, Event::SelectService(ServiceType::Catering)).unwrap();
        let state = apply(&state, Event::SelectPricing(PricingMode::ByPeople)).unwrap();
        let state = apply(&state, Event::AddLine(draft(10, 50.0))).unwrap();

        let line = &state.lines()[0];
        assert_eq!(line.service_type(), ServiceType::Catering);
        assert_eq!(line.pricing_mode(), PricingMode::ByPeople);
        assert_eq!(line.quantity(), 10);
    }

    #[test]
    fn vat_included_price_is_stored_net() {
        let state = apply(&InvoiceState::default(), Event::SetVatIncluded(true)).unwrap();
        let state = apply(&state, Event::AddLine(draft(1, 121.0))).unwrap();

        assert_eq!(state.lines()[0].unit_price(), 100.0);
        assert_eq!(state.totals().total, 121.0);
    }

    #[test]
    fn totals_follow_added_lines() {
        let state = with_lines(&[draft(10, 50.0), draft(1, 200.0)]);
        let totals = state.totals();
        assert_eq!(totals.subtotal, 700.0);
        assert_eq!(totals.total, 847.0);
        assert_eq!(totals.vat_amount, 147.0);
        assert_eq!(state.line_results().len(), 2);
    }

    #[test]
    fn delete_keeps_relative_order() {
        let state = with_lines(&[draft(1, 10.0), draft(2, 20.0), draft(3, 30.0)]);
        let state = apply(&state, Event::DeleteLine(1)).unwrap();

        let quantities: Vec<u32> = state.lines().iter().map(LineItem::quantity).collect();
        assert_eq!(quantities, vec![1, 3]);
    }

    #[test]
    fn delete_out_of_range_is_rejected() {
        let state = with_lines(&[draft(1, 10.0)]);
        let err = apply(&state, Event::DeleteLine(4)).unwrap_err();
        assert_eq!(err, InvoiceError::NoSuchLine { index: 4, len: 1 });
        assert_eq!(state.lines().len(), 1);
    }

    #[test]
    fn mixed_currency_is_rejected() {
        let state = with_lines(&[draft(1, 10.0)]);
        let mut sterling = draft(1, 10.0);
        sterling.currency = Currency::Sterling;

        let err = apply(&state, Event::AddLine(sterling)).unwrap_err();
        assert_eq!(
            err,
            InvoiceError::Validation(ValidationError::CurrencyMismatch {
                expected: Currency::Euro,
                found: Currency::Sterling,
            })
        );
    }

    #[test]
    fn invalid_draft_leaves_state_untouched() {
        let state = InvoiceState::default();
        let err = apply(&state, Event::AddLine(draft(0, 10.0))).unwrap_err();
        assert_eq!(err, InvoiceError::Validation(ValidationError::ZeroQuantity));
        assert!(state.is_empty());
    }

    #[test]
    fn header_update_replaces_header() {
        let mut header = InvoiceHeader::default();
        header.number = "2024-017".to_string();
        let state = apply(&InvoiceState::default(), Event::UpdateHeader(header)).unwrap();
        assert_eq!(state.header.number, "2024-017");
    }
}
