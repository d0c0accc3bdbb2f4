use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::error::ValidationError;
use crate::models::{Currency, LineDraft, PricingMode, ServiceType, DEFAULT_FEE_PERCENT};
use crate::state::{Event, InvoiceState};
use crate::ui::components::selector;

// Fields of the add-line section, in tab order
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum LineField {
    Service,
    Pricing,
    VatIncluded,
    Quantity,
    Price,
    Currency,
    Discount,
    Fee,
}

const FIELD_ORDER: [LineField; 8] = [
    LineField::Service,
    LineField::Pricing,
    LineField::VatIncluded,
    LineField::Quantity,
    LineField::Price,
    LineField::Currency,
    LineField::Discount,
    LineField::Fee,
];

impl LineField {
    fn is_shown(&self, pricing_mode: PricingMode) -> bool {
        *self != LineField::Quantity || pricing_mode.quantity_label().is_some()
    }
}

pub struct LineFormState {
    focus: LineField,
    quantity: String,
    price: String,
    currency: Currency,
    discount: String,
    fee: String,
}

impl LineFormState {
    pub fn new() -> Self {
        Self {
            focus: LineField::Service,
            quantity: "1".to_string(),
            price: String::new(),
            currency: Currency::Euro,
            discount: "0".to_string(),
            fee: DEFAULT_FEE_PERCENT.to_string(),
        }
    }

    pub fn focus(&self) -> LineField {
        self.focus
    }

    /// Clears the numbers after a line was added and puts the cursor on the
    /// first amount shown for `pricing_mode`. Currency stays, the invoice is single-currency.
    pub fn reset(&mut self, pricing_mode: PricingMode) {
        let currency = self.currency;
        *self = Self::new();
        self.currency = currency;
        self.focus = if LineField::Quantity.is_shown(pricing_mode) {
            LineField::Quantity
        } else {
            LineField::Price
        };
    }

    fn step_field(&mut self, pricing_mode: PricingMode, forward: bool) {
        let len = FIELD_ORDER.len();
        let mut pos = FIELD_ORDER.iter().position(|f| *f == self.focus).unwrap_or(0);
        loop {
            pos = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
            if FIELD_ORDER[pos].is_shown(pricing_mode) {
                break;
            }
        }
        self.focus = FIELD_ORDER[pos];
    }

    pub fn next_field(&mut self, pricing_mode: PricingMode) {
        self.step_field(pricing_mode, true);
    }

    pub fn previous_field(&mut self, pricing_mode: PricingMode) {
        self.step_field(pricing_mode, false);
    }

    fn active_input(&mut self) -> Option<(&mut String, bool)> {
        // (buffer, accepts a decimal point)
        match self.focus {
            LineField::Quantity => Some((&mut self.quantity, false)),
            LineField::Price => Some((&mut self.price, true)),
            LineField::Discount => Some((&mut self.discount, false)),
            LineField::Fee => Some((&mut self.fee, true)),
            _ => None,
        }
    }

    /// Applies a key to the focused field. Selector changes belong to the
    /// invoice session, so they come back as an [`Event`] to dispatch.
    pub fn handle_key(&mut self, key: KeyCode, invoice: &InvoiceState) -> Option<Event> {
        match (self.focus, key) {
            (LineField::Service, KeyCode::Left | KeyCode::Right) => Some(Event::SelectService(
                selector::cycle(ServiceType::ALL, invoice.service_type, key == KeyCode::Right),
            )),
            (LineField::Pricing, KeyCode::Left | KeyCode::Right) => Some(Event::SelectPricing(
                selector::cycle(PricingMode::ALL, invoice.pricing_mode, key == KeyCode::Right),
            )),
            (LineField::VatIncluded, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) => {
                Some(Event::SetVatIncluded(!invoice.vat_included))
            }
            (LineField::Currency, KeyCode::Left | KeyCode::Right) => {
                self.currency =
                    selector::cycle(Currency::ALL, self.currency, key == KeyCode::Right);
                None
            }
            (_, KeyCode::Char(c)) => {
                if let Some((buffer, decimal)) = self.active_input() {
                    if c.is_ascii_digit() || (decimal && c == '.' && !buffer.contains('.')) {
                        buffer.push(c);
                    }
                }
                None
            }
            (_, KeyCode::Backspace) => {
                if let Some((buffer, _)) = self.active_input() {
                    buffer.pop();
                }
                None
            }
            _ => None,
        }
    }

    /// Parses the typed values. Fixed prices ignore the quantity field.
    pub fn to_draft(&self, pricing_mode: PricingMode) -> Result<LineDraft, ValidationError> {
        let quantity = match pricing_mode.quantity_label() {
            Some(label) => parse_field(&self.quantity, label)?,
            None => 1,
        };

        Ok(LineDraft {
            quantity,
            unit_price: parse_field(&self.price, pricing_mode.price_label())?,
            currency: self.currency,
            discount_percent: parse_field(&self.discount, "Discount %")?,
            fee_percent: parse_field(&self.fee, "Fee %")?,
        })
    }
}

fn parse_field<T: std::str::FromStr>(
    value: &str,
    field: &'static str,
) -> Result<T, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    value.parse().map_err(|_| ValidationError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

pub fn render_line_form<B: Backend>(
    frame: &mut Frame<B>,
    state: &LineFormState,
    invoice: &InvoiceState,
    area: Rect,
    focused: bool,
) {
    let block = Block::default()
        .title("Add line")
        .borders(Borders::ALL)
        .style(if focused { Style::default().fg(Color::Yellow) } else { Style::default() });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let pricing_mode = invoice.pricing_mode;
    let field = |f: LineField, label: &str, value: String| -> Vec<Span<'static>> {
        let active = focused && state.focus() == f;
        let style = if active {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let is_text = matches!(
            f,
            LineField::Quantity | LineField::Price | LineField::Discount | LineField::Fee
        );
        let value = if active && is_text {
            format!("{}|", value)
        } else {
            value
        };
        vec![
            Span::styled(format!("{}: ", label), Style::default().fg(Color::Gray)),
            Span::styled(value, style),
            Span::raw("   "),
        ]
    };
    let is_active = |f: LineField| focused && state.focus() == f;

    let mut selectors = Vec::new();
    selectors.extend(field(
        LineField::Service,
        "Type of service",
        selector::display(invoice.service_type.label(), is_active(LineField::Service)),
    ));
    selectors.extend(field(
        LineField::Pricing,
        "Pricing type",
        selector::display(pricing_mode.label(), is_active(LineField::Pricing)),
    ));
    selectors.extend(field(
        LineField::VatIncluded,
        "VAT included in customer price?",
        if invoice.vat_included { "[x]" } else { "[ ]" }.to_string(),
    ));
    frame.render_widget(Paragraph::new(Spans::from(selectors)), rows[0]);

    let mut amounts = Vec::new();
    if let Some(label) = pricing_mode.quantity_label() {
        amounts.extend(field(LineField::Quantity, label, state.quantity.clone()));
    }
    amounts.extend(field(LineField::Price, pricing_mode.price_label(), state.price.clone()));
    amounts.extend(field(
        LineField::Currency,
        "Currency",
        selector::display(state.currency.label(), is_active(LineField::Currency)),
    ));
    frame.render_widget(Paragraph::new(Spans::from(amounts)), rows[1]);

    let mut percentages = Vec::new();
    percentages.extend(field(LineField::Discount, "Discount %", state.discount.clone()));
    percentages.extend(field(LineField::Fee, "Fee %", state.fee.clone()));
    frame.render_widget(Paragraph::new(Spans::from(percentages)), rows[2]);
}
