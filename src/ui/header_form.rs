use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::{InvoiceHeader, Recipient};
use crate::state::Event;
use crate::ui::components::date_input::DateInputState;

// Represents a field of the invoice header
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum HeaderField {
    Number,
    Concept,
    IssuerName,
    IssuerTaxId,
    IssuerAddress,
    Date,
}

impl HeaderField {
    fn label(&self) -> &'static str {
        match self {
            HeaderField::Number => "Invoice Number",
            HeaderField::Concept => "Concept",
            HeaderField::IssuerName => "From",
            HeaderField::IssuerTaxId => "CIF/NIF",
            HeaderField::IssuerAddress => "Address",
            HeaderField::Date => "Date",
        }
    }

    fn value<'a>(&self, header: &'a InvoiceHeader) -> &'a str {
        match self {
            HeaderField::Number => &header.number,
            HeaderField::Concept => &header.concept,
            HeaderField::IssuerName => &header.issuer_name,
            HeaderField::IssuerTaxId => &header.issuer_tax_id,
            HeaderField::IssuerAddress => &header.issuer_address,
            HeaderField::Date => "",
        }
    }
}

const FIELD_ORDER: [HeaderField; 6] = [
    HeaderField::Number,
    HeaderField::Concept,
    HeaderField::IssuerName,
    HeaderField::IssuerTaxId,
    HeaderField::IssuerAddress,
    HeaderField::Date,
];

// Enter starts editing the selected field, Enter again commits it, Esc discards
pub struct HeaderFormState {
    current_field: HeaderField,
    editing: bool,
    active_input: String,
    date_state: DateInputState,
}

impl HeaderFormState {
    pub fn new(header: &InvoiceHeader) -> Self {
        Self {
            current_field: HeaderField::Number,
            editing: false,
            active_input: String::new(),
            date_state: DateInputState::new(header.date),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn next_field(&mut self) {
        let pos = FIELD_ORDER.iter().position(|f| *f == self.current_field).unwrap_or(0);
        self.current_field = FIELD_ORDER[(pos + 1) % FIELD_ORDER.len()];
    }

    pub fn previous_field(&mut self) {
        let pos = FIELD_ORDER.iter().position(|f| *f == self.current_field).unwrap_or(0);
        self.current_field = FIELD_ORDER[(pos + FIELD_ORDER.len() - 1) % FIELD_ORDER.len()];
    }

    fn start_editing(&mut self, header: &InvoiceHeader) {
        self.editing = true;
        if self.current_field == HeaderField::Date {
            self.date_state = DateInputState::new(header.date);
            self.date_state.start_editing();
        } else {
            self.active_input = self.current_field.value(header).to_string();
        }
    }

    fn cancel_editing(&mut self, header: &InvoiceHeader) {
        self.editing = false;
        self.active_input.clear();
        self.date_state = DateInputState::new(header.date);
    }

    fn commit(&mut self, header: &InvoiceHeader) -> Event {
        let mut updated = header.clone();
        let value = std::mem::take(&mut self.active_input);
        match self.current_field {
            HeaderField::Number => updated.number = value,
            HeaderField::Concept => updated.concept = value,
            HeaderField::IssuerName => updated.issuer_name = value,
            HeaderField::IssuerTaxId => updated.issuer_tax_id = value,
            HeaderField::IssuerAddress => updated.issuer_address = value,
            HeaderField::Date => {
                self.date_state.stop_editing();
                updated.date = self.date_state.date;
            }
        }
        self.editing = false;
        Event::UpdateHeader(updated)
    }

    /// Handles a key while the header section has focus. Returns the header
    /// update to dispatch once an edit is committed.
    pub fn handle_key(&mut self, key: KeyCode, header: &InvoiceHeader) -> Option<Event> {
        if !self.editing {
            match key {
                KeyCode::Enter => self.start_editing(header),
                KeyCode::Up => self.previous_field(),
                KeyCode::Down => self.next_field(),
                _ => {}
            }
            return None;
        }

        match key {
            KeyCode::Enter => return Some(self.commit(header)),
            KeyCode::Esc => self.cancel_editing(header),
            _ if self.current_field == HeaderField::Date => self.date_state.handle_key(key),
            KeyCode::Char(c) => self.active_input.push(c),
            KeyCode::Backspace => {
                self.active_input.pop();
            }
            _ => {}
        }
        None
    }

    fn display_value(&self, field: HeaderField, header: &InvoiceHeader) -> String {
        let editing_this = self.editing && self.current_field == field;
        match field {
            HeaderField::Date if editing_this => self.date_state.display(),
            HeaderField::Date => header.date.format("%d/%m/%Y").to_string(),
            _ if editing_this => format!("{}|", self.active_input),
            _ => field.value(header).to_string(),
        }
    }
}

pub fn render_header<B: Backend>(
    frame: &mut Frame<B>,
    state: &HeaderFormState,
    header: &InvoiceHeader,
    recipient: &Recipient,
    area: Rect,
    focused: bool,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(area);

    let to = Paragraph::new(vec![
        Spans::from(recipient.name.as_str()),
        Spans::from(recipient.tax_id.as_str()),
        Spans::from(recipient.address.as_str()),
    ])
    .block(Block::default().title("To").borders(Borders::ALL));
    frame.render_widget(to, columns[0]);

    let lines: Vec<Spans> = FIELD_ORDER
        .iter()
        .map(|field| {
            let label_style = if focused && state.current_field == *field {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            };
            Spans::from(vec![
                Span::styled(format!("{:<16}", format!("{}:", field.label())), label_style),
                Span::raw(state.display_value(*field, header)),
            ])
        })
        .collect();

    let from = Paragraph::new(lines).block(
        Block::default()
            .title("Invoice")
            .borders(Borders::ALL)
            .style(if focused { Style::default().fg(Color::Yellow) } else { Style::default() }),
    );
    frame.render_widget(from, columns[1]);
}
