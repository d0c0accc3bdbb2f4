use anyhow::Result;
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEventKind};
use tracing::warn;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::Recipient;
use crate::state::{self, Event, InvoiceState};
use crate::ui::components::popup::{render_confirmation, render_error};
use crate::ui::header_form::{render_header, HeaderFormState};
use crate::ui::line_form::{render_line_form, LineFormState};
use crate::ui::lines_table::{render_lines, LinesTableState};

// Part of the screen receiving keys; Tab moves between them
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Section {
    Header,
    AddLine,
    Lines,
}

pub struct InvoiceScreenState {
    invoice: InvoiceState,
    recipient: Recipient,
    section: Section,
    header_form: HeaderFormState,
    line_form: LineFormState,
    lines: LinesTableState,
    show_error: Option<String>,
    status: Option<String>,
}

pub enum InvoiceScreenAction {
    Quit,
    Export,
}

impl InvoiceScreenState {
    pub fn new(invoice: InvoiceState, recipient: Recipient) -> Self {
        let header_form = HeaderFormState::new(&invoice.header);
        Self {
            invoice,
            recipient,
            section: Section::AddLine,
            header_form,
            line_form: LineFormState::new(),
            lines: LinesTableState::new(),
            show_error: None,
            status: None,
        }
    }

    pub fn invoice(&self) -> &InvoiceState {
        &self.invoice
    }

    pub fn recipient(&self) -> &Recipient {
        &self.recipient
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.show_error = Some(error.into());
    }

    /// Runs one transition. A rejected event keeps the current invoice and
    /// surfaces the reason in the error popup.
    pub fn dispatch(&mut self, event: Event) -> bool {
        match state::apply(&self.invoice, event) {
            Ok(next) => {
                self.invoice = next;
                self.lines.clamp(self.invoice.lines().len());
                true
            }
            Err(err) => {
                warn!(error = %err, "event rejected");
                self.show_error = Some(err.to_string());
                false
            }
        }
    }

    fn submit_line(&mut self) {
        match self.line_form.to_draft(self.invoice.pricing_mode) {
            Ok(draft) => {
                if self.dispatch(Event::AddLine(draft)) {
                    self.line_form.reset(self.invoice.pricing_mode);
                    self.status = Some(format!("{} lines", self.invoice.lines().len()));
                }
            }
            Err(err) => self.show_error = Some(err.to_string()),
        }
    }

    fn next_section(&mut self) {
        self.section = match self.section {
            Section::Header => Section::AddLine,
            Section::AddLine => Section::Lines,
            Section::Lines => Section::Header,
        };
    }

    fn previous_section(&mut self) {
        self.section = match self.section {
            Section::Header => Section::Lines,
            Section::AddLine => Section::Header,
            Section::Lines => Section::AddLine,
        };
    }
}

pub fn render_invoice_screen<B: Backend>(frame: &mut Frame<B>, state: &mut InvoiceScreenState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3), // Title
                Constraint::Length(8), // Header
                Constraint::Length(5), // Add line
                Constraint::Min(10),   // Lines and totals
                Constraint::Length(3), // Help
            ]
            .as_ref(),
        )
        .split(frame.size());

    let title_text = match &state.status {
        Some(status) => format!("Invoice creator - {}", status),
        None => "Invoice creator".to_string(),
    };
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    render_header(
        frame,
        &state.header_form,
        &state.invoice.header,
        &state.recipient,
        chunks[1],
        state.section == Section::Header,
    );
    render_line_form(
        frame,
        &state.line_form,
        &state.invoice,
        chunks[2],
        state.section == Section::AddLine,
    );
    render_lines(
        frame,
        &mut state.lines,
        &state.invoice,
        chunks[3],
        state.section == Section::Lines,
    );

    let help_text = match state.section {
        Section::Header if state.header_form.is_editing() => {
            "Enter - Save field | Esc - Cancel editing"
        }
        Section::Header => {
            "Up/Down - Field | Enter - Edit | Tab - Next section | X - Export | Esc - Quit"
        }
        Section::AddLine => concat!(
            "Up/Down - Field | Left/Right - Change option | Space - Toggle VAT | ",
            "Enter - Add line | Tab - Next section | X - Export | Esc - Quit"
        ),
        Section::Lines => {
            "Up/Down - Select line | D - Delete line | Tab - Next section | X - Export | Esc - Quit"
        }
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[4]);

    let size = frame.size();
    if state.lines.is_confirming_delete() {
        render_confirmation(frame, size, "Delete the selected line?");
    }

    if let Some(error) = &state.show_error {
        render_error(frame, size, error);
    }
}

pub fn handle_input(state: &mut InvoiceScreenState) -> Result<Option<InvoiceScreenAction>> {
    if let TermEvent::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            return Ok(handle_key(state, key.code));
        }
    }
    Ok(None)
}

pub fn handle_key(state: &mut InvoiceScreenState, key: KeyCode) -> Option<InvoiceScreenAction> {
    // Any key dismisses the error popup
    if state.show_error.take().is_some() {
        return None;
    }

    if state.lines.is_confirming_delete() {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                state.lines.set_confirm_delete(false);
                if let Some(index) = state.lines.selected() {
                    if state.dispatch(Event::DeleteLine(index)) {
                        state.status = Some(format!("line {} deleted", index + 1));
                    }
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                state.lines.set_confirm_delete(false);
            }
            _ => {}
        }
        return None;
    }

    if state.section == Section::Header && state.header_form.is_editing() {
        if let Some(event) = state.header_form.handle_key(key, &state.invoice.header) {
            state.dispatch(event);
        }
        return None;
    }

    match key {
        KeyCode::Esc => return Some(InvoiceScreenAction::Quit),
        KeyCode::Tab => state.next_section(),
        KeyCode::BackTab => state.previous_section(),
        KeyCode::Char('x') | KeyCode::Char('X') => return Some(InvoiceScreenAction::Export),
        _ => match state.section {
            Section::Header => {
                if let Some(event) = state.header_form.handle_key(key, &state.invoice.header) {
                    state.dispatch(event);
                }
            }
            Section::AddLine => {
                let pricing_mode = state.invoice.pricing_mode;
                match key {
                    KeyCode::Enter => state.submit_line(),
                    KeyCode::Up => state.line_form.previous_field(pricing_mode),
                    KeyCode::Down => state.line_form.next_field(pricing_mode),
                    _ => {
                        if let Some(event) = state.line_form.handle_key(key, &state.invoice) {
                            state.dispatch(event);
                        }
                    }
                }
            }
            Section::Lines => {
                let len = state.invoice.lines().len();
                match key {
                    KeyCode::Up => state.lines.previous(len),
                    KeyCode::Down => state.lines.next(len),
                    KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
                        if state.lines.selected().is_some() {
                            state.lines.set_confirm_delete(true);
                        }
                    }
                    _ => {}
                }
            }
        },
    }

    None
}
