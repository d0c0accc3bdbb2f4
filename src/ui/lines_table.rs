use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::format;
use crate::state::InvoiceState;

pub struct LinesTableState {
    table_state: TableState,
    confirm_delete: bool,
}

impl LinesTableState {
    pub fn new() -> Self {
        Self {
            table_state: TableState::default(),
            confirm_delete: false,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.table_state.selected()
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.confirm_delete
    }

    pub fn set_confirm_delete(&mut self, confirm: bool) {
        self.confirm_delete = confirm;
    }

    pub fn next(&mut self, len: usize) {
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self, len: usize) {
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    /// Keeps the selection on a valid row after the line list changed.
    pub fn clamp(&mut self, len: usize) {
        match self.table_state.selected() {
            _ if len == 0 => self.table_state.select(None),
            Some(i) if i >= len => self.table_state.select(Some(len - 1)),
            None => self.table_state.select(Some(0)),
            Some(_) => {}
        }
    }
}

pub fn render_lines<B: Backend>(
    frame: &mut Frame<B>,
    state: &mut LinesTableState,
    invoice: &InvoiceState,
    area: Rect,
    focused: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(5)].as_ref())
        .split(area);

    let header = Row::new(["Product provider", "Processing fee", "Subtotal", "VAT", "Total"])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let detail_style = Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC);
    let rows: Vec<Row> = invoice
        .lines()
        .iter()
        .zip(invoice.line_results())
        .map(|(item, result)| {
            let currency = item.currency();
            let provider = Text::from(vec![
                Spans::from(format::line_caption(item)),
                Spans::from(Span::styled(format::line_detail(item, &result), detail_style)),
            ]);
            Row::new(vec![
                Cell::from(provider),
                Cell::from(format::amount(result.platform_fee, currency)),
                Cell::from(format::amount(result.subtotal, currency)),
                Cell::from(format::amount(result.vat_amount, currency)),
                Cell::from(format::amount(result.total, currency)),
            ])
            .height(2)
        })
        .collect();

    let title = if invoice.is_empty() {
        "Lines (none yet)"
    } else {
        "Lines"
    };

    let table = Table::new(rows)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .style(if focused { Style::default().fg(Color::Yellow) } else { Style::default() }),
        )
        .highlight_style(if focused {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else {
            Style::default()
        })
        .widths(&[
            Constraint::Percentage(44),
            Constraint::Percentage(14),
            Constraint::Percentage(14),
            Constraint::Percentage(14),
            Constraint::Percentage(14),
        ]);

    frame.render_stateful_widget(table, chunks[0], &mut state.table_state);

    // Nothing to total (and no currency to print) until a line exists
    if let Some(rows) = format::totals(&invoice.totals()) {
        let summary: Vec<Spans> = rows
            .iter()
            .map(|(label, value)| {
                Spans::from(vec![
                    Span::styled(
                        format!("{:>10}: ", label),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(value.clone()),
                ])
            })
            .collect();
        let totals = Paragraph::new(summary)
            .block(Block::default().title("Totals").borders(Borders::ALL));
        frame.render_widget(totals, chunks[1]);
    }
}
