use chrono::{Datelike, NaiveDate};
use crossterm::event::KeyCode;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DatePart {
    Day,
    Month,
    Year,
}

impl DatePart {
    fn width(&self) -> usize {
        match self {
            DatePart::Day | DatePart::Month => 2,
            DatePart::Year => 4,
        }
    }
}

/// Digit-by-digit editor for the invoice date, shown as DD/MM/YYYY.
/// A part is committed once all of its digits are typed; invalid dates are dropped.
pub struct DateInputState {
    pub date: NaiveDate,
    pub editing: bool,
    part: DatePart,
    buffer: String,
}

impl DateInputState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            editing: false,
            part: DatePart::Day,
            buffer: String::new(),
        }
    }

    pub fn start_editing(&mut self) {
        self.editing = true;
        self.part = DatePart::Day;
        self.buffer.clear();
    }

    pub fn stop_editing(&mut self) {
        self.editing = false;
        self.buffer.clear();
    }

    fn move_part(&mut self, forward: bool) {
        self.part = match (self.part, forward) {
            (DatePart::Day, true) | (DatePart::Year, false) => DatePart::Month,
            (DatePart::Month, true) | (DatePart::Day, false) => DatePart::Year,
            (DatePart::Year, true) | (DatePart::Month, false) => DatePart::Day,
        };
        self.buffer.clear();
    }

    fn commit(&mut self) {
        let Ok(value) = self.buffer.parse::<u32>() else {
            return;
        };
        let (year, month, day) = (self.date.year(), self.date.month(), self.date.day());
        let candidate = match self.part {
            DatePart::Day => NaiveDate::from_ymd_opt(year, month, value),
            DatePart::Month => NaiveDate::from_ymd_opt(year, value, day),
            DatePart::Year if (1900..=2100).contains(&value) => {
                NaiveDate::from_ymd_opt(value as i32, month, day)
            }
            DatePart::Year => None,
        };
        if let Some(date) = candidate {
            self.date = date;
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.buffer.push(c);
                if self.buffer.len() == self.part.width() {
                    self.commit();
                    self.move_part(true);
                }
            }
            KeyCode::Backspace => {
                self.buffer.pop();
            }
            KeyCode::Right | KeyCode::Char('/') => self.move_part(true),
            KeyCode::Left => self.move_part(false),
            _ => {}
        }
    }

    pub fn display(&self) -> String {
        if !self.editing {
            return self.date.format("%d/%m/%Y").to_string();
        }

        let placeholder = |part: DatePart, current: String| {
            if part != self.part {
                current
            } else if self.buffer.is_empty() {
                match part {
                    DatePart::Day => "[DD]".to_string(),
                    DatePart::Month => "[MM]".to_string(),
                    DatePart::Year => "[YYYY]".to_string(),
                }
            } else {
                format!("[{}]", self.buffer)
            }
        };

        format!(
            "{}/{}/{}",
            placeholder(DatePart::Day, format!("{:02}", self.date.day())),
            placeholder(DatePart::Month, format!("{:02}", self.date.month())),
            placeholder(DatePart::Year, format!("{:04}", self.date.year())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editing(date: NaiveDate) -> DateInputState {
        let mut state = DateInputState::new(date);
        state.start_editing();
        state
    }

    fn type_digits(state: &mut DateInputState, digits: &str) {
        for c in digits.chars() {
            state.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_a_full_date_updates_every_part() {
        let mut state = editing(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        type_digits(&mut state, "03112025");
        assert_eq!(state.date, NaiveDate::from_ymd_opt(2025, 11, 3).unwrap());
        assert_eq!(state.part, DatePart::Day);
    }

    #[test]
    fn impossible_day_is_ignored() {
        let mut state = editing(NaiveDate::from_ymd_opt(2023, 2, 10).unwrap());
        type_digits(&mut state, "30");
        assert_eq!(state.date, NaiveDate::from_ymd_opt(2023, 2, 10).unwrap());
        assert_eq!(state.part, DatePart::Month);
    }

    #[test]
    fn display_marks_the_part_being_typed() {
        let mut state = editing(NaiveDate::from_ymd_opt(2024, 6, 9).unwrap());
        assert_eq!(state.display(), "[DD]/06/2024");
        state.handle_key(KeyCode::Right);
        type_digits(&mut state, "1");
        assert_eq!(state.display(), "09/[1]/2024");
        state.stop_editing();
        assert_eq!(state.display(), "09/06/2024");
    }

    #[test]
    fn keys_are_ignored_when_not_editing() {
        let mut state = DateInputState::new(NaiveDate::from_ymd_opt(2024, 6, 9).unwrap());
        type_digits(&mut state, "01012020");
        assert_eq!(state.date, NaiveDate::from_ymd_opt(2024, 6, 9).unwrap());
    }
}
