//! Month view state for the calendar tab

use chrono::{Datelike, Months, NaiveDate};

use crate::todo::{self, Todo};

/// Weekday column headers, Sunday first
pub const WEEKDAY_HEADERS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

/// One row of the month grid; `None` pads days outside the month
pub type Week = [Option<u32>; 7];

pub struct CalendarView {
    /// First day of the displayed month
    month: NaiveDate,
    selected: Option<NaiveDate>,
}

impl CalendarView {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            month: first_of_month(today),
            selected: None,
        }
    }

    pub fn month(&self) -> NaiveDate {
        self.month
    }

    /// "April 2024"
    pub fn title(&self) -> String {
        self.month.format("%B %Y").to_string()
    }

    pub fn next_month(&mut self) {
        if let Some(next) = self.month.checked_add_months(Months::new(1)) {
            self.month = next;
        }
    }

    pub fn previous_month(&mut self) {
        if let Some(prev) = self.month.checked_sub_months(Months::new(1)) {
            self.month = prev;
        }
    }

    /// Sunday-first grid of the displayed month
    pub fn weeks(&self) -> Vec<Week> {
        let lead = self.month.weekday().num_days_from_sunday() as usize;
        let days = days_in_month(self.month);

        let mut weeks = Vec::new();
        let mut week: Week = [None; 7];
        let mut column = lead;
        for day in 1..=days {
            week[column] = Some(day);
            column += 1;
            if column == 7 {
                weeks.push(week);
                week = [None; 7];
                column = 0;
            }
        }
        if column > 0 {
            weeks.push(week);
        }
        weeks
    }

    pub fn date_of(&self, day: u32) -> Option<NaiveDate> {
        self.month.with_day(day)
    }

    /// Select a day of the displayed month; out-of-range days are ignored
    pub fn select(&mut self, day: u32) -> Option<NaiveDate> {
        let date = self.date_of(day)?;
        self.selected = Some(date);
        Some(date)
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    /// Day number of the selection when it lies in the displayed month
    pub fn selected_day(&self) -> Option<u32> {
        self.selected
            .filter(|d| first_of_month(*d) == self.month)
            .map(|d| d.day())
    }

    pub fn is_today(&self, day: u32, today: NaiveDate) -> bool {
        self.date_of(day) == Some(today)
    }

    pub fn has_todos(&self, day: u32, todos: &[Todo], today: NaiveDate) -> bool {
        !self.todos_for(day, todos, today).is_empty()
    }

    pub fn todos_for<'a>(&self, day: u32, todos: &'a [Todo], today: NaiveDate) -> Vec<&'a Todo> {
        let Some(date) = self.date_of(day) else {
            return Vec::new();
        };
        todo::due_on(todos, date, today)
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn days_in_month(first: NaiveDate) -> u32 {
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next.signed_duration_since(first).num_days() as u32,
        None => 31,
    }
}
