#![forbid(unsafe_code)]

//! The add-process form.
//!
//! Field editing is plain string state; validation happens once, at
//! submit, where the numeric fields must parse as non-negative integers
//! before any request is built. The engine never sees unparsed input.

use std::fmt;

use schedtui_core::{NewProcess, QueueType};

/// The form fields, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Arrival,
    Burst,
    Priority,
    Queue,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        Self::Name,
        Self::Arrival,
        Self::Burst,
        Self::Priority,
        Self::Queue,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Arrival => "Arrival time",
            Self::Burst => "Burst time",
            Self::Priority => "Priority",
            Self::Queue => "Queue",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Name => Self::Arrival,
            Self::Arrival => Self::Burst,
            Self::Burst => Self::Priority,
            Self::Priority => Self::Queue,
            Self::Queue => Self::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Name => Self::Queue,
            Self::Arrival => Self::Name,
            Self::Burst => Self::Arrival,
            Self::Priority => Self::Burst,
            Self::Queue => Self::Priority,
        }
    }
}

/// Why a submit was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    EmptyName,
    InvalidInteger(FormField),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "process name must not be empty"),
            Self::InvalidInteger(field) => {
                write!(f, "{} must be a non-negative integer", field.label().to_lowercase())
            }
        }
    }
}

/// Editable state for the add-process form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessForm {
    pub name: String,
    pub arrival: String,
    pub burst: String,
    pub priority: String,
    pub queue: QueueType,
    pub field: FormField,
}

impl Default for ProcessForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            arrival: String::new(),
            burst: String::new(),
            priority: String::new(),
            queue: QueueType::Foreground,
            field: FormField::Name,
        }
    }
}

impl ProcessForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the focused field; the queue selector has no free text.
    pub fn active_text(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::Name => Some(&mut self.name),
            FormField::Arrival => Some(&mut self.arrival),
            FormField::Burst => Some(&mut self.burst),
            FormField::Priority => Some(&mut self.priority),
            FormField::Queue => None,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        if let Some(text) = self.active_text() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.active_text() {
            text.pop();
        }
    }

    pub fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn prev_field(&mut self) {
        self.field = self.field.prev();
    }

    /// Flip the queue selector between foreground and background.
    pub fn toggle_queue(&mut self) {
        self.queue = self.queue.toggled();
    }

    /// Validate and assemble the request body.
    pub fn build(&self) -> Result<NewProcess, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::EmptyName);
        }
        let arrival_time = parse_field(&self.arrival, FormField::Arrival)?;
        let burst_time = parse_field(&self.burst, FormField::Burst)?;
        let priority = u32::try_from(parse_field(&self.priority, FormField::Priority)?)
            .map_err(|_| FormError::InvalidInteger(FormField::Priority))?;
        Ok(NewProcess {
            name: name.to_owned(),
            arrival_time,
            burst_time,
            priority,
            queue_type: self.queue,
        })
    }

    /// Clear all fields after a successful submit.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn parse_field(text: &str, field: FormField) -> Result<u64, FormError> {
    text.trim()
        .parse::<u64>()
        .map_err(|_| FormError::InvalidInteger(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ProcessForm {
        ProcessForm {
            name: "P1".to_owned(),
            arrival: "0".to_owned(),
            burst: "5".to_owned(),
            priority: "2".to_owned(),
            queue: QueueType::Background,
            field: FormField::Name,
        }
    }

    #[test]
    fn build_parses_numeric_fields_as_integers() {
        let request = filled().build().unwrap();
        assert_eq!(request.arrival_time, 0);
        assert_eq!(request.burst_time, 5);
        assert_eq!(request.priority, 2);
        assert_eq!(request.queue_type, QueueType::Background);
    }

    #[test]
    fn build_rejects_non_numeric_input() {
        let mut form = filled();
        form.burst = "five".to_owned();
        assert_eq!(form.build(), Err(FormError::InvalidInteger(FormField::Burst)));
        assert_eq!(
            FormError::InvalidInteger(FormField::Burst).to_string(),
            "burst time must be a non-negative integer"
        );
    }

    #[test]
    fn build_rejects_an_empty_name() {
        let mut form = filled();
        form.name = "   ".to_owned();
        assert_eq!(form.build(), Err(FormError::EmptyName));
    }

    #[test]
    fn tab_order_cycles_through_all_fields() {
        let mut form = ProcessForm::new();
        for expected in FormField::ALL {
            assert_eq!(form.field, expected);
            form.next_field();
        }
        assert_eq!(form.field, FormField::Name);
        form.prev_field();
        assert_eq!(form.field, FormField::Queue);
    }

    #[test]
    fn queue_field_takes_no_text() {
        let mut form = ProcessForm::new();
        form.field = FormField::Queue;
        form.insert_char('x');
        assert!(form.name.is_empty());
        form.toggle_queue();
        assert_eq!(form.queue, QueueType::Background);
    }
}
