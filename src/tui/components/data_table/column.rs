//! Column definitions and cell values

use chrono::{DateTime, Utc};
use ratatui::layout::Alignment;
use ratatui::text::Line;
use std::fmt;

use crate::money::{CvlPct, Satoshis, UsdCents};

/// A row type the table can display
///
/// `Field` names the record's columns, so a column key is always a valid
/// field of the row type.
pub trait Record {
    type Field: Copy + Eq;

    fn value(&self, field: Self::Field) -> CellValue;
}

/// A single cell before formatting
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Cents(UsdCents),
    Sats(Satoshis),
    Percent(CvlPct),
    Date(DateTime<Utc>),
    Empty,
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// `Text` or `Empty` for optional strings
    pub fn opt_text(s: Option<&str>) -> Self {
        match s {
            Some(s) if !s.is_empty() => Self::Text(s.to_string()),
            _ => Self::Empty,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{}", n),
            Self::Cents(c) => write!(f, "{}", c),
            Self::Sats(s) => write!(f, "{}", s),
            Self::Percent(p) => write!(f, "{}", p),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M")),
            Self::Empty => f.write_str("-"),
        }
    }
}

/// Column header: plain label or pre-styled content
pub enum Header {
    Label(String),
    Node(Line<'static>),
}

impl Header {
    /// Non-blank string label; cards only label fields that have one
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Label(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        }
    }

    pub fn to_line(&self) -> Line<'static> {
        match self {
            Self::Label(s) => Line::raw(s.clone()),
            Self::Node(line) => line.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl From<Align> for Alignment {
    fn from(align: Align) -> Self {
        match align {
            Align::Left => Alignment::Left,
            Align::Center => Alignment::Center,
            Align::Right => Alignment::Right,
        }
    }
}

/// Custom cell formatter
pub type CellRenderer<T> = Box<dyn Fn(&CellValue, &T) -> Line<'static>>;

/// One column of a table
///
/// Several columns may share a key to show different facets of one field.
pub struct Column<T: Record> {
    pub key: T::Field,
    pub header: Header,
    /// Fixed width in cells; `None` shares the remaining space
    pub width: Option<u16>,
    pub align: Align,
    pub render: Option<CellRenderer<T>>,
}

impl<T: Record> Column<T> {
    pub fn new(key: T::Field, header: impl Into<String>) -> Self {
        Self {
            key,
            header: Header::Label(header.into()),
            width: None,
            align: Align::Left,
            render: None,
        }
    }

    /// Column whose header is arbitrary content rather than a label
    pub fn with_node(key: T::Field, header: Line<'static>) -> Self {
        Self {
            header: Header::Node(header),
            ..Self::new(key, "")
        }
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn render(mut self, render: impl Fn(&CellValue, &T) -> Line<'static> + 'static) -> Self {
        self.render = Some(Box::new(render));
        self
    }

    /// Formatted cell for `row`
    pub fn cell(&self, row: &T) -> Line<'static> {
        let value = row.value(self.key);
        let line = match &self.render {
            Some(render) => render(&value, row),
            None => Line::raw(value.to_string()),
        };
        line.alignment(self.align.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Account {
        name: &'static str,
        balance: u64,
    }

    #[derive(Clone, Copy, PartialEq, Eq)]
    enum AccountField {
        Name,
        Balance,
    }

    impl Record for Account {
        type Field = AccountField;

        fn value(&self, field: AccountField) -> CellValue {
            match field {
                AccountField::Name => CellValue::text(self.name),
                AccountField::Balance => CellValue::Cents(UsdCents::new(self.balance)),
            }
        }
    }

    fn account() -> Account {
        Account {
            name: "ops",
            balance: 123_456,
        }
    }

    #[test]
    fn default_formatting() {
        let col = Column::<Account>::new(AccountField::Balance, "Balance");
        assert_eq!(col.cell(&account()).to_string(), "$1,234.56");
    }

    #[test]
    fn custom_renderer_sees_value_and_row() {
        let col = Column::<Account>::new(AccountField::Name, "Name")
            .render(|value, row| Line::raw(format!("{} ({})", value, row.balance)));
        assert_eq!(col.cell(&account()).to_string(), "ops (123456)");
    }

    #[test]
    fn duplicate_keys_are_allowed() {
        let columns = [
            Column::<Account>::new(AccountField::Balance, "Balance"),
            Column::<Account>::new(AccountField::Balance, "Raw")
                .render(|_, row| Line::raw(row.balance.to_string())),
        ];
        let cells: Vec<String> = columns.iter().map(|c| c.cell(&account()).to_string()).collect();
        assert_eq!(cells, vec!["$1,234.56", "123456"]);
    }

    #[test]
    fn only_non_blank_labels_count() {
        assert_eq!(Header::Label("Email".into()).label(), Some("Email"));
        assert_eq!(Header::Label("  ".into()).label(), None);
        assert_eq!(Header::Node(Line::raw("Email")).label(), None);
    }
}
