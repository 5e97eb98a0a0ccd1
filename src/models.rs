//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. These types stay light-weight data holders so the store and the
//! workflow can focus on persistence and form state.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// One person entry. Every field is free-form text: age and phone number are
/// stored exactly as typed, without numeric parsing.
pub struct Record {
    /// Primary key from the database. `None` until the store inserts the
    /// record; never changes afterwards.
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub age: String,
    pub phone_number: String,
}

impl Record {
    /// Build an unsaved record from the four text values.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        age: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            age: age.into(),
            phone_number: phone_number.into(),
        }
    }

    /// Read the value backing a form field.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Age => &self.age,
            Field::PhoneNumber => &self.phone_number,
        }
    }
}

impl fmt::Display for Record {
    /// `First Last` with the id appended once the record is stored.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)?;
        if let Some(id) = self.id {
            write!(f, " (#{id})")?;
        }
        Ok(())
    }
}

/// The four inputs of the entry form, in focus order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Field {
    #[default]
    FirstName,
    LastName,
    Age,
    PhoneNumber,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::FirstName,
        Field::LastName,
        Field::Age,
        Field::PhoneNumber,
    ];

    /// Label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First name",
            Field::LastName => "Last name",
            Field::Age => "Age",
            Field::PhoneNumber => "Phone number",
        }
    }

    /// Column name in the `records` table. Also used in log lines so
    /// personal values never have to be written out.
    pub fn column(self) -> &'static str {
        match self {
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::Age => "age",
            Field::PhoneNumber => "phone_number",
        }
    }

    /// Next field, wrapping from the phone number back to the first name.
    pub fn next(self) -> Self {
        match self {
            Field::FirstName => Field::LastName,
            Field::LastName => Field::Age,
            Field::Age => Field::PhoneNumber,
            Field::PhoneNumber => Field::FirstName,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Field::FirstName => Field::PhoneNumber,
            Field::LastName => Field::FirstName,
            Field::Age => Field::LastName,
            Field::PhoneNumber => Field::Age,
        }
    }

    /// Position within [`Field::ALL`].
    pub fn index(self) -> usize {
        match self {
            Field::FirstName => 0,
            Field::LastName => 1,
            Field::Age => 2,
            Field::PhoneNumber => 3,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
