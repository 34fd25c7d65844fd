//! Dynamically typed field access for table records.

use std::cmp::Ordering;
use std::fmt;

/// A borrowed view of one field of a record.
///
/// Values form a total order: numbers first, compared numerically across
/// integers and floats, then text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// A text field.
    Text(&'a str),
    /// A whole-number field.
    Integer(i64),
    /// A decimal field.
    Float(f64),
}

impl FieldValue<'_> {
    /// Get the text content, if this is a text field.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Compare two values.
    ///
    /// Numbers sort before text. Integers and floats compare by numeric
    /// value; an integer and a float of the same value put the integer
    /// first. Floats use IEEE total ordering, so NaN has a fixed place.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Text(_), _) => Ordering::Greater,
            (_, FieldValue::Text(_)) => Ordering::Less,
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.total_cmp(b),
            (FieldValue::Integer(a), FieldValue::Float(b)) => {
                (*a as f64).total_cmp(b).then(Ordering::Less)
            }
            (FieldValue::Float(a), FieldValue::Integer(b)) => {
                a.total_cmp(&(*b as f64)).then(Ordering::Greater)
            }
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Float(x) => write!(f, "{}", x),
        }
    }
}

/// A row that can be sorted and filtered by field name.
pub trait Record {
    /// Look up a field by its wire name.
    ///
    /// Returns `None` when the record has no such field.
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        (**self).field(name)
    }
}
