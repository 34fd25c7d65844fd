//! Client-side table data pipeline.
//!
//! List views load a whole collection once and then derive everything they
//! display from the in-memory copy: records are sorted with a field
//! comparator, narrowed by a free-text name filter, and cut into pages.

mod field;
mod filter;
mod pagination;
mod sort;

pub use field::{FieldValue, Record};
pub use filter::apply_filter;
pub use pagination::{empty_rows, page_count, visible_range};
pub use sort::{descending_compare, get_comparator, Comparator, Order};

#[cfg(test)]
pub(crate) mod fixtures {
    use super::{FieldValue, Record};

    /// Minimal record used by the pipeline tests.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Row {
        pub id: i64,
        pub name: Option<&'static str>,
        pub qty: i64,
    }

    impl Record for Row {
        fn field(&self, name: &str) -> Option<FieldValue<'_>> {
            match name {
                "id" => Some(FieldValue::Integer(self.id)),
                "name" => self.name.map(FieldValue::Text),
                "qty" => Some(FieldValue::Integer(self.qty)),
                _ => None,
            }
        }
    }

    pub fn row(id: i64, name: &'static str, qty: i64) -> Row {
        Row {
            id,
            name: Some(name),
            qty,
        }
    }

    pub fn ids(rows: &[&Row]) -> Vec<i64> {
        rows.iter().map(|r| r.id).collect()
    }
}
