//! Field comparators for table sorting.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Record;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Smallest value first.
    #[default]
    Asc,
    /// Largest value first.
    Desc,
}

impl Order {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Order::Asc => Order::Desc,
            Order::Desc => Order::Asc,
        }
    }

    /// Arrow glyph shown next to the active column header.
    pub fn arrow(&self) -> &'static str {
        match self {
            Order::Asc => "▲",
            Order::Desc => "▼",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Asc => f.write_str("asc"),
            Order::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for Order {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Order::Asc),
            "desc" | "descending" => Ok(Order::Desc),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// Compare two records so that larger field values come first.
///
/// Returns `Less` when `b[order_by] < a[order_by]` and `Greater` when
/// `b[order_by] > a[order_by]`, ordering values with
/// [`FieldValue::total_cmp`](super::FieldValue::total_cmp). A missing field
/// ranks above every present value, so it comes first here and last in
/// ascending order. Two missing fields compare as `Equal`.
pub fn descending_compare<R: Record + ?Sized>(a: &R, b: &R, order_by: &str) -> Ordering {
    match (a.field(order_by), b.field(order_by)) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
    }
}

/// A comparator over records for one column and direction.
///
/// Not stable on its own: equal keys must be tie-broken by the caller,
/// which [`apply_filter`](super::apply_filter) does by original position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparator<'a> {
    order: Order,
    order_by: &'a str,
}

impl<'a> Comparator<'a> {
    /// The sort direction.
    pub fn order(&self) -> Order {
        self.order
    }

    /// The field being sorted on.
    pub fn order_by(&self) -> &'a str {
        self.order_by
    }

    /// Compare two records.
    pub fn compare<R: Record + ?Sized>(&self, a: &R, b: &R) -> Ordering {
        match self.order {
            Order::Desc => descending_compare(a, b, self.order_by),
            Order::Asc => descending_compare(a, b, self.order_by).reverse(),
        }
    }
}

/// Build a comparator for the given direction and field.
pub fn get_comparator(order: Order, order_by: &str) -> Comparator<'_> {
    Comparator { order, order_by }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::fixtures::{row, Row};

    #[test]
    fn test_descending_compare_larger_first() {
        let small = row(1, "a", 1);
        let large = row(2, "b", 9);
        assert_eq!(descending_compare(&small, &large, "qty"), Ordering::Greater);
        assert_eq!(descending_compare(&large, &small, "qty"), Ordering::Less);
        assert_eq!(descending_compare(&small, &small, "qty"), Ordering::Equal);
    }

    #[test]
    fn test_descending_compare_missing_field_is_equal() {
        let a = row(1, "a", 1);
        let b = row(2, "b", 2);
        assert_eq!(descending_compare(&a, &b, "price"), Ordering::Equal);
    }

    #[test]
    fn test_missing_field_sorts_last_ascending() {
        let named = row(1, "a", 1);
        let nameless = Row {
            id: 2,
            name: None,
            qty: 1,
        };
        let asc = get_comparator(Order::Asc, "name");
        assert_eq!(asc.compare(&named, &nameless), Ordering::Less);
        assert_eq!(asc.compare(&nameless, &named), Ordering::Greater);

        let desc = get_comparator(Order::Desc, "name");
        assert_eq!(desc.compare(&nameless, &named), Ordering::Less);
    }

    #[test]
    fn test_asc_comparator_negates() {
        let small = row(1, "a", 1);
        let large = row(2, "b", 9);
        let cmp = get_comparator(Order::Asc, "qty");
        assert_eq!(cmp.compare(&small, &large), Ordering::Less);
        assert_eq!(cmp.compare(&large, &small), Ordering::Greater);
    }

    #[test]
    fn test_desc_comparator() {
        let small = row(1, "a", 1);
        let large = row(2, "b", 9);
        let cmp = get_comparator(Order::Desc, "qty");
        assert_eq!(cmp.compare(&small, &large), Ordering::Greater);
        assert_eq!(cmp.order(), Order::Desc);
        assert_eq!(cmp.order_by(), "qty");
    }

    #[test]
    fn test_comparator_is_antisymmetric() {
        let rows = [row(1, "b", 3), row(2, "a", 3), row(3, "c", 1)];
        let cmp = get_comparator(Order::Asc, "name");
        for a in &rows {
            for b in &rows {
                assert_eq!(cmp.compare(a, b), cmp.compare(b, a).reverse());
            }
        }
    }

    #[test]
    fn test_order_reversed_and_parse() {
        assert_eq!(Order::Asc.reversed(), Order::Desc);
        assert_eq!(Order::Desc.reversed(), Order::Asc);
        assert_eq!("DESC".parse::<Order>().unwrap(), Order::Desc);
        assert_eq!("ascending".parse::<Order>().unwrap(), Order::Asc);
        assert!("sideways".parse::<Order>().is_err());
    }
}
