//! Column sorting state shared by list screens.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Direction of a column sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortOrder {
    /// Returns the order as used in query strings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Orients an ascending comparison result.
    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(CoreError::unknown("sort order", other)),
        }
    }
}

/// Sorting state of a table keyed by one column.
///
/// Selecting the active column flips the direction; selecting another column
/// switches to it in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSort<C> {
    /// Active column.
    pub column: C,
    /// Active direction.
    pub order: SortOrder,
}

impl<C: Copy + PartialEq> ColumnSort<C> {
    /// Creates a sort state.
    #[must_use]
    pub const fn new(column: C, order: SortOrder) -> Self {
        Self { column, order }
    }

    /// Applies a column click.
    pub fn select(&mut self, column: C) {
        if self.column == column {
            self.order = self.order.reversed();
        } else {
            self.column = column;
            self.order = SortOrder::Asc;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reselecting_column_flips_order() {
        let mut sort = ColumnSort::new(1u8, SortOrder::Asc);
        sort.select(1);
        assert_eq!(sort.order, SortOrder::Desc);
        sort.select(1);
        assert_eq!(sort.order, SortOrder::Asc);
    }

    #[test]
    fn selecting_other_column_resets_to_ascending() {
        let mut sort = ColumnSort::new(1u8, SortOrder::Desc);
        sort.select(2);
        assert_eq!(sort, ColumnSort::new(2, SortOrder::Asc));
    }

    #[test]
    fn desc_reverses_ordering() {
        assert_eq!(SortOrder::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortOrder::Asc.apply(Ordering::Less), Ordering::Less);
    }

    #[test]
    fn sort_order_parses() {
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("down".parse::<SortOrder>().is_err());
    }
}
