mod decode;

pub use decode::DecodeStripe;

use std::str::FromStr;

use serde::Serialize;

use crate::error::StripeError;

/// Which side of the panel the striping starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
}

/// The corner a viewer sees pixel 0 in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Corner {
    Left,
    Right,
}

impl Side {
    /// Returns the corner the first row starts from, seen from the back
    /// (`from_back = true`) or the front of the panel.
    #[must_use]
    pub fn starting_corner(self, from_back: bool) -> Corner {
        match (self, from_back) {
            (Self::Left, true) | (Self::Right, false) => Corner::Left,
            (Self::Left, false) | (Self::Right, true) => Corner::Right,
        }
    }
}

impl FromStr for Side {
    type Err = StripeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(Self::Left),
            "R" => Ok(Self::Right),
            other => Err(StripeError::InvalidSide(other.into())),
        }
    }
}

/// One physical LED row within a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub index: usize,
    /// Cumulative deviation from the standard one-pixel-per-row inset on the
    /// starting side. Not an absolute pixel index.
    pub offset: i32,
    pub point_count: usize,
    /// Unlit pixels on the strand immediately before this row.
    pub gap_count: usize,
}

/// The decoded rows of one panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stripe {
    pub panel_id: String,
    pub side: Side,
    /// Per-output capacities overriding the default, in output order.
    pub custom_lengths: Vec<usize>,
    pub rows: Vec<Row>,
}

impl Stripe {
    /// Total LED-bearing pixels across all rows.
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.rows.iter().map(|row| row.point_count).sum()
    }

    /// Total gap pixels across all rows.
    #[must_use]
    pub fn gap_count(&self) -> usize {
        self.rows.iter().map(|row| row.gap_count).sum()
    }
}
