use tracing::warn;

use crate::error::{Result, StripeError};

use super::{Row, Side, Stripe};

/// Decodes a panel's row code into its ordered rows.
///
/// Tokens are separated by whitespace. A token made only of `g` adds that
/// many gap pixels to the next row. Any other token is
/// `<left-nudges>.<right-nudges>`, each side a run of `+`/`-`, and yields one
/// row whose length is the previous length plus both nets. After each row
/// the running length drops by one.
pub struct DecodeStripe<'a> {
    panel_id: &'a str,
    base_row_length: usize,
    side: Side,
    code: &'a str,
    custom_lengths: Vec<usize>,
}

impl<'a> DecodeStripe<'a> {
    /// Creates a new `DecodeStripe` operation.
    ///
    /// * `base_row_length` - Length of the first row before its own nudges.
    #[must_use]
    pub fn new(panel_id: &'a str, base_row_length: usize, side: Side, code: &'a str) -> Self {
        Self {
            panel_id,
            base_row_length,
            side,
            code,
            custom_lengths: Vec::new(),
        }
    }

    /// Overrides the capacities of the panel's outputs, in output order.
    #[must_use]
    pub fn with_custom_lengths(mut self, lengths: Vec<usize>) -> Self {
        self.custom_lengths = lengths;
        self
    }

    /// Executes the decode, returning the panel's stripe.
    ///
    /// # Errors
    ///
    /// Returns [`StripeError::MalformedRowCode`] for a token that is neither
    /// a gap run nor two nudge groups of `+`/`-`,
    /// [`StripeError::RowLengthUnderflow`] if nudges shrink a row to zero
    /// pixels, and [`StripeError::NoRows`] if the code holds no row tokens.
    pub fn execute(self) -> Result<Stripe> {
        let mut rows = Vec::new();
        let mut row_length = i64::try_from(self.base_row_length).map_err(|_| {
            StripeError::RowLengthUnderflow { row: 0 }
        })?;
        let mut offset: i32 = 0;
        let mut gaps = 0;

        for token in self.code.split_whitespace() {
            if token.bytes().all(|b| b == b'g') {
                gaps += token.len();
                continue;
            }

            let (left, right) = parse_nudges(token)?;
            offset -= match self.side {
                Side::Left => left,
                Side::Right => right,
            };
            row_length += i64::from(left) + i64::from(right);

            let index = rows.len();
            let point_count = usize::try_from(row_length)
                .ok()
                .filter(|&len| len > 0)
                .ok_or(StripeError::RowLengthUnderflow { row: index })?;
            rows.push(Row {
                index,
                offset,
                point_count,
                gap_count: gaps,
            });
            gaps = 0;
            row_length -= 1;
        }

        if rows.is_empty() {
            return Err(StripeError::NoRows(self.panel_id.into()).into());
        }
        if gaps > 0 {
            warn!(panel = self.panel_id, gaps, "ignoring gap pixels after the last row");
        }

        Ok(Stripe {
            panel_id: self.panel_id.into(),
            side: self.side,
            custom_lengths: self.custom_lengths,
            rows,
        })
    }
}

/// Splits a row token into its left and right net nudges.
fn parse_nudges(token: &str) -> std::result::Result<(i32, i32), StripeError> {
    let mut groups = token.split('.');
    let (Some(left), Some(right), None) = (groups.next(), groups.next(), groups.next()) else {
        return Err(StripeError::MalformedRowCode {
            token: token.into(),
            reason: "expected exactly one '.' between nudge groups".into(),
        });
    };
    Ok((net_nudge(token, left)?, net_nudge(token, right)?))
}

fn net_nudge(token: &str, group: &str) -> std::result::Result<i32, StripeError> {
    group.chars().try_fold(0, |net, c| match c {
        '+' => Ok(net + 1),
        '-' => Ok(net - 1),
        other => Err(StripeError::MalformedRowCode {
            token: token.into(),
            reason: format!("bad nudge character {other:?}"),
        }),
    })
}
