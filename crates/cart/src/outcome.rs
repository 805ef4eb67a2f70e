//! Result of a cart mutation.

use serde::{Deserialize, Serialize};

use crate::{CartLine, StockExceeded};

/// The line transition a mutation performed.
///
/// `Created`, `Updated` and `Removed` are the only state changes a line can
/// go through; `Unchanged` is a rejected increment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "line", rename_all = "camelCase")]
pub enum LineChange {
    /// Absent → Present(1).
    Created(CartLine),
    /// Present(n) → Present(m).
    Updated(CartLine),
    /// Nothing persisted.
    Unchanged(CartLine),
    /// Present → Absent; `None` when there was nothing to remove.
    Removed(Option<CartLine>),
}

/// A mutation's line change plus the non-fatal stock signal, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartOutcome {
    pub change: LineChange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_exceeded: Option<StockExceeded>,
}

impl CartOutcome {
    pub fn new(change: LineChange) -> Self {
        Self {
            change,
            stock_exceeded: None,
        }
    }

    pub fn with_stock_exceeded(change: LineChange, exceeded: StockExceeded) -> Self {
        Self {
            change,
            stock_exceeded: Some(exceeded),
        }
    }

    /// The line as it exists after the mutation (`None` once removed).
    pub fn line(&self) -> Option<&CartLine> {
        match &self.change {
            LineChange::Created(l) | LineChange::Updated(l) | LineChange::Unchanged(l) => Some(l),
            LineChange::Removed(_) => None,
        }
    }

    /// Snapshot of a removed line.
    pub fn removed(&self) -> Option<&CartLine> {
        match &self.change {
            LineChange::Removed(l) => l.as_ref(),
            _ => None,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self.change, LineChange::Created(_))
    }
}
