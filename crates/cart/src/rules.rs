//! Pure cart decisions.
//!
//! Everything here is deterministic and IO-free: given the current line (if
//! any), the product's stock and the request, decide what should happen.
//! `CartService` executes the decision against the stores.

use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use shopcart_core::DomainError;

use crate::CartLine;

/// Non-fatal signal: the requested quantity is more than the product's stock.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockExceeded {
    pub available: u32,
}

impl core::fmt::Display for StockExceeded {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Only {} items in stock!", self.available)
    }
}

/// What `add` should do.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AddDecision {
    /// No line yet: create one with quantity 1.
    Create,
    /// Persist the incremented quantity.
    Increment(NonZeroU32),
    /// Leave the line as it is and report the stock.
    Reject(StockExceeded),
}

/// Decide an add-or-increment.
///
/// The first add always creates a quantity-1 line, whatever the stock and the
/// delta. Only increments are checked against stock.
pub fn decide_add(
    existing: Option<&CartLine>,
    stock: u32,
    delta: u32,
) -> Result<AddDecision, DomainError> {
    if delta == 0 {
        return Err(DomainError::validation("quantity increment must be at least 1"));
    }

    let Some(line) = existing else {
        return Ok(AddDecision::Create);
    };

    // Overflowing u32 is necessarily above any stock.
    match line.qty.checked_add(delta) {
        Some(new_qty) if new_qty.get() <= stock => Ok(AddDecision::Increment(new_qty)),
        _ => Ok(AddDecision::Reject(StockExceeded { available: stock })),
    }
}

/// What `setQuantity` should do.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SetDecision {
    /// Requested quantity ≤ 0.
    Remove,
    /// Persist the requested quantity unchanged.
    Set(NonZeroU32),
    /// Requested quantity above stock: persist the stock instead.
    Clamp(NonZeroU32, StockExceeded),
    /// Requested quantity above a stock of zero: the line cannot survive.
    ClampToRemove(StockExceeded),
}

impl SetDecision {
    pub fn stock_exceeded(&self) -> Option<StockExceeded> {
        match self {
            Self::Clamp(_, e) | Self::ClampToRemove(e) => Some(*e),
            Self::Remove | Self::Set(_) => None,
        }
    }
}

/// Decide a quantity change. `requested` may be any integer.
pub fn decide_set_quantity(requested: i64, stock: u32) -> SetDecision {
    if requested <= 0 {
        return SetDecision::Remove;
    }

    if requested > i64::from(stock) {
        let exceeded = StockExceeded { available: stock };
        return match NonZeroU32::new(stock) {
            Some(clamped) => SetDecision::Clamp(clamped, exceeded),
            None => SetDecision::ClampToRemove(exceeded),
        };
    }

    // 0 < requested <= stock <= u32::MAX
    match u32::try_from(requested).ok().and_then(NonZeroU32::new) {
        Some(qty) => SetDecision::Set(qty),
        None => SetDecision::Remove,
    }
}

/// `qty * price`, saturating.
pub fn line_subtotal(qty: u32, price: u64) -> u64 {
    u64::from(qty).saturating_mul(price)
}

/// Sum of `qty * price` over `(qty, price)` pairs.
///
/// A `None` price (the product no longer resolves) contributes zero.
pub fn total<I>(lines: I) -> u64
where
    I: IntoIterator<Item = (u32, Option<u64>)>,
{
    lines
        .into_iter()
        .map(|(qty, price)| price.map_or(0, |p| line_subtotal(qty, p)))
        .fold(0u64, u64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopcart_core::ProductId;

    fn line_with(qty: u32) -> CartLine {
        CartLine::first(ProductId::new()).with_qty(NonZeroU32::new(qty).unwrap())
    }

    #[test]
    fn first_add_creates_regardless_of_stock() {
        assert_eq!(decide_add(None, 0, 1).unwrap(), AddDecision::Create);
        assert_eq!(decide_add(None, 5, 4).unwrap(), AddDecision::Create);
    }

    #[test]
    fn increment_within_stock_is_accepted() {
        let line = line_with(2);
        assert_eq!(
            decide_add(Some(&line), 3, 1).unwrap(),
            AddDecision::Increment(NonZeroU32::new(3).unwrap())
        );
    }

    #[test]
    fn increment_past_stock_is_rejected_with_available_count() {
        let line = line_with(3);
        assert_eq!(
            decide_add(Some(&line), 3, 1).unwrap(),
            AddDecision::Reject(StockExceeded { available: 3 })
        );
    }

    #[test]
    fn increment_that_overflows_is_rejected() {
        let line = line_with(u32::MAX);
        assert_eq!(
            decide_add(Some(&line), u32::MAX, 1).unwrap(),
            AddDecision::Reject(StockExceeded { available: u32::MAX })
        );
    }

    #[test]
    fn zero_delta_is_a_validation_error() {
        assert!(matches!(
            decide_add(None, 3, 0),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn non_positive_quantities_remove() {
        assert_eq!(decide_set_quantity(0, 5), SetDecision::Remove);
        assert_eq!(decide_set_quantity(-3, 5), SetDecision::Remove);
        assert_eq!(decide_set_quantity(i64::MIN, 5), SetDecision::Remove);
    }

    #[test]
    fn quantity_above_stock_is_clamped() {
        assert_eq!(
            decide_set_quantity(10, 3),
            SetDecision::Clamp(NonZeroU32::new(3).unwrap(), StockExceeded { available: 3 })
        );
    }

    #[test]
    fn quantity_above_zero_stock_removes_the_line() {
        let decision = decide_set_quantity(2, 0);
        assert_eq!(decision, SetDecision::ClampToRemove(StockExceeded { available: 0 }));
        assert_eq!(decision.stock_exceeded(), Some(StockExceeded { available: 0 }));
    }

    #[test]
    fn quantity_equal_to_stock_is_kept() {
        assert_eq!(
            decide_set_quantity(3, 3),
            SetDecision::Set(NonZeroU32::new(3).unwrap())
        );
    }

    #[test]
    fn huge_requested_quantity_is_clamped_not_truncated() {
        assert_eq!(
            decide_set_quantity(i64::MAX, 7),
            SetDecision::Clamp(NonZeroU32::new(7).unwrap(), StockExceeded { available: 7 })
        );
    }

    #[test]
    fn total_of_known_example() {
        assert_eq!(total([(2, Some(10)), (1, Some(5))]), 25);
    }

    #[test]
    fn unresolved_price_contributes_zero() {
        assert_eq!(total([(2, Some(10)), (4, None)]), 20);
    }

    #[test]
    fn stock_exceeded_message() {
        assert_eq!(
            StockExceeded { available: 3 }.to_string(),
            "Only 3 items in stock!"
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// S adds reach S; the (S+1)-th is rejected with StockExceeded(S).
            #[test]
            fn repeated_adds_stop_at_stock(stock in 1u32..50) {
                let mut line: Option<CartLine> = None;
                for _ in 0..stock {
                    line = Some(match decide_add(line.as_ref(), stock, 1).unwrap() {
                        AddDecision::Create => CartLine::first(ProductId::new()),
                        AddDecision::Increment(q) => line.as_ref().unwrap().with_qty(q),
                        AddDecision::Reject(e) => panic!("rejected early: {e:?}"),
                    });
                }
                let line = line.unwrap();
                prop_assert_eq!(line.quantity(), stock);
                prop_assert_eq!(
                    decide_add(Some(&line), stock, 1).unwrap(),
                    AddDecision::Reject(StockExceeded { available: stock })
                );
            }

            #[test]
            fn set_quantity_never_exceeds_stock(requested in any::<i64>(), stock in any::<u32>()) {
                match decide_set_quantity(requested, stock) {
                    SetDecision::Remove => prop_assert!(requested <= 0),
                    SetDecision::Set(q) => {
                        prop_assert!(q.get() <= stock);
                        prop_assert_eq!(i64::from(q.get()), requested);
                    }
                    SetDecision::Clamp(q, e) => {
                        prop_assert_eq!(q.get(), stock);
                        prop_assert_eq!(e.available, stock);
                        prop_assert!(requested > i64::from(stock));
                    }
                    SetDecision::ClampToRemove(e) => {
                        prop_assert_eq!(stock, 0);
                        prop_assert_eq!(e.available, 0);
                    }
                }
            }

            #[test]
            fn total_is_order_independent(
                mut lines in proptest::collection::vec((1u32..100, proptest::option::of(0u64..10_000)), 0..20)
            ) {
                let before = total(lines.clone());
                lines.reverse();
                prop_assert_eq!(total(lines.clone()), before);
                let mid = lines.len() / 2;
                lines.rotate_left(mid);
                prop_assert_eq!(total(lines), before);
            }
        }
    }
}
