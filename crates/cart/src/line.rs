use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use shopcart_core::{CartLineId, Entity, ProductId};

/// A cart entry: one product and a positive quantity.
///
/// The quantity is `NonZeroU32`, so a zero-quantity line cannot be built or
/// deserialized. Lines that would drop to zero are deleted instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: CartLineId,
    pub product_id: ProductId,
    pub qty: NonZeroU32,
}

impl CartLine {
    /// A freshly added line (quantity 1).
    pub fn first(product_id: ProductId) -> Self {
        Self {
            id: CartLineId::new(),
            product_id,
            qty: NonZeroU32::MIN,
        }
    }

    pub fn quantity(&self) -> u32 {
        self.qty.get()
    }

    pub fn with_qty(&self, qty: NonZeroU32) -> Self {
        Self {
            qty,
            ..self.clone()
        }
    }
}

impl Entity for CartLine {
    type Id = CartLineId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
