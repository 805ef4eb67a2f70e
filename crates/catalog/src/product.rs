use serde::{Deserialize, Serialize};

use shopcart_core::{DomainError, Entity, ProductId};

/// A catalog product.
///
/// `stock` is the number of available units. Cart logic only ever reads it;
/// nothing in the workspace decrements it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Price in the smallest currency unit.
    pub price: u64,
    pub category: String,
    pub description: String,
    /// Opaque image reference (file name or URL), never interpreted here.
    pub image: String,
    pub stock: u32,
}

impl Product {
    /// Build a product from validated input.
    pub fn from_new(id: ProductId, new: NewProduct) -> Result<Self, DomainError> {
        new.validate()?;
        Ok(Self {
            id,
            name: new.name.trim().to_string(),
            price: new.price,
            category: new.category.trim().to_string(),
            description: new.description.trim().to_string(),
            image: new.image.trim().to_string(),
            stock: new.stock,
        })
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Input for catalog-add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: u64,
    pub category: String,
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub stock: u32,
}

impl NewProduct {
    /// Every text field is required; price zero is allowed, stock defaults to 0.
    pub fn validate(&self) -> Result<(), DomainError> {
        let required = [
            ("name", &self.name),
            ("category", &self.category),
            ("description", &self.description),
            ("image", &self.image),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(k, _)| *k)
            .collect();

        if !missing.is_empty() {
            return Err(DomainError::validation(format!(
                "all fields are required (missing: {})",
                missing.join(", ")
            )));
        }

        Ok(())
    }
}
