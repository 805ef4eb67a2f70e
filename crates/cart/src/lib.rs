//! Cart domain module.
//!
//! The one place the cart-mutation contract lives: add-or-increment, quantity
//! changes clamped to stock, removal, and the derived total. The server routes
//! and both storefront state styles all go through `CartService`.
//!
//! - `rules`: pure decisions (no IO), unit-testable in isolation
//! - `service`: executes decisions against the catalog and cart stores
//! - `outcome`: what a mutation did, named after the line's state transitions

pub mod error;
pub mod line;
pub mod outcome;
pub mod rules;
pub mod service;
pub mod store;
pub mod view;

pub use error::CartError;
pub use line::CartLine;
pub use outcome::{CartOutcome, LineChange};
pub use rules::StockExceeded;
pub use service::CartService;
pub use store::CartStore;
pub use view::{CartItemView, CartView};
