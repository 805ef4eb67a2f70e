//! `shopcart-storefront`: client-side cart state over a cart backend.
//!
//! Two interchangeable state styles sit on top of the same `CartBackend`:
//!
//! - `LocalCartView`: component-local state, patched in place from each
//!   mutation's outcome
//! - `SharedCartStore`: one state container changed only through `reduce`
//!
//! Neither re-implements cart rules; stock checks and clamping happen behind
//! the backend, in `CartService`.

pub mod backend;
pub mod error;
pub mod local;
pub mod notices;
pub mod snapshot;
pub mod store;

pub use backend::{CartBackend, HttpBackend, InProcessBackend};
pub use error::ClientError;
pub use local::LocalCartView;
pub use notices::Notices;
pub use snapshot::CartSnapshot;
pub use store::{CartAction, SharedCartStore, StoreState, reduce};
