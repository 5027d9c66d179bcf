//! Data models for the storefront.

pub mod cart;
pub mod order;
pub mod product;
pub mod session;

pub use cart::CartContents;
pub use order::{Order, OrderItem};
pub use product::{BundleComponent, Product};
pub use session::{AuthContext, AuthMethod, session_keys};
