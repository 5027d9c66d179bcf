//! Core types for the Sharp storefront.

pub mod email;
pub mod id;
pub mod money;
pub mod order_number;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{line_total, quantize};
pub use order_number::{OrderNumber, OrderNumberError};
pub use status::{InvalidStatus, OrderStatus};
