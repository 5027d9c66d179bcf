//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Dashboard authentication (named accounts and shared secret)
//! - `cart` - Session cart operations and catalog materialization
//! - `checkout` - Order placement against the ledger
//! - `lookup` - Customer-facing order status lookup
//! - `mailer` - SMTP delivery via lettre
//! - `notifications` - Best-effort transactional email flows
//! - `pricing` - Shipping tiers and order totals

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod lookup;
pub mod mailer;
pub mod notifications;
pub mod pricing;
