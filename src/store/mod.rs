//! Persistence layer: sqlx-backed stores plus the shared revision engine.

pub mod bids;
pub mod reviews;
pub mod revisions;
pub mod tenders;

pub use bids::BidStore;
pub use reviews::ReviewStore;
pub use tenders::TenderStore;
