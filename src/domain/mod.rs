pub mod availability;
pub mod fees;
pub mod filter;
pub mod flatten;
pub mod neighborhoods;
pub mod record;

pub use filter::{apply_filters, FilterSpec};
pub use flatten::flatten_listings;
pub use neighborhoods::NeighborhoodOverrides;
pub use record::FlatRecord;
