mod apify_error;
mod client;
pub mod models;

pub use apify_error::FetchError;
pub use client::{ApifyClient, ListingSource};
pub use models::{decode_listings, SourceListing};
