pub mod rentfaster;
pub mod traits;
pub mod types;

pub use rentfaster::RentFaster;
pub use traits::ListingSource;
pub use types::{FetchOptions, ResultSet, SearchPage};
