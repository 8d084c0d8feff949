pub mod encoder;
pub mod spec;
pub mod vocabulary;

pub use spec::{Dimension, FilterBuilder, FilterSpec};
pub use vocabulary::{
    Availability, Baths, Beds, CityId, Furnishing, HomeFeature, Parking, Pets, PropertyType,
    Smoking, Utility, Vocabulary,
};
