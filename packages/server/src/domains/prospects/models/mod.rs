pub mod saved_prospect;

pub use saved_prospect::*;
