// Business domains
pub mod companies;
pub mod prospects;
