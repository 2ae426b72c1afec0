// HTTP routes
pub mod companies;
pub mod health;
pub mod prospects;

pub use companies::*;
pub use health::*;
pub use prospects::*;
