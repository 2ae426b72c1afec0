// Prospects domain - companies the user saved for follow-up

pub mod error;
pub mod models;
pub mod service;
pub mod store;

pub use error::ProspectError;
pub use models::*;
pub use service::ProspectService;
pub use store::{MemoryProspectStore, PostgresProspectStore, ProspectStore};
