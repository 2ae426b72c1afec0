use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domains::companies::Company;

/// A company bookmarked by the user. At most one per company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SavedProspect {
    pub id: Uuid,
    pub company_id: Uuid,
    pub saved_at: DateTime<Utc>,
}

impl SavedProspect {
    pub fn new(company_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            company_id,
            saved_at: Utc::now(),
        }
    }
}

/// Saved prospect with its company record embedded.
#[derive(Debug, Clone, Serialize)]
pub struct ProspectWithCompany {
    pub id: Uuid,
    pub saved_at: DateTime<Utc>,
    pub company: Company,
}
