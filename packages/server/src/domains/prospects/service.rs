use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::error::ProspectError;
use super::models::{ProspectWithCompany, SavedProspect};
use super::store::ProspectStore;
use crate::domains::companies::CompanyStore;

pub struct ProspectService {
    prospects: Arc<dyn ProspectStore>,
    companies: Arc<dyn CompanyStore>,
}

impl ProspectService {
    pub fn new(prospects: Arc<dyn ProspectStore>, companies: Arc<dyn CompanyStore>) -> Self {
        Self {
            prospects,
            companies,
        }
    }

    pub async fn save(&self, company_id: Uuid) -> Result<SavedProspect, ProspectError> {
        if self.companies.find_by_id(company_id).await?.is_none() {
            return Err(ProspectError::CompanyNotFound(company_id.to_string()));
        }

        let prospect = SavedProspect::new(company_id);
        if !self.prospects.insert(&prospect).await? {
            return Err(ProspectError::AlreadySaved(company_id.to_string()));
        }

        info!(company_id = %company_id, "Prospect saved");
        Ok(prospect)
    }

    /// Saved prospects with their companies, newest first.
    pub async fn list(&self) -> Result<Vec<ProspectWithCompany>, ProspectError> {
        let saved = self.prospects.list().await?;
        let mut prospects = Vec::with_capacity(saved.len());

        for prospect in saved {
            match self.companies.find_by_id(prospect.company_id).await? {
                Some(company) => prospects.push(ProspectWithCompany {
                    id: prospect.id,
                    saved_at: prospect.saved_at,
                    company,
                }),
                None => warn!(company_id = %prospect.company_id, "Saved prospect without company"),
            }
        }

        Ok(prospects)
    }

    pub async fn delete(&self, company_id: Uuid) -> Result<SavedProspect, ProspectError> {
        let prospect = self
            .prospects
            .delete_by_company(company_id)
            .await?
            .ok_or_else(|| ProspectError::NotSaved(company_id.to_string()))?;

        info!(company_id = %company_id, "Prospect deleted");
        Ok(prospect)
    }
}
