use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// Company - record owned by the company store
///
/// Created by the seed import and otherwise only mutated by enrichment,
/// which sets `ai_summary` once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, TypedBuilder)]
pub struct Company {
    #[builder(default = Uuid::now_v7())]
    pub id: Uuid,
    #[builder(setter(into))]
    pub name: String,
    #[builder(setter(into))]
    pub website: String,
    #[builder(default, setter(strip_option, into))]
    pub industry: Option<String>,
    #[builder(default, setter(strip_option, into))]
    pub size: Option<String>, // '1-10' | '11-50' | ... | '10001+'
    #[builder(default, setter(strip_option))]
    pub founded: Option<i32>,
    #[builder(default, setter(strip_option, into))]
    pub locality: Option<String>,
    #[builder(default, setter(strip_option, into))]
    pub region: Option<String>,
    #[builder(default, setter(strip_option, into))]
    pub country: Option<String>,
    #[builder(default, setter(strip_option, into))]
    pub linkedin_url: Option<String>,
    #[builder(default, setter(strip_option, into))]
    pub ai_summary: Option<String>,
    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,
    #[builder(default = Utc::now())]
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// Cached summary, if enrichment already ran.
    pub fn summary(&self) -> Option<&str> {
        self.ai_summary
            .as_deref()
            .filter(|summary| !summary.trim().is_empty())
    }
}

/// One line of a bulk import file.
///
/// Field names follow the public company dataset. Any incoming `id` is
/// ignored so the store assigns its own.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyImport {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub founded: Option<Value>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
}

impl CompanyImport {
    /// Convert into a new record, or `None` when name or website is missing.
    pub fn into_company(self) -> Option<Company> {
        let name = non_blank(self.name)?;
        let website = non_blank(self.website)?;
        let now = Utc::now();

        Some(Company {
            id: Uuid::now_v7(),
            name,
            website,
            industry: non_blank(self.industry),
            size: non_blank(self.size),
            founded: self.founded.as_ref().and_then(import_year),
            locality: non_blank(self.locality),
            region: non_blank(self.region),
            country: non_blank(self.country),
            linkedin_url: non_blank(self.linkedin_url),
            ai_summary: None,
            created_at: now,
            updated_at: now,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn import_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
