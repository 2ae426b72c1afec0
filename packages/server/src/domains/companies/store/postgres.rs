use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::CompanyStore;
use crate::domains::companies::filters::{SortField, SortSpec};
use crate::domains::companies::models::Company;
use crate::domains::companies::query::{CompanyPredicate, Condition};

/// Rows per multi-row INSERT (keeps bind parameters under the Postgres limit).
const INSERT_CHUNK: usize = 1000;

const COLUMNS: &str = "id, name, website, industry, size, founded, locality, region, country, \
                       linkedin_url, ai_summary, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresCompanyStore {
    pool: PgPool,
}

impl PostgresCompanyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Remove every company (and, by cascade, every saved prospect).
    pub async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM companies")
            .execute(&self.pool)
            .await
            .context("Failed to clear companies")?;
        Ok(result.rows_affected())
    }
}

/// Escape LIKE wildcards so user text only matches literally.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, predicate: &CompanyPredicate) {
    builder.push(" WHERE TRUE");
    for condition in predicate.conditions() {
        match condition {
            Condition::Contains { field, needle } => {
                builder
                    .push(" AND ")
                    .push(field.column())
                    .push(" ILIKE ")
                    .push_bind(like_pattern(needle))
                    .push(" ESCAPE '\\'");
            }
            Condition::SizeIs(size) => {
                builder.push(" AND size = ").push_bind(size.as_str());
            }
            Condition::FoundedIn(year) => {
                builder.push(" AND founded = ").push_bind(*year);
            }
        }
    }
}

/// ORDER BY clause from the closed sort field set. Text sorts ignore case;
/// Postgres puts NULLs last ascending and first descending.
fn order_by(sort: SortSpec) -> String {
    let column = match sort.field {
        SortField::Founded => sort.field.column().to_string(),
        _ => format!("LOWER({})", sort.field.column()),
    };
    format!(" ORDER BY {} {}", column, sort.order.as_sql())
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl CompanyStore for PostgresCompanyStore {
    async fn find(
        &self,
        predicate: &CompanyPredicate,
        sort: SortSpec,
        skip: u64,
        take: u64,
    ) -> Result<Vec<Company>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM companies"));
        push_predicate(&mut builder, predicate);
        builder.push(order_by(sort));
        builder.push(" LIMIT ").push_bind(to_i64(take));
        builder.push(" OFFSET ").push_bind(to_i64(skip));

        let companies = builder
            .build_query_as::<Company>()
            .fetch_all(&self.pool)
            .await
            .context("Failed to query companies")?;
        Ok(companies)
    }

    async fn count(&self, predicate: &CompanyPredicate) -> Result<u64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM companies");
        push_predicate(&mut builder, predicate);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .context("Failed to count companies")?;
        Ok(count.max(0) as u64)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {COLUMNS} FROM companies WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to load company")?;
        Ok(company)
    }

    async fn save(&self, company: &Company) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO companies (
                id, name, website, industry, size, founded, locality, region, country,
                linkedin_url, ai_summary, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                website = EXCLUDED.website,
                industry = EXCLUDED.industry,
                size = EXCLUDED.size,
                founded = EXCLUDED.founded,
                locality = EXCLUDED.locality,
                region = EXCLUDED.region,
                country = EXCLUDED.country,
                linkedin_url = EXCLUDED.linkedin_url,
                ai_summary = EXCLUDED.ai_summary,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.website)
        .bind(&company.industry)
        .bind(&company.size)
        .bind(company.founded)
        .bind(&company.locality)
        .bind(&company.region)
        .bind(&company.country)
        .bind(&company.linkedin_url)
        .bind(&company.ai_summary)
        .bind(company.created_at)
        .bind(company.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to save company")?;
        Ok(())
    }

    async fn insert_many(&self, companies: &[Company]) -> Result<u64> {
        let mut inserted = 0;

        for chunk in companies.chunks(INSERT_CHUNK) {
            let mut builder =
                QueryBuilder::<Postgres>::new(format!("INSERT INTO companies ({COLUMNS}) "));
            builder.push_values(chunk, |mut row, company| {
                row.push_bind(company.id)
                    .push_bind(company.name.clone())
                    .push_bind(company.website.clone())
                    .push_bind(company.industry.clone())
                    .push_bind(company.size.clone())
                    .push_bind(company.founded)
                    .push_bind(company.locality.clone())
                    .push_bind(company.region.clone())
                    .push_bind(company.country.clone())
                    .push_bind(company.linkedin_url.clone())
                    .push_bind(company.ai_summary.clone())
                    .push_bind(company.created_at)
                    .push_bind(company.updated_at);
            });
            builder.push(" ON CONFLICT (id) DO NOTHING");

            let result = builder
                .build()
                .execute(&self.pool)
                .await
                .context("Failed to insert companies")?;
            inserted += result.rows_affected();
        }

        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::companies::filters::{CompanySize, SortOrder};
    use crate::domains::companies::query::TextField;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("bank"), "%bank%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b\\c"), "%a\\_b\\\\c%");
    }

    #[test]
    fn test_predicate_sql() {
        let predicate = CompanyPredicate::all()
            .and(Condition::Contains {
                field: TextField::Summary,
                needle: "payments".into(),
            })
            .and(Condition::SizeIs(CompanySize::Small))
            .and(Condition::FoundedIn(2012));

        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM companies");
        push_predicate(&mut builder, &predicate);

        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM companies WHERE TRUE AND ai_summary ILIKE $1 ESCAPE '\\' \
             AND size = $2 AND founded = $3"
        );
    }

    #[test]
    fn test_order_by_uses_whitelisted_columns() {
        assert_eq!(order_by(SortSpec::default()), " ORDER BY LOWER(name) ASC");
        assert_eq!(
            order_by(SortSpec {
                field: SortField::Founded,
                order: SortOrder::Desc
            }),
            " ORDER BY founded DESC"
        );
    }
}
