//! PostgreSQL implementation of ParameterRepository.
//!
//! Persists parameters in the `parametres` table. The key column is
//! unique, so the upsert primitive is a single INSERT .. ON CONFLICT
//! and two concurrent upserts on one key can never produce two rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::parameter::{NewParameter, Parameter, ParameterPatch, ParameterType};
use crate::ports::ParameterRepository;

/// PostgreSQL implementation of the ParameterRepository port.
#[derive(Clone)]
pub struct PostgresParameterRepository {
    pool: PgPool,
}

impl PostgresParameterRepository {
    /// Creates a new PostgresParameterRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a parameter.
#[derive(Debug, sqlx::FromRow)]
struct ParameterRow {
    id: i64,
    cle: String,
    valeur: Option<String>,
    #[sqlx(rename = "type")]
    value_type: String,
    groupe: Option<String>,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ParameterRow> for Parameter {
    type Error = DomainError;

    fn try_from(row: ParameterRow) -> Result<Self, Self::Error> {
        let value_type = parse_value_type(&row.value_type)?;

        Ok(Parameter {
            id: row.id,
            key: row.cle,
            raw_value: row.valeur,
            value_type,
            group: row.groupe,
            description: row.description,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_value_type(s: &str) -> Result<ParameterType, DomainError> {
    s.parse::<ParameterType>().map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid parameter type value: {}", s),
        )
    })
}

#[async_trait]
impl ParameterRepository for PostgresParameterRepository {
    async fn find_by_key(&self, key: &str) -> Result<Option<Parameter>, DomainError> {
        let row: Option<ParameterRow> = sqlx::query_as(
            r#"
            SELECT id, cle, valeur, type, groupe, description, created_at, updated_at
            FROM parametres
            WHERE cle = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch parameter by key: {}", e),
            )
        })?;

        row.map(Parameter::try_from).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Parameter>, DomainError> {
        let row: Option<ParameterRow> = sqlx::query_as(
            r#"
            SELECT id, cle, valeur, type, groupe, description, created_at, updated_at
            FROM parametres
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch parameter by id: {}", e),
            )
        })?;

        row.map(Parameter::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Parameter>, DomainError> {
        let rows: Vec<ParameterRow> = sqlx::query_as(
            r#"
            SELECT id, cle, valeur, type, groupe, description, created_at, updated_at
            FROM parametres
            ORDER BY cle
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list parameters: {}", e),
            )
        })?;

        rows.into_iter().map(Parameter::try_from).collect()
    }

    async fn find_by_group(&self, group: &str) -> Result<Vec<Parameter>, DomainError> {
        let rows: Vec<ParameterRow> = sqlx::query_as(
            r#"
            SELECT id, cle, valeur, type, groupe, description, created_at, updated_at
            FROM parametres
            WHERE groupe = $1
            ORDER BY cle
            "#,
        )
        .bind(group)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list parameters by group: {}", e),
            )
        })?;

        rows.into_iter().map(Parameter::try_from).collect()
    }

    async fn upsert(&self, entry: &NewParameter) -> Result<Parameter, DomainError> {
        let row: ParameterRow = sqlx::query_as(
            r#"
            INSERT INTO parametres (cle, valeur, type, groupe, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            ON CONFLICT (cle) DO UPDATE SET
                valeur = EXCLUDED.valeur,
                type = EXCLUDED.type,
                groupe = EXCLUDED.groupe,
                description = EXCLUDED.description,
                updated_at = NOW()
            RETURNING id, cle, valeur, type, groupe, description, created_at, updated_at
            "#,
        )
        .bind(&entry.key)
        .bind(&entry.raw_value)
        .bind(entry.value_type.as_str())
        .bind(&entry.group)
        .bind(&entry.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to upsert parameter: {}", e),
            )
        })?;

        Parameter::try_from(row)
    }

    async fn update(&self, id: i64, patch: &ParameterPatch) -> Result<Parameter, DomainError> {
        let row: Option<ParameterRow> = sqlx::query_as(
            r#"
            UPDATE parametres SET
                valeur = COALESCE($2, valeur),
                type = COALESCE($3, type),
                groupe = COALESCE($4, groupe),
                description = COALESCE($5, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, cle, valeur, type, groupe, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&patch.raw_value)
        .bind(patch.value_type.map(|t| t.as_str()))
        .bind(&patch.group)
        .bind(&patch.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update parameter: {}", e),
            )
        })?;

        match row {
            Some(row) => Parameter::try_from(row),
            None => Err(DomainError::new(
                ErrorCode::ParameterNotFound,
                format!("Parameter not found: {}", id),
            )),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM parametres WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete parameter: {}", e),
                )
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_type_conversion_roundtrips() {
        for ty in ParameterType::ALL {
            assert_eq!(parse_value_type(ty.as_str()).unwrap(), ty);
        }
    }

    #[test]
    fn parse_value_type_rejects_invalid() {
        assert!(parse_value_type("varchar").is_err());
    }

    #[test]
    fn row_conversion_maps_all_fields() {
        let now = Utc::now();
        let row = ParameterRow {
            id: 42,
            cle: "site_name".to_string(),
            valeur: Some("Acme Gym".to_string()),
            value_type: "text".to_string(),
            groupe: Some("general".to_string()),
            description: None,
            created_at: now,
            updated_at: now,
        };

        let parameter = Parameter::try_from(row).unwrap();

        assert_eq!(parameter.id, 42);
        assert_eq!(parameter.key, "site_name");
        assert_eq!(parameter.raw_value.as_deref(), Some("Acme Gym"));
        assert_eq!(parameter.value_type, ParameterType::Text);
        assert_eq!(parameter.group.as_deref(), Some("general"));
        assert_eq!(parameter.created_at, Timestamp::from_datetime(now));
    }

    #[test]
    fn row_conversion_rejects_unknown_type() {
        let now = Utc::now();
        let row = ParameterRow {
            id: 1,
            cle: "x".to_string(),
            valeur: None,
            value_type: "varchar".to_string(),
            groupe: None,
            description: None,
            created_at: now,
            updated_at: now,
        };

        assert!(Parameter::try_from(row).is_err());
    }
}
