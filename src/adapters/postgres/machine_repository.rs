//! PostgreSQL implementation of MachineRepository.
//!
//! Machines join to `branches` and carry two pivot tables,
//! `charge_machine` and `category_machine`. Mutations touching the row
//! and its pivots run in one transaction; relation loading for
//! listings is batched to avoid per-machine queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::machine::{
    BranchRef, CategoryRef, ChargeRef, Machine, MachineDetails, MachinePatch, NewMachine,
};
use crate::ports::MachineRepository;

/// PostgreSQL implementation of the MachineRepository port.
#[derive(Clone)]
pub struct PostgresMachineRepository {
    pool: PgPool,
}

impl PostgresMachineRepository {
    /// Creates a new PostgresMachineRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reload one machine with relations after a mutation.
    async fn reload(&self, id: i64) -> Result<MachineDetails, DomainError> {
        self.find_by_id(id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Machine not found after write: {}", id),
            )
        })
    }
}

/// Database row representation of a machine with its branch name.
#[derive(Debug, sqlx::FromRow)]
struct MachineRow {
    id: i64,
    branch_id: i64,
    name: String,
    #[sqlx(rename = "type")]
    machine_type: String,
    description: Option<String>,
    image_url: Option<String>,
    video_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    branch_name: Option<String>,
}

impl From<MachineRow> for MachineDetails {
    fn from(row: MachineRow) -> Self {
        let branch = row.branch_name.clone().map(|name| BranchRef {
            id: row.branch_id,
            name,
        });

        MachineDetails {
            machine: Machine {
                id: row.id,
                branch_id: row.branch_id,
                name: row.name,
                machine_type: row.machine_type,
                description: row.description,
                image_url: row.image_url,
                video_url: row.video_url,
                created_at: Timestamp::from_datetime(row.created_at),
                updated_at: Timestamp::from_datetime(row.updated_at),
            },
            branch,
            charges: Vec::new(),
            categories: Vec::new(),
        }
    }
}

#[async_trait]
impl MachineRepository for PostgresMachineRepository {
    async fn find_all(&self) -> Result<Vec<MachineDetails>, DomainError> {
        let rows: Vec<MachineRow> = sqlx::query_as(
            r#"
            SELECT m.id, m.branch_id, m.name, m.type, m.description, m.image_url, m.video_url,
                   m.created_at, m.updated_at, b.name AS branch_name
            FROM machines m
            LEFT JOIN branches b ON b.id = m.branch_id
            ORDER BY m.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list machines: {}", e),
            )
        })?;

        load_details(&self.pool, rows).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<MachineDetails>, DomainError> {
        let row: Option<MachineRow> = sqlx::query_as(
            r#"
            SELECT m.id, m.branch_id, m.name, m.type, m.description, m.image_url, m.video_url,
                   m.created_at, m.updated_at, b.name AS branch_name
            FROM machines m
            LEFT JOIN branches b ON b.id = m.branch_id
            WHERE m.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch machine: {}", e),
            )
        })?;

        match row {
            Some(row) => Ok(load_details(&self.pool, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_branch(&self, branch_id: i64) -> Result<Vec<MachineDetails>, DomainError> {
        let rows: Vec<MachineRow> = sqlx::query_as(
            r#"
            SELECT m.id, m.branch_id, m.name, m.type, m.description, m.image_url, m.video_url,
                   m.created_at, m.updated_at, b.name AS branch_name
            FROM machines m
            LEFT JOIN branches b ON b.id = m.branch_id
            WHERE m.branch_id = $1
            ORDER BY m.id
            "#,
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list machines by branch: {}", e),
            )
        })?;

        load_details(&self.pool, rows).await
    }

    async fn create(&self, machine: &NewMachine) -> Result<MachineDetails, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })?;

        let (machine_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO machines (
                branch_id, name, type, description, image_url, video_url, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(machine.branch_id)
        .bind(&machine.name)
        .bind(&machine.machine_type)
        .bind(&machine.description)
        .bind(&machine.image_url)
        .bind(&machine.video_url)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert machine: {}", e),
            )
        })?;

        if !machine.charge_ids.is_empty() {
            insert_charge_links(&mut tx, machine_id, &machine.charge_ids).await?;
        }
        if !machine.category_ids.is_empty() {
            insert_category_links(&mut tx, machine_id, &machine.category_ids).await?;
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit transaction: {}", e),
            )
        })?;

        self.reload(machine_id).await
    }

    async fn update(&self, id: i64, patch: &MachinePatch) -> Result<MachineDetails, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })?;

        let current: Option<MachineScalars> = sqlx::query_as(
            r#"
            SELECT branch_id, name, type, description, image_url, video_url
            FROM machines
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch machine for update: {}", e),
            )
        })?;

        let current = match current {
            Some(current) => current,
            None => {
                return Err(DomainError::new(
                    ErrorCode::MachineNotFound,
                    format!("Machine not found: {}", id),
                ));
            }
        };

        // Merge: absent scalar fields keep their stored values, present
        // nullable fields overwrite including with null
        let branch_id = patch.branch_id.unwrap_or(current.branch_id);
        let name = patch.name.clone().unwrap_or(current.name);
        let machine_type = patch.machine_type.clone().unwrap_or(current.machine_type);
        let description = match &patch.description {
            Some(value) => value.clone(),
            None => current.description,
        };
        let image_url = match &patch.image_url {
            Some(value) => value.clone(),
            None => current.image_url,
        };
        let video_url = match &patch.video_url {
            Some(value) => value.clone(),
            None => current.video_url,
        };

        sqlx::query(
            r#"
            UPDATE machines SET
                branch_id = $2,
                name = $3,
                type = $4,
                description = $5,
                image_url = $6,
                video_url = $7,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(branch_id)
        .bind(&name)
        .bind(&machine_type)
        .bind(&description)
        .bind(&image_url)
        .bind(&video_url)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update machine: {}", e),
            )
        })?;

        if let Some(charge_ids) = &patch.charge_ids {
            replace_charge_links(&mut tx, id, charge_ids).await?;
        }
        if let Some(category_ids) = &patch.category_ids {
            replace_category_links(&mut tx, id, category_ids).await?;
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit transaction: {}", e),
            )
        })?;

        self.reload(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })?;

        sqlx::query("DELETE FROM charge_machine WHERE machine_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to detach charges: {}", e),
                )
            })?;

        sqlx::query("DELETE FROM category_machine WHERE machine_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to detach categories: {}", e),
                )
            })?;

        let result = sqlx::query("DELETE FROM machines WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete machine: {}", e),
                )
            })?;

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit transaction: {}", e),
            )
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn sync_charges(
        &self,
        id: i64,
        charge_ids: &[i64],
    ) -> Result<MachineDetails, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })?;

        let exists: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM machines WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to fetch machine: {}", e),
                    )
                })?;

        if exists.is_none() {
            return Err(DomainError::new(
                ErrorCode::MachineNotFound,
                format!("Machine not found: {}", id),
            ));
        }

        replace_charge_links(&mut tx, id, charge_ids).await?;

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit transaction: {}", e),
            )
        })?;

        self.reload(id).await
    }

    async fn attach_charge(&self, id: i64, charge_id: i64) -> Result<MachineDetails, DomainError> {
        ensure_machine_exists(&self.pool, id).await?;
        ensure_charge_exists(&self.pool, charge_id).await?;

        sqlx::query(
            r#"
            INSERT INTO charge_machine (charge_id, machine_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(charge_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to attach charge: {}", e),
            )
        })?;

        self.reload(id).await
    }

    async fn detach_charge(&self, id: i64, charge_id: i64) -> Result<MachineDetails, DomainError> {
        ensure_machine_exists(&self.pool, id).await?;
        ensure_charge_exists(&self.pool, charge_id).await?;

        sqlx::query("DELETE FROM charge_machine WHERE charge_id = $1 AND machine_id = $2")
            .bind(charge_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to detach charge: {}", e),
                )
            })?;

        self.reload(id).await
    }

    async fn branch_exists(&self, branch_id: i64) -> Result<bool, DomainError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM branches WHERE id = $1")
            .bind(branch_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to check branch existence: {}", e),
                )
            })?;

        Ok(result.0 > 0)
    }

    async fn missing_charges(&self, charge_ids: &[i64]) -> Result<Vec<i64>, DomainError> {
        let rows: Vec<(i64,)> = sqlx::query_as("SELECT id FROM charges WHERE id = ANY($1)")
            .bind(charge_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to check charges: {}", e),
                )
            })?;

        let existing: HashSet<i64> = rows.into_iter().map(|(id,)| id).collect();
        Ok(charge_ids
            .iter()
            .copied()
            .filter(|id| !existing.contains(id))
            .collect())
    }

    async fn missing_categories(&self, category_ids: &[i64]) -> Result<Vec<i64>, DomainError> {
        let rows: Vec<(i64,)> = sqlx::query_as("SELECT id FROM categories WHERE id = ANY($1)")
            .bind(category_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to check categories: {}", e),
                )
            })?;

        let existing: HashSet<i64> = rows.into_iter().map(|(id,)| id).collect();
        Ok(category_ids
            .iter()
            .copied()
            .filter(|id| !existing.contains(id))
            .collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

/// Scalar machine columns for the read-merge-write partial update.
#[derive(Debug, sqlx::FromRow)]
struct MachineScalars {
    branch_id: i64,
    name: String,
    #[sqlx(rename = "type")]
    machine_type: String,
    description: Option<String>,
    image_url: Option<String>,
    video_url: Option<String>,
}

/// Batch-load charges and categories for the given machine rows.
async fn load_details(
    pool: &PgPool,
    rows: Vec<MachineRow>,
) -> Result<Vec<MachineDetails>, DomainError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut charges = load_charges(pool, &ids).await?;
    let mut categories = load_categories(pool, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let id = row.id;
            let mut details = MachineDetails::from(row);
            details.charges = charges.remove(&id).unwrap_or_default();
            details.categories = categories.remove(&id).unwrap_or_default();
            details
        })
        .collect())
}

async fn load_charges(
    pool: &PgPool,
    machine_ids: &[i64],
) -> Result<HashMap<i64, Vec<ChargeRef>>, DomainError> {
    let rows: Vec<(i64, i64, String)> = sqlx::query_as(
        r#"
        SELECT cm.machine_id, c.id, c.label
        FROM charge_machine cm
        JOIN charges c ON c.id = cm.charge_id
        WHERE cm.machine_id = ANY($1)
        ORDER BY cm.machine_id, c.id
        "#,
    )
    .bind(machine_ids)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to load charges: {}", e),
        )
    })?;

    let mut by_machine: HashMap<i64, Vec<ChargeRef>> = HashMap::new();
    for (machine_id, id, label) in rows {
        by_machine
            .entry(machine_id)
            .or_default()
            .push(ChargeRef { id, label });
    }
    Ok(by_machine)
}

async fn load_categories(
    pool: &PgPool,
    machine_ids: &[i64],
) -> Result<HashMap<i64, Vec<CategoryRef>>, DomainError> {
    let rows: Vec<(i64, i64, String)> = sqlx::query_as(
        r#"
        SELECT cm.machine_id, c.id, c.name
        FROM category_machine cm
        JOIN categories c ON c.id = cm.category_id
        WHERE cm.machine_id = ANY($1)
        ORDER BY cm.machine_id, c.id
        "#,
    )
    .bind(machine_ids)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to load categories: {}", e),
        )
    })?;

    let mut by_machine: HashMap<i64, Vec<CategoryRef>> = HashMap::new();
    for (machine_id, id, name) in rows {
        by_machine
            .entry(machine_id)
            .or_default()
            .push(CategoryRef { id, name });
    }
    Ok(by_machine)
}

async fn insert_charge_links(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    machine_id: i64,
    charge_ids: &[i64],
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO charge_machine (charge_id, machine_id)
        SELECT unnest($2::bigint[]), $1
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(machine_id)
    .bind(charge_ids)
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to attach charges: {}", e),
        )
    })?;

    Ok(())
}

async fn insert_category_links(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    machine_id: i64,
    category_ids: &[i64],
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO category_machine (category_id, machine_id)
        SELECT unnest($2::bigint[]), $1
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(machine_id)
    .bind(category_ids)
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to attach categories: {}", e),
        )
    })?;

    Ok(())
}

/// Replace the machine's charge set with exactly `charge_ids`.
async fn replace_charge_links(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    machine_id: i64,
    charge_ids: &[i64],
) -> Result<(), DomainError> {
    sqlx::query("DELETE FROM charge_machine WHERE machine_id = $1")
        .bind(machine_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to clear charges: {}", e),
            )
        })?;

    if charge_ids.is_empty() {
        return Ok(());
    }
    insert_charge_links(tx, machine_id, charge_ids).await
}

/// Replace the machine's category set with exactly `category_ids`.
async fn replace_category_links(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    machine_id: i64,
    category_ids: &[i64],
) -> Result<(), DomainError> {
    sqlx::query("DELETE FROM category_machine WHERE machine_id = $1")
        .bind(machine_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to clear categories: {}", e),
            )
        })?;

    if category_ids.is_empty() {
        return Ok(());
    }
    insert_category_links(tx, machine_id, category_ids).await
}

async fn ensure_machine_exists(pool: &PgPool, id: i64) -> Result<(), DomainError> {
    let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM machines WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to check machine existence: {}", e),
            )
        })?;

    if result.0 == 0 {
        return Err(DomainError::new(
            ErrorCode::MachineNotFound,
            format!("Machine not found: {}", id),
        ));
    }
    Ok(())
}

async fn ensure_charge_exists(pool: &PgPool, charge_id: i64) -> Result<(), DomainError> {
    let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM charges WHERE id = $1")
        .bind(charge_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to check charge existence: {}", e),
            )
        })?;

    if result.0 == 0 {
        return Err(DomainError::new(
            ErrorCode::ChargeNotFound,
            format!("Charge not found: {}", charge_id),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(branch_name: Option<&str>) -> MachineRow {
        let now = Utc::now();
        MachineRow {
            id: 5,
            branch_id: 2,
            name: "Leg Press".to_string(),
            machine_type: "musculation".to_string(),
            description: Some("Lower body".to_string()),
            image_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
            branch_name: branch_name.map(String::from),
        }
    }

    #[test]
    fn row_conversion_embeds_the_branch() {
        let details = MachineDetails::from(sample_row(Some("Centre Ville")));

        assert_eq!(details.machine.id, 5);
        assert_eq!(details.machine.machine_type, "musculation");
        let branch = details.branch.expect("branch should be present");
        assert_eq!(branch.id, 2);
        assert_eq!(branch.name, "Centre Ville");
        assert!(details.charges.is_empty());
        assert!(details.categories.is_empty());
    }

    #[test]
    fn row_conversion_tolerates_a_dangling_branch() {
        let details = MachineDetails::from(sample_row(None));

        assert_eq!(details.machine.branch_id, 2);
        assert!(details.branch.is_none());
    }
}
