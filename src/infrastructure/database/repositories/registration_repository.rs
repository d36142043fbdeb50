//! SeaORM implementation of RegistrationRepository

use std::collections::BTreeMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, Statement,
};
use tracing::debug;

use crate::domain::{
    DomainError, DomainResult, NewRegistration, Registration, RegistrationRepository,
};
use crate::infrastructure::database::entities::registration;
use crate::shared::errors::InfraError;

/// Inserts only while the event holds fewer than the given number of rows.
/// Evaluated as one statement, so the count and the write cannot interleave
/// with a concurrent admission.
const INSERT_WITHIN_CAPACITY: &str = "INSERT INTO registrations (event_id, email, name, registered_at) \
     SELECT ?, ?, ?, ? \
     WHERE (SELECT COUNT(*) FROM registrations WHERE event_id = ?) < ?";

pub struct SeaOrmRegistrationRepository {
    db: DatabaseConnection,
}

impl SeaOrmRegistrationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn insert_unbounded(&self, r: &NewRegistration) -> Result<i32, DbErr> {
        let model = registration::ActiveModel {
            event_id: Set(r.event_id),
            email: Set(r.email.clone()),
            name: Set(r.name.clone()),
            registered_at: Set(r.registered_at),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?.id)
    }

    /// `Ok(None)` when the event is already at `capacity`.
    async fn insert_bounded(&self, r: &NewRegistration, capacity: u32) -> Result<Option<i32>, DbErr> {
        let stmt = Statement::from_sql_and_values(
            self.db.get_database_backend(),
            INSERT_WITHIN_CAPACITY,
            [
                r.event_id.into(),
                r.email.clone().into(),
                r.name.clone().into(),
                r.registered_at.into(),
                r.event_id.into(),
                i64::from(capacity).into(),
            ],
        );
        let result = self.db.execute(stmt).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(result.last_insert_id() as i32))
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: registration::Model) -> Registration {
    Registration {
        id: m.id,
        event_id: m.event_id,
        email: m.email,
        name: m.name,
        registered_at: m.registered_at,
    }
}

fn db_err(e: DbErr) -> DomainError {
    InfraError::Database(e).into()
}

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// ── RegistrationRepository impl ─────────────────────────────────

#[async_trait]
impl RegistrationRepository for SeaOrmRegistrationRepository {
    async fn find_by_event_and_email(
        &self,
        event_id: i32,
        email: &str,
    ) -> DomainResult<Option<Registration>> {
        let model = registration::Entity::find()
            .filter(registration::Column::EventId.eq(event_id))
            .filter(registration::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Registration>> {
        let models = registration::Entity::find()
            .order_by_desc(registration::Column::RegisteredAt)
            .order_by_desc(registration::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn count(&self) -> DomainResult<u64> {
        registration::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn count_for_event(&self, event_id: i32) -> DomainResult<u64> {
        registration::Entity::find()
            .filter(registration::Column::EventId.eq(event_id))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn count_by_event(&self) -> DomainResult<BTreeMap<i32, u64>> {
        let rows: Vec<(i32, i64)> = registration::Entity::find()
            .select_only()
            .column(registration::Column::EventId)
            .column_as(registration::Column::Id.count(), "count")
            .group_by(registration::Column::EventId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows
            .into_iter()
            .map(|(event_id, count)| (event_id, count.max(0) as u64))
            .collect())
    }

    async fn insert(
        &self,
        r: NewRegistration,
        capacity: Option<u32>,
    ) -> DomainResult<Registration> {
        debug!(event_id = r.event_id, ?capacity, "Inserting registration");

        let outcome = match capacity {
            Some(limit) => self.insert_bounded(&r, limit).await,
            None => self.insert_unbounded(&r).await.map(Some),
        };

        match outcome {
            Ok(Some(id)) => Ok(r.into_registration(id)),
            Ok(None) => Err(DomainError::EventFull {
                event_id: r.event_id,
                capacity: capacity.unwrap_or_default(),
            }),
            Err(e) if is_unique_violation(&e) => Err(DomainError::DuplicateRegistration {
                event_id: r.event_id,
                email: r.email,
            }),
            Err(e) => Err(db_err(e)),
        }
    }
}
