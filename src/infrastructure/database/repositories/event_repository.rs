//! SeaORM implementation of EventRepository

use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
    TransactionTrait,
};
use tracing::debug;

use crate::domain::{DomainError, DomainResult, Event, EventRepository, ImportReport};
use crate::infrastructure::database::entities::event;
use crate::shared::errors::InfraError;

pub struct SeaOrmEventRepository {
    db: DatabaseConnection,
}

impl SeaOrmEventRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: event::Model) -> Event {
    Event {
        id: m.id,
        school_number: m.school_number,
        principal: m.principal,
        date: m.date,
        time: m.time,
        location: m.location,
        address: m.address,
        ceremony_type: m.ceremony_type,
        title: m.title,
        year: m.year,
        raw_text: m.raw_text,
        extracted_at: m.extracted_at,
    }
}

fn domain_to_active(e: Event) -> event::ActiveModel {
    event::ActiveModel {
        id: Set(e.id),
        school_number: Set(e.school_number),
        principal: Set(e.principal),
        date: Set(e.date),
        time: Set(e.time),
        location: Set(e.location),
        address: Set(e.address),
        ceremony_type: Set(e.ceremony_type),
        title: Set(e.title),
        year: Set(e.year),
        raw_text: Set(e.raw_text),
        extracted_at: Set(e.extracted_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    InfraError::Database(e).into()
}

/// Rows per INSERT statement, keeps bound parameters well under SQLite's limit
const INSERT_CHUNK: usize = 50;

async fn insert_chunked<C: ConnectionTrait>(conn: &C, events: Vec<Event>) -> DomainResult<u64> {
    let inserted = events.len() as u64;
    let mut models: Vec<event::ActiveModel> = events.into_iter().map(domain_to_active).collect();
    while !models.is_empty() {
        let rest = models.split_off(models.len().min(INSERT_CHUNK));
        event::Entity::insert_many(models)
            .exec(conn)
            .await
            .map_err(db_err)?;
        models = rest;
    }
    Ok(inserted)
}

// ── EventRepository impl ────────────────────────────────────────

#[async_trait]
impl EventRepository for SeaOrmEventRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Event>> {
        let model = event::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Event>> {
        let models = event::Entity::find()
            .order_by_asc(event::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn count(&self) -> DomainResult<u64> {
        event::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn insert_many(&self, events: Vec<Event>) -> DomainResult<u64> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let inserted = insert_chunked(&txn, events).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(inserted)
    }

    async fn replace_all(&self, events: Vec<Event>) -> DomainResult<ImportReport> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let deleted = event::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(db_err)?
            .rows_affected;

        let inserted = insert_chunked(&txn, events).await?;

        let total = event::Entity::find().count(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        debug!(deleted, inserted, total, "Replaced events");
        Ok(ImportReport {
            deleted,
            inserted,
            total,
        })
    }
}
