//! Registration entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// (event_id, email) is unique, see `idx_registrations_event_email`.
///
/// `event_id` is intentionally not a foreign key: events can be re-imported
/// and registrations must survive that.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "registrations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub event_id: i32,

    /// Stored lowercase
    pub email: String,

    pub name: String,

    pub registered_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
