//! Event entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Graduation ceremony, keyed by the id assigned during extraction
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    pub school_number: String,
    pub principal: String,
    pub date: String,
    pub time: String,

    /// May contain line breaks
    pub location: String,
    pub address: String,
    pub ceremony_type: String,
    pub title: String,
    pub year: String,

    /// Source text the record was extracted from
    pub raw_text: String,
    pub extracted_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
