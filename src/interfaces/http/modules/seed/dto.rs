//! Seed DTOs

use serde::Serialize;
use utoipa::ToSchema;

use crate::application::SampleSeed;
use crate::domain::ImportReport;

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportDetailsDto {
    pub deleted: u64,
    pub inserted: u64,
    pub total: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeedImportResponse {
    pub message: String,
    /// Events stored after the import
    pub count: u64,
    pub details: ImportDetailsDto,
}

impl From<ImportReport> for SeedImportResponse {
    fn from(r: ImportReport) -> Self {
        Self {
            message: format!("Successfully seeded {} events", r.inserted),
            count: r.total,
            details: ImportDetailsDto {
                deleted: r.deleted,
                inserted: r.inserted,
                total: r.total,
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SampleSeedResponse {
    pub message: String,
    /// `false` when the store already held events
    pub seeded: bool,
    pub count: u64,
}

impl From<SampleSeed> for SampleSeedResponse {
    fn from(s: SampleSeed) -> Self {
        match s {
            SampleSeed::AlreadyPopulated(count) => Self {
                message: format!("Database already contains {} events", count),
                seeded: false,
                count,
            },
            SampleSeed::Seeded(count) => Self {
                message: format!("Successfully seeded {} sample events", count),
                seeded: true,
                count,
            },
        }
    }
}
