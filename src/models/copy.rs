use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::CopyStatus;

/// A single physical, barcoded item of a book. The id is the barcode.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "copies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub book_id: i32,
    pub purchase_date: Date,
    pub publication_date: Date,
    pub price: f64,
    pub edition: Option<f64>,
    /// Only the lending engine changes this.
    /// `UNAVAILABLE` exactly when an outstanding ledger entry exists.
    pub status: CopyStatus,
    /// Sticky: once set by a tampered return it is never cleared here.
    pub tampered: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Book,
    #[sea_orm(has_many = "super::ledger_entry::Entity")]
    LedgerEntries,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl Related<super::ledger_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
