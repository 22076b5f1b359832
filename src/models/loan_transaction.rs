use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{BorrowerKind, BorrowerRef};

/// One issue event: a borrower takes one or more copies, processed by a staff member.
///
/// `borrower_id` refers to `students` or `professors` depending on `borrower_kind`,
/// so it carries no foreign key.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loan_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub issue_date: Date,
    pub borrower_kind: BorrowerKind,
    pub borrower_id: i32,
    pub staff_id: i32,
    pub created_at: String,
}

impl Model {
    pub fn borrower(&self) -> BorrowerRef {
        BorrowerRef {
            kind: self.borrower_kind,
            id: self.borrower_id,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::staff::Entity",
        from = "Column::StaffId",
        to = "super::staff::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Staff,
    #[sea_orm(has_many = "super::ledger_entry::Entity")]
    LedgerEntries,
}

impl Related<super::staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Staff.def()
    }
}

impl Related<super::ledger_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
