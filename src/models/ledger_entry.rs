use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Links one copy to the transaction that issued it.
/// `return_date` is NULL while the loan is outstanding; once stamped the row is history.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loan_ledger")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub transaction_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub copy_id: i32,
    pub due_date: Date,
    pub return_date: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::loan_transaction::Entity",
        from = "Column::TransactionId",
        to = "super::loan_transaction::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    LoanTransaction,
    #[sea_orm(
        belongs_to = "super::copy::Entity",
        from = "Column::CopyId",
        to = "super::copy::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Copy,
}

impl Related<super::loan_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanTransaction.def()
    }
}

impl Related<super::copy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Copy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
