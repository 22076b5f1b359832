use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Library staff member; recorded on every loan transaction they process.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staff")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::loan_transaction::Entity")]
    LoanTransactions,
}

impl Related<super::loan_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
