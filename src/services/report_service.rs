//! Report Service - read-only views over the catalog and the loan ledger

use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;

use crate::domain::{BorrowerKind, BorrowerRef, CopyStatus, DomainError, Missing};
use crate::models::{book, copy, department, ledger_entry, loan_transaction, professor, student};

/// A loan of one of the department's books by a borrower from another department
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImpactRow {
    pub transaction_id: i32,
    pub copy_id: i32,
    pub book_title: String,
    pub borrower: BorrowerRef,
    pub borrower_name: String,
    pub borrower_department: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusRow {
    pub copy_id: i32,
    pub status: CopyStatus,
    pub due_date: Option<NaiveDate>,
    pub tampered: bool,
    /// Status says the copy is out, but no outstanding ledger entry exists
    pub consistency_warning: bool,
}

struct BorrowerInfo {
    name: String,
    department_id: i32,
}

/// Cross-department loans of a department's books, ordered by transaction id.
///
/// Both outstanding and returned loans are reported. An empty result means the
/// department's books have no such activity.
pub async fn impact(
    db: &DatabaseConnection,
    department_id: i32,
) -> Result<Vec<ImpactRow>, DomainError> {
    if department::Entity::find_by_id(department_id).count(db).await? == 0 {
        return Err(DomainError::NotFound(Missing::Department));
    }

    // 1. Copies of the department's books, with titles
    let books: HashMap<i32, String> = book::Entity::find()
        .filter(book::Column::DepartmentId.eq(department_id))
        .all(db)
        .await?
        .into_iter()
        .map(|b| (b.id, b.title))
        .collect();

    if books.is_empty() {
        return Ok(Vec::new());
    }

    let copy_titles: HashMap<i32, String> = copy::Entity::find()
        .filter(copy::Column::BookId.is_in(books.keys().copied()))
        .all(db)
        .await?
        .into_iter()
        .filter_map(|c| books.get(&c.book_id).map(|t| (c.id, t.clone())))
        .collect();

    if copy_titles.is_empty() {
        return Ok(Vec::new());
    }

    // 2. Every ledger row touching those copies, with its transaction
    let entries = ledger_entry::Entity::find()
        .filter(ledger_entry::Column::CopyId.is_in(copy_titles.keys().copied()))
        .order_by_asc(ledger_entry::Column::TransactionId)
        .order_by_asc(ledger_entry::Column::CopyId)
        .find_also_related(loan_transaction::Entity)
        .all(db)
        .await?;

    // 3. Resolve borrowers per namespace
    let mut student_ids = HashSet::new();
    let mut professor_ids = HashSet::new();
    for (_, transaction) in &entries {
        if let Some(t) = transaction {
            match t.borrower_kind {
                BorrowerKind::Student => student_ids.insert(t.borrower_id),
                BorrowerKind::Professor => professor_ids.insert(t.borrower_id),
            };
        }
    }

    let mut borrowers: HashMap<BorrowerRef, BorrowerInfo> = HashMap::new();
    if !student_ids.is_empty() {
        for s in student::Entity::find()
            .filter(student::Column::Id.is_in(student_ids))
            .all(db)
            .await?
        {
            borrowers.insert(
                BorrowerRef::student(s.id),
                BorrowerInfo {
                    name: s.name,
                    department_id: s.department_id,
                },
            );
        }
    }
    if !professor_ids.is_empty() {
        for p in professor::Entity::find()
            .filter(professor::Column::Id.is_in(professor_ids))
            .all(db)
            .await?
        {
            borrowers.insert(
                BorrowerRef::professor(p.id),
                BorrowerInfo {
                    name: p.name,
                    department_id: p.department_id,
                },
            );
        }
    }

    let department_names: HashMap<i32, String> = department::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|d| (d.id, d.name))
        .collect();

    // 4. Keep loans by borrowers outside the department
    let rows: Vec<ImpactRow> = entries
        .into_iter()
        .filter_map(|(entry, transaction)| {
            let transaction = transaction?;
            let borrower = transaction.borrower();
            let info = borrowers.get(&borrower)?;
            if info.department_id == department_id {
                return None;
            }
            Some(ImpactRow {
                transaction_id: transaction.id,
                copy_id: entry.copy_id,
                book_title: copy_titles.get(&entry.copy_id)?.clone(),
                borrower,
                borrower_name: info.name.clone(),
                borrower_department: department_names
                    .get(&info.department_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
            })
        })
        .collect();

    tracing::debug!(department_id, rows = rows.len(), "Impact report computed");
    Ok(rows)
}

/// Status of every copy of a book, with the due date of copies currently out
pub async fn check_status(
    db: &DatabaseConnection,
    book_id: i32,
) -> Result<Vec<StatusRow>, DomainError> {
    if book::Entity::find_by_id(book_id).count(db).await? == 0 {
        return Err(DomainError::NotFound(Missing::Book));
    }

    let copies = copy::Entity::find()
        .filter(copy::Column::BookId.eq(book_id))
        .order_by_asc(copy::Column::Id)
        .all(db)
        .await?;

    let out_ids: Vec<i32> = copies
        .iter()
        .filter(|c| c.status == CopyStatus::Unavailable)
        .map(|c| c.id)
        .collect();

    // Newest outstanding entry per copy and borrower kind
    let mut due_by_kind: HashMap<(i32, BorrowerKind), NaiveDate> = HashMap::new();
    if !out_ids.is_empty() {
        let outstanding = ledger_entry::Entity::find()
            .filter(ledger_entry::Column::CopyId.is_in(out_ids))
            .filter(ledger_entry::Column::ReturnDate.is_null())
            .order_by_desc(ledger_entry::Column::TransactionId)
            .find_also_related(loan_transaction::Entity)
            .all(db)
            .await?;

        for (entry, transaction) in outstanding {
            if let Some(t) = transaction {
                due_by_kind
                    .entry((entry.copy_id, t.borrower_kind))
                    .or_insert(entry.due_date);
            }
        }
    }

    let rows = copies
        .into_iter()
        .map(|c| {
            if c.status != CopyStatus::Unavailable {
                return StatusRow {
                    copy_id: c.id,
                    status: c.status,
                    due_date: None,
                    tampered: c.tampered,
                    consistency_warning: false,
                };
            }

            let due_date = due_by_kind
                .get(&(c.id, BorrowerKind::Student))
                .or_else(|| due_by_kind.get(&(c.id, BorrowerKind::Professor)))
                .copied();

            if due_date.is_none() {
                tracing::warn!(
                    copy_id = c.id,
                    book_id,
                    "Copy is UNAVAILABLE but has no outstanding loan"
                );
            }

            StatusRow {
                copy_id: c.id,
                status: c.status,
                due_date,
                tampered: c.tampered,
                consistency_warning: due_date.is_none(),
            }
        })
        .collect();

    Ok(rows)
}
