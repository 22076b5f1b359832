//! Lending Service - issue and return of copies
//!
//! Each operation runs in a single database transaction. Every precondition is
//! checked before the first write, and the writes themselves are guarded by the
//! expected current state (`status = AVAILABLE`, `return_date IS NULL`) so two
//! callers racing on the same copy cannot both succeed.
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use chrono::{Local, NaiveDate};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::domain::{
    BorrowerKind, BorrowerRef, Conflict, CopyStatus, DomainError, FineNotice, LoanPolicy, Missing,
    issue_transition, return_transition,
};
use crate::models::book::Entity as Book;
use crate::models::{copy, ledger_entry, loan_transaction, professor, staff, student};

/// Input for lending copies to a borrower
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IssueRequest {
    pub staff_id: i32,
    pub borrower_kind: BorrowerKind,
    pub borrower_id: i32,
    pub copy_ids: Vec<i32>,
}

impl IssueRequest {
    pub fn borrower(&self) -> BorrowerRef {
        BorrowerRef {
            kind: self.borrower_kind,
            id: self.borrower_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IssuedCopy {
    pub copy_id: i32,
    pub book_title: String,
    pub due_date: NaiveDate,
}

/// The transaction created by a successful issue
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanReceipt {
    pub transaction_id: i32,
    pub issue_date: NaiveDate,
    pub borrower: BorrowerRef,
    pub staff_id: i32,
    pub copies: Vec<IssuedCopy>,
}

/// Input for closing outstanding loans
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReturnRequest {
    pub copy_ids: Vec<i32>,
    #[serde(default)]
    pub lost: bool,
    #[serde(default)]
    pub tampered: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReturnedCopy {
    pub copy_id: i32,
    pub transaction_id: i32,
    pub status: CopyStatus,
    pub tampered: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReturnSummary {
    pub returned_on: NaiveDate,
    pub returned: Vec<ReturnedCopy>,
    pub fines: Vec<FineNotice>,
}

/// One copy in a borrower's loan history
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HistoryRow {
    pub transaction_id: i32,
    pub issue_date: NaiveDate,
    pub copy_id: i32,
    pub book_title: String,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn require_copy_ids(copy_ids: &[i32]) -> Result<(), DomainError> {
    if copy_ids.is_empty() {
        return Err(DomainError::Validation(
            "at least one copy id is required".to_string(),
        ));
    }
    Ok(())
}

async fn borrower_exists<C: ConnectionTrait>(
    conn: &C,
    borrower: BorrowerRef,
) -> Result<bool, DomainError> {
    let count = match borrower.kind {
        BorrowerKind::Student => student::Entity::find_by_id(borrower.id).count(conn).await?,
        BorrowerKind::Professor => professor::Entity::find_by_id(borrower.id).count(conn).await?,
    };
    Ok(count > 0)
}

/// Lend copies to a borrower, dated today
pub async fn issue(
    db: &DatabaseConnection,
    policy: &LoanPolicy,
    request: IssueRequest,
) -> Result<LoanReceipt, DomainError> {
    issue_on(db, policy, request, today()).await
}

/// Lend copies to a borrower with an explicit issue date
pub async fn issue_on(
    db: &DatabaseConnection,
    policy: &LoanPolicy,
    request: IssueRequest,
    issued_on: NaiveDate,
) -> Result<LoanReceipt, DomainError> {
    require_copy_ids(&request.copy_ids)?;
    let borrower = request.borrower();

    let txn = db.begin().await?;

    // 1. Borrower and staff must exist
    if !borrower_exists(&txn, borrower).await? {
        return Err(DomainError::NotFound(Missing::Borrower));
    }
    if staff::Entity::find_by_id(request.staff_id).count(&txn).await? == 0 {
        return Err(DomainError::NotFound(Missing::Staff));
    }

    // 2. Every id must resolve, and to a distinct copy
    let copies = copy::Entity::find()
        .filter(copy::Column::Id.is_in(request.copy_ids.clone()))
        .order_by_asc(copy::Column::Id)
        .find_also_related(Book)
        .all(&txn)
        .await?;

    if copies.len() != request.copy_ids.len() {
        return Err(DomainError::NotFound(Missing::Copy));
    }

    // 3. All copies must be AVAILABLE before anything is written
    for (copy, _) in &copies {
        issue_transition(copy.id, copy.status).map_err(DomainError::Conflict)?;
    }

    // 4. Flip status, guarded on the status we just read
    let now = chrono::Utc::now().to_rfc3339();
    for (copy, _) in &copies {
        let updated = copy::Entity::update_many()
            .col_expr(
                copy::Column::Status,
                Expr::value(CopyStatus::Unavailable.to_value()),
            )
            .col_expr(copy::Column::UpdatedAt, Expr::value(now.clone()))
            .filter(copy::Column::Id.eq(copy.id))
            .filter(copy::Column::Status.eq(CopyStatus::Available))
            .exec(&txn)
            .await?;

        if updated.rows_affected != 1 {
            let status = copy::Entity::find_by_id(copy.id)
                .one(&txn)
                .await?
                .map(|c| c.status.as_str().to_string())
                .unwrap_or_else(|| "UNKNOWN".to_string());
            return Err(DomainError::Conflict(Conflict::CopyUnavailable {
                copy_id: copy.id,
                status,
            }));
        }
    }

    // 5. Record the transaction and one ledger row per copy
    let transaction = loan_transaction::ActiveModel {
        issue_date: Set(issued_on),
        borrower_kind: Set(borrower.kind),
        borrower_id: Set(borrower.id),
        staff_id: Set(request.staff_id),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let due_date = policy.due_date(issued_on);
    let entries: Vec<ledger_entry::ActiveModel> = copies
        .iter()
        .map(|(copy, _)| ledger_entry::ActiveModel {
            transaction_id: Set(transaction.id),
            copy_id: Set(copy.id),
            due_date: Set(due_date),
            return_date: Set(None),
        })
        .collect();

    ledger_entry::Entity::insert_many(entries)
        .exec_without_returning(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(
        transaction_id = transaction.id,
        borrower_kind = borrower.kind.as_str(),
        borrower_id = borrower.id,
        staff_id = request.staff_id,
        copies = copies.len(),
        "Copies issued"
    );

    Ok(LoanReceipt {
        transaction_id: transaction.id,
        issue_date: transaction.issue_date,
        borrower,
        staff_id: transaction.staff_id,
        copies: copies
            .into_iter()
            .map(|(copy, book)| IssuedCopy {
                copy_id: copy.id,
                book_title: book
                    .map(|b| b.title)
                    .unwrap_or_else(|| "Unknown".to_string()),
                due_date,
            })
            .collect(),
    })
}

/// Close the outstanding loans of the given copies, dated today
pub async fn return_copies(
    db: &DatabaseConnection,
    request: ReturnRequest,
) -> Result<ReturnSummary, DomainError> {
    return_copies_on(db, request, today()).await
}

/// Close the outstanding loans of the given copies with an explicit return date.
///
/// All copies are validated before any is modified; one copy without an
/// outstanding loan rejects the whole batch.
pub async fn return_copies_on(
    db: &DatabaseConnection,
    request: ReturnRequest,
    returned_on: NaiveDate,
) -> Result<ReturnSummary, DomainError> {
    require_copy_ids(&request.copy_ids)?;

    let txn = db.begin().await?;

    let copies = copy::Entity::find()
        .filter(copy::Column::Id.is_in(request.copy_ids.clone()))
        .order_by_asc(copy::Column::Id)
        .all(&txn)
        .await?;

    if copies.len() != request.copy_ids.len() {
        return Err(DomainError::NotFound(Missing::Copy));
    }

    // Validate: each copy needs its most recent outstanding ledger row
    let mut open_loans = Vec::with_capacity(copies.len());
    for copy in copies {
        let entry = ledger_entry::Entity::find()
            .filter(ledger_entry::Column::CopyId.eq(copy.id))
            .filter(ledger_entry::Column::ReturnDate.is_null())
            .order_by_desc(ledger_entry::Column::TransactionId)
            .one(&txn)
            .await?
            .ok_or(DomainError::Conflict(Conflict::NotOnLoan { copy_id: copy.id }))?;
        open_loans.push((copy, entry));
    }

    let transaction_ids: Vec<i32> = open_loans.iter().map(|(_, e)| e.transaction_id).collect();
    let borrowers: HashMap<i32, BorrowerRef> = loan_transaction::Entity::find()
        .filter(loan_transaction::Column::Id.is_in(transaction_ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|t| (t.id, t.borrower()))
        .collect();

    // Mutate
    let now = chrono::Utc::now().to_rfc3339();
    let mut returned = Vec::with_capacity(open_loans.len());
    let mut fines = Vec::new();

    for (copy, entry) in open_loans {
        let stamped = ledger_entry::Entity::update_many()
            .col_expr(ledger_entry::Column::ReturnDate, Expr::value(returned_on))
            .filter(ledger_entry::Column::TransactionId.eq(entry.transaction_id))
            .filter(ledger_entry::Column::CopyId.eq(entry.copy_id))
            .filter(ledger_entry::Column::ReturnDate.is_null())
            .exec(&txn)
            .await?;
        if stamped.rows_affected != 1 {
            return Err(DomainError::Conflict(Conflict::NotOnLoan { copy_id: copy.id }));
        }

        let transition = return_transition(copy.tampered, request.lost, request.tampered);
        let copy_id = copy.id;

        let mut active: copy::ActiveModel = copy.into();
        active.status = Set(transition.status);
        active.tampered = Set(transition.tampered);
        active.updated_at = Set(now.clone());
        active.update(&txn).await?;

        if let Some(borrower) = borrowers.get(&entry.transaction_id) {
            for reason in &transition.fines {
                fines.push(FineNotice {
                    copy_id,
                    transaction_id: entry.transaction_id,
                    borrower: *borrower,
                    reason: *reason,
                });
            }
        } else {
            tracing::warn!(
                transaction_id = entry.transaction_id,
                "Ledger entry without a loan transaction; fine not raised"
            );
        }

        returned.push(ReturnedCopy {
            copy_id,
            transaction_id: entry.transaction_id,
            status: transition.status,
            tampered: transition.tampered,
        });
    }

    txn.commit().await?;

    tracing::info!(
        copies = returned.len(),
        lost = request.lost,
        tampered = request.tampered,
        "Copies returned"
    );
    for fine in &fines {
        tracing::warn!(
            target: "campus_library::fines",
            copy_id = fine.copy_id,
            transaction_id = fine.transaction_id,
            borrower_kind = fine.borrower.kind.as_str(),
            borrower_id = fine.borrower.id,
            reason = ?fine.reason,
            "Fine due"
        );
    }

    Ok(ReturnSummary {
        returned_on,
        returned,
        fines,
    })
}

/// Every copy a borrower has taken out, oldest transaction first
pub async fn borrower_history(
    db: &DatabaseConnection,
    borrower: BorrowerRef,
) -> Result<Vec<HistoryRow>, DomainError> {
    if !borrower_exists(db, borrower).await? {
        return Err(DomainError::NotFound(Missing::Borrower));
    }

    let transactions: HashMap<i32, NaiveDate> = loan_transaction::Entity::find()
        .filter(loan_transaction::Column::BorrowerKind.eq(borrower.kind))
        .filter(loan_transaction::Column::BorrowerId.eq(borrower.id))
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.issue_date))
        .collect();

    if transactions.is_empty() {
        return Ok(Vec::new());
    }

    let entries = ledger_entry::Entity::find()
        .filter(ledger_entry::Column::TransactionId.is_in(transactions.keys().copied()))
        .order_by_asc(ledger_entry::Column::TransactionId)
        .order_by_asc(ledger_entry::Column::CopyId)
        .all(db)
        .await?;

    // Collect copy IDs to fetch book titles
    let copy_ids: Vec<i32> = entries.iter().map(|e| e.copy_id).collect();
    let mut copy_title_map: HashMap<i32, String> = HashMap::new();

    let copies_with_books = copy::Entity::find()
        .filter(copy::Column::Id.is_in(copy_ids))
        .find_also_related(Book)
        .all(db)
        .await?;
    for (copy, book) in copies_with_books {
        if let Some(book) = book {
            copy_title_map.insert(copy.id, book.title);
        }
    }

    let rows = entries
        .into_iter()
        .filter_map(|entry| {
            let issue_date = *transactions.get(&entry.transaction_id)?;
            Some(HistoryRow {
                transaction_id: entry.transaction_id,
                issue_date,
                copy_id: entry.copy_id,
                book_title: copy_title_map
                    .get(&entry.copy_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                due_date: entry.due_date,
                return_date: entry.return_date,
            })
        })
        .collect();

    Ok(rows)
}
