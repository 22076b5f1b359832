//! Lending vocabulary shared by the engine, the reports and the HTTP layer.
//!
//! A copy moves `AVAILABLE -> UNAVAILABLE` on issue, and back to `AVAILABLE`
//! (or on to the terminal `LOST`) on return. `tampered` is a separate sticky
//! flag, not a state.

use chrono::{Days, NaiveDate};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::errors::Conflict;

/// Days between issue and due date unless configured otherwise.
pub const DEFAULT_LOAN_PERIOD_DAYS: u32 = 15;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CopyStatus {
    #[sea_orm(string_value = "AVAILABLE")]
    Available,
    #[sea_orm(string_value = "UNAVAILABLE")]
    Unavailable,
    #[sea_orm(string_value = "LOST")]
    Lost,
}

impl CopyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CopyStatus::Available => "AVAILABLE",
            CopyStatus::Unavailable => "UNAVAILABLE",
            CopyStatus::Lost => "LOST",
        }
    }
}

/// Which identity namespace a borrower id lives in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "lowercase")]
pub enum BorrowerKind {
    #[sea_orm(string_value = "STUDENT")]
    Student,
    #[sea_orm(string_value = "PROFESSOR")]
    Professor,
}

impl BorrowerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BorrowerKind::Student => "student",
            BorrowerKind::Professor => "professor",
        }
    }
}

/// A student or professor, addressed by kind and id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct BorrowerRef {
    pub kind: BorrowerKind,
    pub id: i32,
}

impl BorrowerRef {
    pub fn student(id: i32) -> Self {
        Self {
            kind: BorrowerKind::Student,
            id,
        }
    }

    pub fn professor(id: i32) -> Self {
        Self {
            kind: BorrowerKind::Professor,
            id,
        }
    }
}

/// Lending rules that are configurable per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanPolicy {
    pub loan_period_days: u32,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            loan_period_days: DEFAULT_LOAN_PERIOD_DAYS,
        }
    }
}

impl LoanPolicy {
    pub fn due_date(&self, issued_on: NaiveDate) -> NaiveDate {
        issued_on
            .checked_add_days(Days::new(u64::from(self.loan_period_days)))
            .unwrap_or(NaiveDate::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FineReason {
    Lost,
    Tampered,
}

/// A fine obligation raised while closing a loan. The amount is decided elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FineNotice {
    pub copy_id: i32,
    pub transaction_id: i32,
    pub borrower: BorrowerRef,
    pub reason: FineReason,
}

/// Status a copy takes when it is issued.
pub fn issue_transition(copy_id: i32, status: CopyStatus) -> Result<CopyStatus, Conflict> {
    match status {
        CopyStatus::Available => Ok(CopyStatus::Unavailable),
        other => Err(Conflict::CopyUnavailable {
            copy_id,
            status: other.as_str().to_string(),
        }),
    }
}

/// Result of applying a return report to one copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnTransition {
    pub status: CopyStatus,
    pub tampered: bool,
    pub fines: Vec<FineReason>,
}

/// Computes the post-return state of a copy. A tamper report only raises a
/// fine the first time a copy is marked tampered.
pub fn return_transition(already_tampered: bool, lost: bool, tampered: bool) -> ReturnTransition {
    let mut fines = Vec::new();

    let status = if lost {
        fines.push(FineReason::Lost);
        CopyStatus::Lost
    } else {
        CopyStatus::Available
    };

    if tampered && !already_tampered {
        fines.push(FineReason::Tampered);
    }

    ReturnTransition {
        status,
        tampered: already_tampered || tampered,
        fines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_available_copies_can_be_issued() {
        assert_eq!(
            issue_transition(1, CopyStatus::Available),
            Ok(CopyStatus::Unavailable)
        );
        assert!(matches!(
            issue_transition(2, CopyStatus::Unavailable),
            Err(Conflict::CopyUnavailable { copy_id: 2, .. })
        ));
        assert!(matches!(
            issue_transition(22, CopyStatus::Lost),
            Err(Conflict::CopyUnavailable { copy_id: 22, .. })
        ));
    }

    #[test]
    fn plain_return_makes_copy_available() {
        let t = return_transition(false, false, false);
        assert_eq!(t.status, CopyStatus::Available);
        assert!(!t.tampered);
        assert!(t.fines.is_empty());
    }

    #[test]
    fn lost_return_is_terminal_and_fined() {
        let t = return_transition(false, true, false);
        assert_eq!(t.status, CopyStatus::Lost);
        assert_eq!(t.fines, vec![FineReason::Lost]);
    }

    #[test]
    fn tamper_fine_is_charged_once() {
        let first = return_transition(false, false, true);
        assert!(first.tampered);
        assert_eq!(first.fines, vec![FineReason::Tampered]);

        let second = return_transition(first.tampered, false, true);
        assert!(second.tampered);
        assert!(second.fines.is_empty());

        // Flag never reverts on a clean return
        let clean = return_transition(second.tampered, false, false);
        assert!(clean.tampered);
    }

    #[test]
    fn lost_and_tampered_raise_both_fines() {
        let t = return_transition(false, true, true);
        assert_eq!(t.status, CopyStatus::Lost);
        assert_eq!(t.fines, vec![FineReason::Lost, FineReason::Tampered]);
    }

    #[test]
    fn due_date_uses_loan_period() {
        let issued = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
        assert_eq!(
            LoanPolicy::default().due_date(issued),
            NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()
        );
        let weekly = LoanPolicy {
            loan_period_days: 7,
        };
        assert_eq!(
            weekly.due_date(issued),
            NaiveDate::from_ymd_opt(2024, 2, 27).unwrap()
        );
    }
}
