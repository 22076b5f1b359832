//! Services Layer
//!
//! Business logic kept apart from the HTTP handlers, so it can be called
//! directly or through Axum.

pub mod lending_service;
pub mod report_service;

// Re-export for convenience
pub use lending_service::{
    HistoryRow, IssueRequest, IssuedCopy, LoanReceipt, ReturnRequest, ReturnSummary, ReturnedCopy,
    borrower_history, issue, return_copies,
};
pub use report_service::{ImpactRow, StatusRow, check_status, impact};
