pub mod author;
pub mod book;
pub mod book_authors;
pub mod copy;
pub mod department;
pub mod ledger_entry;
pub mod loan_transaction;
pub mod professor;
pub mod staff;
pub mod student;
