pub mod clients;
pub mod dashboard;
pub mod invoices;
pub mod payments;
pub mod profile;
