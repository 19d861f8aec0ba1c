//! Record store: sqlx-backed CRUD per entity, keyed by id and scoped
//! to the owning user. Last writer wins; no optimistic locking.

pub mod clients;
pub mod dashboard;
pub mod invoices;
pub mod payments;
pub mod profile;

#[cfg(test)]
mod tests;
