pub mod client;
pub mod dashboard;
pub mod invoice;
pub mod payment;
pub mod profile;

pub use client::Client;
pub use invoice::{Invoice, InvoiceItem, InvoiceStatus};
pub use payment::Payment;
pub use profile::Profile;
