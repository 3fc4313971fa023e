//! Database access: connection pool and credential lookup

mod pool;
mod users;

pub use pool::connect_pool;
pub use users::{find_credential, CredentialRecord};
