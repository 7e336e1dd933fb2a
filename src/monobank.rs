pub mod client;
pub mod types;

pub use client::{MonobankApi, MonobankClient};
pub use types::{
    Account, ClientInfo, Jar, NormalizedStatementItem, StatementItem, StatementQuery,
    normalize_statement,
};
