//! Command handlers for the ladle CLI.

mod corpus;
mod query;

pub use corpus::CorpusCommand;
pub use query::QueryCommand;
