//! DDL Parsing Module
//!
//! Turns batches of MySQL DDL into [`Tables`](crate::schema::Tables) by
//! replaying them into the in-memory catalog.

pub mod convert;
pub mod parser;
pub mod splitter;

pub use self::convert::convert_table;
pub use self::parser::{catalog_tables, parse_ddl, replay_ddls, try_exec_ddls};
pub use self::splitter::split_statements;
