pub mod counter;
pub mod items;
pub mod query;
pub mod shell;
