/*
 * Oracle Infrastructure
 */

pub mod table_oracle;

pub use table_oracle::TableOracle;
