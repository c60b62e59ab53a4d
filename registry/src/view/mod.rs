pub mod columns;
pub mod filter;
pub mod sort;
pub mod table;
