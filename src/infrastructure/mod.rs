pub mod parsers;
pub mod random;
pub mod sources;
pub mod sqlite;
