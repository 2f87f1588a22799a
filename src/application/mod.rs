pub mod documents;
pub mod enrichment;
pub mod failure_analysis;
pub mod filter;
pub mod ingest;
pub mod persist;
pub mod stats;
pub mod store;
pub mod workflow;
