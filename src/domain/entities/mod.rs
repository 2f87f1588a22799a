pub mod document_status;
pub mod failure_analysis;
pub mod trade;
pub mod workflow;
