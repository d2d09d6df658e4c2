//! Pane navigation engine: history, filtering, sorting, pane state and the
//! orchestrator that reconciles asynchronous directory reads.

pub mod filter;
pub mod history;
pub mod orchestrator;
pub mod pane;
pub mod request;
pub mod sort;
