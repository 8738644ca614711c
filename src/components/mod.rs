pub mod chart;
pub mod force_graph;
pub mod query_chat;
pub mod toast;
pub mod upload;
