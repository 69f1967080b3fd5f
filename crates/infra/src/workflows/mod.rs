//! Compound operation clients
//!
//! Each method is one use case made of several sequential transport calls.
//! These clients talk to [`Transport`](crate::http::Transport) directly and
//! never go through the atomic clients in [`api`](crate::api).

pub mod catalog;
pub mod publishing;

pub use catalog::WidgetCatalog;
pub use publishing::ProfilePublishing;
