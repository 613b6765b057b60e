pub mod guard;
pub mod pipeline;
pub mod reconcile;
