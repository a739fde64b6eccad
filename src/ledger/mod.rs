pub mod hydrate;
pub mod reason;
pub mod reconcile;
pub mod state;
