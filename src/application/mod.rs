pub mod assignments;
pub mod intake;
pub mod reconciler;
