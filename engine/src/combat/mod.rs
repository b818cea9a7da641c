pub mod actions;
pub mod ai;
pub mod legal;
