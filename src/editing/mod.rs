//! Editors that work on the whole multi-label dataset without decomposing it.
pub mod imbalance;
pub mod iterative;
