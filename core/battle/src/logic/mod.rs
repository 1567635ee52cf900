//! 核心規則邏輯

pub mod ai;
pub mod geometry;
pub mod placement;
pub mod rules;
pub mod turn_order;
