//! 領域型別：別名、常數、核心資料結構

pub mod alias;
pub mod constants;
pub mod core_types;
