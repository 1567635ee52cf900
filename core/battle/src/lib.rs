//! 回合制格子戰鬥核心
//!
//! - `domain`：型別別名、常數、單位與座標等資料結構
//! - `logic`：幾何、回合順序、規則、電腦決策等純函數
//! - `battle`：擁有整場比賽狀態的 `Battle` 狀態機
//! - `recorder` / `result` / `replay`：事件紀錄、比賽結果與重播驗證

pub mod battle;
pub mod config;
pub mod domain;
pub mod error;
pub mod loader;
pub mod loader_schema;
pub mod logic;
pub mod recorder;
pub mod replay;
pub mod result;

pub use domain::alias;
pub use domain::constants;
