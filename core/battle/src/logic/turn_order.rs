//! 回合順序：先攻排序、輪替、回合數、陣亡單位剔除

use crate::domain::alias::ID;
use crate::domain::core_types::Unit;

/// 一次換手的結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub active_id: ID,
    pub index: usize,
    /// 是否從最後一位繞回開頭（回合數 +1）
    pub wrapped: bool,
}

/// 開戰時固定的行動順序
///
/// 陣亡單位透過 `remove` 立即剔除，`current_index` 隨之修正，始終指向同一個單位。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnOrder {
    order: Vec<ID>,
    current_index: usize,
    round: u32,
    // 行動中單位被剔除後，下一位已遞補到 current_index
    current_removed: bool,
}

impl TurnOrder {
    /// 以先攻值降冪做穩定排序，同先攻保留原始順序
    pub fn new(units: &[Unit]) -> Self {
        let mut alive: Vec<&Unit> = units.iter().filter(|u| u.is_alive()).collect();
        alive.sort_by(|a, b| b.initiative.cmp(&a.initiative));
        Self {
            order: alive.into_iter().map(|u| u.id).collect(),
            current_index: 0,
            round: 1,
            current_removed: false,
        }
    }

    pub fn order(&self) -> &[ID] {
        &self.order
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 目前行動中的單位 ID；索引越界或已被剔除時為 `None`
    pub fn current_id(&self) -> Option<ID> {
        if self.current_removed {
            return None;
        }
        self.order.get(self.current_index).copied()
    }

    /// 從 `start` 開始（含）找下一個存活單位的索引，最多掃描一輪
    pub fn next_alive_index(&self, start: usize, is_alive: impl Fn(ID) -> bool) -> Option<usize> {
        let len = self.order.len();
        (0..len)
            .map(|step| (start + step) % len)
            .find(|&idx| is_alive(self.order[idx]))
    }

    /// 換到下一個存活單位，繞回開頭時回合數 +1
    ///
    /// 找不到存活單位時回傳 `None`，狀態不變。
    pub fn advance(&mut self, is_alive: impl Fn(ID) -> bool) -> Option<Advance> {
        let start = if self.current_removed {
            self.current_index
        } else {
            self.current_index + 1
        };
        let index = self.next_alive_index(start, is_alive)?;
        let wrapped = index < start;
        if wrapped {
            self.round += 1;
        }
        self.current_index = index;
        self.current_removed = false;
        Some(Advance {
            active_id: self.order[index],
            index,
            wrapped,
        })
    }

    /// 剔除陣亡單位
    pub fn remove(&mut self, unit_id: ID) {
        let Some(pos) = self.order.iter().position(|&id| id == unit_id) else {
            return;
        };
        self.order.remove(pos);
        if pos < self.current_index {
            self.current_index -= 1;
        } else if pos == self.current_index {
            self.current_removed = true;
        }
    }

    /// 從行動中單位開始，依序列出存活單位
    pub fn upcoming(&self, is_alive: impl Fn(ID) -> bool) -> Vec<ID> {
        let len = self.order.len();
        if len == 0 {
            return Vec::new();
        }
        let start = if self.current_index < len {
            self.current_index
        } else {
            0
        };
        (0..len)
            .map(|step| self.order[(start + step) % len])
            .filter(|&id| is_alive(id))
            .collect()
    }
}
