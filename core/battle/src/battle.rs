//! battle.rs：
//! - `Battle` 擁有一場比賽的所有可變狀態（單位、回合順序、階段、事件紀錄、結果）。
//! - 所有操作同步完成，回傳 `Result`；非法行動不改變任何狀態。
//! - 電腦回合在開戰與每次換手後自動推進，直到輪到玩家或比賽結束。
use crate::config::BattleConfig;
use crate::domain::alias::{ID, MatchId};
use crate::domain::core_types::{Phase, Position, Unit, Winner};
use crate::error::{ActionError, DataError, Result};
use crate::loader::validate_defs;
use crate::loader_schema::UnitDef;
use crate::logic::ai::{Action, decide_action};
use crate::logic::geometry::{check_placement, distance, is_valid_position, unit_at};
use crate::logic::placement::find_free_position;
use crate::logic::rules::{apply_attack, check_attack_range, check_move_range, evaluate_victory};
use crate::logic::turn_order::TurnOrder;
use crate::recorder::{Clock, MatchEvent, MatchLog, SystemClock};
use crate::result::{MatchResult, ResultSink, UnitSummary};
use tracing::{debug, info, instrument, warn};

/// 輸入指令，由狀態機依目前階段判斷是否合法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 部署階段選擇玩家單位
    SelectUnit { id: ID },
    /// 部署階段點擊格子：選取該格玩家單位，或把已選單位放到此處
    PlaceAt { pos: Position },
    /// 結束部署並開戰
    StartBattle,
    /// 行動中玩家單位移動
    MoveTo { pos: Position },
    /// 行動中玩家單位攻擊該格的敵方單位
    AttackAt { pos: Position },
    /// 結束目前單位的回合
    EndTurn,
    /// 放棄比賽並回到部署階段
    Abandon,
}

/// 部署階段點擊的結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    Selected(ID),
    Placed(ID),
}

#[derive(Debug)]
pub struct Battle {
    config: BattleConfig,
    defs: Vec<UnitDef>,
    units: Vec<Unit>,
    phase: Phase,
    turn_order: TurnOrder,
    selected: Option<ID>,
    acted: bool,
    auto_ai: bool,
    log: MatchLog,
    result: Option<MatchResult>,
    submitted: bool,
    saved_match_id: Option<MatchId>,
    clock: Box<dyn Clock>,
}

impl Battle {
    /// 以單位定義建立比賽並進入部署階段
    ///
    /// 單位定義會被複製，之後的比賽不會影響呼叫端的資料。
    pub fn new(config: BattleConfig, defs: &[UnitDef]) -> Result<Self> {
        Self::with_clock(config, defs, Box::new(SystemClock))
    }

    pub fn with_clock(
        config: BattleConfig,
        defs: &[UnitDef],
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let mut battle = Self {
            config,
            defs: defs.to_vec(),
            units: Vec::new(),
            phase: Phase::Placement,
            turn_order: TurnOrder::default(),
            selected: None,
            acted: false,
            auto_ai: true,
            log: MatchLog::new(),
            result: None,
            submitted: false,
            saved_match_id: None,
            clock,
        };
        battle.enter_placement()?;
        Ok(battle)
    }

    // ========================================================================
    // 查詢
    // ========================================================================

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// 棋盤上的單位（陣亡單位已移除）
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit(&self, unit_id: ID) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == unit_id)
    }

    pub fn unit_at(&self, pos: Position) -> Option<&Unit> {
        unit_at(&self.units, pos)
    }

    pub fn round(&self) -> u32 {
        self.turn_order.round()
    }

    pub fn turn_order(&self) -> &TurnOrder {
        &self.turn_order
    }

    /// 目前行動中的存活單位
    pub fn active_unit(&self) -> Option<&Unit> {
        if !self.phase.is_turn() {
            return None;
        }
        self.turn_order
            .current_id()
            .and_then(|id| self.unit(id))
            .filter(|u| u.is_alive())
    }

    pub fn selected_unit(&self) -> Option<&Unit> {
        self.selected.and_then(|id| self.unit(id))
    }

    pub fn has_acted(&self) -> bool {
        self.acted
    }

    pub fn events(&self) -> &[MatchEvent] {
        self.log.events()
    }

    pub fn result(&self) -> Option<&MatchResult> {
        self.result.as_ref()
    }

    pub fn winner(&self) -> Option<Winner> {
        self.result.as_ref().map(|r| r.winner)
    }

    /// 儲存端回傳的比賽 ID（供重播連結使用）
    pub fn saved_match_id(&self) -> Option<MatchId> {
        self.saved_match_id
    }

    /// 從行動中單位開始的存活行動順序
    pub fn turn_queue(&self) -> Vec<&Unit> {
        self.turn_order
            .upcoming(|id| self.is_alive(id))
            .into_iter()
            .filter_map(|id| self.unit(id))
            .collect()
    }

    /// 關閉後電腦回合需手動呼叫 `run_ai_turn`
    pub fn set_auto_ai(&mut self, enabled: bool) {
        self.auto_ai = enabled;
    }

    // ========================================================================
    // 指令分派
    // ========================================================================

    /// 執行一個輸入指令，成功時回傳執行後的階段
    pub fn dispatch(&mut self, command: Command) -> Result<Phase> {
        match command {
            Command::SelectUnit { id } => self.select_unit(id)?,
            Command::PlaceAt { pos } => {
                self.place_at(pos)?;
            }
            Command::StartBattle => self.start_battle()?,
            Command::MoveTo { pos } => {
                let unit_id = self.active_player_id()?;
                self.move_unit(unit_id, pos)?;
            }
            Command::AttackAt { pos } => {
                let unit_id = self.active_player_id()?;
                let target_id = self
                    .unit_at(pos)
                    .map(|u| u.id)
                    .ok_or(ActionError::NoTargetAt { x: pos.x, y: pos.y })?;
                self.attack(unit_id, target_id)?;
            }
            Command::EndTurn => self.end_turn()?,
            Command::Abandon => self.abandon()?,
        }
        Ok(self.phase)
    }

    fn active_player_id(&self) -> Result<ID> {
        match self.phase {
            Phase::PlayerTurn => {}
            Phase::GameOver => return Err(ActionError::GameOver.into()),
            phase => return Err(ActionError::WrongPhase { phase }.into()),
        }
        let unit = self
            .active_unit()
            .ok_or(ActionError::WrongPhase { phase: self.phase })?;
        Ok(unit.id)
    }

    // ========================================================================
    // 部署階段
    // ========================================================================

    /// 放棄比賽，丟棄所有進行中的狀態與紀錄並回到部署階段
    pub fn abandon(&mut self) -> Result<()> {
        if self.phase == Phase::GameOver {
            return Err(ActionError::GameOver.into());
        }
        info!("abandon battle, back to placement");
        self.enter_placement()
    }

    fn enter_placement(&mut self) -> Result<()> {
        self.units = build_units(&self.config, &self.defs)?;
        self.phase = Phase::Placement;
        self.turn_order = TurnOrder::default();
        self.selected = self
            .units
            .iter()
            .find(|u| u.is_player() && u.is_alive())
            .map(|u| u.id);
        self.acted = false;
        self.log = MatchLog::new();
        self.result = None;
        self.submitted = false;
        self.saved_match_id = None;
        Ok(())
    }

    fn require_placement(&self) -> Result<()> {
        match self.phase {
            Phase::Placement => Ok(()),
            Phase::GameOver => Err(ActionError::GameOver.into()),
            phase => Err(ActionError::WrongPhase { phase }.into()),
        }
    }

    /// 選擇要部署的玩家單位
    pub fn select_unit(&mut self, unit_id: ID) -> Result<()> {
        self.require_placement()?;
        let unit = self
            .unit(unit_id)
            .ok_or(ActionError::UnitNotFound { unit_id })?;
        if !unit.is_player() {
            return Err(ActionError::WrongSide {
                unit_id,
                phase: self.phase,
            }
            .into());
        }
        self.selected = Some(unit_id);
        Ok(())
    }

    /// 部署階段點擊格子
    ///
    /// - 格子上有玩家單位：改選該單位
    /// - 空格：把已選單位（未選時取最近的玩家單位）以此格為左上角放置
    pub fn place_at(&mut self, pos: Position) -> Result<PlaceOutcome> {
        self.require_placement()?;
        if !is_valid_position(&self.config, pos) {
            return Err(ActionError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                width: 1,
                height: 1,
                cols: self.config.cols,
                rows: self.config.rows,
            }
            .into());
        }

        if let Some((clicked_id, is_player)) = self.unit_at(pos).map(|u| (u.id, u.is_player())) {
            if is_player {
                self.selected = Some(clicked_id);
                return Ok(PlaceOutcome::Selected(clicked_id));
            }
            return Err(ActionError::CellOccupied {
                x: pos.x,
                y: pos.y,
                occupant: clicked_id,
            }
            .into());
        }

        let unit_id = match self.selected {
            Some(id) => id,
            None => self.nearest_player_unit(pos).ok_or(ActionError::NothingToPlace)?,
        };
        let index = self
            .unit_index(unit_id)
            .ok_or(ActionError::UnitNotFound { unit_id })?;
        check_placement(&self.units, &self.config, &self.units[index], pos)?;

        self.units[index].position = pos;
        self.log.push(MatchEvent::Place {
            time: self.clock.now_millis(),
            unit_id,
            x: pos.x,
            y: pos.y,
        });
        self.selected = None;
        debug!(unit_id, x = pos.x, y = pos.y, "unit placed");
        Ok(PlaceOutcome::Placed(unit_id))
    }

    fn nearest_player_unit(&self, pos: Position) -> Option<ID> {
        let mut nearest: Option<(ID, usize)> = None;
        for unit in self.units.iter().filter(|u| u.is_player() && u.is_alive()) {
            let dist = distance(unit.position, pos);
            if nearest.is_none_or(|(_, best)| dist < best) {
                nearest = Some((unit.id, dist));
            }
        }
        nearest.map(|(id, _)| id)
    }

    /// 結束部署並開戰：建立行動順序、回合數設為 1、記錄開戰快照
    #[instrument(skip(self))]
    pub fn start_battle(&mut self) -> Result<()> {
        self.require_placement()?;
        self.turn_order = TurnOrder::new(&self.units);
        self.selected = None;
        self.acted = false;
        self.log.push(MatchEvent::Start {
            time: self.clock.now_millis(),
            units: self.units.clone(),
        });

        let first = self
            .turn_order
            .current_id()
            .and_then(|id| self.unit(id))
            .map(|u| (u.id, u.side));
        let Some((first_id, first_side)) = first else {
            // 沒有任何單位
            self.phase = Phase::AiTurn;
            self.check_victory();
            return Ok(());
        };
        self.phase = Phase::turn_of(first_side);
        info!(
            units = self.units.len(),
            first = first_id,
            phase = %self.phase,
            "battle started"
        );
        self.drive_ai()
    }

    // ========================================================================
    // 戰鬥階段
    // ========================================================================

    /// 驗證單位可以在本回合行動，回傳其索引
    fn check_actor(&self, unit_id: ID) -> Result<usize, ActionError> {
        match self.phase {
            Phase::PlayerTurn | Phase::AiTurn => {}
            Phase::GameOver => return Err(ActionError::GameOver),
            phase => return Err(ActionError::WrongPhase { phase }),
        }
        let index = self
            .unit_index(unit_id)
            .ok_or(ActionError::UnitNotFound { unit_id })?;
        let unit = &self.units[index];
        if !unit.is_alive() {
            return Err(ActionError::UnitDead { unit_id });
        }
        if self.turn_order.current_id() != Some(unit_id) {
            return Err(ActionError::NotActiveUnit { unit_id });
        }
        if Phase::turn_of(unit.side) != self.phase {
            return Err(ActionError::WrongSide {
                unit_id,
                phase: self.phase,
            });
        }
        if self.acted {
            return Err(ActionError::AlreadyActed { unit_id });
        }
        Ok(index)
    }

    /// 行動中單位移動到 `to`（左上角）
    #[instrument(skip(self))]
    pub fn move_unit(&mut self, unit_id: ID, to: Position) -> Result<()> {
        let index = self.check_actor(unit_id)?;
        let unit = &self.units[index];
        if !is_valid_position(&self.config, to) {
            return Err(ActionError::OutOfBounds {
                x: to.x,
                y: to.y,
                width: unit.footprint.width,
                height: unit.footprint.height,
                cols: self.config.cols,
                rows: self.config.rows,
            }
            .into());
        }
        check_move_range(unit, to)?;
        check_placement(&self.units, &self.config, unit, to)?;

        let from = unit.position;
        self.units[index].position = to;
        self.acted = true;
        self.log.push(MatchEvent::Move {
            time: self.clock.now_millis(),
            unit_id,
            from,
            to,
        });
        debug!(?from, ?to, "unit moved");
        Ok(())
    }

    /// 行動中單位攻擊敵對單位，致命時移除目標
    #[instrument(skip(self))]
    pub fn attack(&mut self, attacker_id: ID, target_id: ID) -> Result<()> {
        let attacker_index = self.check_actor(attacker_id)?;
        let target_index = self
            .unit_index(target_id)
            .ok_or(ActionError::UnitNotFound { unit_id: target_id })?;
        let attacker = self.units[attacker_index].clone();
        let target = &self.units[target_index];
        if !target.is_alive() {
            return Err(ActionError::UnitDead { unit_id: target_id }.into());
        }
        if target.side == attacker.side {
            return Err(ActionError::SameSide {
                attacker: attacker_id,
                target: target_id,
            }
            .into());
        }
        check_attack_range(&attacker, target)?;

        let outcome = apply_attack(&attacker, &mut self.units[target_index]);
        self.acted = true;
        self.log.push(MatchEvent::Attack {
            time: self.clock.now_millis(),
            attacker_id,
            target_id,
            damage: outcome.damage,
            target_hp: outcome.target_hp,
        });
        debug!(damage = outcome.damage, target_hp = outcome.target_hp, "attack resolved");

        if outcome.killed {
            self.units.remove(target_index);
            self.turn_order.remove(target_id);
            self.log.push(MatchEvent::Kill {
                time: self.clock.now_millis(),
                killer_id: attacker_id,
                victim_id: target_id,
            });
            info!(killer = attacker_id, victim = target_id, "unit killed");
        }
        Ok(())
    }

    /// 結束回合：先判定勝負，否則換到下一個存活單位
    #[instrument(skip(self))]
    pub fn end_turn(&mut self) -> Result<()> {
        self.finish_turn()?;
        self.drive_ai()
    }

    fn finish_turn(&mut self) -> Result<()> {
        match self.phase {
            Phase::PlayerTurn | Phase::AiTurn => {}
            Phase::GameOver => return Err(ActionError::GameOver.into()),
            phase => return Err(ActionError::WrongPhase { phase }.into()),
        }
        if self.check_victory().is_some() {
            return Ok(());
        }

        let units = &self.units;
        let advance = self
            .turn_order
            .advance(|id| units.iter().any(|u| u.id == id && u.is_alive()));
        let Some(advance) = advance else {
            warn!("turn order has no living unit, re-checking victory");
            self.check_victory();
            return Ok(());
        };

        let side = self
            .unit(advance.active_id)
            .map(|u| u.side)
            .ok_or(ActionError::UnitNotFound {
                unit_id: advance.active_id,
            })?;
        self.phase = Phase::turn_of(side);
        self.acted = false;
        debug!(
            active = advance.active_id,
            round = self.turn_order.round(),
            wrapped = advance.wrapped,
            "next turn"
        );
        Ok(())
    }

    /// 判定勝負；成立時進入 `GameOver` 並產生唯一一次的比賽結果
    ///
    /// 比賽結束後重複呼叫只回傳既有勝方，不再改變狀態。
    pub fn check_victory(&mut self) -> Option<Winner> {
        match self.phase {
            Phase::GameOver => return self.winner(),
            Phase::Placement => return None,
            Phase::PlayerTurn | Phase::AiTurn => {}
        }
        let winner = evaluate_victory(&self.units)?;
        self.phase = Phase::GameOver;
        self.result = Some(MatchResult {
            winner,
            round: self.turn_order.round(),
            units: self.units.iter().map(UnitSummary::from).collect(),
            moves: self.log.events().to_vec(),
        });
        info!(%winner, round = self.turn_order.round(), "game over");
        Some(winner)
    }

    // ========================================================================
    // 電腦回合
    // ========================================================================

    /// 執行一次電腦回合：決策、行動、結束回合（不自動推進後續電腦回合）
    pub fn run_ai_turn(&mut self) -> Result<Action> {
        match self.phase {
            Phase::AiTurn => {}
            Phase::GameOver => return Err(ActionError::GameOver.into()),
            phase => return Err(ActionError::WrongPhase { phase }.into()),
        }
        let action = self.act_with_policy()?;
        self.finish_turn()?;
        Ok(action)
    }

    /// 以貪婪策略替目前行動中的單位（任一陣營）行動並結束回合
    pub fn play_active_with_policy(&mut self) -> Result<Action> {
        match self.phase {
            Phase::PlayerTurn | Phase::AiTurn => {}
            Phase::GameOver => return Err(ActionError::GameOver.into()),
            phase => return Err(ActionError::WrongPhase { phase }.into()),
        }
        let action = self.act_with_policy()?;
        self.end_turn()?;
        Ok(action)
    }

    fn act_with_policy(&mut self) -> Result<Action> {
        let Some(unit_id) = self.active_unit().map(|u| u.id) else {
            return Ok(Action::Pass);
        };
        if self.acted {
            return Ok(Action::Pass);
        }
        let action = decide_action(&self.units, &self.config, unit_id)?;
        match action {
            Action::Attack { target_id } => self.attack(unit_id, target_id)?,
            Action::Move { to } => self.move_unit(unit_id, to)?,
            Action::Pass => debug!(unit_id, "no useful move, passing"),
        }
        Ok(action)
    }

    /// 連續執行電腦回合直到輪到玩家或比賽結束
    fn drive_ai(&mut self) -> Result<()> {
        if !self.auto_ai {
            return Ok(());
        }
        // 每次電腦回合都會換手，一輪內必定輪到玩家或分出勝負
        for _ in 0..=self.turn_order.order().len() {
            if self.phase != Phase::AiTurn {
                break;
            }
            self.run_ai_turn()?;
        }
        Ok(())
    }

    // ========================================================================
    // 結果傳送
    // ========================================================================

    /// 送出比賽結果（最多一次），失敗只記錄警告不影響結束狀態
    #[instrument(skip(self, sink))]
    pub fn submit_result(&mut self, sink: &mut dyn ResultSink) -> Option<MatchId> {
        let result = self.result.as_ref()?;
        if self.submitted {
            return self.saved_match_id;
        }
        self.submitted = true;
        match sink.submit(result) {
            Ok(id) => {
                info!(match_id = id, "match result saved");
                self.saved_match_id = Some(id);
                Some(id)
            }
            Err(err) => {
                warn!(%err, "failed to submit match result");
                None
            }
        }
    }

    fn unit_index(&self, unit_id: ID) -> Option<usize> {
        self.units.iter().position(|u| u.id == unit_id)
    }

    fn is_alive(&self, unit_id: ID) -> bool {
        self.unit(unit_id).is_some_and(|u| u.is_alive())
    }
}

/// 依定義建立單位：先驗證指定位置，再為其餘單位自動擺放
fn build_units(config: &BattleConfig, defs: &[UnitDef]) -> Result<Vec<Unit>> {
    let validated = validate_defs(defs)?;

    // 初始位置只檢查邊界與重疊，不套用玩家部署欄限制
    let relaxed = BattleConfig {
        player_columns: config.cols,
        ..*config
    };
    let mut placed: Vec<Unit> = Vec::new();
    for (unit, position) in &validated {
        let Some(pos) = position else { continue };
        let mut unit = unit.clone();
        unit.position = *pos;
        check_placement(&placed, &relaxed, &unit, *pos).map_err(|reason| {
            DataError::InvalidInitialPosition {
                unit_id: unit.id,
                x: pos.x,
                y: pos.y,
                reason: reason.to_string(),
            }
        })?;
        placed.push(unit);
    }

    let mut units = Vec::with_capacity(validated.len());
    for (unit, position) in validated {
        let unit = match position {
            Some(_) => placed
                .iter()
                .find(|p| p.id == unit.id)
                .cloned()
                .ok_or(ActionError::UnitNotFound { unit_id: unit.id })?,
            None => {
                let pos = find_free_position(&placed, config, &unit)
                    .ok_or(ActionError::NoFreeCell { unit_id: unit.id })?;
                let mut unit = unit;
                unit.position = pos;
                placed.push(unit.clone());
                unit
            }
        };
        units.push(unit);
    }
    Ok(units)
}
