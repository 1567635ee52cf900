//! skirmish：無介面的對戰執行器
//!
//! 載入單位與棋盤設定，以貪婪策略替雙方自動對戰，並把結果存到目錄中。

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod store;

use anyhow::{Context, Result, bail};
use battle::battle::{Battle, Command};
use battle::config::BattleConfig;
use battle::domain::alias::MatchId;
use battle::domain::core_types::{Phase, Winner};
use battle::loader::load_units_file;
use battle::recorder::MatchEvent;
use battle::replay::verify_result;
use battle::result::MatchResult;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use store::{DirectorySink, load_file};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// 回合制網格對戰執行器
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 自動對戰一場並儲存結果
    Play {
        /// 單位資料（units.json）
        #[arg(long)]
        units: PathBuf,

        /// 棋盤設定（TOML），未指定時使用 12x10、部署欄 2
        #[arg(long)]
        config: Option<PathBuf>,

        /// 結果儲存目錄
        #[arg(long, default_value = "results")]
        store: PathBuf,

        /// 超過此回合數仍未分出勝負時放棄比賽
        #[arg(long, default_value = "100")]
        max_rounds: u32,
    },

    /// 重播比賽結果檔並驗證紀錄
    Replay {
        /// 比賽結果（<id>.json）
        #[arg(long)]
        file: PathBuf,
    },

    /// 統計儲存目錄中的勝負
    Stats {
        /// 結果儲存目錄
        #[arg(long, default_value = "results")]
        store: PathBuf,
    },
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match Args::parse().command {
        Commands::Play {
            units,
            config,
            store,
            max_rounds,
        } => play(&units, config.as_deref(), &store, max_rounds),
        Commands::Replay { file } => replay(&file),
        Commands::Stats { store } => stats(&store),
    }
}

fn play(units: &Path, config: Option<&Path>, store: &Path, max_rounds: u32) -> Result<()> {
    let config = match config {
        Some(path) => BattleConfig::from_file(path)
            .with_context(|| format!("載入棋盤設定 {} 失敗", path.display()))?,
        None => BattleConfig::default(),
    };
    let defs = load_units_file(units)
        .with_context(|| format!("載入單位資料 {} 失敗", units.display()))?;
    let mut battle = Battle::new(config, &defs).context("建立比賽失敗")?;

    battle.dispatch(Command::StartBattle)?;
    while battle.phase() != Phase::GameOver {
        if battle.round() > max_rounds {
            warn!(max_rounds, "round limit reached, abandoning match");
            battle.dispatch(Command::Abandon)?;
            println!("超過 {max_rounds} 回合仍未分出勝負，比賽已放棄，結果不儲存");
            return Ok(());
        }
        battle.play_active_with_policy()?;
    }

    let Some(result) = battle.result() else {
        bail!("比賽已結束卻沒有結果");
    };
    println!("勝方：{}（第 {} 回合）", result.winner, result.round);
    println!("事件數：{}", result.moves.len());
    for unit in &result.units {
        let side = if unit.is_player { "玩家" } else { "敵方" };
        println!("  [{side}] {} HP {}/{}", unit.name, unit.hp, unit.max_hp);
    }

    let mut sink = DirectorySink::open(store)?;
    match battle.submit_result(&mut sink) {
        Some(id) => {
            info!(match_id = id, "result stored");
            println!("已儲存：{}", sink.path_of(id).display());
        }
        None => println!("結果未儲存"),
    }
    Ok(())
}

fn replay(file: &Path) -> Result<()> {
    let result = load_file(file)?;
    for (index, event) in result.moves.iter().enumerate() {
        println!("{index:>4} {}", describe(event));
    }
    let survivors = verify_result(&result)
        .with_context(|| format!("重播 {} 與紀錄不一致", file.display()))?;
    println!(
        "重播一致：勝方 {}，存活 {} 個單位",
        result.winner,
        survivors.len()
    );
    Ok(())
}

fn stats(store: &Path) -> Result<()> {
    let sink = DirectorySink::open(store)?;
    let results = sink.load_all()?;
    if results.is_empty() {
        println!("{} 沒有任何比賽結果", store.display());
        return Ok(());
    }

    let total = results.len();
    println!("比賽總數：{total}");
    for winner in [Winner::Player, Winner::Enemy, Winner::Draw] {
        let count = results.iter().filter(|(_, r)| r.winner == winner).count();
        println!("  {winner}: {count}");
    }
    println!("平均回合數：{:.1}", average_round(&results));
    Ok(())
}

/// 平均回合數，以 u64 累加避免大量結果時溢位
fn average_round(results: &[(MatchId, MatchResult)]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let rounds: u64 = results.iter().map(|(_, r)| u64::from(r.round)).sum();
    rounds as f64 / results.len() as f64
}

fn describe(event: &MatchEvent) -> String {
    match event {
        MatchEvent::Start { units, .. } => format!("start  {} 個單位", units.len()),
        MatchEvent::Place { unit_id, x, y, .. } => format!("place  #{unit_id} -> ({x}, {y})"),
        MatchEvent::Move {
            unit_id, from, to, ..
        } => format!(
            "move   #{unit_id} ({}, {}) -> ({}, {})",
            from.x, from.y, to.x, to.y
        ),
        MatchEvent::Attack {
            attacker_id,
            target_id,
            damage,
            target_hp,
            ..
        } => format!("attack #{attacker_id} -> #{target_id} 傷害 {damage}，剩餘 {target_hp}"),
        MatchEvent::Kill {
            killer_id,
            victim_id,
            ..
        } => format!("kill   #{killer_id} 擊殺 #{victim_id}"),
    }
}
