//! Yearn Headless Simulation Harness
//!
//! Validates the economy formulas and colony scenarios, then soaks the full
//! colony loop for a while and checks its invariants. Runs entirely
//! in-process, no rendering.
//!
//! Usage:
//!   cargo run -p yearn-simtest
//!   cargo run -p yearn-simtest -- --verbose
//!   cargo run -p yearn-simtest -- --seconds 600 --config colony.json --json

use std::collections::HashMap;

use serde::Serialize;
use yearn_core::prelude::*;
use yearn_core::systems::PopulationController;
use yearn_logic::balance::{conversion_batch, next_yield_bonus};
use yearn_logic::{BalanceTable, ResourceLedger, TIER_COUNT};

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Options {
    verbose: bool,
    json: bool,
    seconds: u32,
    config: ColonyConfig,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        verbose: false,
        json: false,
        seconds: 300,
        config: ColonyConfig::default().with_seed(0x5EED),
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" => options.verbose = true,
            "--json" => options.json = true,
            "--seconds" => {
                let value = args.next().ok_or("--seconds needs a value")?;
                options.seconds = value
                    .parse()
                    .map_err(|e| format!("bad --seconds {value}: {e}"))?;
            }
            "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                options.config = ColonyConfig::from_path(&path).map_err(|e| e.to_string())?;
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(options)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let options = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    println!("=== Yearn Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Tiers and ledger
    results.extend(validate_tiers_and_ledger(options.verbose));

    // 2. Balance formulas
    results.extend(validate_formulas(options.verbose));

    // 3. Crusher chain
    results.extend(validate_crushers(options.verbose));

    // 4. Miner round trip
    results.extend(validate_miners(options.verbose));

    // 5. Population growth
    results.extend(validate_population(options.verbose));

    // 6. Save / load
    results.extend(validate_persistence(options.verbose));

    // 7. Long soak
    results.extend(soak(&options));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || options.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn colony(miners: u32, seed: u64) -> Option<ColonyEngine> {
    let config = ColonyConfig {
        initial_miners: miners,
        ..ColonyConfig::default()
    }
    .with_seed(seed);
    ColonyEngine::from_config(config).ok()
}

fn failed(name: &str, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.into(),
        passed: false,
        detail: detail.into(),
    }
}

// ── 1. Tiers & Ledger ───────────────────────────────────────────────────

fn validate_tiers_and_ledger(_verbose: bool) -> Vec<TestResult> {
    println!("--- Tiers & Ledger ---");
    let mut results = Vec::new();

    let contiguous = ResourceTier::ALL
        .iter()
        .enumerate()
        .all(|(i, t)| t.index() == i && ResourceTier::from_index(i) == Some(*t));
    results.push(TestResult {
        name: "tiers_contiguous".into(),
        passed: contiguous && ResourceTier::ALL.len() == TIER_COUNT,
        detail: format!("{} tiers, indices 0..{}", TIER_COUNT, TIER_COUNT - 1),
    });

    let chain_ok = ResourceTier::ALL
        .windows(2)
        .all(|w| w[0].next() == Some(w[1]))
        && ResourceTier::TERMINAL.next().is_none();
    results.push(TestResult {
        name: "tiers_step_to_terminal".into(),
        passed: chain_ok,
        detail: format!("{} → … → {}", ResourceTier::BASE, ResourceTier::TERMINAL),
    });

    // Pseudo-random credit/debit sequence never drives a counter negative
    let mut ledger = ResourceLedger::new();
    let mut shadow = vec![0i64; TIER_COUNT];
    let mut state = 0x2545_F491_4F6C_DD1Du64;
    let mut consistent = true;
    for _ in 0..10_000 {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let tier = ResourceTier::ALL[(state % TIER_COUNT as u64) as usize];
        let amount = (state >> 8) % 50;
        if state & 1 == 0 {
            ledger.credit(tier, amount);
            shadow[tier.index()] += amount as i64;
        } else if ledger.debit(tier, amount).is_ok() {
            shadow[tier.index()] -= amount as i64;
        }
        consistent &= shadow[tier.index()] >= 0 && ledger.get(tier) == shadow[tier.index()] as u64;
    }
    results.push(TestResult {
        name: "ledger_non_negative".into(),
        passed: consistent,
        detail: "10k mixed credit/debit ops, refused debits had no effect".into(),
    });

    results
}

// ── 2. Balance Formulas ─────────────────────────────────────────────────

fn validate_formulas(verbose: bool) -> Vec<TestResult> {
    println!("--- Balance Formulas ---");
    let mut results = Vec::new();
    let table = BalanceTable::default();

    let costs = [
        table.hopper_upgrade_cost(100),
        table.hopper_upgrade_cost(1_000),
        table.rate_upgrade_cost(1),
        table.rate_upgrade_cost(30),
    ];
    if verbose {
        println!("  hopper@100={} hopper@1000={} rate@1={} rate@30={}", costs[0], costs[1], costs[2], costs[3]);
    }
    results.push(TestResult {
        name: "formula_upgrade_costs".into(),
        passed: costs == [10, 12, 20, 53],
        detail: format!("costs {:?}", costs),
    });

    let steps = [
        table.rate_upgrade_step(9),
        table.rate_upgrade_step(10),
        table.rate_upgrade_step(20),
        table.rate_upgrade_step(50),
    ];
    results.push(TestResult {
        name: "formula_rate_steps".into(),
        passed: steps == [1, 2, 3, 5],
        detail: format!("rate steps {:?}", steps),
    });

    let mut bonus = 0;
    let mut bonuses = Vec::new();
    for _ in 0..12 {
        bonus = next_yield_bonus(bonus);
        bonuses.push(bonus);
    }
    results.push(TestResult {
        name: "formula_yield_bonus".into(),
        passed: bonuses[..4] == [1, 2, 3, 4] && bonuses[10] == 12 && bonuses[11] == 14,
        detail: format!("yield bonus after 12 batches: {:?}", bonuses),
    });

    results.push(TestResult {
        name: "formula_conversion_batch".into(),
        passed: conversion_batch(7, 10) == 6 && conversion_batch(100, 3) == 6 && conversion_batch(1, 5) == 0,
        detail: "even batches capped at rate*2".into(),
    });

    results.push(TestResult {
        name: "formula_level_threshold".into(),
        passed: table.next_level_threshold(10, 2) == 30,
        detail: "10 + 10*2 = 30".into(),
    });

    results
}

// ── 3. Crusher Chain ────────────────────────────────────────────────────

fn validate_crushers(_verbose: bool) -> Vec<TestResult> {
    println!("--- Crusher Chain ---");
    let mut results = Vec::new();

    let Some(mut engine) = colony(0, 1) else {
        return vec![failed("crusher_setup", "default config rejected")];
    };

    // Ten Earth at rate 1 → five Stone over five seconds
    match engine
        .credit_ledger(ResourceTier::Earth, 10)
        .and_then(|_| engine.feed_crusher(CrusherId(0), 10))
    {
        Ok(10) => {}
        Ok(moved) => return vec![failed("crusher_setup", format!("fed {moved} of 10 Earth"))],
        Err(e) => return vec![failed("crusher_setup", e.to_string())],
    }
    for _ in 0..5 {
        engine.update(1.0);
    }
    let stone = engine.ledger().get(ResourceTier::Stone);
    let buffered = engine.crushers()[0].buffered;
    results.push(TestResult {
        name: "crusher_ten_to_five".into(),
        passed: stone == 5 && buffered == 0,
        detail: format!("stone={} buffered={}", stone, buffered),
    });

    // Duplicate extension refused
    if let Err(e) = engine.credit_ledger(ResourceTier::Stone, 300) {
        results.push(failed("crusher_extension_setup", e.to_string()));
        return results;
    }
    let first = engine.spawn_next_tier_crusher(CrusherId(0));
    let before = engine.crushers();
    let second = engine.spawn_next_tier_crusher(CrusherId(0));
    results.push(TestResult {
        name: "crusher_extension_unique".into(),
        passed: first.is_ok()
            && matches!(second, Err(CommandError::TierOccupied(ResourceTier::Hardstone)))
            && engine.crushers() == before,
        detail: format!("first={:?} second={:?}", first, second),
    });

    // Extend all the way to the terminal tier
    let mut tail = CrusherId(1);
    let mut refusal = None;
    for tier in ResourceTier::ALL.iter().skip(2) {
        match engine
            .credit_ledger(*tier, 100)
            .and_then(|_| engine.spawn_next_tier_crusher(tail))
        {
            Ok(id) => tail = id,
            Err(e) => {
                refusal = Some(e);
                break;
            }
        }
    }
    results.push(TestResult {
        name: "crusher_chain_full_length".into(),
        passed: engine.crushers.len() == TIER_COUNT - 1
            && engine.crushers.chain_is_path()
            && refusal == Some(CommandError::TerminalTier(ResourceTier::TERMINAL)),
        detail: format!("{} crushers, last refusal {:?}", engine.crushers.len(), refusal),
    });

    results
}

// ── 4. Miner Round Trip ─────────────────────────────────────────────────

fn validate_miners(_verbose: bool) -> Vec<TestResult> {
    println!("--- Miners ---");
    let mut results = Vec::new();

    let Some(mut engine) = colony(1, 3) else {
        return vec![failed("miner_setup", "default config rejected")];
    };
    for (_, miner) in engine.world.query_mut::<&mut Miner>() {
        miner.inventory = 9;
    }

    let mut returned_at = None;
    let mut banked_at = None;
    for tick in 0..60 * 60 {
        engine.update(1.0 / 60.0);
        let state = engine.miners()[0].state;
        if returned_at.is_none() && state == MinerState::Returning {
            returned_at = Some(tick);
        }
        if returned_at.is_some() && state == MinerState::MovingUp {
            banked_at = Some(tick);
            break;
        }
    }
    let earth = engine.ledger().get(ResourceTier::Earth);
    results.push(TestResult {
        name: "miner_full_load_banked".into(),
        passed: banked_at.is_some() && earth == 10,
        detail: format!(
            "returning at tick {:?}, banked at tick {:?}, ledger[Earth]={}",
            returned_at, banked_at, earth
        ),
    });

    let id = engine.miners()[0].id;
    let refused = engine.upgrade_miner_pickaxe(id, yearn_logic::PickaxeStats::default());
    results.push(TestResult {
        name: "miner_rejects_sidegrade".into(),
        passed: refused == Err(CommandError::NotAnUpgrade),
        detail: "default pickaxe is not an upgrade over itself".into(),
    });

    results
}

// ── 5. Population ───────────────────────────────────────────────────────

fn validate_population(_verbose: bool) -> Vec<TestResult> {
    println!("--- Population ---");
    let mut results = Vec::new();
    let table = BalanceTable::default();

    let mut pop = PopulationController::new(2, &table);
    let due = pop.add_progress(200.0);
    pop.complete_spawn(3, &table);
    results.push(TestResult {
        name: "population_threshold_scaling".into(),
        passed: due && pop.progress == 0.0 && pop.threshold == 300.0,
        detail: format!("due={} progress={} threshold={}", due, pop.progress, pop.threshold),
    });

    if let Some(mut engine) = colony(0, 8) {
        for _ in 0..600 {
            engine.update(1.0 / 60.0);
        }
        results.push(TestResult {
            name: "population_empty_colony_static".into(),
            passed: engine.miner_count() == 0,
            detail: "no miners → no destruction → no spawns".into(),
        });
    }

    results
}

// ── 6. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(_verbose: bool) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();

    let Some(mut engine) = colony(0, 9) else {
        return vec![failed("persist_setup", "default config rejected")];
    };
    match engine
        .credit_ledger(ResourceTier::Earth, 300)
        .and_then(|_| engine.feed_crusher(CrusherId(0), 77))
    {
        Ok(77) => {}
        Ok(moved) => return vec![failed("persist_setup", format!("fed {moved} of 77 Earth"))],
        Err(e) => return vec![failed("persist_setup", e.to_string())],
    }
    engine.update(0.5);

    for format in [SaveFormat::Binary, SaveFormat::Json] {
        let name = format!("persist_{:?}_roundtrip", format).to_lowercase();
        let mut buffer = Vec::new();
        if let Err(e) = engine.save(&mut buffer, format) {
            results.push(failed(&name, format!("save failed: {e}")));
            continue;
        }
        let mut loaded = match ColonyEngine::load(&buffer[..], format, engine.config().clone()) {
            Ok(l) => l,
            Err(e) => {
                results.push(failed(&name, format!("load failed: {e}")));
                continue;
            }
        };
        let mut reference = match ColonyEngine::load(&buffer[..], format, engine.config().clone()) {
            Ok(l) => l,
            Err(e) => {
                results.push(failed(&name, format!("load failed: {e}")));
                continue;
            }
        };
        for _ in 0..30 {
            loaded.update(1.0);
            reference.update(1.0);
        }
        results.push(TestResult {
            name,
            passed: loaded.economy() == reference.economy() && loaded.crushers() == reference.crushers(),
            detail: format!("{} bytes, 30s of identical ticking", buffer.len()),
        });
    }

    results
}

// ── 7. Soak ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SoakSummary {
    seconds: u32,
    ticks: u64,
    miners: usize,
    blocks: usize,
    crushers: usize,
    batches_laid: u64,
    blocks_destroyed: u64,
    durability_multiplier: f64,
    yield_bonus: u64,
    holdings: HashMap<String, u64>,
}

fn soak(options: &Options) -> Vec<TestResult> {
    println!("--- Soak ({}s) ---", options.seconds);
    let mut results = Vec::new();

    let mut engine = match ColonyEngine::from_config(options.config.clone()) {
        Ok(e) => e,
        Err(e) => return vec![failed("soak_setup", e.to_string())],
    };

    let mut inventory_ok = true;
    let mut depth_ok = true;
    let ticks_per_second = 30;
    for second in 0..options.seconds {
        for _ in 0..ticks_per_second {
            engine.update(1.0 / ticks_per_second as f32);
        }
        for view in engine.miners() {
            inventory_ok &= view.inventory <= view.capacity;
        }
        depth_ok &= engine.field.live_count() > 0;

        // Keep the chain busy the way a player would
        if let Err(e) = engine.feed_crusher(CrusherId(0), 100) {
            results.push(failed("soak_feed_root", e.to_string()));
            break;
        }
        if second % 10 == 0 {
            // Refusals for lack of funds are normal play
            let tail = engine.crushers().last().map(|c| c.id);
            if let Some(tail) = tail {
                if let Err(e) = engine.spawn_next_tier_crusher(tail) {
                    log::debug!("soak: extension refused: {e}");
                }
            }
            if let Err(e) = engine.purchase_rate_upgrade(CrusherId(0)) {
                log::debug!("soak: rate upgrade refused: {e}");
            }
        }
    }

    log::info!(
        "Soak finished: {} ticks, {} miners",
        engine.tick_count(),
        engine.miner_count()
    );

    let crushers = engine.crushers();
    let conversion_ok = crushers
        .iter()
        .all(|c| c.total_converted % 2 == 0 && c.total_produced == c.total_converted / 2);

    results.push(TestResult {
        name: "soak_inventory_bound".into(),
        passed: inventory_ok,
        detail: "inventory ≤ capacity for every miner, every second".into(),
    });
    results.push(TestResult {
        name: "soak_terrain_supply".into(),
        passed: depth_ok,
        detail: format!("{} live blocks at end", engine.field.live_count()),
    });
    results.push(TestResult {
        name: "soak_conversion_ratio".into(),
        passed: conversion_ok && engine.crushers.chain_is_path(),
        detail: format!("{} crushers, output = converted / 2", crushers.len()),
    });

    let summary = SoakSummary {
        seconds: options.seconds,
        ticks: engine.tick_count(),
        miners: engine.miner_count(),
        blocks: engine.field.live_count(),
        crushers: crushers.len(),
        batches_laid: engine.field.batches_laid(),
        blocks_destroyed: engine.field.destroyed_total(),
        durability_multiplier: engine.economy().difficulty.durability_multiplier,
        yield_bonus: engine.economy().difficulty.yield_bonus,
        holdings: engine
            .ledger()
            .holdings()
            .map(|(tier, n)| (tier.name().to_string(), n))
            .collect(),
    };

    if options.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{text}"),
            Err(e) => results.push(failed("soak_summary_json", e.to_string())),
        }
    } else {
        println!(
            "  {} miners, {} blocks destroyed, {} batches, {} crushers",
            summary.miners, summary.blocks_destroyed, summary.batches_laid, summary.crushers
        );
    }

    results
}
