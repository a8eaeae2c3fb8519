//! Colony engine - main entry point for running the simulation

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;
use yearn_logic::{
    CanisterStats, Economy, PickaxeStats, ResourceLedger, ResourceTier, ShovelStats,
};

use crate::components::*;
use crate::config::ColonyConfig;
use crate::error::{CommandError, ConfigError, SaveError};
use crate::generation::{spawn_miner, spawn_with};
use crate::persistence::{
    load_snapshot, save_snapshot, ColonySnapshot, MinerRecord, SaveFormat, SAVE_VERSION,
};
use crate::systems::*;
use crate::views::{BlockView, CrusherView, MinerView};

/// Main simulation engine
pub struct ColonyEngine {
    /// ECS world containing the miners
    pub world: World,
    /// Depletable terrain
    pub field: BlockField,
    /// Crusher chain
    pub crushers: CrusherNetwork,
    /// Stockpile and terrain difficulty
    pub economy: Economy,
    /// Destruction progress toward the next miner
    pub population: PopulationController,
    /// Base geometry
    pub base: Base,

    config: ColonyConfig,
    rng: StdRng,
    /// Simulated seconds since founding
    sim_time: f64,
    time_scale: f32,
    next_miner_id: u32,
    tick_count: u64,
    /// Simulated seconds since the last autosave
    autosave_timer: f32,
}

impl Default for ColonyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ColonyEngine {
    /// Create a colony with the default configuration
    pub fn new() -> Self {
        Self::build(ColonyConfig::default())
    }

    /// Create a colony from a validated configuration
    pub fn from_config(config: ColonyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ColonyConfig) -> Self {
        let mut engine = Self::empty(config, Economy::new());
        engine.lay_field();
        for _ in 0..engine.config.initial_miners {
            engine.add_miner(MinerState::MovingUp);
        }
        engine.population = PopulationController::new(engine.miner_count(), &engine.config.balance);
        log::info!(
            "Colony founded: {} miners, {} blocks",
            engine.miner_count(),
            engine.field.live_count()
        );
        engine
    }

    /// Everything but terrain and miners.
    fn empty(config: ColonyConfig, economy: Economy) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            world: World::new(),
            field: BlockField::new(&config),
            crushers: CrusherNetwork::with_root(
                config.root_input,
                config.root_output,
                config.root_hopper,
            ),
            economy,
            population: PopulationController::new(0, &config.balance),
            base: Base::for_field(config.field_width, config.field_height),
            config,
            rng,
            sim_time: 0.0,
            time_scale: 1.0,
            next_miner_id: 0,
            tick_count: 0,
            autosave_timer: 0.0,
        }
    }

    fn lay_field(&mut self) {
        self.field
            .lay_initial_field(&self.economy, &self.config.balance, &mut self.rng);
    }

    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.clamp(0.0, 100.0);
    }

    /// Advance the colony by `delta_seconds` of wall time.
    pub fn update(&mut self, delta_seconds: f32) {
        let dt = delta_seconds * self.time_scale;
        if dt <= 0.0 {
            return;
        }
        self.sim_time += dt as f64;
        self.tick_count += 1;
        let balance = &self.config.balance;

        // 1. Terrain upkeep
        self.field.maintain(&mut self.economy, balance, &mut self.rng);

        // 2. Miners, ascending id, each followed by its projectiles
        let report = {
            let mut site = MineSite {
                field: &mut self.field,
                crushers: &mut self.crushers,
                economy: &mut self.economy,
                base: &self.base,
                balance,
            };
            miner_system(&mut self.world, &mut site, &mut self.rng, dt)
        };

        if report.spilled > 0 {
            log::debug!("{} units spilled from full miners", report.spilled);
        }

        // 3. Crushers, ascending id
        self.crushers.tick_all(dt, &mut self.economy);

        // 4. Population, one check per destroyed block
        for _ in 0..report.destroyed {
            if self.population.record_destruction(&mut self.rng, balance) {
                let id = MinerId(self.next_miner_id);
                spawn_miner(
                    &mut self.world,
                    id,
                    MinerState::MovingUp,
                    &self.base,
                    balance,
                    &mut self.rng,
                );
                self.next_miner_id += 1;
                let count = self.world.query::<&Miner>().iter().count();
                self.population.complete_spawn(count, balance);
                log::info!("Colony grew to {} miners, welcome {}", count, id);
            }
        }

        // 5. Frontier
        let highest = self
            .world
            .query::<(&Miner, &Position)>()
            .iter()
            .map(|(_, (_, p))| p.point.y)
            .fold(f32::INFINITY, f32::min);
        if highest.is_finite() {
            self.field
                .ensure_reach(highest, &mut self.economy, balance, &mut self.rng);
        }

        self.autosave(dt);
    }

    /// Save to the configured autosave path once its interval has elapsed.
    /// A failed save is logged and retried next interval.
    fn autosave(&mut self, dt: f32) {
        let Some(interval) = self.config.autosave.as_ref().map(|a| a.interval_seconds) else {
            return;
        };
        self.autosave_timer += dt;
        if self.autosave_timer < interval {
            return;
        }
        self.autosave_timer = 0.0;
        let Some(path) = self.config.autosave.as_ref().map(|a| a.path.clone()) else {
            return;
        };
        if let Err(e) = self.save_to_path(&path) {
            log::warn!("Autosave to {} failed: {}", path.display(), e);
        }
    }

    // ── Queries ───────────────────────────────────────────────────────

    pub fn miner_count(&self) -> usize {
        self.world.query::<&Miner>().iter().count()
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.economy.ledger
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn population(&self) -> &PopulationController {
        &self.population
    }

    pub fn miners(&self) -> Vec<MinerView> {
        let mut views: Vec<MinerView> = self
            .world
            .query::<(&Miner, &Name, &Position, &Projectiles)>()
            .iter()
            .map(|(_, (m, name, pos, shots))| MinerView {
                id: m.id,
                name: name.0.clone(),
                state: m.state,
                x: pos.point.x,
                y: pos.point.y,
                radius: m.radius,
                inventory: m.inventory,
                capacity: m.capacity(),
                cargo: m.cargo,
                power: m.power(),
                speed: m.speed,
                experience: m.experience,
                level_threshold: m.level_threshold,
                projectiles_in_flight: shots.len(),
            })
            .collect();
        views.sort_by_key(|v| v.id);
        views
    }

    pub fn blocks(&self) -> Vec<BlockView> {
        self.field
            .iter()
            .map(|(handle, b)| BlockView {
                id: handle.to_bits(),
                handle,
                x: b.x,
                y: b.y,
                size: b.size,
                durability: b.durability,
                yield_amount: b.yield_amount,
                grain: b.grain,
            })
            .collect()
    }

    pub fn crushers(&self) -> Vec<CrusherView> {
        let balance = &self.config.balance;
        self.crushers
            .iter()
            .map(|c| CrusherView {
                id: c.id,
                input: c.input,
                output: c.output,
                hopper: c.hopper,
                buffered: c.buffered,
                rate: c.rate,
                hopper_upgrade_cost: balance.hopper_upgrade_cost(c.hopper),
                rate_upgrade_cost: balance.rate_upgrade_cost(c.rate),
                can_extend: self.crushers.can_extend(c.id, &self.economy, balance),
                total_converted: c.total_converted,
                total_produced: c.total_produced,
            })
            .collect()
    }

    fn find_miner(&self, id: MinerId) -> Result<Entity, CommandError> {
        self.world
            .query::<&Miner>()
            .iter()
            .find(|(_, m)| m.id == id)
            .map(|(e, _)| e)
            .ok_or(CommandError::UnknownMiner(id))
    }

    fn require_crusher(&self, id: CrusherId) -> Result<(), CommandError> {
        self.crushers
            .get(id)
            .map(|_| ())
            .ok_or(CommandError::UnknownCrusher(id))
    }

    // ── Commands ──────────────────────────────────────────────────────

    pub fn credit_ledger(&mut self, tier: ResourceTier, amount: u64) -> Result<(), CommandError> {
        self.economy.credit(tier, amount);
        Ok(())
    }

    pub fn debit_ledger(&mut self, tier: ResourceTier, amount: u64) -> Result<(), CommandError> {
        self.economy.debit(tier, amount)?;
        Ok(())
    }

    /// Move stockpile into a crusher's hopper. Returns units moved.
    pub fn feed_crusher(&mut self, id: CrusherId, amount: u32) -> Result<u32, CommandError> {
        self.crushers.feed(id, amount, &mut self.economy)
    }

    /// Put a miner to work hauling stockpile into a crusher.
    pub fn assign_miner_to_crusher(
        &mut self,
        miner: MinerId,
        crusher: CrusherId,
    ) -> Result<(), CommandError> {
        self.require_crusher(crusher)?;
        let entity = self.find_miner(miner)?;
        let (m, shots) = self
            .world
            .query_one_mut::<(&mut Miner, &mut Projectiles)>(entity)
            .map_err(|_| CommandError::UnknownMiner(miner))?;
        m.state = MinerState::Working { crusher };
        m.collect_timer = 0.0;
        shots.clear();
        Ok(())
    }

    pub fn purchase_hopper_upgrade(&mut self, id: CrusherId) -> Result<u32, CommandError> {
        self.crushers
            .purchase_hopper_upgrade(id, &mut self.economy, &self.config.balance)
    }

    pub fn purchase_rate_upgrade(&mut self, id: CrusherId) -> Result<u32, CommandError> {
        self.crushers
            .purchase_rate_upgrade(id, &mut self.economy, &self.config.balance)
    }

    /// Extend the chain past crusher `id`.
    pub fn spawn_next_tier_crusher(&mut self, id: CrusherId) -> Result<CrusherId, CommandError> {
        self.crushers
            .extend_chain(id, &mut self.economy, &self.config.balance)
    }

    /// Send a miner home immediately. Shots in flight are discarded; the load
    /// is kept and deposited on arrival.
    pub fn force_return_to_base(&mut self, miner: MinerId) -> Result<(), CommandError> {
        let entity = self.find_miner(miner)?;
        let (m, shots) = self
            .world
            .query_one_mut::<(&mut Miner, &mut Projectiles)>(entity)
            .map_err(|_| CommandError::UnknownMiner(miner))?;
        m.state = MinerState::Returning;
        shots.clear();
        Ok(())
    }

    /// Add a miner that waits for an assignment.
    pub fn spawn_idle_miner(&mut self) -> Result<MinerId, CommandError> {
        let id = self.add_miner(MinerState::Idle);
        let count = self.miner_count();
        self.population.rescale(count, &self.config.balance);
        Ok(id)
    }

    fn add_miner(&mut self, state: MinerState) -> MinerId {
        let id = MinerId(self.next_miner_id);
        self.next_miner_id += 1;
        spawn_miner(
            &mut self.world,
            id,
            state,
            &self.base,
            &self.config.balance,
            &mut self.rng,
        );
        log::info!("Spawned {} ({})", id, state.label());
        id
    }

    fn with_miner<T>(
        &mut self,
        miner: MinerId,
        f: impl FnOnce(&mut Miner) -> Result<T, CommandError>,
    ) -> Result<T, CommandError> {
        let entity = self.find_miner(miner)?;
        let mut m = self
            .world
            .get::<&mut Miner>(entity)
            .map_err(|_| CommandError::UnknownMiner(miner))?;
        f(&mut *m)
    }

    /// Equip a pickaxe if it is strictly better than the current one.
    pub fn upgrade_miner_pickaxe(
        &mut self,
        miner: MinerId,
        pickaxe: PickaxeStats,
    ) -> Result<(), CommandError> {
        self.with_miner(miner, |m| {
            if !pickaxe.is_better_than(&m.pickaxe) {
                return Err(CommandError::NotAnUpgrade);
            }
            m.pickaxe = pickaxe;
            Ok(())
        })
    }

    /// Equip a canister if it is strictly better than the current one.
    pub fn upgrade_miner_capacity(
        &mut self,
        miner: MinerId,
        canister: CanisterStats,
    ) -> Result<(), CommandError> {
        self.with_miner(miner, |m| {
            if !canister.is_better_than(&m.canister.unwrap_or_default()) {
                return Err(CommandError::NotAnUpgrade);
            }
            m.canister = Some(canister);
            Ok(())
        })
    }

    /// Equip a shovel if it is strictly better than the current one.
    pub fn upgrade_miner_shovel(
        &mut self,
        miner: MinerId,
        shovel: ShovelStats,
    ) -> Result<(), CommandError> {
        self.with_miner(miner, |m| {
            if !shovel.is_better_than(&m.shovel) {
                return Err(CommandError::NotAnUpgrade);
            }
            m.shovel = shovel;
            Ok(())
        })
    }

    // ── Persistence ───────────────────────────────────────────────────

    pub fn snapshot(&self) -> ColonySnapshot {
        let mut miners: Vec<MinerRecord> = self
            .world
            .query::<(&Miner, &Name)>()
            .iter()
            .map(|(_, (m, name))| MinerRecord::capture(m, name))
            .collect();
        miners.sort_by_key(|r| r.id);

        ColonySnapshot {
            version: SAVE_VERSION,
            sim_time: self.sim_time,
            ledger: self.economy.ledger.counts().to_vec(),
            difficulty: self.economy.difficulty,
            miners,
            crushers: self.crushers.iter().cloned().collect(),
            next_crusher_id: self.crushers.next_id(),
            population_progress: self.population.progress,
            next_miner_id: self.next_miner_id,
        }
    }

    /// Rebuild a colony from a snapshot. The field is relaid at the saved
    /// difficulty and miners reappear above the base, heading up or, when
    /// they were hauling a higher tier, heading home to bank it.
    pub fn restore(snapshot: ColonySnapshot, config: ColonyConfig) -> Result<Self, SaveError> {
        if snapshot.version != SAVE_VERSION {
            return Err(SaveError::VersionMismatch {
                expected: SAVE_VERSION,
                found: snapshot.version,
            });
        }
        config.validate()?;

        let economy = Economy {
            ledger: ResourceLedger::from_counts(&snapshot.ledger),
            difficulty: snapshot.difficulty,
        };
        let mut engine = Self::empty(config, economy);
        engine.sim_time = snapshot.sim_time;
        engine.crushers = CrusherNetwork::from_parts(snapshot.crushers, snapshot.next_crusher_id);
        engine.lay_field();

        let mut next_id = snapshot.next_miner_id;
        for record in &snapshot.miners {
            let template = Miner::new(record.id, MinerState::MovingUp, &engine.config.balance);
            let (miner, name) = record.restore(template);
            next_id = next_id.max(miner.id.0 + 1);
            spawn_with(&mut engine.world, miner, name, &engine.base, &mut engine.rng);
        }
        engine.next_miner_id = next_id;

        engine.population = PopulationController {
            progress: snapshot.population_progress,
            threshold: engine.config.balance.population_threshold(engine.miner_count()),
        };
        Ok(engine)
    }

    /// Save the colony to a writer
    pub fn save<W: Write>(&self, writer: W, format: SaveFormat) -> Result<(), SaveError> {
        save_snapshot(writer, &self.snapshot(), format)
    }

    /// Load a colony from a reader
    pub fn load<R: Read>(
        reader: R,
        format: SaveFormat,
        config: ColonyConfig,
    ) -> Result<Self, SaveError> {
        let snapshot = load_snapshot(reader, format)?;
        Self::restore(snapshot, config)
    }

    /// Save to a file; `.json` paths are written as JSON.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer, SaveFormat::from_path(path))?;
        writer.flush()?;
        log::info!("Saved colony to {}", path.display());
        Ok(())
    }

    pub fn load_from_path(path: impl AsRef<Path>, config: ColonyConfig) -> Result<Self, SaveError> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let engine = Self::load(reader, SaveFormat::from_path(path), config)?;
        log::info!(
            "Loaded colony from {}: {} miners, {} crushers",
            path.display(),
            engine.miner_count(),
            engine.crushers.len()
        );
        Ok(engine)
    }

    /// Load a save, or start fresh if it is missing or unreadable.
    pub fn load_or_fresh(path: impl AsRef<Path>, config: ColonyConfig) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match Self::load_from_path(path, config.clone()) {
            Ok(engine) => Ok(engine),
            Err(e) => {
                log::warn!("Could not load {} ({}), starting a new colony", path.display(), e);
                Self::from_config(config)
            }
        }
    }
}
