//! Miner system - the agent state machine
//!
//! Each tick a miner is turned into a [`Perception`] of its surroundings,
//! [`transition`] picks the next state and one [`Action`], and the system
//! carries that action out. The transition itself is a pure function so
//! every row of the state table can be tested without a world.

use hecs::{Entity, World};
use rand::Rng;
use yearn_logic::{BalanceTable, Economy, ResourceTier};

use super::crushers::CrusherNetwork;
use super::projectiles::{advance_projectiles, ImpactReport};
use super::terrain::BlockField;
use crate::components::*;

/// Headings are re-rolled within this many degrees either side of straight up.
const HEADING_SPREAD: f32 = 60.0;

/// The assigned crusher, as seen by a Working miner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkSite {
    pub input: ResourceTier,
    pub station: Vec2,
    /// The stockpile holds at least one unit of the input tier
    pub input_available: bool,
    pub buffer_full: bool,
    pub at_crusher: bool,
}

/// Everything the state machine needs to know about a miner's surroundings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Perception {
    pub inventory_full: bool,
    pub inventory_empty: bool,
    /// Nearest block within mining range
    pub block_in_range: Option<BlockHandle>,
    pub at_deposit: bool,
    pub at_pile: bool,
    /// Carried units (if any) are the work site's input tier
    pub cargo_matches: bool,
    /// `None` when not Working or when the assigned crusher is gone
    pub work: Option<WorkSite>,
}

/// Side effect chosen by the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Roam along the heading, avoiding blocks
    Wander,
    Hold,
    /// Fire at a block when the pickaxe is ready
    Strike(BlockHandle),
    SeekDeposit,
    /// Credit the carried load to the stockpile
    Deposit,
    SeekPile,
    /// Shovel input units out of the stockpile
    Collect,
    SeekCrusher,
    /// Tip the load into the crusher hopper
    Unload,
    /// Leave the crusher, returning any load to the stockpile
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub next: MinerState,
    pub action: Action,
}

impl Step {
    fn new(next: MinerState, action: Action) -> Self {
        Self { next, action }
    }
}

/// The miner state table.
pub fn transition(state: MinerState, p: &Perception) -> Step {
    use MinerState::*;

    match state {
        Working { crusher } => working_step(crusher, p),
        _ if p.inventory_full && state != Returning => Step::new(Returning, Action::SeekDeposit),
        MovingUp => match p.block_in_range {
            Some(_) => Step::new(Mining, Action::Hold),
            None => Step::new(MovingUp, Action::Wander),
        },
        Mining => match p.block_in_range {
            Some(block) => Step::new(Mining, Action::Strike(block)),
            None => Step::new(MovingUp, Action::Wander),
        },
        Returning if p.at_deposit => Step::new(MovingUp, Action::Deposit),
        Returning => Step::new(Returning, Action::SeekDeposit),
        Idle => Step::new(Idle, Action::Hold),
    }
}

fn working_step(crusher: CrusherId, p: &Perception) -> Step {
    let working = MinerState::Working { crusher };
    let Some(site) = p.work else {
        return Step::new(MinerState::MovingUp, Action::Release);
    };

    if !p.cargo_matches {
        let action = if p.at_pile {
            Action::Deposit
        } else {
            Action::SeekPile
        };
        return Step::new(working, action);
    }
    if p.inventory_empty && (!site.input_available || site.buffer_full) {
        return Step::new(MinerState::MovingUp, Action::Release);
    }
    if p.inventory_full || !site.input_available {
        let action = if site.at_crusher {
            Action::Unload
        } else {
            Action::SeekCrusher
        };
        return Step::new(working, action);
    }
    let action = if p.at_pile {
        Action::Collect
    } else {
        Action::SeekPile
    };
    Step::new(working, action)
}

/// Shared colony state the miners act on.
pub struct MineSite<'a> {
    pub field: &'a mut BlockField,
    pub crushers: &'a mut CrusherNetwork,
    pub economy: &'a mut Economy,
    pub base: &'a Base,
    pub balance: &'a BalanceTable,
}

/// Totals over every miner for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinerTickReport {
    pub impacts: u32,
    pub destroyed: u32,
    pub level_ups: u32,
    pub collected: u64,
    pub deposited: u64,
    pub spilled: u64,
}

impl MinerTickReport {
    fn absorb(&mut self, impacts: ImpactReport) {
        self.impacts += impacts.impacts;
        self.destroyed += impacts.destroyed;
        self.level_ups += impacts.level_ups;
        self.collected += impacts.collected;
        self.spilled += impacts.spilled;
    }
}

/// Miner entities in ascending id order.
pub fn miners_by_id(world: &World) -> Vec<(MinerId, Entity)> {
    let mut order: Vec<_> = world
        .query::<&Miner>()
        .iter()
        .map(|(entity, miner)| (miner.id, entity))
        .collect();
    order.sort_by_key(|(id, _)| *id);
    order
}

/// Step every miner in ascending id order: state machine first, then that
/// miner's projectiles.
pub fn miner_system(
    world: &mut World,
    site: &mut MineSite<'_>,
    rng: &mut impl Rng,
    delta_seconds: f32,
) -> MinerTickReport {
    let mut report = MinerTickReport::default();

    for (_, entity) in miners_by_id(world) {
        let Ok((miner, position, projectiles)) =
            world.query_one_mut::<(&mut Miner, &mut Position, &mut Projectiles)>(entity)
        else {
            continue;
        };

        let perception = perceive(miner, position.point, site);
        let step = transition(miner.state, &perception);
        miner.state = step.next;
        report.deposited += execute(
            step.action,
            miner,
            &mut position.point,
            projectiles,
            &perception,
            site,
            rng,
            delta_seconds,
        );

        if miner.state.is_free_roaming() {
            let impacts =
                advance_projectiles(miner, projectiles, site.field, site.balance, delta_seconds);
            report.absorb(impacts);
        } else {
            projectiles.clear();
        }
    }

    report
}

/// Build the perception for one miner.
pub fn perceive(miner: &Miner, point: Vec2, site: &MineSite<'_>) -> Perception {
    let block_in_range = if miner.state.is_free_roaming() {
        site.field.nearest_in_range(point, miner.mining_range)
    } else {
        None
    };

    let work = match miner.state {
        MinerState::Working { crusher } => site.crushers.get(crusher).map(|c| {
            let station = c.station(site.base);
            WorkSite {
                input: c.input,
                station,
                input_available: site.economy.balance(c.input) > 0,
                buffer_full: c.is_full(),
                at_crusher: point.distance(&station) <= ARRIVE_DISTANCE,
            }
        }),
        _ => None,
    };

    let inventory_empty = miner.inventory == 0;
    Perception {
        inventory_full: miner.is_full(),
        inventory_empty,
        block_in_range,
        at_deposit: site.base.reached_deposit(point, miner.radius),
        at_pile: point.distance(&site.base.pile_point()) <= ARRIVE_DISTANCE,
        cargo_matches: inventory_empty || work.map_or(true, |w| w.input == miner.cargo),
        work,
    }
}

/// Carry out one action. Returns units credited to the stockpile by a deposit.
#[allow(clippy::too_many_arguments)]
fn execute(
    action: Action,
    miner: &mut Miner,
    point: &mut Vec2,
    projectiles: &mut Projectiles,
    perception: &Perception,
    site: &mut MineSite<'_>,
    rng: &mut impl Rng,
    dt: f32,
) -> u64 {
    match action {
        Action::Wander => {
            wander(miner, point, site.field, rng, dt);
            0
        }
        Action::Hold => 0,
        Action::Strike(target) => {
            miner.attack_timer += dt;
            if miner.attack_timer >= miner.pickaxe.attack_interval {
                miner.attack_timer = 0.0;
                projectiles.launch(aim(miner, *point, target));
            }
            0
        }
        Action::SeekDeposit => {
            *point = step_toward(*point, site.base.deposit_point(), miner.speed, dt).0;
            0
        }
        Action::SeekPile => {
            miner.collect_timer = 0.0;
            *point = step_toward(*point, site.base.pile_point(), miner.speed, dt).0;
            0
        }
        Action::SeekCrusher => {
            if let Some(work) = perception.work {
                *point = step_toward(*point, work.station, miner.speed, dt).0;
            }
            0
        }
        Action::Deposit | Action::Release => {
            let (tier, amount) = miner.unload();
            site.economy.credit(tier, amount as u64);
            amount as u64
        }
        Action::Collect => {
            if let Some(work) = perception.work {
                collect(miner, work.input, site.economy, dt);
            }
            0
        }
        Action::Unload => {
            let (tier, amount) = miner.unload();
            let accepted = match miner.state {
                MinerState::Working { crusher } => site
                    .crushers
                    .get_mut(crusher)
                    .map_or(0, |c| c.receive(amount)),
                _ => 0,
            };
            // Whatever the hopper can't take goes back on the pile
            site.economy.credit(tier, (amount - accepted) as u64);
            0
        }
    }
}

fn aim(miner: &Miner, from: Vec2, target: BlockHandle) -> Projectile {
    Projectile {
        position: from,
        target,
        speed: miner.pickaxe.projectile_speed,
    }
}

fn wander(miner: &mut Miner, point: &mut Vec2, field: &BlockField, rng: &mut impl Rng, dt: f32) {
    miner.heading_timer += dt;
    if miner.heading_timer >= HEADING_PERIOD {
        miner.heading_timer = 0.0;
        let degrees = -90.0 + rng.gen_range(-HEADING_SPREAD..HEADING_SPREAD);
        miner.heading = Vec2::from_degrees(degrees);
    }

    let candidate = *point + miner.heading * (miner.speed * dt);
    if !field.overlaps_circle(candidate, miner.radius) {
        *point = candidate;
    }
    point.x = point.x.clamp(miner.radius, field.width() - miner.radius);
}

fn collect(miner: &mut Miner, input: ResourceTier, economy: &mut Economy, dt: f32) {
    miner.collect_timer += dt;
    let interval = miner.collect_interval();
    while miner.collect_timer >= interval && !miner.is_full() {
        miner.collect_timer -= interval;
        if economy.debit(input, 1).is_err() {
            miner.collect_timer = 0.0;
            return;
        }
        if miner.stow(input, 1) == 0 {
            economy.credit(input, 1);
            miner.collect_timer = 0.0;
            return;
        }
    }
    if miner.is_full() {
        miner.collect_timer = 0.0;
    }
}
