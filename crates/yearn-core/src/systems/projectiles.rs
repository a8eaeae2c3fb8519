//! Projectile system - moves each miner's shots and resolves impacts

use yearn_logic::{BalanceTable, ResourceTier};

use super::terrain::{BlockField, DamageOutcome};
use crate::components::{step_toward, Miner, Projectiles};

/// What a miner's projectiles did this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImpactReport {
    pub impacts: u32,
    pub destroyed: u32,
    /// Units stowed from destroyed blocks
    pub collected: u64,
    /// Units that didn't fit in the inventory
    pub spilled: u64,
    pub level_ups: u32,
}

/// Move every projectile toward its target's current center.
///
/// A projectile that arrives deals the miner's current power and is removed
/// whether or not the block survives. One whose target is already gone is
/// dropped silently. Each impact on a live block earns the miner one
/// experience point; the destroying blow also stows the block's yield
/// (clamped to capacity).
pub fn advance_projectiles(
    miner: &mut Miner,
    projectiles: &mut Projectiles,
    field: &mut BlockField,
    table: &BalanceTable,
    delta_seconds: f32,
) -> ImpactReport {
    let mut report = ImpactReport::default();

    projectiles.in_flight.retain_mut(|shot| {
        let Some(center) = field.center_of(shot.target) else {
            return false;
        };
        let (next, arrived) = step_toward(shot.position, center, shot.speed, delta_seconds);
        shot.position = next;
        if !arrived {
            return true;
        }

        // Power is read on arrival so a level-up mid-flight counts
        match field.apply_damage(shot.target, miner.power()) {
            DamageOutcome::Missing => {}
            DamageOutcome::Damaged { .. } => {
                report.impacts += 1;
                if miner.gain_experience(table) {
                    report.level_ups += 1;
                }
            }
            DamageOutcome::Destroyed { yield_amount } => {
                report.impacts += 1;
                report.destroyed += 1;
                let kept = miner.stow(ResourceTier::BASE, yield_amount);
                report.collected += kept as u64;
                report.spilled += yield_amount - kept as u64;
                if miner.gain_experience(table) {
                    report.level_ups += 1;
                }
            }
        }
        false
    });

    if report.level_ups > 0 {
        log::debug!(
            "{} reached power {} (next level at {} xp)",
            miner.id,
            miner.base_power,
            miner.level_threshold
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{MinerId, MinerState, Projectile, Vec2};
    use crate::config::ColonyConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use yearn_logic::Economy;

    fn setup() -> (BlockField, Miner, BalanceTable) {
        let config = ColonyConfig::default();
        let mut field = BlockField::new(&config);
        let mut rng = StdRng::seed_from_u64(11);
        field.lay_initial_field(&Economy::new(), &config.balance, &mut rng);
        let miner = Miner::new(MinerId(1), MinerState::Mining, &config.balance);
        (field, miner, config.balance)
    }

    #[test]
    fn test_projectile_travels_then_hits() {
        let (mut field, mut miner, table) = setup();
        let (target, block) = field.iter().next().unwrap();
        let center = block.center();

        let mut shots = Projectiles::default();
        shots.launch(Projectile {
            position: center + Vec2::new(0.0, 100.0),
            target,
            speed: 250.0,
        });

        // 0.2s covers 50 of the 100 units
        let report = advance_projectiles(&mut miner, &mut shots, &mut field, &table, 0.2);
        assert_eq!(report.impacts, 0);
        assert_eq!(shots.len(), 1);

        let report = advance_projectiles(&mut miner, &mut shots, &mut field, &table, 0.2);
        assert_eq!(report.impacts, 1);
        assert!(shots.is_empty());
        assert_eq!(miner.experience, 1);
        assert_eq!(
            field.get(target).unwrap().durability,
            block.durability - miner.power() as i64
        );
    }

    #[test]
    fn test_killing_blow_stows_yield() {
        let (mut field, mut miner, table) = setup();
        miner.base_power = 1_000;
        let (target, block) = field.iter().next().unwrap();

        let mut shots = Projectiles::default();
        for _ in 0..2 {
            shots.launch(Projectile {
                position: block.center(),
                target,
                speed: 250.0,
            });
        }
        let report = advance_projectiles(&mut miner, &mut shots, &mut field, &table, 0.016);
        // Second shot sees the block gone and is dropped without effect
        assert_eq!(report.destroyed, 1);
        assert_eq!(report.impacts, 1);
        assert_eq!(miner.inventory, 1);
        assert_eq!(miner.cargo, ResourceTier::Earth);
        assert!(shots.is_empty());
    }

    #[test]
    fn test_yield_clamped_to_capacity() {
        let (mut field, mut miner, table) = setup();
        miner.base_power = 1_000;
        let (target, block) = field.iter().next().unwrap();
        miner.inventory = miner.capacity();

        let mut shots = Projectiles::default();
        shots.launch(Projectile {
            position: block.center(),
            target,
            speed: 250.0,
        });
        let report = advance_projectiles(&mut miner, &mut shots, &mut field, &table, 0.016);
        assert_eq!(report.destroyed, 1);
        assert_eq!(report.spilled, block.yield_amount);
        assert_eq!(miner.inventory, miner.capacity());
    }

    #[test]
    fn test_power_gained_mid_flight_applies_on_impact() {
        let (mut field, mut miner, table) = setup();
        let (target, block) = field.iter().next().unwrap();

        let mut shots = Projectiles::default();
        shots.launch(Projectile {
            position: block.center() + Vec2::new(0.0, 100.0),
            target,
            speed: 250.0,
        });
        advance_projectiles(&mut miner, &mut shots, &mut field, &table, 0.2);
        assert_eq!(shots.len(), 1);

        // Stronger by the time the shot lands
        miner.base_power = block.durability as u32;
        let report = advance_projectiles(&mut miner, &mut shots, &mut field, &table, 0.2);
        assert_eq!(report.destroyed, 1);
        assert!(!field.contains(target));
    }
}
