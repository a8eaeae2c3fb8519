//! Miner spawning

use hecs::{Entity, World};
use rand::Rng;
use yearn_logic::BalanceTable;

use super::names::generate_name;
use crate::components::*;

/// Miners appear in a band this tall just above the base.
const SPAWN_BAND: f32 = 100.0;

/// Random point in the spawn band: middle 60% of the width, just above the base.
pub fn spawn_point(base: &Base, rng: &mut impl Rng) -> Vec2 {
    let x = rng.gen_range(base.width * 0.2..base.width * 0.8);
    let top = base.top();
    let y = rng.gen_range(top - SPAWN_BAND..top);
    Vec2::new(x, y)
}

/// Spawn a fresh miner entity with a random name at a random spawn point.
pub fn spawn_miner(
    world: &mut World,
    id: MinerId,
    state: MinerState,
    base: &Base,
    table: &BalanceTable,
    rng: &mut impl Rng,
) -> Entity {
    let miner = Miner::new(id, state, table);
    spawn_with(world, miner, generate_name(rng), base, rng)
}

/// Spawn an existing miner record (e.g. from a save) at a random spawn point.
pub fn spawn_with(
    world: &mut World,
    mut miner: Miner,
    name: Name,
    base: &Base,
    rng: &mut impl Rng,
) -> Entity {
    let point = spawn_point(base, rng);
    miner.heading = Vec2::from_degrees(-90.0);
    world.spawn((
        miner,
        name,
        Position { point },
        Projectiles::default(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_point_above_base() {
        let base = Base::for_field(600.0, 800.0);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let p = spawn_point(&base, &mut rng);
            assert!(p.x >= 120.0 && p.x < 480.0);
            assert!(p.y >= 490.0 && p.y < 590.0);
        }
    }

    #[test]
    fn test_spawn_miner_components() {
        let base = Base::for_field(600.0, 800.0);
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(3);
        let e = spawn_miner(
            &mut world,
            MinerId(4),
            MinerState::Idle,
            &base,
            &BalanceTable::default(),
            &mut rng,
        );
        let miner = world.get::<&Miner>(e).unwrap();
        assert_eq!(miner.id, MinerId(4));
        assert_eq!(miner.state, MinerState::Idle);
        assert!(world.get::<&Name>(e).is_ok());
        assert!(world.get::<&Projectiles>(e).unwrap().is_empty());
    }
}
