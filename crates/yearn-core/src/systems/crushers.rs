//! Crusher network - the chain of converters and its upgrade economics

use serde::{Deserialize, Serialize};
use yearn_logic::{BalanceTable, Economy, ResourceTier};

use crate::components::{Crusher, CrusherId, DEFAULT_HOPPER};
use crate::error::CommandError;

/// Growable chain of crushers. The root may be seeded with any upward pair;
/// every crusher added by extension turns tier `i` into tier `i + 1`.
///
/// Crushers are kept in id order, which is also the tick order. At most one
/// crusher exists per output tier, so the chain is always a simple path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrusherNetwork {
    crushers: Vec<Crusher>,
    next_id: u32,
}

impl CrusherNetwork {
    /// A network with a single root crusher.
    pub fn with_root(input: ResourceTier, output: ResourceTier, hopper: u32) -> Self {
        Self {
            crushers: vec![Crusher::new(CrusherId(0), input, output, hopper)],
            next_id: 1,
        }
    }

    /// Rebuild from saved crushers.
    pub fn from_parts(mut crushers: Vec<Crusher>, next_id: u32) -> Self {
        crushers.sort_by_key(|c| c.id);
        let next_id = crushers
            .iter()
            .map(|c| c.id.0 + 1)
            .max()
            .unwrap_or(0)
            .max(next_id);
        Self { crushers, next_id }
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.crushers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crushers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Crusher> {
        self.crushers.iter()
    }

    pub fn get(&self, id: CrusherId) -> Option<&Crusher> {
        self.crushers.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CrusherId) -> Option<&mut Crusher> {
        self.crushers.iter_mut().find(|c| c.id == id)
    }

    fn require_mut(&mut self, id: CrusherId) -> Result<&mut Crusher, CommandError> {
        self.get_mut(id).ok_or(CommandError::UnknownCrusher(id))
    }

    /// The crusher producing `tier`, if any.
    pub fn producing(&self, tier: ResourceTier) -> Option<&Crusher> {
        self.crushers.iter().find(|c| c.output == tier)
    }

    /// Run every crusher's conversion clock in id order. Returns total output.
    pub fn tick_all(&mut self, delta_seconds: f32, economy: &mut Economy) -> u64 {
        self.crushers
            .iter_mut()
            .map(|c| c.tick(delta_seconds, economy))
            .sum()
    }

    pub fn hopper_upgrade_cost(&self, id: CrusherId, table: &BalanceTable) -> Option<u64> {
        self.get(id).map(|c| table.hopper_upgrade_cost(c.hopper))
    }

    pub fn rate_upgrade_cost(&self, id: CrusherId, table: &BalanceTable) -> Option<u64> {
        self.get(id).map(|c| table.rate_upgrade_cost(c.rate))
    }

    /// Buy a bigger hopper with the crusher's own output. Returns the new capacity.
    pub fn purchase_hopper_upgrade(
        &mut self,
        id: CrusherId,
        economy: &mut Economy,
        table: &BalanceTable,
    ) -> Result<u32, CommandError> {
        let crusher = self.require_mut(id)?;
        economy.debit(crusher.output, table.hopper_upgrade_cost(crusher.hopper))?;
        crusher.hopper += table.hopper_upgrade_step(crusher.hopper);
        Ok(crusher.hopper)
    }

    /// Buy a faster conversion rate with the crusher's own output. Returns the new rate.
    pub fn purchase_rate_upgrade(
        &mut self,
        id: CrusherId,
        economy: &mut Economy,
        table: &BalanceTable,
    ) -> Result<u32, CommandError> {
        let crusher = self.require_mut(id)?;
        economy.debit(crusher.output, table.rate_upgrade_cost(crusher.rate))?;
        crusher.rate += table.rate_upgrade_step(crusher.rate);
        Ok(crusher.rate)
    }

    /// Checks every refusal reason for extending the chain past `id`,
    /// without touching anything. Returns the new crusher's input and output.
    fn extension_target(
        &self,
        id: CrusherId,
        economy: &Economy,
        table: &BalanceTable,
    ) -> Result<(ResourceTier, ResourceTier), CommandError> {
        let crusher = self.get(id).ok_or(CommandError::UnknownCrusher(id))?;
        let input = crusher.output;
        let output = input.next().ok_or(CommandError::TerminalTier(input))?;
        if self.producing(output).is_some() {
            return Err(CommandError::TierOccupied(output));
        }
        if !economy.ledger.has(input, table.chain_extension_cost) {
            return Err(CommandError::Ledger(yearn_logic::LedgerError::Insufficient {
                tier: input,
                requested: table.chain_extension_cost,
                available: economy.balance(input),
            }));
        }
        Ok((input, output))
    }

    pub fn can_extend(&self, id: CrusherId, economy: &Economy, table: &BalanceTable) -> bool {
        self.extension_target(id, economy, table).is_ok()
    }

    /// Add the next crusher in the chain, paid from `id`'s output tier.
    pub fn extend_chain(
        &mut self,
        id: CrusherId,
        economy: &mut Economy,
        table: &BalanceTable,
    ) -> Result<CrusherId, CommandError> {
        let (input, output) = self.extension_target(id, economy, table)?;
        economy.debit(input, table.chain_extension_cost)?;

        let new_id = CrusherId(self.next_id);
        self.next_id += 1;
        self.crushers
            .push(Crusher::new(new_id, input, output, DEFAULT_HOPPER));
        log::info!("Chain extended: {} converts {} -> {}", new_id, input, output);
        Ok(new_id)
    }

    /// Move up to `amount` input units from the stockpile into the hopper.
    /// Returns how many units actually moved.
    pub fn feed(
        &mut self,
        id: CrusherId,
        amount: u32,
        economy: &mut Economy,
    ) -> Result<u32, CommandError> {
        let crusher = self.require_mut(id)?;
        let wanted = amount.min(crusher.space()) as u64;
        let moved = economy.ledger.take_up_to(crusher.input, wanted) as u32;
        crusher.receive(moved);
        Ok(moved)
    }

    /// The root (lowest id) converts upward to any tier, every extension
    /// converts adjacent tiers, no output tier repeats, and each non-root
    /// crusher consumes what another produces.
    pub fn chain_is_path(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        let well_formed = self.crushers.iter().enumerate().all(|(i, c)| {
            let converts = if i == 0 {
                c.input < c.output
            } else {
                c.input.next() == Some(c.output)
            };
            converts && seen.insert(c.output)
        });
        if !well_formed {
            return false;
        }
        let roots = self
            .crushers
            .iter()
            .filter(|c| self.producing(c.input).is_none())
            .count();
        roots <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network() -> (CrusherNetwork, Economy, BalanceTable) {
        (
            CrusherNetwork::with_root(ResourceTier::Earth, ResourceTier::Stone, DEFAULT_HOPPER),
            Economy::new(),
            BalanceTable::default(),
        )
    }

    #[test]
    fn test_extend_and_refuse_duplicate() {
        let (mut net, mut economy, table) = network();
        economy.credit(ResourceTier::Stone, 250);

        let id = net.extend_chain(CrusherId(0), &mut economy, &table).unwrap();
        assert_eq!(id, CrusherId(1));
        let c = net.get(id).unwrap();
        assert_eq!((c.input, c.output), (ResourceTier::Stone, ResourceTier::Hardstone));
        assert_eq!(c.hopper, 100);
        assert_eq!(economy.balance(ResourceTier::Stone), 150);

        let before = net.clone();
        assert_eq!(
            net.extend_chain(CrusherId(0), &mut economy, &table),
            Err(CommandError::TierOccupied(ResourceTier::Hardstone))
        );
        assert_eq!(net, before);
        assert_eq!(economy.balance(ResourceTier::Stone), 150);
        assert!(net.chain_is_path());
    }

    #[test]
    fn test_wide_root_extends_from_its_output() {
        let mut net =
            CrusherNetwork::with_root(ResourceTier::Earth, ResourceTier::Rock, DEFAULT_HOPPER);
        let mut economy = Economy::new();
        economy.credit(ResourceTier::Rock, 100);
        assert!(net.chain_is_path());

        let id = net
            .extend_chain(CrusherId(0), &mut economy, &BalanceTable::default())
            .unwrap();
        let c = net.get(id).unwrap();
        assert_eq!((c.input, c.output), (ResourceTier::Rock, ResourceTier::Marble));
        assert!(net.chain_is_path());
    }

    #[test]
    fn test_skipping_extension_is_not_a_path() {
        let root = Crusher::new(CrusherId(0), ResourceTier::Earth, ResourceTier::Stone, 100);
        let skip = Crusher::new(CrusherId(1), ResourceTier::Stone, ResourceTier::Rock, 100);
        assert!(!CrusherNetwork::from_parts(vec![root.clone(), skip], 2).chain_is_path());

        let downward = Crusher::new(CrusherId(0), ResourceTier::Rock, ResourceTier::Earth, 100);
        assert!(!CrusherNetwork::from_parts(vec![downward], 1).chain_is_path());
        assert!(CrusherNetwork::from_parts(vec![root], 1).chain_is_path());
    }

    #[test]
    fn test_extend_requires_funds() {
        let (mut net, mut economy, table) = network();
        economy.credit(ResourceTier::Stone, 99);
        assert!(!net.can_extend(CrusherId(0), &economy, &table));
        assert!(matches!(
            net.extend_chain(CrusherId(0), &mut economy, &table),
            Err(CommandError::Ledger(_))
        ));
        assert_eq!(net.len(), 1);
        assert_eq!(economy.balance(ResourceTier::Stone), 99);
    }

    #[test]
    fn test_terminal_tier_refused() {
        let mut net = CrusherNetwork::with_root(
            ResourceTier::Etherium,
            ResourceTier::Aetherstone,
            DEFAULT_HOPPER,
        );
        let mut economy = Economy::new();
        economy.credit(ResourceTier::Aetherstone, 1_000);
        assert_eq!(
            net.extend_chain(CrusherId(0), &mut economy, &BalanceTable::default()),
            Err(CommandError::TerminalTier(ResourceTier::Aetherstone))
        );
    }

    #[test]
    fn test_hopper_upgrade() {
        let (mut net, mut economy, table) = network();
        economy.credit(ResourceTier::Stone, 10);
        // floor(10 * 1.05^(100/200)) = 10
        assert_eq!(net.hopper_upgrade_cost(CrusherId(0), &table), Some(10));
        assert_eq!(
            net.purchase_hopper_upgrade(CrusherId(0), &mut economy, &table),
            Ok(121)
        );
        assert_eq!(economy.balance(ResourceTier::Stone), 0);
        assert!(net
            .purchase_hopper_upgrade(CrusherId(0), &mut economy, &table)
            .is_err());
        assert_eq!(net.get(CrusherId(0)).unwrap().hopper, 121);
    }

    #[test]
    fn test_rate_upgrade() {
        let (mut net, mut economy, table) = network();
        economy.credit(ResourceTier::Stone, 100);
        // floor(20 * 1.05^(1/1.5)) = 20
        assert_eq!(net.rate_upgrade_cost(CrusherId(0), &table), Some(20));
        assert_eq!(
            net.purchase_rate_upgrade(CrusherId(0), &mut economy, &table),
            Ok(2)
        );
        assert_eq!(economy.balance(ResourceTier::Stone), 80);
    }

    #[test]
    fn test_unknown_crusher() {
        let (mut net, mut economy, table) = network();
        assert_eq!(
            net.purchase_rate_upgrade(CrusherId(9), &mut economy, &table),
            Err(CommandError::UnknownCrusher(CrusherId(9)))
        );
    }

    #[test]
    fn test_feed_limits() {
        let (mut net, mut economy, _) = network();
        economy.credit(ResourceTier::Earth, 30);
        assert_eq!(net.feed(CrusherId(0), 50, &mut economy), Ok(30));
        assert_eq!(economy.balance(ResourceTier::Earth), 0);

        economy.credit(ResourceTier::Earth, 500);
        assert_eq!(net.feed(CrusherId(0), 500, &mut economy), Ok(70));
        assert_eq!(economy.balance(ResourceTier::Earth), 430);
        assert!(net.get(CrusherId(0)).unwrap().is_full());
    }

    #[test]
    fn test_long_chain_stays_a_path() {
        let (mut net, mut economy, table) = network();
        let mut tail = CrusherId(0);
        for tier in ResourceTier::ALL.iter().skip(1) {
            economy.credit(*tier, 100);
            match net.extend_chain(tail, &mut economy, &table) {
                Ok(id) => tail = id,
                Err(CommandError::TerminalTier(t)) => {
                    assert_eq!(t, ResourceTier::TERMINAL);
                    break;
                }
                Err(e) => panic!("unexpected refusal: {e}"),
            }
        }
        assert_eq!(net.len(), yearn_logic::TIER_COUNT - 1);
        assert!(net.chain_is_path());
    }
}
