use std::collections::HashMap;

use anyhow::Result;
use substreams::log;

use crate::{
    chain::ChainReader,
    consts::{DEPOSITOR_REWARD_MINT_MULTIPLIER, FUNDER_REWARD_MULTIPLIER},
    entities::Pool,
    events::SetParamUint,
    math::normalize_multiplier,
    projector::Projector,
    store::EntityStore,
    utils::{keccak256, to_hex_id},
};

/// Minter parameters the projection keeps track of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewardParam {
    DepositorRewardMintMultiplier,
    FunderRewardMultiplier,
}

impl RewardParam {
    pub const ALL: [RewardParam; 2] =
        [RewardParam::DepositorRewardMintMultiplier, RewardParam::FunderRewardMultiplier];

    pub fn name(&self) -> &'static str {
        match self {
            RewardParam::DepositorRewardMintMultiplier => DEPOSITOR_REWARD_MINT_MULTIPLIER,
            RewardParam::FunderRewardMultiplier => FUNDER_REWARD_MULTIPLIER,
        }
    }
}

/// Maps the keccak256 of each parameter name, as found in the indexed `paramName` topic, to
/// the parameter.
pub fn reward_param_digests() -> HashMap<[u8; 32], RewardParam> {
    RewardParam::ALL
        .into_iter()
        .map(|param| (keccak256(param.name().as_bytes()), param))
        .collect()
}

impl<S: EntityStore, R: ChainReader> Projector<S, R> {
    /// `ESetParamUint`: updates a pool's reward multiplier. Pools that are not indexed yet
    /// are left alone; the update is dropped.
    pub fn handle_set_param_uint(&mut self, event: &SetParamUint) -> Result<()> {
        let pool_id = to_hex_id(&event.pool);
        let Some(mut pool) = self.store.load::<Pool>(&pool_id) else {
            log::debug!("Ignoring parameter update for unindexed pool {}", pool_id);
            return Ok(());
        };
        let Some(param) = self
            .reward_params
            .get(&event.param_name)
            .copied()
        else {
            log::debug!(
                "Ignoring unknown parameter 0x{} for pool {}",
                hex::encode(event.param_name),
                pool_id
            );
            return Ok(());
        };

        let stablecoin_decimals = self.stablecoin_decimals(&pool)?;
        let value = normalize_multiplier(&event.new_value, stablecoin_decimals)?;
        match param {
            RewardParam::DepositorRewardMintMultiplier => {
                pool.mph_depositor_reward_mint_multiplier = value
            }
            RewardParam::FunderRewardMultiplier => pool.mph_funder_reward_multiplier = value,
        }
        self.store.save(&pool);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use hex_literal::hex;
    use std::str::FromStr;
    use substreams::scalar::BigDecimal;

    fn set_param(pool: &[u8], param_name: [u8; 32], new_value: &str) -> SetParamUint {
        SetParamUint { pool: pool.to_vec(), param_name, new_value: big(new_value) }
    }

    #[test]
    fn digests_match_parameter_topics() {
        let digests = reward_param_digests();
        assert_eq!(
            digests[&hex!("d2b8bc446c628fe0e462893c1770945fd18b7b32734f6cde9ea1781c8c7ca4c2")],
            RewardParam::DepositorRewardMintMultiplier
        );
        assert_eq!(
            digests[&hex!("b639f6af18390d77667ca71c7939b29cc824df36da1568e193bfb7dd69a2435f")],
            RewardParam::FunderRewardMultiplier
        );
        assert_eq!(digests.len(), 2);
    }

    #[test]
    fn updates_depositor_mint_multiplier() {
        let mut projector = projector(MockChain::default().with_pool(&POOL, 6));
        projector.pool(&POOL).unwrap();

        let digest = keccak256(DEPOSITOR_REWARD_MINT_MULTIPLIER.as_bytes());
        projector
            .handle_set_param_uint(&set_param(&POOL, digest, "7000000000000000000"))
            .unwrap();

        let pool = projector.store().load::<Pool>(&to_hex_id(&POOL)).unwrap();
        // 7 * 10^18 normalized with 36 - 6 = 30 decimals.
        assert_eq!(
            pool.mph_depositor_reward_mint_multiplier,
            BigDecimal::from_str("0.000000000007").unwrap()
        );
        assert_eq!(
            pool.mph_funder_reward_multiplier,
            BigDecimal::from_str("0.000000000002").unwrap()
        );
    }

    #[test]
    fn updates_funder_multiplier_with_live_decimals() {
        let mut projector = projector(MockChain::default().with_pool(&POOL, 6));
        projector.pool(&POOL).unwrap();
        let calls_after_discovery = projector.chain().decimals_calls();

        let digest = keccak256(FUNDER_REWARD_MULTIPLIER.as_bytes());
        projector
            .handle_set_param_uint(&set_param(&POOL, digest, "3000000000000000000"))
            .unwrap();

        let pool = projector.store().load::<Pool>(&to_hex_id(&POOL)).unwrap();
        assert_eq!(pool.mph_funder_reward_multiplier, BigDecimal::from_str("0.000000000003").unwrap());
        assert_eq!(projector.chain().decimals_calls(), calls_after_discovery + 1);
    }

    #[test]
    fn unindexed_pool_is_left_alone() {
        let mut projector = projector(MockChain::default().with_pool(&POOL, 6));
        let digest = keccak256(DEPOSITOR_REWARD_MINT_MULTIPLIER.as_bytes());

        projector
            .handle_set_param_uint(&set_param(&POOL, digest, "1"))
            .unwrap();

        assert!(projector.store().is_empty());
        assert_eq!(projector.chain().pool_config_calls(), 0);
    }

    #[test]
    fn unknown_parameter_changes_nothing() {
        let mut projector = projector(MockChain::default().with_pool(&POOL, 6));
        let before = projector.pool(&POOL).unwrap();
        projector.store_mut().take_entity_changes();

        let digest = keccak256(b"poolDepositorRewardVestPeriod");
        projector
            .handle_set_param_uint(&set_param(&POOL, digest, "1"))
            .unwrap();

        assert_eq!(projector.store().load::<Pool>(&before.id), Some(before));
        assert!(projector
            .store_mut()
            .take_entity_changes()
            .entity_changes
            .is_empty());
    }
}
