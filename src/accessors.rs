//! Get-or-create accessors for the aggregate entities.
//!
//! Each accessor loads by id and, only when the entity is missing, builds it with zeroed
//! counters, saves it and records the creation. Counters that track how many entities exist
//! are only ever bumped through [`Projector::record_creation`], so calling an accessor any
//! number of times for the same id counts the entity once.
use anyhow::Result;
use substreams::log;

use crate::{
    chain::ChainReader,
    consts::{DEFAULT_DECIMALS, DEPOSIT_NFT_TYPE, FUNDING_NFT_TYPE, MPH_ID, POOL_LIST_ID, ZERO_ADDRESS},
    entities::{Funder, Mph, MphHolder, Pool, PoolList, User},
    math::{normalize, normalize_multiplier},
    projector::Projector,
    store::{EntityStore, NftWatcher},
    utils::{parse_address, to_hex_id},
};

/// An entity creation that other aggregates count.
#[derive(Debug)]
pub enum Creation<'a> {
    Pool { id: &'a str },
    User { pool: &'a mut Pool },
    Funder { pool: &'a mut Pool },
}

impl<S: EntityStore, R: ChainReader> Projector<S, R> {
    pub fn pool_list(&mut self) -> PoolList {
        if let Some(pool_list) = self.store.load::<PoolList>(POOL_LIST_ID) {
            return pool_list;
        }
        let pool_list = PoolList::new();
        self.store.save(&pool_list);
        pool_list
    }

    /// Loads the pool at `address`, discovering it on first sight: its static configuration
    /// is read from chain, its deposit and funding NFTs get watchers and it is added to the
    /// pool list.
    pub fn pool(&mut self, address: &[u8]) -> Result<Pool> {
        let id = to_hex_id(address);
        if let Some(pool) = self.store.load::<Pool>(&id) {
            return Ok(pool);
        }

        let config = self.chain.pool_config(address)?;
        let stablecoin_decimals = self.chain.token_decimals(&config.stablecoin)?;
        let oracle_rate = self
            .chain
            .oracle_interest_rate(&config.interest_oracle)?;
        let multipliers = self
            .chain
            .issuance_multipliers(&self.issuance_model, address)?;

        let mut pool = Pool::new(&id);
        pool.money_market = to_hex_id(&config.money_market);
        pool.stablecoin = to_hex_id(&config.stablecoin);
        pool.interest_model = to_hex_id(&config.interest_model);
        pool.one_year_interest_rate = normalize(&config.one_year_interest_amount, DEFAULT_DECIMALS)?;
        pool.oracle_interest_rate = normalize(&oracle_rate, DEFAULT_DECIMALS)?;
        pool.min_deposit_period = config.min_deposit_period;
        pool.max_deposit_period = config.max_deposit_period;
        pool.min_deposit_amount = normalize(&config.min_deposit_amount, stablecoin_decimals)?;
        pool.max_deposit_amount = normalize(&config.max_deposit_amount, stablecoin_decimals)?;
        pool.mph_depositor_reward_mint_multiplier =
            normalize_multiplier(&multipliers.depositor_reward_mint_multiplier, stablecoin_decimals)?;
        pool.mph_depositor_reward_take_back_multiplier =
            normalize(&multipliers.depositor_reward_take_back_multiplier, DEFAULT_DECIMALS)?;
        pool.mph_funder_reward_multiplier =
            normalize_multiplier(&multipliers.funder_reward_multiplier, stablecoin_decimals)?;
        self.store.save(&pool);

        for (nft, nft_type) in
            [(&config.deposit_nft, DEPOSIT_NFT_TYPE), (&config.funding_nft, FUNDING_NFT_TYPE)]
        {
            self.store.create_watcher(NftWatcher {
                address: to_hex_id(nft),
                pool: id.clone(),
                nft_type: nft_type.to_string(),
            });
        }

        self.record_creation(Creation::Pool { id: &id });
        log::info!("Discovered pool {} with stablecoin {}", id, pool.stablecoin);

        Ok(pool)
    }

    /// Loads the user at `address`. A new user starts out in `pool`, whose user count is
    /// bumped and saved.
    pub fn user(&mut self, address: &[u8], pool: &mut Pool) -> User {
        let id = to_hex_id(address);
        if let Some(user) = self.store.load::<User>(&id) {
            return user;
        }

        let user = User::new(&id, &pool.id);
        self.store.save(&user);
        self.record_creation(Creation::User { pool });
        log::info!("New user {}", id);
        user
    }

    /// Loads the funder at `address`. A new funder starts out in `pool`, whose funder count
    /// is bumped and saved.
    pub fn funder(&mut self, address: &[u8], pool: &mut Pool) -> Funder {
        let id = to_hex_id(address);
        if let Some(funder) = self.store.load::<Funder>(&id) {
            return funder;
        }

        let funder = Funder::new(&id, &pool.id);
        self.store.save(&funder);
        self.record_creation(Creation::Funder { pool });
        log::info!("New funder {}", id);
        funder
    }

    pub fn mph(&mut self) -> Mph {
        if let Some(mph) = self.store.load::<Mph>(MPH_ID) {
            return mph;
        }
        let mph = Mph::new();
        self.store.save(&mph);
        mph
    }

    /// Loads the MPH holder at `address`. The zero address is never a holder.
    pub fn mph_holder(&mut self, address: &[u8]) -> Option<MphHolder> {
        if address == ZERO_ADDRESS {
            return None;
        }
        let id = to_hex_id(address);
        if let Some(holder) = self.store.load::<MphHolder>(&id) {
            return Some(holder);
        }
        let holder = MphHolder::new(&id);
        self.store.save(&holder);
        log::info!("New MPH holder {}", id);
        Some(holder)
    }

    /// Decimals of the pool's stablecoin, read from the token at call time.
    pub fn stablecoin_decimals(&self, pool: &Pool) -> Result<u32> {
        let stablecoin = parse_address(&pool.stablecoin)?;
        self.chain.token_decimals(&stablecoin)
    }

    /// Applies the counter updates caused by a creation. This is the only place the pool
    /// list and per-pool membership counters change.
    pub fn record_creation(&mut self, creation: Creation<'_>) {
        let mut pool_list = self.pool_list();
        match creation {
            Creation::Pool { id } => {
                pool_list.pools.push(id.to_string());
                pool_list.num_pools = pool_list.pools.len() as u64;
            }
            Creation::User { pool } => {
                pool_list.num_users += 1;
                pool.num_users += 1;
                self.store.save(&*pool);
            }
            Creation::Funder { pool } => {
                pool_list.num_funders += 1;
                pool.num_funders += 1;
                self.store.save(&*pool);
            }
        }
        self.store.save(&pool_list);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use std::str::FromStr;
    use substreams::scalar::BigDecimal;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn pool_is_discovered_with_static_configuration() {
        let mut projector = projector(MockChain::default().with_pool(&POOL, 6));
        let pool = projector.pool(&POOL).unwrap();

        assert_eq!(pool.id, to_hex_id(&POOL));
        assert_eq!(pool.address, pool.id);
        assert_eq!(pool.stablecoin, to_hex_id(&STABLECOIN));
        assert_eq!(pool.money_market, to_hex_id(&[0x07; 20]));
        assert_eq!(pool.interest_model, to_hex_id(&[0x08; 20]));
        assert_eq!(pool.num_users, 0);
        assert_eq!(pool.one_year_interest_rate, dec("0.05"));
        assert_eq!(pool.oracle_interest_rate, dec("0.000000001"));
        assert_eq!(pool.min_deposit_period, big("60"));
        assert_eq!(pool.min_deposit_amount, dec("1"));
        assert_eq!(pool.max_deposit_amount, dec("1000000"));
        assert_eq!(pool.mph_depositor_reward_mint_multiplier, dec("0.000000000005"));
        assert_eq!(pool.mph_depositor_reward_take_back_multiplier, dec("1"));
        assert_eq!(pool.mph_funder_reward_multiplier, dec("0.000000000002"));

        assert_eq!(projector.store().load::<Pool>(&pool.id), Some(pool));
    }

    #[test]
    fn pool_discovery_is_idempotent() {
        let mut projector = projector(MockChain::default().with_pool(&POOL, 6));
        let first = projector.pool(&POOL).unwrap();
        let second = projector.pool(&POOL).unwrap();

        assert_eq!(first, second);
        assert_eq!(projector.chain().pool_config_calls(), 1);

        let pool_list = projector.store().load::<PoolList>(POOL_LIST_ID).unwrap();
        assert_eq!(pool_list.pools, vec![to_hex_id(&POOL)]);
        assert_eq!(pool_list.num_pools, 1);
    }

    #[test]
    fn pool_discovery_registers_both_nft_watchers_once() {
        let mut projector = projector(MockChain::default().with_pool(&POOL, 6));
        projector.pool(&POOL).unwrap();
        projector.pool(&POOL).unwrap();

        let watchers = projector.store().watchers();
        assert_eq!(watchers.len(), 2);
        assert_eq!(
            watchers[0],
            NftWatcher {
                address: to_hex_id(&DEPOSIT_NFT),
                pool: to_hex_id(&POOL),
                nft_type: "deposit".to_string(),
            }
        );
        assert_eq!(watchers[1].address, to_hex_id(&FUNDING_NFT));
        assert_eq!(watchers[1].nft_type, "funding");
    }

    #[test]
    fn pool_list_counts_match_its_pools() {
        let mut projector =
            projector(MockChain::default().with_pool(&POOL, 18).with_pool(&OTHER_POOL, 18));
        projector.pool(&POOL).unwrap();
        projector.pool(&OTHER_POOL).unwrap();
        projector.pool(&POOL).unwrap();

        let pool_list = projector.pool_list();
        assert_eq!(pool_list.num_pools, 2);
        assert_eq!(pool_list.num_pools as usize, pool_list.pools.len());
    }

    #[test]
    fn failed_discovery_leaves_no_trace() {
        let mut projector = projector(MockChain::default());
        assert!(projector.pool(&POOL).is_err());
        assert!(projector.store().is_empty());
        assert!(projector.store().watchers().is_empty());
    }

    #[test]
    fn user_is_counted_once() {
        let mut projector = projector(MockChain::default().with_pool(&POOL, 6));
        let mut pool = projector.pool(&POOL).unwrap();

        let first = projector.user(&ALICE, &mut pool);
        let second = projector.user(&ALICE, &mut pool);

        assert_eq!(first, second);
        assert_eq!(first.pools, vec![to_hex_id(&POOL)]);
        assert_eq!(first.num_pools, 0);
        assert_eq!(pool.num_users, 1);
        assert_eq!(projector.store().load::<Pool>(&pool.id).unwrap().num_users, 1);
        assert_eq!(projector.pool_list().num_users, 1);
    }

    #[test]
    fn funder_is_counted_once() {
        let mut projector = projector(MockChain::default().with_pool(&POOL, 6));
        let mut pool = projector.pool(&POOL).unwrap();

        let funder = projector.funder(&ALICE, &mut pool);
        projector.funder(&ALICE, &mut pool);
        projector.funder(&BOB, &mut pool);

        assert_eq!(funder.pools, vec![to_hex_id(&POOL)]);
        assert_eq!(funder.num_pools, 0);

        assert_eq!(pool.num_funders, 2);
        assert_eq!(projector.store().load::<Pool>(&pool.id).unwrap().num_funders, 2);
        assert_eq!(projector.pool_list().num_funders, 2);
        assert_eq!(projector.pool_list().num_users, 0);
    }

    #[test]
    fn mph_singleton_is_created_once() {
        let mut projector = projector(MockChain::default());
        let mut mph = projector.mph();
        mph.total_supply = dec("10");
        projector.store_mut().save(&mph);

        assert_eq!(projector.mph().total_supply, dec("10"));
    }

    #[test]
    fn zero_address_is_never_a_holder() {
        let mut projector = projector(MockChain::default());
        assert_eq!(projector.mph_holder(&ZERO), None);
        assert!(projector.store().is_empty());

        let holder = projector.mph_holder(&ALICE).unwrap();
        assert_eq!(holder.address, to_hex_id(&ALICE));
        assert_eq!(holder.mph_balance, BigDecimal::zero());
    }
}
