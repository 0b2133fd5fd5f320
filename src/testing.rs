// Mocks and fixtures shared by the unit tests.
use std::{cell::Cell, collections::HashMap, str::FromStr};

use anyhow::{anyhow, Result};
use substreams::scalar::BigInt;

use crate::{
    chain::{ChainReader, IssuanceMultipliers, PoolConfig, VestState},
    consts::{MPH_ISSUANCE_MODEL_ADDRESS, ZERO_ADDRESS},
    events::LogMeta,
    params::Params,
    projector::Projector,
    store::MemoryStore,
};

pub const ZERO: [u8; 20] = ZERO_ADDRESS;
pub const POOL: [u8; 20] = [0x01; 20];
pub const OTHER_POOL: [u8; 20] = [0x0f; 20];
pub const STABLECOIN: [u8; 20] = [0x02; 20];
pub const ORACLE: [u8; 20] = [0x03; 20];
pub const DEPOSIT_NFT: [u8; 20] = [0x04; 20];
pub const FUNDING_NFT: [u8; 20] = [0x05; 20];
pub const VESTING: [u8; 20] = [0x06; 20];
pub const ALICE: [u8; 20] = [0xa1; 20];
pub const BOB: [u8; 20] = [0xb0; 20];

pub fn big(value: &str) -> BigInt {
    BigInt::from_str(value).unwrap()
}

/// Log emitted by the vesting contract at `log_index`, one block per log.
pub fn log_meta(log_index: u64) -> LogMeta {
    LogMeta {
        address: VESTING.to_vec(),
        tx_hash: vec![0xee; 32],
        log_index,
        block_timestamp: 1_610_000_000 + log_index * 13,
    }
}

/// Configuration every mocked pool reports, with `stablecoin` as its token.
pub fn pool_config(stablecoin: &[u8]) -> PoolConfig {
    PoolConfig {
        money_market: vec![0x07; 20],
        stablecoin: stablecoin.to_vec(),
        interest_model: vec![0x08; 20],
        interest_oracle: ORACLE.to_vec(),
        deposit_nft: DEPOSIT_NFT.to_vec(),
        funding_nft: FUNDING_NFT.to_vec(),
        min_deposit_period: BigInt::from(60),
        max_deposit_period: BigInt::from(31_556_952),
        min_deposit_amount: big("1000000"),
        max_deposit_amount: big("1000000000000"),
        one_year_interest_amount: big("50000000000000000"),
    }
}

pub fn multipliers() -> IssuanceMultipliers {
    IssuanceMultipliers {
        depositor_reward_mint_multiplier: big("5000000000000000000"),
        depositor_reward_take_back_multiplier: big("1000000000000000000"),
        funder_reward_multiplier: big("2000000000000000000"),
    }
}

/// [`ChainReader`] answering from fixed tables. Unknown contracts are call failures.
#[derive(Default)]
pub struct MockChain {
    decimals: HashMap<Vec<u8>, u32>,
    pools: HashMap<Vec<u8>, PoolConfig>,
    oracle_rates: HashMap<Vec<u8>, BigInt>,
    multipliers: HashMap<Vec<u8>, IssuanceMultipliers>,
    vests: HashMap<u64, VestState>,
    pool_config_calls: Cell<usize>,
    decimals_calls: Cell<usize>,
}

impl MockChain {
    /// Registers `pool`, its stablecoin with `stablecoin_decimals`, its oracle and its
    /// issuance multipliers.
    pub fn with_pool(mut self, pool: &[u8], stablecoin_decimals: u32) -> Self {
        self.decimals
            .insert(STABLECOIN.to_vec(), stablecoin_decimals);
        self.pools
            .insert(pool.to_vec(), pool_config(&STABLECOIN));
        self.oracle_rates
            .insert(ORACLE.to_vec(), big("1000000000"));
        self.multipliers
            .insert(pool.to_vec(), multipliers());
        self
    }

    pub fn with_vest(mut self, vest_id: u64, state: VestState) -> Self {
        self.vests.insert(vest_id, state);
        self
    }

    pub fn set_decimals(&mut self, token: &[u8], decimals: u32) {
        self.decimals
            .insert(token.to_vec(), decimals);
    }

    pub fn set_vest(&mut self, vest_id: u64, state: VestState) {
        self.vests.insert(vest_id, state);
    }

    pub fn pool_config_calls(&self) -> usize {
        self.pool_config_calls.get()
    }

    pub fn decimals_calls(&self) -> usize {
        self.decimals_calls.get()
    }
}

impl ChainReader for MockChain {
    fn token_decimals(&self, token: &[u8]) -> Result<u32> {
        self.decimals_calls
            .set(self.decimals_calls.get() + 1);
        self.decimals
            .get(token)
            .copied()
            .ok_or_else(|| anyhow!("decimals() reverted for {}", hex::encode(token)))
    }

    fn pool_config(&self, pool: &[u8]) -> Result<PoolConfig> {
        self.pool_config_calls
            .set(self.pool_config_calls.get() + 1);
        self.pools
            .get(pool)
            .cloned()
            .ok_or_else(|| anyhow!("No pool at {}", hex::encode(pool)))
    }

    fn oracle_interest_rate(&self, oracle: &[u8]) -> Result<BigInt> {
        self.oracle_rates
            .get(oracle)
            .cloned()
            .ok_or_else(|| anyhow!("No oracle at {}", hex::encode(oracle)))
    }

    fn issuance_multipliers(&self, issuance_model: &[u8], pool: &[u8]) -> Result<IssuanceMultipliers> {
        if issuance_model != MPH_ISSUANCE_MODEL_ADDRESS {
            return Err(anyhow!("No issuance model at {}", hex::encode(issuance_model)));
        }
        self.multipliers
            .get(pool)
            .cloned()
            .ok_or_else(|| anyhow!("No multipliers for {}", hex::encode(pool)))
    }

    fn vest(&self, vesting: &[u8], vest_id: u64) -> Result<VestState> {
        if vesting != VESTING {
            return Err(anyhow!("No vesting contract at {}", hex::encode(vesting)));
        }
        self.vests
            .get(&vest_id)
            .cloned()
            .ok_or_else(|| anyhow!("getVest({}) reverted", vest_id))
    }
}

pub fn projector(chain: MockChain) -> Projector<MemoryStore, MockChain> {
    Projector::new(MemoryStore::new(), chain, &Params::default()).unwrap()
}
