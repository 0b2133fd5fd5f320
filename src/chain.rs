use anyhow::Result;
use substreams::scalar::BigInt;

/// Static configuration of a `DInterest` pool, read once when the pool is first seen.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolConfig {
    pub money_market: Vec<u8>,
    pub stablecoin: Vec<u8>,
    pub interest_model: Vec<u8>,
    pub interest_oracle: Vec<u8>,
    pub deposit_nft: Vec<u8>,
    pub funding_nft: Vec<u8>,
    pub min_deposit_period: BigInt,
    pub max_deposit_period: BigInt,
    pub min_deposit_amount: BigInt,
    pub max_deposit_amount: BigInt,
    /// `calculateInterestAmount(1e18, YEAR)`: interest earned by one unit over a year.
    pub one_year_interest_amount: BigInt,
}

/// Per-pool multipliers held by the MPH issuance model.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuanceMultipliers {
    pub depositor_reward_mint_multiplier: BigInt,
    pub depositor_reward_take_back_multiplier: BigInt,
    pub funder_reward_multiplier: BigInt,
}

/// The parts of the vesting contract's own record of a vest that the projection mirrors.
#[derive(Debug, Clone, PartialEq)]
pub struct VestState {
    pub pool: Vec<u8>,
    pub accumulated_amount: BigInt,
    pub vest_amount_per_stablecoin_per_second: BigInt,
}

/// Read-only view of deployed contract state.
///
/// Every call reflects the chain at the block being processed; nothing is cached between
/// handler invocations.
pub trait ChainReader {
    fn token_decimals(&self, token: &[u8]) -> Result<u32>;

    fn pool_config(&self, pool: &[u8]) -> Result<PoolConfig>;

    /// Latest rate reported by an interest oracle, in 18 decimals.
    fn oracle_interest_rate(&self, oracle: &[u8]) -> Result<BigInt>;

    fn issuance_multipliers(&self, issuance_model: &[u8], pool: &[u8]) -> Result<IssuanceMultipliers>;

    fn vest(&self, vesting: &[u8], vest_id: u64) -> Result<VestState>;
}
