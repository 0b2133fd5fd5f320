//! Entities maintained by the projection. Field names written to the entity rows follow the
//! subgraph schema the sink expects.
use substreams::scalar::{BigDecimal, BigInt};
use substreams_entity_change::tables::Row;

use crate::consts::{MPH_ID, POOL_LIST_ID};

/// A record addressable by `(TYPE, id)` in an [`EntityStore`](crate::store::EntityStore).
pub trait Entity: Clone + 'static {
    const TYPE: &'static str;

    fn id(&self) -> &str;

    /// Writes every field of the entity, so a row always replaces the stored record.
    fn write_fields(&self, row: &mut Row);
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolList {
    pub id: String,
    pub pools: Vec<String>,
    pub num_pools: u64,
    pub num_users: u64,
    pub num_active_users: u64,
    pub num_funders: u64,
}

impl PoolList {
    pub fn new() -> Self {
        Self {
            id: POOL_LIST_ID.to_string(),
            pools: vec![],
            num_pools: 0,
            num_users: 0,
            num_active_users: 0,
            num_funders: 0,
        }
    }
}

impl Default for PoolList {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for PoolList {
    const TYPE: &'static str = "DPoolList";

    fn id(&self) -> &str {
        &self.id
    }

    fn write_fields(&self, row: &mut Row) {
        row.set("pools", self.pools.clone())
            .set("numPools", self.num_pools)
            .set("numUsers", self.num_users)
            .set("numActiveUsers", self.num_active_users)
            .set("numFunders", self.num_funders);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pool {
    pub id: String,
    pub address: String,
    pub money_market: String,
    pub stablecoin: String,
    pub interest_model: String,
    pub num_users: u64,
    pub num_deposits: u64,
    pub num_active_deposits: u64,
    pub total_active_deposit: BigDecimal,
    pub total_historical_deposit: BigDecimal,
    pub num_funders: u64,
    pub num_fundings: u64,
    pub total_interest_paid: BigDecimal,
    pub unfunded_deposit_amount: BigDecimal,
    pub one_year_interest_rate: BigDecimal,
    pub surplus: BigDecimal,
    pub money_market_income_index: BigInt,
    pub oracle_interest_rate: BigDecimal,
    pub min_deposit_period: BigInt,
    pub max_deposit_period: BigInt,
    pub min_deposit_amount: BigDecimal,
    pub max_deposit_amount: BigDecimal,
    pub mph_depositor_reward_mint_multiplier: BigDecimal,
    pub mph_depositor_reward_take_back_multiplier: BigDecimal,
    pub mph_funder_reward_multiplier: BigDecimal,
}

impl Pool {
    /// A pool with all counters and amounts zeroed. Static configuration is filled in by the
    /// accessor that discovers the pool.
    pub fn new(address: &str) -> Self {
        Self {
            id: address.to_string(),
            address: address.to_string(),
            money_market: String::new(),
            stablecoin: String::new(),
            interest_model: String::new(),
            num_users: 0,
            num_deposits: 0,
            num_active_deposits: 0,
            total_active_deposit: BigDecimal::zero(),
            total_historical_deposit: BigDecimal::zero(),
            num_funders: 0,
            num_fundings: 0,
            total_interest_paid: BigDecimal::zero(),
            unfunded_deposit_amount: BigDecimal::zero(),
            one_year_interest_rate: BigDecimal::zero(),
            surplus: BigDecimal::zero(),
            money_market_income_index: BigInt::zero(),
            oracle_interest_rate: BigDecimal::zero(),
            min_deposit_period: BigInt::zero(),
            max_deposit_period: BigInt::zero(),
            min_deposit_amount: BigDecimal::zero(),
            max_deposit_amount: BigDecimal::zero(),
            mph_depositor_reward_mint_multiplier: BigDecimal::zero(),
            mph_depositor_reward_take_back_multiplier: BigDecimal::zero(),
            mph_funder_reward_multiplier: BigDecimal::zero(),
        }
    }
}

impl Entity for Pool {
    const TYPE: &'static str = "DPool";

    fn id(&self) -> &str {
        &self.id
    }

    fn write_fields(&self, row: &mut Row) {
        row.set("address", self.address.clone())
            .set("moneyMarket", self.money_market.clone())
            .set("stablecoin", self.stablecoin.clone())
            .set("interestModel", self.interest_model.clone())
            .set("numUsers", self.num_users)
            .set("numDeposits", self.num_deposits)
            .set("numActiveDeposits", self.num_active_deposits)
            .set("totalActiveDeposit", self.total_active_deposit.clone())
            .set("totalHistoricalDeposit", self.total_historical_deposit.clone())
            .set("numFunders", self.num_funders)
            .set("numFundings", self.num_fundings)
            .set("totalInterestPaid", self.total_interest_paid.clone())
            .set("unfundedDepositAmount", self.unfunded_deposit_amount.clone())
            .set("oneYearInterestRate", self.one_year_interest_rate.clone())
            .set("surplus", self.surplus.clone())
            .set("moneyMarketIncomeIndex", self.money_market_income_index.clone())
            .set("oracleInterestRate", self.oracle_interest_rate.clone())
            .set("MinDepositPeriod", self.min_deposit_period.clone())
            .set("MaxDepositPeriod", self.max_deposit_period.clone())
            .set("MinDepositAmount", self.min_deposit_amount.clone())
            .set("MaxDepositAmount", self.max_deposit_amount.clone())
            .set(
                "mphDepositorRewardMintMultiplier",
                self.mph_depositor_reward_mint_multiplier.clone(),
            )
            .set(
                "mphDepositorRewardTakeBackMultiplier",
                self.mph_depositor_reward_take_back_multiplier.clone(),
            )
            .set("mphFunderRewardMultiplier", self.mph_funder_reward_multiplier.clone());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub address: String,
    pub pools: Vec<String>,
    pub num_pools: u64,
    pub num_deposits: u64,
    pub num_active_deposits: u64,
    pub total_mph_earned: BigDecimal,
    pub total_mph_paid_back: BigDecimal,
}

impl User {
    /// A user seen for the first time in `pool`.
    pub fn new(address: &str, pool: &str) -> Self {
        Self {
            id: address.to_string(),
            address: address.to_string(),
            pools: vec![pool.to_string()],
            num_pools: 0,
            num_deposits: 0,
            num_active_deposits: 0,
            total_mph_earned: BigDecimal::zero(),
            total_mph_paid_back: BigDecimal::zero(),
        }
    }
}

impl Entity for User {
    const TYPE: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }

    fn write_fields(&self, row: &mut Row) {
        row.set("address", self.address.clone())
            .set("pools", self.pools.clone())
            .set("numPools", self.num_pools)
            .set("numDeposits", self.num_deposits)
            .set("numActiveDeposits", self.num_active_deposits)
            .set("totalMPHEarned", self.total_mph_earned.clone())
            .set("totalMPHPaidBack", self.total_mph_paid_back.clone());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Funder {
    pub id: String,
    pub address: String,
    pub pools: Vec<String>,
    pub num_pools: u64,
    pub num_fundings: u64,
    pub total_mph_earned: BigDecimal,
}

impl Funder {
    /// A funder seen for the first time in `pool`.
    pub fn new(address: &str, pool: &str) -> Self {
        Self {
            id: address.to_string(),
            address: address.to_string(),
            pools: vec![pool.to_string()],
            num_pools: 0,
            num_fundings: 0,
            total_mph_earned: BigDecimal::zero(),
        }
    }
}

impl Entity for Funder {
    const TYPE: &'static str = "Funder";

    fn id(&self) -> &str {
        &self.id
    }

    fn write_fields(&self, row: &mut Row) {
        row.set("address", self.address.clone())
            .set("pools", self.pools.clone())
            .set("numPools", self.num_pools)
            .set("numFundings", self.num_fundings)
            .set("totalMPHEarned", self.total_mph_earned.clone());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vest {
    pub id: String,
    pub pool: String,
    pub deposit: String,
    pub owner: String,
    pub last_update_timestamp: u64,
    pub accumulated_amount: BigDecimal,
    pub withdrawn_amount: BigDecimal,
    pub vest_amount_per_stablecoin_per_second: BigDecimal,
}

impl Entity for Vest {
    const TYPE: &'static str = "Vest";

    fn id(&self) -> &str {
        &self.id
    }

    fn write_fields(&self, row: &mut Row) {
        row.set("pool", self.pool.clone())
            .set("deposit", self.deposit.clone())
            .set("owner", self.owner.clone())
            .set("lastUpdateTimestamp", self.last_update_timestamp)
            .set("accumulatedAmount", self.accumulated_amount.clone())
            .set("withdrawnAmount", self.withdrawn_amount.clone())
            .set(
                "vestAmountPerStablecoinPerSecond",
                self.vest_amount_per_stablecoin_per_second.clone(),
            );
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mph {
    pub id: String,
    pub total_supply: BigDecimal,
    pub total_staked_mph_balance: BigDecimal,
    pub total_historical_reward: BigDecimal,
    pub reward_per_mph_per_second: BigDecimal,
    pub reward_per_second: BigDecimal,
}

impl Mph {
    pub fn new() -> Self {
        Self {
            id: MPH_ID.to_string(),
            total_supply: BigDecimal::zero(),
            total_staked_mph_balance: BigDecimal::zero(),
            total_historical_reward: BigDecimal::zero(),
            reward_per_mph_per_second: BigDecimal::zero(),
            reward_per_second: BigDecimal::zero(),
        }
    }
}

impl Default for Mph {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Mph {
    const TYPE: &'static str = "MPH";

    fn id(&self) -> &str {
        &self.id
    }

    fn write_fields(&self, row: &mut Row) {
        row.set("totalSupply", self.total_supply.clone())
            .set("totalStakedMPHBalance", self.total_staked_mph_balance.clone())
            .set("totalHistoricalReward", self.total_historical_reward.clone())
            .set("rewardPerMPHPerSecond", self.reward_per_mph_per_second.clone())
            .set("rewardPerSecond", self.reward_per_second.clone());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MphHolder {
    pub id: String,
    pub address: String,
    pub mph_balance: BigDecimal,
    pub staked_mph_balance: BigDecimal,
    pub total_historical_reward: BigDecimal,
}

impl MphHolder {
    pub fn new(address: &str) -> Self {
        Self {
            id: address.to_string(),
            address: address.to_string(),
            mph_balance: BigDecimal::zero(),
            staked_mph_balance: BigDecimal::zero(),
            total_historical_reward: BigDecimal::zero(),
        }
    }
}

impl Entity for MphHolder {
    const TYPE: &'static str = "MPHHolder";

    fn id(&self) -> &str {
        &self.id
    }

    fn write_fields(&self, row: &mut Row) {
        row.set("address", self.address.clone())
            .set("mphBalance", self.mph_balance.clone())
            .set("stakedMPHBalance", self.staked_mph_balance.clone())
            .set("totalHistoricalReward", self.total_historical_reward.clone());
    }
}

/// One row per MPH token transfer; never updated once written.
#[derive(Debug, Clone, PartialEq)]
pub struct MphTransferRecord {
    pub id: String,
    pub from: String,
    pub to: String,
    pub amount: BigInt,
    pub tx_hash: String,
}

impl Entity for MphTransferRecord {
    const TYPE: &'static str = "MPHTransfer";

    fn id(&self) -> &str {
        &self.id
    }

    fn write_fields(&self, row: &mut Row) {
        row.set("from", self.from.clone())
            .set("to", self.to.clone())
            .set("amount", self.amount.clone())
            .set("txhash", self.tx_hash.clone());
    }
}
