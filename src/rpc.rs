//! [`ChainReader`] backed by the substreams `eth_call` intrinsic, through the generated
//! contract bindings.
use anyhow::{anyhow, ensure, Result};
use substreams::scalar::BigInt;

use crate::{
    abi::{d_interest, erc20, interest_oracle, mph_issuance_model, vesting},
    chain::{ChainReader, IssuanceMultipliers, PoolConfig, VestState},
    consts::{DEFAULT_DECIMALS, YEAR},
    utils::to_hex_id,
};

/// `getVest` output: pool, depositID, lastUpdateTimestamp, accumulatedAmount,
/// withdrawnAmount, vestAmountPerStablecoinPerSecond.
type VestOutput = (Vec<u8>, BigInt, BigInt, BigInt, BigInt, BigInt);

/// Issues one `eth_call` per read at the block being processed.
#[derive(Debug, Default, Clone, Copy)]
pub struct RpcChainReader;

impl RpcChainReader {
    pub fn new() -> Self {
        Self
    }
}

fn called<T>(output: Option<T>, function: &str, to: &[u8]) -> Result<T> {
    output.ok_or_else(|| anyhow!("Call to `{}` on {} failed", function, to_hex_id(to)))
}

fn checked_address(address: &[u8]) -> Result<Vec<u8>> {
    ensure!(
        address.len() == 20,
        "Invalid address length {} for {}",
        address.len(),
        to_hex_id(address)
    );
    Ok(address.to_vec())
}

fn to_u32(value: &BigInt) -> Result<u32> {
    let repr = value.to_string();
    repr.parse::<u32>()
        .map_err(|e| anyhow!("Value {} does not fit in 32 bits: {}", repr, e))
}

/// `calculateInterestAmount(1e18, YEAR)`: interest earned by one unit deposited for a year.
fn one_year_interest() -> d_interest::functions::CalculateInterestAmount {
    d_interest::functions::CalculateInterestAmount {
        deposit_amount: BigInt::from(10u64.pow(DEFAULT_DECIMALS)),
        deposit_period_in_seconds: BigInt::from(YEAR),
    }
}

/// `updateAndQuery` returns `(updated, value)`; only the value is kept.
fn oracle_rate((_updated, value): (bool, BigInt)) -> BigInt {
    value
}

fn vest_state(
    (pool, _deposit_id, _last_update_timestamp, accumulated_amount, _withdrawn_amount, rate): VestOutput,
) -> VestState {
    VestState { pool, accumulated_amount, vest_amount_per_stablecoin_per_second: rate }
}

impl ChainReader for RpcChainReader {
    fn token_decimals(&self, token: &[u8]) -> Result<u32> {
        let decimals = called(erc20::functions::Decimals {}.call(token.to_vec()), "decimals", token)?;
        to_u32(&decimals)
    }

    fn pool_config(&self, pool: &[u8]) -> Result<PoolConfig> {
        use d_interest::functions;

        let to = pool.to_vec();
        Ok(PoolConfig {
            money_market: called(functions::MoneyMarket {}.call(to.clone()), "moneyMarket", pool)?,
            stablecoin: called(functions::Stablecoin {}.call(to.clone()), "stablecoin", pool)?,
            interest_model: called(
                functions::InterestModel {}.call(to.clone()),
                "interestModel",
                pool,
            )?,
            interest_oracle: called(
                functions::InterestOracle {}.call(to.clone()),
                "interestOracle",
                pool,
            )?,
            deposit_nft: called(functions::DepositNft {}.call(to.clone()), "depositNFT", pool)?,
            funding_nft: called(functions::FundingNft {}.call(to.clone()), "fundingNFT", pool)?,
            min_deposit_period: called(
                functions::MinDepositPeriod {}.call(to.clone()),
                "MinDepositPeriod",
                pool,
            )?,
            max_deposit_period: called(
                functions::MaxDepositPeriod {}.call(to.clone()),
                "MaxDepositPeriod",
                pool,
            )?,
            min_deposit_amount: called(
                functions::MinDepositAmount {}.call(to.clone()),
                "MinDepositAmount",
                pool,
            )?,
            max_deposit_amount: called(
                functions::MaxDepositAmount {}.call(to.clone()),
                "MaxDepositAmount",
                pool,
            )?,
            one_year_interest_amount: called(
                one_year_interest().call(to),
                "calculateInterestAmount",
                pool,
            )?,
        })
    }

    fn oracle_interest_rate(&self, oracle: &[u8]) -> Result<BigInt> {
        let output = called(
            interest_oracle::functions::UpdateAndQuery {}.call(oracle.to_vec()),
            "updateAndQuery",
            oracle,
        )?;
        Ok(oracle_rate(output))
    }

    fn issuance_multipliers(&self, issuance_model: &[u8], pool: &[u8]) -> Result<IssuanceMultipliers> {
        use mph_issuance_model::functions;

        let pool = checked_address(pool)?;
        let to = issuance_model.to_vec();
        Ok(IssuanceMultipliers {
            depositor_reward_mint_multiplier: called(
                functions::PoolDepositorRewardMintMultiplier { param0: pool.clone() }.call(to.clone()),
                "poolDepositorRewardMintMultiplier",
                issuance_model,
            )?,
            depositor_reward_take_back_multiplier: called(
                functions::PoolDepositorRewardTakeBackMultiplier { param0: pool.clone() }
                    .call(to.clone()),
                "poolDepositorRewardTakeBackMultiplier",
                issuance_model,
            )?,
            funder_reward_multiplier: called(
                functions::PoolFunderRewardMultiplier { param0: pool }.call(to),
                "poolFunderRewardMultiplier",
                issuance_model,
            )?,
        })
    }

    fn vest(&self, vesting: &[u8], vest_id: u64) -> Result<VestState> {
        let get_vest = vesting::functions::GetVest { vest_id: BigInt::from(vest_id) };
        let output = called(get_vest.call(vesting.to_vec()), "getVest", vesting)?;
        Ok(vest_state(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::keccak256;
    use ethabi::Token;
    use hex_literal::hex;
    use std::str::FromStr;

    fn uint(value: u64) -> Token {
        Token::Uint(ethabi::Uint::from(value))
    }

    fn selector(encoded: &[u8]) -> [u8; 4] {
        [encoded[0], encoded[1], encoded[2], encoded[3]]
    }

    fn selector_of(signature: &str) -> [u8; 4] {
        selector(&keccak256(signature.as_bytes()))
    }

    #[test]
    fn bindings_match_contract_signatures() {
        let pool = vec![0x01u8; 20];
        let calls = [
            (erc20::functions::Decimals {}.encode(), "decimals()"),
            (d_interest::functions::DepositNft {}.encode(), "depositNFT()"),
            (d_interest::functions::MinDepositPeriod {}.encode(), "MinDepositPeriod()"),
            (one_year_interest().encode(), "calculateInterestAmount(uint256,uint256)"),
            (interest_oracle::functions::UpdateAndQuery {}.encode(), "updateAndQuery()"),
            (
                mph_issuance_model::functions::PoolFunderRewardMultiplier { param0: pool }.encode(),
                "poolFunderRewardMultiplier(address)",
            ),
            (
                vesting::functions::GetVest { vest_id: BigInt::from(3) }.encode(),
                "getVest(uint64)",
            ),
        ];

        for (encoded, signature) in calls {
            assert_eq!(selector(&encoded), selector_of(signature), "{}", signature);
        }
        assert_eq!(selector_of("getVest(uint64)"), hex!("6e24af11"));
    }

    #[test]
    fn one_year_interest_asks_for_one_unit_over_a_year() {
        let encoded = one_year_interest().encode();
        assert_eq!(&encoded[4..], ethabi::encode(&[uint(1_000_000_000_000_000_000), uint(YEAR)]));
    }

    #[test]
    fn get_vest_output_maps_to_state() {
        let data = ethabi::encode(&[Token::Tuple(vec![
            Token::Address(ethabi::Address::from_slice(&[0x11; 20])),
            uint(7),
            uint(1_620_000_000),
            uint(100),
            uint(200),
            uint(300),
        ])]);

        let output = vesting::functions::GetVest::output(&data).unwrap();
        assert_eq!(
            vest_state(output),
            VestState {
                pool: vec![0x11; 20],
                accumulated_amount: BigInt::from(100),
                vest_amount_per_stablecoin_per_second: BigInt::from(300),
            }
        );
    }

    #[test]
    fn oracle_rate_is_the_queried_value() {
        let data = ethabi::encode(&[Token::Bool(true), uint(1_000_000_000)]);
        let output = interest_oracle::functions::UpdateAndQuery::output(&data).unwrap();
        assert_eq!(oracle_rate(output), BigInt::from(1_000_000_000));
    }

    #[test]
    fn pool_config_outputs_decode() {
        let stablecoin = vec![0x02u8; 20];
        let data = ethabi::encode(&[Token::Address(ethabi::Address::from_slice(&stablecoin))]);
        assert_eq!(d_interest::functions::Stablecoin::output(&data).unwrap(), stablecoin);

        let data = ethabi::encode(&[uint(1_000_000)]);
        assert_eq!(
            d_interest::functions::MinDepositAmount::output(&data).unwrap(),
            BigInt::from(1_000_000)
        );
    }

    #[test]
    fn decimals_must_fit_in_u32() {
        assert_eq!(to_u32(&BigInt::from(6)).unwrap(), 6);
        assert!(to_u32(&BigInt::from_str("4294967296").unwrap()).is_err());
    }

    #[test]
    fn multiplier_reads_require_a_full_address() {
        assert!(checked_address(&[0u8; 4]).is_err());
        assert_eq!(checked_address(&[0x01; 20]).unwrap(), vec![0x01; 20]);
    }
}
