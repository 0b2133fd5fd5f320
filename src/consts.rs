use hex_literal::hex;

/// Id of the `DPoolList` singleton.
pub const POOL_LIST_ID: &str = "0";
/// Id of the `MPH` singleton.
pub const MPH_ID: &str = "0";

/// Separator used when composing entity ids out of other ids.
pub const DELIMITER: &str = "---";

/// One year in seconds, as used by the pools' interest model.
pub const YEAR: u64 = 31_556_952;

/// Decimals of the wei-style fixed point values returned by the contracts.
pub const DEFAULT_DECIMALS: u32 = 18;
/// Reward multipliers are 36-decimal fixed point divided by stablecoin precision.
pub const MULTIPLIER_DECIMALS: u32 = 36;

pub const ZERO_ADDRESS: [u8; 20] = hex!("0000000000000000000000000000000000000000");
pub const MPH_ISSUANCE_MODEL_ADDRESS: [u8; 20] = hex!("36ad542dadc22078511d64b98aff818abd1ac713");

pub const DEPOSITOR_REWARD_MINT_MULTIPLIER: &str = "poolDepositorRewardMintMultiplier";
pub const FUNDER_REWARD_MULTIPLIER: &str = "poolFunderRewardMultiplier";

pub const DEPOSIT_NFT_TYPE: &str = "deposit";
pub const FUNDING_NFT_TYPE: &str = "funding";
