#![allow(clippy::all)]

pub mod d_interest;
pub mod erc20;
pub mod interest_oracle;
pub mod mph_issuance_model;
pub mod vesting;
