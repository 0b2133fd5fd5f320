//! Decoded events consumed by the handlers.
//!
//! Decoding from raw logs is done by the host; these structs carry the decoded parameters
//! in the same shape as the `substreams-ethereum` ABI bindings (addresses as raw bytes,
//! integers as [`BigInt`]).
use substreams::scalar::BigInt;

/// Where and when an event was emitted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogMeta {
    /// Contract that emitted the log.
    pub address: Vec<u8>,
    pub tx_hash: Vec<u8>,
    pub log_index: u64,
    pub block_timestamp: u64,
}

/// ERC-20 `Transfer` of the MPH token.
#[derive(Debug, Clone, PartialEq)]
pub struct MphTransfer {
    pub from: Vec<u8>,
    pub to: Vec<u8>,
    pub value: BigInt,
}

/// `ESetParamUint` of the MPH minter. The parameter name is an indexed string, so only its
/// keccak256 digest is available.
#[derive(Debug, Clone, PartialEq)]
pub struct SetParamUint {
    pub pool: Vec<u8>,
    pub param_name: [u8; 32],
    pub new_value: BigInt,
}

/// `ECreateVest` of the vesting contract.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateVest {
    pub to: Vec<u8>,
    pub pool: Vec<u8>,
    pub deposit_id: u64,
    pub vest_id: u64,
    pub vest_amount_per_stablecoin_per_second: BigInt,
}

/// `EUpdateVest` of the vesting contract. The event does not carry the new state; it has to
/// be read back from the contract.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateVest {
    pub vest_id: u64,
}

/// `EWithdraw` of the vesting contract.
#[derive(Debug, Clone, PartialEq)]
pub struct Withdraw {
    pub sender: Vec<u8>,
    pub vest_id: u64,
    pub withdrawn_amount: BigInt,
}

/// ERC-721 `Transfer` of a vest NFT.
#[derive(Debug, Clone, PartialEq)]
pub struct VestTransfer {
    pub from: Vec<u8>,
    pub to: Vec<u8>,
    pub token_id: BigInt,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    MphTransfer(MphTransfer),
    SetParamUint(SetParamUint),
    CreateVest(CreateVest),
    UpdateVest(UpdateVest),
    Withdraw(Withdraw),
    VestTransfer(VestTransfer),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub log: LogMeta,
    pub kind: EventKind,
}

impl Event {
    pub fn new(log: LogMeta, kind: impl Into<EventKind>) -> Self {
        Self { log, kind: kind.into() }
    }
}

macro_rules! impl_into_event_kind {
    ($($event:ident),* $(,)?) => {
        $(
            impl From<$event> for EventKind {
                fn from(event: $event) -> Self {
                    EventKind::$event(event)
                }
            }
        )*
    };
}

impl_into_event_kind!(MphTransfer, SetParamUint, CreateVest, UpdateVest, Withdraw, VestTransfer);
