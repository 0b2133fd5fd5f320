pub mod abi;
pub mod accessors;
pub mod chain;
pub mod consts;
pub mod entities;
pub mod events;
pub mod handlers;
pub mod math;
pub mod params;
pub mod projector;
pub mod rpc;
pub mod store;
pub mod utils;

#[cfg(test)]
mod testing;

pub mod prelude {
    pub use super::{
        chain::{ChainReader, IssuanceMultipliers, PoolConfig, VestState},
        entities::*,
        events::*,
        params::Params,
        projector::Projector,
        rpc::RpcChainReader,
        store::{EntityStore, MemoryStore, NftWatcher},
    };
}
