use std::collections::HashMap;

use anyhow::Result;

use crate::{
    chain::ChainReader,
    events::{Event, EventKind},
    handlers::mph_minter::{reward_param_digests, RewardParam},
    params::Params,
    store::EntityStore,
};

/// Applies decoded events to the entities held by an [`EntityStore`].
///
/// Events must be applied one at a time, in block and log order. A handler either finishes
/// all of its writes or returns an error, in which case the host is expected to discard the
/// block.
pub struct Projector<S, R> {
    pub(crate) store: S,
    pub(crate) chain: R,
    pub(crate) issuance_model: Vec<u8>,
    pub(crate) reward_params: HashMap<[u8; 32], RewardParam>,
}

impl<S: EntityStore, R: ChainReader> Projector<S, R> {
    pub fn new(store: S, chain: R, params: &Params) -> Result<Self> {
        Ok(Self {
            store,
            chain,
            issuance_model: params.issuance_model()?,
            reward_params: reward_param_digests(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn chain(&self) -> &R {
        &self.chain
    }

    pub fn apply(&mut self, event: &Event) -> Result<()> {
        match &event.kind {
            EventKind::MphTransfer(transfer) => {
                self.handle_mph_transfer(&event.log, transfer);
                self.track_mph_balances(transfer)
            }
            EventKind::SetParamUint(set_param) => self.handle_set_param_uint(set_param),
            EventKind::CreateVest(create) => self.handle_create_vest(&event.log, create),
            EventKind::UpdateVest(update) => self.handle_update_vest(&event.log, update),
            EventKind::Withdraw(withdraw) => self.handle_withdraw(withdraw),
            EventKind::VestTransfer(transfer) => {
                self.handle_vest_transfer(transfer);
                Ok(())
            }
        }
    }

    /// Applies `events` in order, stopping at the first error.
    pub fn apply_all<'a>(&mut self, events: impl IntoIterator<Item = &'a Event>) -> Result<()> {
        events
            .into_iter()
            .try_for_each(|event| self.apply(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::{Mph, MphHolder, MphTransferRecord, Pool, Vest},
        events::{CreateVest, MphTransfer, VestTransfer, Withdraw},
        store::MemoryStore,
        testing::*,
        utils::to_hex_id,
    };
    use std::str::FromStr;
    use substreams::scalar::{BigDecimal, BigInt};

    #[test]
    fn new_rejects_bad_issuance_model() {
        let params = Params { mph_issuance_model: "0x12".to_string() };
        assert!(Projector::new(MemoryStore::new(), MockChain::default(), &params).is_err());
    }

    #[test]
    fn routes_a_mixed_stream() {
        let mut projector = projector(MockChain::default().with_pool(&POOL, 6));
        let events = vec![
            Event::new(
                log_meta(1),
                CreateVest {
                    to: ALICE.to_vec(),
                    pool: POOL.to_vec(),
                    deposit_id: 3,
                    vest_id: 9,
                    vest_amount_per_stablecoin_per_second: BigInt::from(1_000_000u64),
                },
            ),
            Event::new(
                log_meta(2),
                Withdraw {
                    sender: ALICE.to_vec(),
                    vest_id: 9,
                    withdrawn_amount: BigInt::from_str("2500000000000000000").unwrap(),
                },
            ),
            Event::new(
                log_meta(3),
                VestTransfer { from: ALICE.to_vec(), to: BOB.to_vec(), token_id: BigInt::from(9) },
            ),
            Event::new(
                log_meta(4),
                MphTransfer {
                    from: ZERO.to_vec(),
                    to: BOB.to_vec(),
                    value: BigInt::from_str("1000000000000000000").unwrap(),
                },
            ),
        ];

        projector.apply_all(&events).unwrap();

        let store = projector.store();
        let vest = store.load::<Vest>("9").unwrap();
        assert_eq!(vest.owner, to_hex_id(&BOB));
        assert_eq!(vest.withdrawn_amount, BigDecimal::from_str("2.5").unwrap());
        assert!(store.load::<Pool>(&to_hex_id(&POOL)).is_some());

        let record_id = format!("{}-4", to_hex_id(&log_meta(4).tx_hash));
        assert!(store.load::<MphTransferRecord>(&record_id).is_some());
        let holder = store.load::<MphHolder>(&to_hex_id(&BOB)).unwrap();
        assert_eq!(holder.mph_balance, BigDecimal::from_str("1").unwrap());
        assert_eq!(store.load::<Mph>("0").unwrap().total_supply, BigDecimal::from_str("1").unwrap());
    }

    #[test]
    fn stops_at_first_failing_event() {
        // No pool configured on chain: creating the vest cannot discover its pool.
        let mut projector = projector(MockChain::default());
        let events = vec![
            Event::new(
                log_meta(0),
                CreateVest {
                    to: ALICE.to_vec(),
                    pool: POOL.to_vec(),
                    deposit_id: 1,
                    vest_id: 1,
                    vest_amount_per_stablecoin_per_second: BigInt::from(1),
                },
            ),
            Event::new(
                log_meta(1),
                MphTransfer { from: ALICE.to_vec(), to: BOB.to_vec(), value: BigInt::from(1) },
            ),
        ];

        assert!(projector.apply_all(&events).is_err());
        assert!(projector.store().is_empty());
    }
}
