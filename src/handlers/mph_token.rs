use anyhow::Result;

use crate::{
    chain::ChainReader,
    consts::{DEFAULT_DECIMALS, ZERO_ADDRESS},
    entities::MphTransferRecord,
    events::{LogMeta, MphTransfer},
    math::normalize,
    projector::Projector,
    store::EntityStore,
    utils::to_hex_id,
};

impl<S: EntityStore, R: ChainReader> Projector<S, R> {
    /// MPH `Transfer`: appends a transfer record keyed by `{txHash}-{logIndex}`.
    pub fn handle_mph_transfer(&mut self, log: &LogMeta, event: &MphTransfer) {
        let tx_hash = to_hex_id(&log.tx_hash);
        let record = MphTransferRecord {
            id: format!("{}-{}", tx_hash, log.log_index),
            from: to_hex_id(&event.from),
            to: to_hex_id(&event.to),
            amount: event.value.clone(),
            tx_hash,
        };
        self.store.save(&record);
    }

    /// MPH `Transfer`: moves the amount between holders. Mints and burns, transfers from
    /// or to the zero address, also change the total supply.
    pub fn track_mph_balances(&mut self, event: &MphTransfer) -> Result<()> {
        let amount = normalize(&event.value, DEFAULT_DECIMALS)?;

        if let Some(mut sender) = self.mph_holder(&event.from) {
            sender.mph_balance = sender.mph_balance - amount.clone();
            self.store.save(&sender);
        }
        if let Some(mut receiver) = self.mph_holder(&event.to) {
            receiver.mph_balance = receiver.mph_balance + amount.clone();
            self.store.save(&receiver);
        }

        let minted = event.from == ZERO_ADDRESS;
        let burned = event.to == ZERO_ADDRESS;
        if minted != burned {
            let mut mph = self.mph();
            mph.total_supply = if minted {
                mph.total_supply + amount
            } else {
                mph.total_supply - amount
            };
            self.store.save(&mph);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::{Mph, MphHolder},
        testing::*,
    };
    use std::str::FromStr;
    use substreams::scalar::BigDecimal;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn transfer(from: &[u8], to: &[u8], value: &str) -> MphTransfer {
        MphTransfer { from: from.to_vec(), to: to.to_vec(), value: big(value) }
    }

    #[test]
    fn records_every_transfer() {
        let mut projector = projector(MockChain::default());
        let log = log_meta(7);
        projector.handle_mph_transfer(&log, &transfer(&ALICE, &BOB, "42"));

        let id = format!("0x{}-7", "ee".repeat(32));
        let record = projector
            .store()
            .load::<MphTransferRecord>(&id)
            .unwrap();
        assert_eq!(
            record,
            MphTransferRecord {
                id: id.clone(),
                from: to_hex_id(&ALICE),
                to: to_hex_id(&BOB),
                amount: big("42"),
                tx_hash: format!("0x{}", "ee".repeat(32)),
            }
        );
        assert_eq!(projector.store().len(), 1);
    }

    #[test]
    fn transfers_in_one_transaction_get_distinct_records() {
        let mut projector = projector(MockChain::default());
        projector.handle_mph_transfer(&log_meta(1), &transfer(&ALICE, &BOB, "1"));
        projector.handle_mph_transfer(&log_meta(2), &transfer(&ALICE, &BOB, "1"));

        assert_eq!(projector.store().len(), 2);
    }

    #[test]
    fn mint_transfer_and_burn_move_balances() {
        let mut projector = projector(MockChain::default());
        projector
            .track_mph_balances(&transfer(&ZERO, &ALICE, "10000000000000000000"))
            .unwrap();
        projector
            .track_mph_balances(&transfer(&ALICE, &BOB, "2500000000000000000"))
            .unwrap();
        projector
            .track_mph_balances(&transfer(&BOB, &ZERO, "500000000000000000"))
            .unwrap();

        let store = projector.store();
        let alice = store.load::<MphHolder>(&to_hex_id(&ALICE)).unwrap();
        let bob = store.load::<MphHolder>(&to_hex_id(&BOB)).unwrap();
        assert_eq!(alice.mph_balance, dec("7.5"));
        assert_eq!(bob.mph_balance, dec("2"));
        assert_eq!(store.load::<Mph>("0").unwrap().total_supply, dec("9.5"));
        assert!(!store.contains::<MphHolder>(&to_hex_id(&ZERO)));
    }

    #[test]
    fn plain_transfer_leaves_supply_untouched() {
        let mut projector = projector(MockChain::default());
        projector
            .track_mph_balances(&transfer(&ALICE, &BOB, "1"))
            .unwrap();

        assert!(!projector.store().contains::<Mph>("0"));
    }
}
