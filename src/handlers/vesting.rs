use anyhow::Result;
use substreams::{log, scalar::BigDecimal};

use crate::{
    chain::ChainReader,
    consts::{DEFAULT_DECIMALS, DELIMITER, ZERO_ADDRESS},
    entities::Vest,
    events::{CreateVest, LogMeta, UpdateVest, VestTransfer, Withdraw},
    math::{normalize, normalize_multiplier},
    projector::Projector,
    store::EntityStore,
    utils::to_hex_id,
};

impl<S: EntityStore, R: ChainReader> Projector<S, R> {
    /// `ECreateVest`: starts a vest for a deposit, discovering the pool if needed.
    pub fn handle_create_vest(&mut self, log: &LogMeta, event: &CreateVest) -> Result<()> {
        let pool = self.pool(&event.pool)?;
        let stablecoin_decimals = self.stablecoin_decimals(&pool)?;

        let vest = Vest {
            id: event.vest_id.to_string(),
            deposit: format!("{}{}{}", pool.id, DELIMITER, event.deposit_id),
            pool: pool.id,
            owner: to_hex_id(&event.to),
            last_update_timestamp: log.block_timestamp,
            accumulated_amount: BigDecimal::zero(),
            withdrawn_amount: BigDecimal::zero(),
            vest_amount_per_stablecoin_per_second: normalize_multiplier(
                &event.vest_amount_per_stablecoin_per_second,
                stablecoin_decimals,
            )?,
        };
        self.store.save(&vest);

        Ok(())
    }

    /// `EUpdateVest`: refreshes the vest from the vesting contract that emitted the event.
    pub fn handle_update_vest(&mut self, log: &LogMeta, event: &UpdateVest) -> Result<()> {
        let Some(mut vest) = self.store.load::<Vest>(&event.vest_id.to_string()) else {
            log::debug!("Ignoring update of unknown vest {}", event.vest_id);
            return Ok(());
        };

        let state = self.chain.vest(&log.address, event.vest_id)?;
        let pool = self.pool(&state.pool)?;
        let stablecoin_decimals = self.stablecoin_decimals(&pool)?;

        vest.last_update_timestamp = log.block_timestamp;
        vest.accumulated_amount = normalize(&state.accumulated_amount, DEFAULT_DECIMALS)?;
        vest.vest_amount_per_stablecoin_per_second =
            normalize_multiplier(&state.vest_amount_per_stablecoin_per_second, stablecoin_decimals)?;
        self.store.save(&vest);

        Ok(())
    }

    /// `EWithdraw`: adds to the amount withdrawn from the vest so far.
    pub fn handle_withdraw(&mut self, event: &Withdraw) -> Result<()> {
        let Some(mut vest) = self.store.load::<Vest>(&event.vest_id.to_string()) else {
            log::debug!("Ignoring withdrawal from unknown vest {}", event.vest_id);
            return Ok(());
        };

        let withdrawn = normalize(&event.withdrawn_amount, DEFAULT_DECIMALS)?;
        vest.withdrawn_amount = vest.withdrawn_amount + withdrawn;
        self.store.save(&vest);

        Ok(())
    }

    /// Vest NFT `Transfer`: hands the vest to its new owner. Mints and burns are ignored,
    /// creation is covered by `ECreateVest`.
    pub fn handle_vest_transfer(&mut self, event: &VestTransfer) {
        if event.from == ZERO_ADDRESS || event.to == ZERO_ADDRESS {
            log::debug!("Ignoring mint or burn of vest {}", event.token_id);
            return;
        }

        let vest_id = event.token_id.to_string();
        let Some(mut vest) = self.store.load::<Vest>(&vest_id) else {
            log::debug!("Ignoring transfer of unknown vest {}", vest_id);
            return;
        };
        vest.owner = to_hex_id(&event.to);
        self.store.save(&vest);
    }
}
