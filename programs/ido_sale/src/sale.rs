//! Sale lifecycle: phase guards and transitions.
//!
//! Handlers read the clock and pass `now` in; nothing here touches the
//! runtime, so the whole state machine runs on the host in tests.

use anchor_lang::prelude::*;

use crate::errors::SaleError;
use crate::state::{
    BuyerInfo, CancelPolicy, ReleaseSchedule, SaleConfig, SaleLedger, SalePhase, PRICE_SCALE,
};

/// Admin-supplied parameters for `initialize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaleParams {
    pub price_ratio: u64,
    pub funding_start: i64,
    pub funding_end: i64,
    pub claim_end: i64,
    pub initial_allocation_percent: u8,
    pub single_transaction_mode: bool,
}

impl SaleConfig {
    /// Validates `params` and resets every flag. Funding opens at
    /// `funding_start` without a further call.
    pub fn configure(&mut self, params: &SaleParams) -> Result<()> {
        require!(params.price_ratio > 0, SaleError::ZeroPrice);
        require!(
            params.funding_start < params.funding_end && params.funding_end <= params.claim_end,
            SaleError::InvalidSchedule
        );
        require!(
            params.initial_allocation_percent <= 100,
            SaleError::InvalidPercent
        );

        self.price_ratio = params.price_ratio;
        self.price_scale = PRICE_SCALE;
        self.initial_allocation_percent = params.initial_allocation_percent;
        self.tokens_for_sale = 0;
        self.funding_start = params.funding_start;
        self.funding_end = params.funding_end;
        self.claim_start = 0;
        self.claim_end = params.claim_end;
        self.is_funded = false;
        self.is_canceled = false;
        self.is_claiming_open = false;
        self.single_transaction_mode = params.single_transaction_mode;
        self.release_schedule = ReleaseSchedule::default();
        self.cancel_policy = CancelPolicy::default();
        Ok(())
    }

    pub fn phase(&self, now: i64) -> SalePhase {
        if self.is_canceled {
            SalePhase::Canceled
        } else if self.is_funded && self.is_claiming_open {
            if now >= self.claim_end {
                SalePhase::ClaimingClosed
            } else {
                SalePhase::ClaimingOpen
            }
        } else if self.is_funded {
            SalePhase::Funded
        } else if now < self.funding_start {
            SalePhase::Configuring
        } else if now <= self.funding_end {
            SalePhase::FundingOpen
        } else {
            SalePhase::FundingClosed
        }
    }

    /// Returns the previous percentage.
    pub fn set_initial_allocation_percent(&mut self, percent: u8) -> Result<u8> {
        require!(!self.is_claiming_open, SaleError::ClaimingAlreadyEnabled);
        require!(percent <= 100, SaleError::InvalidPercent);
        let old = self.initial_allocation_percent;
        self.initial_allocation_percent = percent;
        Ok(old)
    }

    pub fn set_policy(
        &mut self,
        release_schedule: ReleaseSchedule,
        cancel_policy: CancelPolicy,
    ) -> Result<()> {
        require!(!self.is_claiming_open, SaleError::ClaimingAlreadyEnabled);
        self.release_schedule = release_schedule;
        self.cancel_policy = cancel_policy;
        Ok(())
    }

    /// Locks in the sale with `amount` IDO tokens deposited for buyers.
    pub fn fund(&mut self, amount: u128, total_allocated: u128, now: i64) -> Result<()> {
        require!(self.is_funding_over(now), SaleError::FundingNotEnded);
        require!(!self.is_funded, SaleError::AlreadyFunded);
        require!(!self.is_canceled, SaleError::SaleCanceled);
        require!(amount >= total_allocated, SaleError::InsufficientFunding);

        self.tokens_for_sale = amount;
        self.is_funded = true;
        Ok(())
    }

    /// Opens (or schedules) claiming. Once open it stays open: any later call
    /// is rejected, so neither the flag nor `claim_start` can be rewound.
    /// Returns the previous flag.
    pub fn enable_claiming(&mut self, open: bool, claim_start: i64) -> Result<bool> {
        require!(!self.is_claiming_open, SaleError::ClaimingAlreadyEnabled);
        let old = self.is_claiming_open;
        self.is_claiming_open = open;
        self.claim_start = claim_start;
        Ok(old)
    }

    /// Returns the previous claim end.
    pub fn set_claim_end(&mut self, claim_end: i64) -> Result<i64> {
        require!(!self.is_claiming_open, SaleError::ClaimingAlreadyEnabled);
        require!(claim_end >= self.funding_end, SaleError::InvalidSchedule);
        let old = self.claim_end;
        self.claim_end = claim_end;
        Ok(old)
    }

    pub fn cancel(&mut self) -> Result<()> {
        require!(!self.is_canceled, SaleError::SaleCanceled);
        require!(!self.is_funded, SaleError::AlreadyFunded);
        self.is_canceled = true;
        Ok(())
    }

    pub fn ensure_can_register(&self) -> Result<()> {
        require!(!self.is_canceled, SaleError::SaleCanceled);
        require!(!self.is_funded, SaleError::AlreadyFunded);
        Ok(())
    }

    /// Payments leave the vault only once the sale is funded. `cancel` needs
    /// an unfunded sale, so a withdrawn payment is never owed as a refund.
    pub fn ensure_can_withdraw_payment(&self, now: i64) -> Result<()> {
        require!(self.is_funding_over(now), SaleError::FundingNotEnded);
        require!(!self.is_canceled, SaleError::SaleCanceled);
        require!(self.is_funded, SaleError::NotYetFunded);
        Ok(())
    }

    pub fn ensure_can_withdraw_unsold(&self, now: i64) -> Result<()> {
        require!(self.is_funding_over(now), SaleError::FundingNotEnded);
        Ok(())
    }
}

/// Registers a buyer row with its uploaded allocation.
#[allow(clippy::too_many_arguments)]
pub fn register_buyer(
    config: &SaleConfig,
    ledger: &mut SaleLedger,
    row: &mut BuyerInfo,
    buyer: Pubkey,
    seed_paid: u128,
    seed_entitlement: u128,
    allocation_ceiling: u128,
    bump: u8,
) -> Result<()> {
    config.ensure_can_register()?;
    ledger.create_row(
        row,
        buyer,
        seed_paid,
        seed_entitlement,
        allocation_ceiling,
        bump,
    )
}

/// Records a purchase of `payment` pay tokens and returns the IDO tokens
/// bought. `row` is `None` when the buyer has no row yet.
pub fn buy(
    config: &SaleConfig,
    ledger: &mut SaleLedger,
    row: Option<&mut BuyerInfo>,
    payment: u128,
    now: i64,
) -> Result<u128> {
    let row = row.ok_or(SaleError::NotRegistered)?;
    if config.cancel_policy == CancelPolicy::BlockPurchases {
        require!(!config.is_canceled, SaleError::SaleCanceled);
    }
    require!(config.is_funding_open(now), SaleError::FundingNotOpen);
    require!(!config.is_funded, SaleError::AlreadyFunded);
    require!(!row.refunded, SaleError::AlreadyRefunded);
    require!(payment > 0, SaleError::InvalidAmount);

    let price = config.price()?;
    ledger.record_purchase(row, &price, payment)
}

/// Releases the claimable part of the buyer's entitlement.
pub fn claim_tokens(
    config: &SaleConfig,
    ledger: &mut SaleLedger,
    row: Option<&mut BuyerInfo>,
    now: i64,
) -> Result<u128> {
    require!(config.is_funded, SaleError::NotYetFunded);
    require!(config.is_claiming_open, SaleError::ClaimingNotOpen);
    let row = match row {
        Some(row) if row.entitlement > 0 => row,
        _ => return err!(SaleError::NotABuyer),
    };
    require!(config.is_funding_over(now), SaleError::FundingNotEnded);

    ledger.record_claim(config, row, now)
}

/// Returns the buyer's payment from a canceled sale.
pub fn claim_refund(
    config: &SaleConfig,
    ledger: &mut SaleLedger,
    row: Option<&mut BuyerInfo>,
) -> Result<u128> {
    require!(config.is_canceled, SaleError::SaleNotCanceled);
    let row = row.ok_or(SaleError::NotABuyer)?;
    ledger.record_refund(row)
}
