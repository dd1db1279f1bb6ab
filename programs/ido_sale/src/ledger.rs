use anchor_lang::prelude::*;

use crate::conversion::Price;
use crate::errors::SaleError;
use crate::state::{BuyerInfo, SaleConfig, SaleLedger, MAX_BUYERS};

// Every mutation below computes all new values with checked math first and
// only then writes them, so a failed call leaves the row and the aggregates
// untouched.

impl SaleLedger {
    /// Creates `row` for `buyer` with an uploaded allocation.
    ///
    /// Seeded payment and entitlement are folded into the aggregates; a
    /// non-zero seeded payment puts the buyer on the roster right away.
    pub fn create_row(
        &mut self,
        row: &mut BuyerInfo,
        buyer: Pubkey,
        seed_paid: u128,
        seed_entitlement: u128,
        allocation_ceiling: u128,
        bump: u8,
    ) -> Result<()> {
        require!(!row.is_created(), SaleError::AlreadyExists);
        require!(
            seed_entitlement <= allocation_ceiling,
            SaleError::AllocationExceeded
        );

        let total_paid = self
            .total_paid
            .checked_add(seed_paid)
            .ok_or(SaleError::MathOverflow)?;
        let total_allocated = self
            .total_allocated
            .checked_add(seed_entitlement)
            .ok_or(SaleError::MathOverflow)?;
        let admitted = if seed_paid > 0 {
            self.admit(&buyer)?
        } else {
            None
        };

        row.sale = self.sale;
        row.buyer = buyer;
        row.paid = seed_paid;
        row.entitlement = seed_entitlement;
        row.allocation_ceiling = allocation_ceiling;
        row.claimed = 0;
        row.refunded = false;
        row.bump = bump;

        self.total_paid = total_paid;
        self.total_allocated = total_allocated;
        self.enroll(buyer, admitted);
        Ok(())
    }

    /// Records `payment` pay tokens against `row` and returns the IDO tokens
    /// it bought.
    pub fn record_purchase(
        &mut self,
        row: &mut BuyerInfo,
        price: &Price,
        payment: u128,
    ) -> Result<u128> {
        require!(!row.refunded, SaleError::AlreadyRefunded);

        let delta = price.quote_project_for(payment)?;
        let entitlement = row
            .entitlement
            .checked_add(delta)
            .ok_or(SaleError::MathOverflow)?;
        require!(
            entitlement <= row.allocation_ceiling,
            SaleError::AllocationExceeded
        );
        let paid = row
            .paid
            .checked_add(payment)
            .ok_or(SaleError::MathOverflow)?;
        let total_paid = self
            .total_paid
            .checked_add(payment)
            .ok_or(SaleError::MathOverflow)?;
        let total_allocated = self
            .total_allocated
            .checked_add(delta)
            .ok_or(SaleError::MathOverflow)?;
        let admitted = self.admit(&row.buyer)?;

        row.paid = paid;
        row.entitlement = entitlement;
        self.total_paid = total_paid;
        self.total_allocated = total_allocated;
        self.enroll(row.buyer, admitted);
        Ok(delta)
    }

    /// Releases whatever part of `row` has vested by `now` and is not yet
    /// claimed. Returns the amount to transfer.
    pub fn record_claim(
        &mut self,
        config: &SaleConfig,
        row: &mut BuyerInfo,
        now: i64,
    ) -> Result<u128> {
        require!(!row.refunded, SaleError::AlreadyRefunded);

        let vested = config.release_schedule(row, now)?;
        let claimable = vested.saturating_sub(row.claimed);
        require!(claimable > 0, SaleError::NothingToClaim);

        let claimed = row
            .claimed
            .checked_add(claimable)
            .ok_or(SaleError::MathOverflow)?;
        let total_claimed = self
            .total_claimed
            .checked_add(claimable)
            .ok_or(SaleError::MathOverflow)?;

        row.claimed = claimed;
        self.total_claimed = total_claimed;
        Ok(claimable)
    }

    /// Zeroes the payment on `row` and returns it for refunding. The buyer
    /// keeps their roster slot and `investor_count` is not reduced.
    pub fn record_refund(&mut self, row: &mut BuyerInfo) -> Result<u128> {
        require!(!row.refunded, SaleError::AlreadyRefunded);

        let amount = row.paid;
        let total_paid = self
            .total_paid
            .checked_sub(amount)
            .ok_or(SaleError::MathOverflow)?;

        row.paid = 0;
        row.refunded = true;
        self.total_paid = total_paid;
        Ok(amount)
    }

    /// Entitlement sold but not yet released.
    pub fn outstanding_entitlement(&self) -> u128 {
        self.total_allocated.saturating_sub(self.total_claimed)
    }

    /// IDO tokens in a vault holding `vault_balance` that no buyer is owed.
    pub fn unsold_tokens(&self, vault_balance: u64) -> u64 {
        let unsold = (vault_balance as u128).saturating_sub(self.outstanding_entitlement());
        // unsold <= vault_balance
        unsold as u64
    }

    /// Investor count after `buyer` joins the roster, or `None` if they are
    /// already on it.
    fn admit(&self, buyer: &Pubkey) -> Result<Option<u64>> {
        if self.contains(buyer) {
            return Ok(None);
        }
        require!(self.buyers.len() < MAX_BUYERS, SaleError::RosterFull);
        let count = self
            .investor_count
            .checked_add(1)
            .ok_or(SaleError::MathOverflow)?;
        Ok(Some(count))
    }

    fn enroll(&mut self, buyer: Pubkey, admitted: Option<u64>) {
        if let Some(count) = admitted {
            self.investor_count = count;
            self.buyers.push(buyer);
        }
    }
}
