//! Release schedule: how much of an entitlement is vested at a given time.

use anchor_lang::prelude::*;

use crate::errors::SaleError;
use crate::state::{BuyerInfo, ReleaseSchedule, SaleConfig};

/// Claim window bounds, both inclusive of `start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClaimWindow {
    pub start: i64,
    pub end: i64,
}

/// Vested portion of `entitlement` at `now`, floored.
///
/// Before `start` nothing is vested and from `end` onwards everything is.
/// In between, [`ReleaseSchedule::Linear`] unlocks `initial_percent` at
/// `start` and vests the remainder proportionally to elapsed time, while
/// [`ReleaseSchedule::LumpSum`] unlocks everything at `start`.
pub fn vested_amount(
    schedule: ReleaseSchedule,
    window: ClaimWindow,
    entitlement: u128,
    initial_percent: u8,
    now: i64,
) -> Result<u128> {
    if now < window.start {
        return Ok(0);
    }
    if now >= window.end {
        return Ok(entitlement);
    }

    match schedule {
        ReleaseSchedule::LumpSum => Ok(entitlement),
        ReleaseSchedule::Linear => {
            let upfront = entitlement
                .checked_mul(initial_percent as u128)
                .ok_or(SaleError::MathOverflow)?
                / 100;
            let remaining = entitlement - upfront;

            // start <= now < end, so span > 0
            let elapsed = now
                .checked_sub(window.start)
                .ok_or(SaleError::MathOverflow)? as u128;
            let span = window
                .end
                .checked_sub(window.start)
                .ok_or(SaleError::MathOverflow)? as u128;
            let linear = remaining
                .checked_mul(elapsed)
                .ok_or(SaleError::MathOverflow)?
                / span;

            Ok(upfront + linear)
        }
    }
}

impl SaleConfig {
    pub fn claim_window(&self) -> ClaimWindow {
        ClaimWindow {
            start: self.claim_start,
            end: self.claim_end,
        }
    }

    /// Vested entitlement of `row` at `now` under this sale's policy.
    pub fn release_schedule(&self, row: &BuyerInfo, now: i64) -> Result<u128> {
        vested_amount(
            self.release_schedule,
            self.claim_window(),
            row.entitlement,
            self.initial_allocation_percent,
            now,
        )
    }
}
