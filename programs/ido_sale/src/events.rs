use anchor_lang::prelude::*;

use crate::state::{CancelPolicy, ReleaseSchedule};

#[event]
pub struct BuyerRegistered {
    pub sale: Pubkey,
    pub buyer: Pubkey,
    pub spend_pay_tokens: u128,
    pub ido_tokens_to_get: u128,
    pub allocation_ceiling: u128,
}

/// Emitted on every purchase.
#[event]
pub struct BoughtIdoTokens {
    pub buyer: Pubkey,
    pub spend_pay_tokens: u128,
    pub ido_tokens_to_get: u128,
    pub timestamp: i64,
}

#[event]
pub struct ClaimedIdoTokens {
    pub buyer: Pubkey,
    pub ido_tokens_claimed: u128,
    pub timestamp: i64,
}

#[event]
pub struct RefundClaimed {
    pub buyer: Pubkey,
    pub pay_tokens_refunded: u128,
}

#[event]
pub struct SaleFunded {
    pub admin: Pubkey,
    pub tokens_for_sale: u128,
    pub total_allocated: u128,
}

#[event]
pub struct SaleCanceled {
    pub admin: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct PaymentWithdrawn {
    pub admin: Pubkey,
    pub amount: u64,
}

#[event]
pub struct UnsoldTokensWithdrawn {
    pub admin: Pubkey,
    pub amount: u64,
}

// Admin setters

#[event]
pub struct ChangedInitialPercentageAllocation {
    pub admin: Pubkey,
    pub old_initial_percentage: u8,
    pub initial_percentage: u8,
}

#[event]
pub struct ChangedIsClaimingOpen {
    pub admin: Pubkey,
    pub old_is_claiming_open: bool,
    pub is_claiming_open: bool,
    pub start_date_of_claiming_tokens: i64,
}

#[event]
pub struct ChangedEndDateOfClaimingTokens {
    pub admin: Pubkey,
    pub old_end_date_of_claiming_tokens: i64,
    pub end_date_of_claiming_tokens: i64,
}

#[event]
pub struct SalePolicyChanged {
    pub admin: Pubkey,
    pub release_schedule: ReleaseSchedule,
    pub cancel_policy: CancelPolicy,
}
