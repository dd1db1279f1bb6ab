use anchor_lang::prelude::*;

/// Fixed normalization constant applied to every price ratio.
pub const PRICE_SCALE: u64 = 10_000;

/// Capacity of the buyer roster held in [`SaleLedger`].
pub const MAX_BUYERS: usize = 100;

/// Largest page returned by `list_buyers` (return data is capped at 1024 bytes).
pub const BUYERS_PAGE_SIZE: usize = 25;

pub const SALE_LEDGER_SEED: &[u8] = b"sale-ledger";
pub const SALE_AUTHORITY_SEED: &[u8] = b"sale-authority";
pub const BUYER_INFO_SEED: &[u8] = b"buyer-info";
pub const PAY_VAULT_SEED: &[u8] = b"pay-vault";
pub const IDO_VAULT_SEED: &[u8] = b"ido-vault";

// ─────────────────────────────────────────────────────────────────────────────
// Sale policies
// ─────────────────────────────────────────────────────────────────────────────

/// How purchased IDO tokens become claimable over the claim window.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ReleaseSchedule {
    /// The initial percentage unlocks at claim start, the rest vests linearly
    /// until claim end.
    #[default]
    Linear,
    /// Everything unlocks at claim start.
    LumpSum,
}

/// Whether a canceled sale still records purchases.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum CancelPolicy {
    /// `buy` fails with `SaleCanceled` once the admin cancels.
    #[default]
    BlockPurchases,
    /// `buy` keeps working after cancellation; buyers refund later.
    AcceptPurchases,
}

/// Lifecycle position derived from the sale flags and the clock.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum SalePhase {
    /// Initialized, funding window not reached yet.
    Configuring,
    FundingOpen,
    /// Funding window passed, admin has not locked in the raised amount.
    FundingClosed,
    Funded,
    ClaimingOpen,
    /// Claim end has passed; everything is vested.
    ClaimingClosed,
    Canceled,
}

// ─────────────────────────────────────────────────────────────────────────────
// SaleConfig: one per sale, keypair account (its key identifies the sale)
// ─────────────────────────────────────────────────────────────────────────────

#[account]
#[derive(Debug, Default)]
pub struct SaleConfig {
    /// Wallet allowed to call every admin instruction.
    pub admin: Pubkey,

    /// Token buyers pay with.
    pub pay_mint: Pubkey,

    /// Token being sold.
    pub ido_mint: Pubkey,

    pub pay_decimals: u8,
    pub ido_decimals: u8,

    /// Price of the IDO token in pay tokens, as `price_ratio / price_scale`.
    pub price_ratio: u64,
    pub price_scale: u64,

    /// Share of each entitlement unlocked at claim start (0..=100).
    pub initial_allocation_percent: u8,

    /// IDO tokens deposited by the admin when locking in the sale.
    pub tokens_for_sale: u128,

    pub funding_start: i64,
    pub funding_end: i64,
    /// Zero until claiming is enabled.
    pub claim_start: i64,
    pub claim_end: i64,

    // One-way flags: false → true only.
    pub is_funded: bool,
    pub is_canceled: bool,
    pub is_claiming_open: bool,

    /// Stored for clients that combine buy and claim; not consulted on-chain.
    pub single_transaction_mode: bool,

    pub release_schedule: ReleaseSchedule,
    pub cancel_policy: CancelPolicy,

    pub authority_bump: u8,
    pub pay_vault_bump: u8,
    pub ido_vault_bump: u8,

    pub _reserved: [u8; 32],
}

impl SaleConfig {
    pub const MAX_SIZE: usize = 8  // discriminator
        + 32  // admin
        + 32  // pay_mint
        + 32  // ido_mint
        + 1   // pay_decimals
        + 1   // ido_decimals
        + 8   // price_ratio
        + 8   // price_scale
        + 1   // initial_allocation_percent
        + 16  // tokens_for_sale
        + 8   // funding_start
        + 8   // funding_end
        + 8   // claim_start
        + 8   // claim_end
        + 1   // is_funded
        + 1   // is_canceled
        + 1   // is_claiming_open
        + 1   // single_transaction_mode
        + 1   // release_schedule
        + 1   // cancel_policy
        + 1   // authority_bump
        + 1   // pay_vault_bump
        + 1   // ido_vault_bump
        + 32; // _reserved

    pub fn is_funding_open(&self, now: i64) -> bool {
        now >= self.funding_start && now <= self.funding_end
    }

    pub fn is_funding_over(&self, now: i64) -> bool {
        now >= self.funding_end
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SaleLedger: sale-wide aggregates and buyer roster
// ─────────────────────────────────────────────────────────────────────────────
// PDA seeds: [b"sale-ledger", sale_config.key().as_ref()]

#[account]
#[derive(Debug, Default)]
pub struct SaleLedger {
    pub sale: Pubkey,

    /// Sum of `paid` over every buyer row.
    pub total_paid: u128,

    /// Sum of `entitlement` over every buyer row.
    pub total_allocated: u128,

    /// Sum of `claimed` over every buyer row.
    pub total_claimed: u128,

    /// Distinct buyers with a recorded payment; always `buyers.len()`.
    pub investor_count: u64,

    /// Buyers in the order their first payment was recorded.
    pub buyers: Vec<Pubkey>,

    pub bump: u8,
}

impl SaleLedger {
    pub const MAX_SIZE: usize = 8  // discriminator
        + 32  // sale
        + 16  // total_paid
        + 16  // total_allocated
        + 16  // total_claimed
        + 8   // investor_count
        + 4 + (32 * MAX_BUYERS)  // buyers
        + 1;  // bump

    pub fn contains(&self, buyer: &Pubkey) -> bool {
        self.buyers.iter().any(|b| b == buyer)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BuyerInfo: one per buyer per sale
// ─────────────────────────────────────────────────────────────────────────────
// PDA seeds: [sale_config.key().as_ref(), b"buyer-info", buyer.as_ref()]

#[account]
#[derive(Debug, Default)]
pub struct BuyerInfo {
    /// Sale this row belongs to; `Pubkey::default()` until created.
    pub sale: Pubkey,

    pub buyer: Pubkey,

    /// Pay tokens spent by the buyer.
    pub paid: u128,

    /// IDO tokens the buyer is owed.
    pub entitlement: u128,

    /// Lottery allocation: the most `entitlement` may ever reach.
    pub allocation_ceiling: u128,

    /// IDO tokens already released to the buyer.
    pub claimed: u128,

    /// Set once the buyer withdrew their payment from a canceled sale.
    pub refunded: bool,

    pub bump: u8,

    pub _reserved: [u8; 32],
}

impl BuyerInfo {
    pub const MAX_SIZE: usize = 8  // discriminator
        + 32  // sale
        + 32  // buyer
        + 16  // paid
        + 16  // entitlement
        + 16  // allocation_ceiling
        + 16  // claimed
        + 1   // refunded
        + 1   // bump
        + 32; // _reserved

    pub fn is_created(&self) -> bool {
        self.sale != Pubkey::default()
    }

    pub fn unclaimed(&self) -> u128 {
        self.entitlement.saturating_sub(self.claimed)
    }
}
