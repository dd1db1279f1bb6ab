use anchor_lang::prelude::*;

#[error_code]
pub enum SaleError {
    // Configuration
    #[msg("You cannot give more than 100 percent of the token allocation")]
    InvalidPercent,
    #[msg("Price ratio must be greater than zero")]
    ZeroPrice,
    #[msg("Sale dates must satisfy funding start < funding end <= claim end")]
    InvalidSchedule,
    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    // Phase
    #[msg("The Funding Period is not Open")]
    FundingNotOpen,
    #[msg("The Funding Period has not ended")]
    FundingNotEnded,
    #[msg("Already funded tokens")]
    AlreadyFunded,
    #[msg("The contract did not receive the IDO tokens")]
    NotYetFunded,
    #[msg("Claiming is not open yet")]
    ClaimingNotOpen,
    #[msg("Claiming is already enabled")]
    ClaimingAlreadyEnabled,
    #[msg("Funding has been canceled")]
    SaleCanceled,
    #[msg("Funding has not been canceled")]
    SaleNotCanceled,

    // Authorization
    #[msg("Only the sale admin can call this")]
    Unauthorized,

    // Allocation
    #[msg("Purchase exceeds the buyer's allocation ceiling")]
    AllocationExceeded,
    #[msg("Buyer roster is full")]
    RosterFull,
    #[msg("You should at least match the total allocated IDO tokens")]
    InsufficientFunding,
    #[msg("Not enough unsold IDO tokens in the vault")]
    InsufficientUnsoldTokens,

    // Lookup
    #[msg("Buyer info has not been created for this wallet")]
    NotRegistered,
    #[msg("Wallet is not a buyer in this sale")]
    NotABuyer,
    #[msg("Buyer info already exists")]
    AlreadyExists,
    #[msg("Invalid token mint for this sale")]
    InvalidMint,

    // Arithmetic
    #[msg("Division by zero")]
    DivisionByZero,
    #[msg("Arithmetic overflow")]
    MathOverflow,

    // Settlement
    #[msg("Nothing to claim at this time")]
    NothingToClaim,
    #[msg("Pay tokens have already been refunded")]
    AlreadyRefunded,
}
