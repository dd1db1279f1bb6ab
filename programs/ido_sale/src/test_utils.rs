//! Fixtures shared by the unit tests: a 6-decimal pay token sold against an
//! 18-decimal IDO token at a ratio of 4000 / 10000.

use anchor_lang::error::Error;
use anchor_lang::prelude::*;

use crate::sale::SaleParams;
use crate::state::{BuyerInfo, SaleConfig, SaleLedger};

pub const FUNDING_START: i64 = 1_652_972_400;
pub const DURING_FUNDING: i64 = 1_653_000_000;
pub const FUNDING_END: i64 = 1_653_285_600;
pub const AFTER_FUNDING: i64 = FUNDING_END + 1;
pub const CLAIM_START: i64 = 1_656_090_000;
pub const CLAIM_END: i64 = 1_666_504_800;

/// IDO tokens bought with 4000 pay tokens.
pub const ONE_LOT_IDO: u128 = 10_000_000_000_000_000;

pub fn sale_config() -> SaleConfig {
    let mut config = SaleConfig {
        admin: Pubkey::new_unique(),
        pay_mint: Pubkey::new_unique(),
        ido_mint: Pubkey::new_unique(),
        pay_decimals: 6,
        ido_decimals: 18,
        ..SaleConfig::default()
    };
    config
        .configure(&SaleParams {
            price_ratio: 4000,
            funding_start: FUNDING_START,
            funding_end: FUNDING_END,
            claim_end: CLAIM_END,
            initial_allocation_percent: 0,
            single_transaction_mode: false,
        })
        .unwrap();
    config
}

pub fn sale_ledger() -> SaleLedger {
    SaleLedger {
        sale: Pubkey::new_unique(),
        ..SaleLedger::default()
    }
}

/// A fresh row for a new buyer with nothing seeded.
pub fn registered_row(ledger: &mut SaleLedger, allocation_ceiling: u128) -> BuyerInfo {
    let mut row = BuyerInfo::default();
    ledger
        .create_row(&mut row, Pubkey::new_unique(), 0, 0, allocation_ceiling, 255)
        .unwrap();
    row
}

pub fn error_code(err: Error) -> u32 {
    match err {
        Error::AnchorError(err) => err.error_code_number,
        Error::ProgramError(err) => panic!("expected an anchor error, got {err:?}"),
    }
}

pub fn assert_ledger_consistent(ledger: &SaleLedger, rows: &[&BuyerInfo]) {
    let paid: u128 = rows.iter().map(|r| r.paid).sum();
    let entitlement: u128 = rows.iter().map(|r| r.entitlement).sum();
    let claimed: u128 = rows.iter().map(|r| r.claimed).sum();
    assert_eq!(ledger.total_paid, paid, "total_paid");
    assert_eq!(ledger.total_allocated, entitlement, "total_allocated");
    assert_eq!(ledger.total_claimed, claimed, "total_claimed");
    assert_eq!(ledger.investor_count as usize, ledger.buyers.len());
    for row in rows {
        assert!(row.claimed <= row.entitlement);
        assert!(row.entitlement <= row.allocation_ceiling);
    }
}
