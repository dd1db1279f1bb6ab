//! Read-only projections returned by the view instructions.

use anchor_lang::prelude::*;

use crate::state::{BuyerInfo, SaleConfig, SaleLedger, BUYERS_PAGE_SIZE};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuyerTotals {
    pub entitlement: u128,
    pub paid: u128,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AggregateTotals {
    pub total_allocated: u128,
    pub total_paid: u128,
}

/// IDO tokens the buyer could claim at `now`. Zero whenever `claim_tokens`
/// would not release anything.
pub fn claimable_now(config: &SaleConfig, row: Option<&BuyerInfo>, now: i64) -> Result<u128> {
    let row = match row {
        Some(row) if !row.refunded => row,
        _ => return Ok(0),
    };
    if !config.is_funded || !config.is_claiming_open || !config.is_funding_over(now) {
        return Ok(0);
    }
    let vested = config.release_schedule(row, now)?;
    Ok(vested.saturating_sub(row.claimed))
}

pub fn buyer_totals(row: Option<&BuyerInfo>) -> BuyerTotals {
    row.map(|row| BuyerTotals {
        entitlement: row.entitlement,
        paid: row.paid,
    })
    .unwrap_or_default()
}

pub fn aggregate_totals(ledger: &SaleLedger) -> AggregateTotals {
    AggregateTotals {
        total_allocated: ledger.total_allocated,
        total_paid: ledger.total_paid,
    }
}

pub fn is_buyer(ledger: &SaleLedger, buyer: &Pubkey) -> bool {
    ledger.contains(buyer)
}

/// Up to [`BUYERS_PAGE_SIZE`] roster entries starting at `offset`.
pub fn buyers_page(ledger: &SaleLedger, offset: u32) -> Vec<Pubkey> {
    ledger
        .buyers
        .iter()
        .skip(offset as usize)
        .take(BUYERS_PAGE_SIZE)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sale;
    use crate::test_utils::*;

    #[test]
    fn empty_sale_reports_zeroes() {
        let config = sale_config();
        let ledger = sale_ledger();
        let stranger = Pubkey::new_unique();

        assert!(buyers_page(&ledger, 0).is_empty());
        assert!(!is_buyer(&ledger, &stranger));
        assert_eq!(buyer_totals(None), BuyerTotals::default());
        assert_eq!(aggregate_totals(&ledger), AggregateTotals::default());
        assert_eq!(claimable_now(&config, None, CLAIM_END).unwrap(), 0);
    }

    #[test]
    fn totals_follow_purchases() {
        let config = sale_config();
        let mut ledger = sale_ledger();
        let mut row = registered_row(&mut ledger, ONE_LOT_IDO);
        sale::buy(&config, &mut ledger, Some(&mut row), 4000, DURING_FUNDING).unwrap();

        assert!(is_buyer(&ledger, &row.buyer));
        assert_eq!(
            buyer_totals(Some(&row)),
            BuyerTotals {
                entitlement: ONE_LOT_IDO,
                paid: 4000,
            }
        );
        assert_eq!(
            aggregate_totals(&ledger),
            AggregateTotals {
                total_allocated: ONE_LOT_IDO,
                total_paid: 4000,
            }
        );
    }

    #[test]
    fn claimable_tracks_schedule_and_claims() {
        let mut config = sale_config();
        let mut ledger = sale_ledger();
        let mut row = registered_row(&mut ledger, 4 * ONE_LOT_IDO);
        sale::buy(&config, &mut ledger, Some(&mut row), 16_000, DURING_FUNDING).unwrap();

        // not funded, not open
        assert_eq!(claimable_now(&config, Some(&row), CLAIM_END).unwrap(), 0);

        config
            .fund(ledger.total_allocated, ledger.total_allocated, AFTER_FUNDING)
            .unwrap();
        config.enable_claiming(true, CLAIM_START).unwrap();
        assert_eq!(claimable_now(&config, Some(&row), CLAIM_START - 1).unwrap(), 0);

        let midpoint = CLAIM_START + (CLAIM_END - CLAIM_START) / 2;
        assert_eq!(
            claimable_now(&config, Some(&row), midpoint).unwrap(),
            2 * ONE_LOT_IDO
        );

        sale::claim_tokens(&config, &mut ledger, Some(&mut row), midpoint).unwrap();
        assert_eq!(claimable_now(&config, Some(&row), midpoint).unwrap(), 0);
        assert_eq!(
            claimable_now(&config, Some(&row), CLAIM_END).unwrap(),
            2 * ONE_LOT_IDO
        );
    }

    #[test]
    fn roster_is_paged_in_insertion_order() {
        let config = sale_config();
        let mut ledger = sale_ledger();
        let mut expected = Vec::new();
        for _ in 0..(BUYERS_PAGE_SIZE + 5) {
            let mut row = registered_row(&mut ledger, ONE_LOT_IDO);
            sale::buy(&config, &mut ledger, Some(&mut row), 4000, DURING_FUNDING).unwrap();
            expected.push(row.buyer);
        }

        let first = buyers_page(&ledger, 0);
        assert_eq!(first, expected[..BUYERS_PAGE_SIZE].to_vec());
        let second = buyers_page(&ledger, BUYERS_PAGE_SIZE as u32);
        assert_eq!(second, expected[BUYERS_PAGE_SIZE..].to_vec());
        assert!(buyers_page(&ledger, 1_000).is_empty());
    }
}
