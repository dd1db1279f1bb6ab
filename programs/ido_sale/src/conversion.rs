//! Price conversion between pay tokens and IDO tokens.
//!
//! Both directions floor. A payment converted to IDO tokens and back may come
//! out smaller than it went in; the remainder stays with the sale.

use anchor_lang::prelude::*;

use crate::errors::SaleError;
use crate::state::SaleConfig;

/// Exchange rate between the two mints, with the decimal gap folded in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Price {
    pub ratio: u64,
    pub scale: u64,
    /// `10^(ido_decimals - pay_decimals)` when the IDO token is finer, else 1.
    pub ido_adjust: u128,
    /// `10^(pay_decimals - ido_decimals)` when the pay token is finer, else 1.
    pub pay_adjust: u128,
}

impl Price {
    pub fn new(ratio: u64, scale: u64, pay_decimals: u8, ido_decimals: u8) -> Result<Self> {
        let (ido_adjust, pay_adjust) = if ido_decimals >= pay_decimals {
            (pow10(ido_decimals - pay_decimals)?, 1)
        } else {
            (1, pow10(pay_decimals - ido_decimals)?)
        };
        Ok(Self {
            ratio,
            scale,
            ido_adjust,
            pay_adjust,
        })
    }

    /// Pay tokens needed for `ido_amount` IDO tokens.
    pub fn quote_payment_for(&self, ido_amount: u128) -> Result<u128> {
        require!(self.ratio > 0, SaleError::DivisionByZero);
        let numerator = ido_amount
            .checked_mul(self.ratio as u128)
            .and_then(|v| v.checked_mul(self.pay_adjust))
            .ok_or(SaleError::MathOverflow)?;
        let denominator = (self.scale as u128)
            .checked_mul(self.ido_adjust)
            .ok_or(SaleError::MathOverflow)?;
        require!(denominator > 0, SaleError::DivisionByZero);
        Ok(numerator / denominator)
    }

    /// IDO tokens bought with `pay_amount` pay tokens.
    pub fn quote_project_for(&self, pay_amount: u128) -> Result<u128> {
        require!(self.ratio > 0, SaleError::DivisionByZero);
        let numerator = pay_amount
            .checked_mul(self.scale as u128)
            .and_then(|v| v.checked_mul(self.ido_adjust))
            .ok_or(SaleError::MathOverflow)?;
        let denominator = (self.ratio as u128)
            .checked_mul(self.pay_adjust)
            .ok_or(SaleError::MathOverflow)?;
        Ok(numerator / denominator)
    }
}

impl SaleConfig {
    pub fn price(&self) -> Result<Price> {
        Price::new(
            self.price_ratio,
            self.price_scale,
            self.pay_decimals,
            self.ido_decimals,
        )
    }
}

fn pow10(exp: u8) -> Result<u128> {
    10u128
        .checked_pow(exp as u32)
        .ok_or_else(|| SaleError::MathOverflow.into())
}
