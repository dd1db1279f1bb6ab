use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    self, Mint, TokenAccount, TokenInterface, TransferChecked,
};

pub mod conversion;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod sale;
pub mod schedule;
pub mod state;
pub mod views;

#[cfg(test)]
mod test_utils;

use errors::SaleError;
use events::*;
use sale::SaleParams;
use state::*;
use views::{AggregateTotals, BuyerTotals};

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod ido_sale {
    use super::*;

    // ═════════════════════════════════════════════════════════════════════
    // 1. INITIALIZE
    // ═════════════════════════════════════════════════════════════════════
    /// Admin creates the sale. Funding opens at `funding_start` with no
    /// further call; both vaults are created here and owned by the
    /// sale-authority PDA.
    pub fn initialize(
        ctx: Context<Initialize>,
        price_ratio: u64,
        funding_start: i64,
        funding_end: i64,
        claim_end: i64,
        initial_allocation_percent: u8,
        single_transaction_mode: bool,
    ) -> Result<()> {
        let sale_key = ctx.accounts.sale_config.key();

        let config = &mut ctx.accounts.sale_config;
        config.admin = ctx.accounts.admin.key();
        config.pay_mint = ctx.accounts.pay_mint.key();
        config.ido_mint = ctx.accounts.ido_mint.key();
        config.pay_decimals = ctx.accounts.pay_mint.decimals;
        config.ido_decimals = ctx.accounts.ido_mint.decimals;
        config.configure(&SaleParams {
            price_ratio,
            funding_start,
            funding_end,
            claim_end,
            initial_allocation_percent,
            single_transaction_mode,
        })?;
        // Reject decimal gaps the conversion cannot represent.
        config.price()?;
        config.authority_bump = ctx.bumps.sale_authority;
        config.pay_vault_bump = ctx.bumps.pay_vault;
        config.ido_vault_bump = ctx.bumps.ido_vault;
        config._reserved = [0u8; 32];

        let ledger = &mut ctx.accounts.sale_ledger;
        ledger.sale = sale_key;
        ledger.total_paid = 0;
        ledger.total_allocated = 0;
        ledger.total_claimed = 0;
        ledger.investor_count = 0;
        ledger.buyers = Vec::new();
        ledger.bump = ctx.bumps.sale_ledger;

        msg!(
            "IDO: Sale {} initialized. Ratio {}/{}. Funding {} to {}, claim end {}",
            sale_key,
            price_ratio,
            PRICE_SCALE,
            funding_start,
            funding_end,
            claim_end
        );

        Ok(())
    }

    // ═════════════════════════════════════════════════════════════════════
    // 2. ADMIN SETTERS
    // ═════════════════════════════════════════════════════════════════════
    /// Change the share of each allocation unlocked at claim start.
    pub fn set_initial_allocation_percent(
        ctx: Context<UpdateSaleConfig>,
        percent: u8,
    ) -> Result<()> {
        let config = &mut ctx.accounts.sale_config;
        let old = config.set_initial_allocation_percent(percent)?;

        emit!(ChangedInitialPercentageAllocation {
            admin: ctx.accounts.admin.key(),
            old_initial_percentage: old,
            initial_percentage: percent,
        });
        msg!("IDO: Initial allocation percent {} -> {}", old, percent);
        Ok(())
    }

    /// Open claiming from `claim_start`. One-way: once open it cannot be
    /// closed or rescheduled.
    pub fn enable_claiming(
        ctx: Context<UpdateSaleConfig>,
        is_claiming_open: bool,
        claim_start: i64,
    ) -> Result<()> {
        let config = &mut ctx.accounts.sale_config;
        let old = config.enable_claiming(is_claiming_open, claim_start)?;

        emit!(ChangedIsClaimingOpen {
            admin: ctx.accounts.admin.key(),
            old_is_claiming_open: old,
            is_claiming_open,
            start_date_of_claiming_tokens: claim_start,
        });
        msg!(
            "IDO: Claiming open = {} from {}",
            is_claiming_open,
            claim_start
        );
        Ok(())
    }

    /// Move the end of the claim window. Only before claiming is enabled.
    pub fn set_claim_end(ctx: Context<UpdateSaleConfig>, claim_end: i64) -> Result<()> {
        let config = &mut ctx.accounts.sale_config;
        let old = config.set_claim_end(claim_end)?;

        emit!(ChangedEndDateOfClaimingTokens {
            admin: ctx.accounts.admin.key(),
            old_end_date_of_claiming_tokens: old,
            end_date_of_claiming_tokens: claim_end,
        });
        msg!("IDO: Claim end {} -> {}", old, claim_end);
        Ok(())
    }

    /// Pick the release schedule and what cancellation does to purchases.
    pub fn set_sale_policy(
        ctx: Context<UpdateSaleConfig>,
        release_schedule: ReleaseSchedule,
        cancel_policy: CancelPolicy,
    ) -> Result<()> {
        let config = &mut ctx.accounts.sale_config;
        config.set_policy(release_schedule, cancel_policy)?;

        emit!(SalePolicyChanged {
            admin: ctx.accounts.admin.key(),
            release_schedule,
            cancel_policy,
        });
        msg!(
            "IDO: Policy set to {:?} / {:?}",
            release_schedule,
            cancel_policy
        );
        Ok(())
    }

    // ═════════════════════════════════════════════════════════════════════
    // 3. REGISTER BUYER
    // ═════════════════════════════════════════════════════════════════════
    /// Admin uploads a buyer's lottery allocation, creating their row.
    /// Seeded values count towards the sale totals immediately.
    pub fn create_buyer_info(
        ctx: Context<CreateBuyerInfo>,
        buyer: Pubkey,
        spend_pay_tokens: u128,
        ido_tokens_to_get: u128,
        allocation_ceiling: u128,
    ) -> Result<()> {
        let accounts = &mut *ctx.accounts;
        sale::register_buyer(
            &accounts.sale_config,
            &mut accounts.sale_ledger,
            &mut accounts.buyer_info,
            buyer,
            spend_pay_tokens,
            ido_tokens_to_get,
            allocation_ceiling,
            ctx.bumps.buyer_info,
        )?;

        emit!(BuyerRegistered {
            sale: accounts.sale_config.key(),
            buyer,
            spend_pay_tokens,
            ido_tokens_to_get,
            allocation_ceiling,
        });
        msg!(
            "IDO: Registered buyer {} with ceiling {}",
            buyer,
            allocation_ceiling
        );
        Ok(())
    }

    // ═════════════════════════════════════════════════════════════════════
    // 4. BUY
    // ═════════════════════════════════════════════════════════════════════
    /// Buyer pays `payment_amount` pay tokens during the funding window and
    /// is credited IDO tokens at the fixed price, up to their ceiling.
    pub fn buy(ctx: Context<Buy>, payment_amount: u64) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        let accounts = &mut *ctx.accounts;

        let mut row = load_buyer_info(&accounts.buyer_info)?;
        let bought = sale::buy(
            &accounts.sale_config,
            &mut accounts.sale_ledger,
            row.as_mut(),
            payment_amount as u128,
            now,
        )?;
        save_buyer_info(&accounts.buyer_info, row.as_ref())?;

        token_interface::transfer_checked(
            CpiContext::new(
                accounts.token_program.to_account_info(),
                TransferChecked {
                    from: accounts.user_pay_account.to_account_info(),
                    mint: accounts.pay_mint.to_account_info(),
                    to: accounts.pay_vault.to_account_info(),
                    authority: accounts.user.to_account_info(),
                },
            ),
            payment_amount,
            accounts.pay_mint.decimals,
        )?;

        emit!(BoughtIdoTokens {
            buyer: accounts.user.key(),
            spend_pay_tokens: payment_amount as u128,
            ido_tokens_to_get: bought,
            timestamp: now,
        });
        msg!(
            "IDO: Buyer {} paid {} for {} IDO tokens (investors: {})",
            accounts.user.key(),
            payment_amount,
            bought,
            accounts.sale_ledger.investor_count
        );
        Ok(())
    }

    // ═════════════════════════════════════════════════════════════════════
    // 5. FUND
    // ═════════════════════════════════════════════════════════════════════
    /// After the funding window, admin deposits the IDO tokens that back
    /// every allocation and locks in the sale.
    pub fn fund_contract(ctx: Context<FundContract>, amount: u64) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        let accounts = &mut *ctx.accounts;
        let total_allocated = accounts.sale_ledger.total_allocated;

        accounts
            .sale_config
            .fund(amount as u128, total_allocated, now)?;

        token_interface::transfer_checked(
            CpiContext::new(
                accounts.token_program.to_account_info(),
                TransferChecked {
                    from: accounts.admin_ido_account.to_account_info(),
                    mint: accounts.ido_mint.to_account_info(),
                    to: accounts.ido_vault.to_account_info(),
                    authority: accounts.admin.to_account_info(),
                },
            ),
            amount,
            accounts.ido_mint.decimals,
        )?;

        emit!(SaleFunded {
            admin: accounts.admin.key(),
            tokens_for_sale: amount as u128,
            total_allocated,
        });
        msg!(
            "IDO: Funded with {} IDO tokens ({} allocated)",
            amount,
            total_allocated
        );
        Ok(())
    }

    // ═════════════════════════════════════════════════════════════════════
    // 6. CLAIM
    // ═════════════════════════════════════════════════════════════════════
    /// Buyer withdraws whatever part of their entitlement has vested.
    pub fn claim_tokens(ctx: Context<ClaimTokens>) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        let accounts = &mut *ctx.accounts;

        let mut row = load_buyer_info(&accounts.buyer_info)?;
        let claimed = sale::claim_tokens(
            &accounts.sale_config,
            &mut accounts.sale_ledger,
            row.as_mut(),
            now,
        )?;
        let amount = u64::try_from(claimed).map_err(|_| SaleError::MathOverflow)?;
        save_buyer_info(&accounts.buyer_info, row.as_ref())?;

        release_from_vault(
            &accounts.token_program,
            &accounts.ido_vault,
            &accounts.ido_mint,
            &accounts.user_ido_account,
            &accounts.sale_authority,
            &accounts.sale_config,
            amount,
        )?;

        emit!(ClaimedIdoTokens {
            buyer: accounts.user.key(),
            ido_tokens_claimed: claimed,
            timestamp: now,
        });
        msg!("IDO: Buyer {} claimed {} IDO tokens", accounts.user.key(), claimed);
        Ok(())
    }

    // ═════════════════════════════════════════════════════════════════════
    // 7. CANCEL / REFUND
    // ═════════════════════════════════════════════════════════════════════
    /// Cancel the sale before it is funded. Buyers can then refund.
    pub fn cancel_sale(ctx: Context<UpdateSaleConfig>) -> Result<()> {
        ctx.accounts.sale_config.cancel()?;

        let now = Clock::get()?.unix_timestamp;
        emit!(SaleCanceled {
            admin: ctx.accounts.admin.key(),
            timestamp: now,
        });
        msg!("IDO: Sale {} canceled", ctx.accounts.sale_config.key());
        Ok(())
    }

    /// Buyer takes back their payment from a canceled sale.
    pub fn claim_refund(ctx: Context<ClaimRefund>) -> Result<()> {
        let accounts = &mut *ctx.accounts;

        let mut row = load_buyer_info(&accounts.buyer_info)?;
        let refunded = sale::claim_refund(
            &accounts.sale_config,
            &mut accounts.sale_ledger,
            row.as_mut(),
        )?;
        let amount = u64::try_from(refunded).map_err(|_| SaleError::MathOverflow)?;
        save_buyer_info(&accounts.buyer_info, row.as_ref())?;

        if amount > 0 {
            release_from_vault(
                &accounts.token_program,
                &accounts.pay_vault,
                &accounts.pay_mint,
                &accounts.user_pay_account,
                &accounts.sale_authority,
                &accounts.sale_config,
                amount,
            )?;
        }

        emit!(RefundClaimed {
            buyer: accounts.user.key(),
            pay_tokens_refunded: refunded,
        });
        msg!("IDO: Refunded {} pay tokens to {}", refunded, accounts.user.key());
        Ok(())
    }

    // ═════════════════════════════════════════════════════════════════════
    // 8. WITHDRAW
    // ═════════════════════════════════════════════════════════════════════
    /// Admin collects raised pay tokens once funding has ended.
    pub fn withdraw_payment(ctx: Context<WithdrawPayment>, amount: u64) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        let accounts = &ctx.accounts;
        accounts.sale_config.ensure_can_withdraw_payment(now)?;

        release_from_vault(
            &accounts.token_program,
            &accounts.pay_vault,
            &accounts.pay_mint,
            &accounts.admin_pay_account,
            &accounts.sale_authority,
            &accounts.sale_config,
            amount,
        )?;

        emit!(PaymentWithdrawn {
            admin: accounts.admin.key(),
            amount,
        });
        msg!("IDO: Admin withdrew {} pay tokens", amount);
        Ok(())
    }

    /// Admin takes back IDO tokens no buyer is owed.
    pub fn withdraw_unsold_tokens(ctx: Context<WithdrawUnsoldTokens>, amount: u64) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        let accounts = &ctx.accounts;
        accounts.sale_config.ensure_can_withdraw_unsold(now)?;
        require!(
            amount <= accounts.sale_ledger.unsold_tokens(accounts.ido_vault.amount),
            SaleError::InsufficientUnsoldTokens
        );

        release_from_vault(
            &accounts.token_program,
            &accounts.ido_vault,
            &accounts.ido_mint,
            &accounts.admin_ido_account,
            &accounts.sale_authority,
            &accounts.sale_config,
            amount,
        )?;

        emit!(UnsoldTokensWithdrawn {
            admin: accounts.admin.key(),
            amount,
        });
        msg!("IDO: Admin withdrew {} unsold IDO tokens", amount);
        Ok(())
    }

    // ═════════════════════════════════════════════════════════════════════
    // 9. VIEWS
    // ═════════════════════════════════════════════════════════════════════
    /// Pay tokens needed to acquire `ido_amount` IDO tokens.
    pub fn quote_payment_for(ctx: Context<SaleView>, ido_amount: u128) -> Result<u128> {
        ctx.accounts.sale_config.price()?.quote_payment_for(ido_amount)
    }

    /// IDO tokens bought with `pay_amount` pay tokens.
    pub fn quote_project_for(ctx: Context<SaleView>, pay_amount: u128) -> Result<u128> {
        ctx.accounts.sale_config.price()?.quote_project_for(pay_amount)
    }

    pub fn get_sale_phase(ctx: Context<SaleView>) -> Result<SalePhase> {
        let now = Clock::get()?.unix_timestamp;
        Ok(ctx.accounts.sale_config.phase(now))
    }

    pub fn get_claimable_now(ctx: Context<BuyerView>, _buyer: Pubkey) -> Result<u128> {
        let now = Clock::get()?.unix_timestamp;
        let row = load_buyer_info(&ctx.accounts.buyer_info)?;
        views::claimable_now(&ctx.accounts.sale_config, row.as_ref(), now)
    }

    pub fn get_buyer_totals(ctx: Context<BuyerView>, _buyer: Pubkey) -> Result<BuyerTotals> {
        let row = load_buyer_info(&ctx.accounts.buyer_info)?;
        Ok(views::buyer_totals(row.as_ref()))
    }

    pub fn is_buyer(ctx: Context<LedgerView>, buyer: Pubkey) -> Result<bool> {
        Ok(views::is_buyer(&ctx.accounts.sale_ledger, &buyer))
    }

    pub fn get_aggregate_totals(ctx: Context<LedgerView>) -> Result<AggregateTotals> {
        Ok(views::aggregate_totals(&ctx.accounts.sale_ledger))
    }

    /// One page of the buyer roster, in purchase order.
    pub fn list_buyers(ctx: Context<LedgerView>, offset: u32) -> Result<Vec<Pubkey>> {
        Ok(views::buyers_page(&ctx.accounts.sale_ledger, offset))
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// BUYER ROW ACCESS
// ═════════════════════════════════════════════════════════════════════════════
// Buy, claim, refund and the buyer views take the row as an unchecked PDA so a
// missing row surfaces as `NotRegistered` / `NotABuyer` instead of a generic
// deserialization failure.

fn load_buyer_info(info: &AccountInfo) -> Result<Option<BuyerInfo>> {
    if info.data_is_empty() {
        return Ok(None);
    }
    require!(info.owner == &crate::ID, SaleError::NotABuyer);
    let data = info.try_borrow_data()?;
    let row = BuyerInfo::try_deserialize(&mut &data[..])?;
    Ok(Some(row))
}

fn save_buyer_info(info: &AccountInfo, row: Option<&BuyerInfo>) -> Result<()> {
    if let Some(row) = row {
        let mut data = info.try_borrow_mut_data()?;
        row.try_serialize(&mut &mut data[..])?;
    }
    Ok(())
}

/// Moves `amount` out of a sale vault, signed by the sale-authority PDA.
fn release_from_vault<'info>(
    token_program: &Interface<'info, TokenInterface>,
    vault: &InterfaceAccount<'info, TokenAccount>,
    mint: &InterfaceAccount<'info, Mint>,
    to: &InterfaceAccount<'info, TokenAccount>,
    sale_authority: &UncheckedAccount<'info>,
    sale_config: &Account<'info, SaleConfig>,
    amount: u64,
) -> Result<()> {
    let sale_key = sale_config.key();
    let bump = [sale_config.authority_bump];
    let authority_seeds: &[&[u8]] = &[SALE_AUTHORITY_SEED, sale_key.as_ref(), &bump];

    token_interface::transfer_checked(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            TransferChecked {
                from: vault.to_account_info(),
                mint: mint.to_account_info(),
                to: to.to_account_info(),
                authority: sale_authority.to_account_info(),
            },
            &[authority_seeds],
        ),
        amount,
        mint.decimals,
    )
}

// ═════════════════════════════════════════════════════════════════════════════
// ACCOUNT CONTEXTS
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Sale admin, pays for every account created here.
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Sale configuration; its address identifies the sale.
    #[account(init, payer = admin, space = SaleConfig::MAX_SIZE)]
    pub sale_config: Box<Account<'info, SaleConfig>>,

    /// Sale-wide totals and buyer roster.
    #[account(
        init,
        payer = admin,
        space = SaleLedger::MAX_SIZE,
        seeds = [SALE_LEDGER_SEED, sale_config.key().as_ref()],
        bump,
    )]
    pub sale_ledger: Box<Account<'info, SaleLedger>>,

    /// CHECK: PDA that owns both vaults; holds no data.
    #[account(
        seeds = [SALE_AUTHORITY_SEED, sale_config.key().as_ref()],
        bump,
    )]
    pub sale_authority: UncheckedAccount<'info>,

    /// Token buyers pay with.
    #[account(mint::token_program = token_program)]
    pub pay_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Token being sold.
    #[account(mint::token_program = token_program)]
    pub ido_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Escrow for buyer payments.
    #[account(
        init,
        payer = admin,
        seeds = [PAY_VAULT_SEED, sale_config.key().as_ref()],
        bump,
        token::mint = pay_mint,
        token::authority = sale_authority,
        token::token_program = token_program,
    )]
    pub pay_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Escrow for IDO tokens deposited at funding.
    #[account(
        init,
        payer = admin,
        seeds = [IDO_VAULT_SEED, sale_config.key().as_ref()],
        bump,
        token::mint = ido_mint,
        token::authority = sale_authority,
        token::token_program = token_program,
    )]
    pub ido_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

/// Validation for admin setters on the sale configuration.
#[derive(Accounts)]
pub struct UpdateSaleConfig<'info> {
    #[account(mut, has_one = admin @ SaleError::Unauthorized)]
    pub sale_config: Account<'info, SaleConfig>,
    pub admin: Signer<'info>,
}

#[derive(Accounts)]
#[instruction(buyer: Pubkey)]
pub struct CreateBuyerInfo<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(has_one = admin @ SaleError::Unauthorized)]
    pub sale_config: Box<Account<'info, SaleConfig>>,

    #[account(
        mut,
        seeds = [SALE_LEDGER_SEED, sale_config.key().as_ref()],
        bump = sale_ledger.bump,
    )]
    pub sale_ledger: Box<Account<'info, SaleLedger>>,

    /// Created here; an existing row is rejected with `AlreadyExists`.
    #[account(
        init_if_needed,
        payer = admin,
        space = BuyerInfo::MAX_SIZE,
        seeds = [sale_config.key().as_ref(), BUYER_INFO_SEED, buyer.as_ref()],
        bump,
    )]
    pub buyer_info: Account<'info, BuyerInfo>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct Buy<'info> {
    pub user: Signer<'info>,

    pub sale_config: Box<Account<'info, SaleConfig>>,

    #[account(
        mut,
        seeds = [SALE_LEDGER_SEED, sale_config.key().as_ref()],
        bump = sale_ledger.bump,
    )]
    pub sale_ledger: Box<Account<'info, SaleLedger>>,

    /// CHECK: buyer row PDA, possibly uninitialized; loaded in the handler.
    #[account(
        mut,
        seeds = [sale_config.key().as_ref(), BUYER_INFO_SEED, user.key().as_ref()],
        bump,
    )]
    pub buyer_info: UncheckedAccount<'info>,

    #[account(address = sale_config.pay_mint @ SaleError::InvalidMint)]
    pub pay_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        token::mint = pay_mint,
        token::authority = user,
    )]
    pub user_pay_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [PAY_VAULT_SEED, sale_config.key().as_ref()],
        bump = sale_config.pay_vault_bump,
    )]
    pub pay_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

#[derive(Accounts)]
pub struct FundContract<'info> {
    pub admin: Signer<'info>,

    #[account(mut, has_one = admin @ SaleError::Unauthorized)]
    pub sale_config: Box<Account<'info, SaleConfig>>,

    #[account(
        seeds = [SALE_LEDGER_SEED, sale_config.key().as_ref()],
        bump = sale_ledger.bump,
    )]
    pub sale_ledger: Box<Account<'info, SaleLedger>>,

    #[account(address = sale_config.ido_mint @ SaleError::InvalidMint)]
    pub ido_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        token::mint = ido_mint,
        token::authority = admin,
    )]
    pub admin_ido_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [IDO_VAULT_SEED, sale_config.key().as_ref()],
        bump = sale_config.ido_vault_bump,
    )]
    pub ido_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

#[derive(Accounts)]
pub struct ClaimTokens<'info> {
    pub user: Signer<'info>,

    pub sale_config: Box<Account<'info, SaleConfig>>,

    #[account(
        mut,
        seeds = [SALE_LEDGER_SEED, sale_config.key().as_ref()],
        bump = sale_ledger.bump,
    )]
    pub sale_ledger: Box<Account<'info, SaleLedger>>,

    /// CHECK: buyer row PDA, possibly uninitialized; loaded in the handler.
    #[account(
        mut,
        seeds = [sale_config.key().as_ref(), BUYER_INFO_SEED, user.key().as_ref()],
        bump,
    )]
    pub buyer_info: UncheckedAccount<'info>,

    /// CHECK: vault authority PDA; signs the release.
    #[account(
        seeds = [SALE_AUTHORITY_SEED, sale_config.key().as_ref()],
        bump = sale_config.authority_bump,
    )]
    pub sale_authority: UncheckedAccount<'info>,

    #[account(address = sale_config.ido_mint @ SaleError::InvalidMint)]
    pub ido_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        seeds = [IDO_VAULT_SEED, sale_config.key().as_ref()],
        bump = sale_config.ido_vault_bump,
    )]
    pub ido_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = ido_mint,
        token::authority = user,
    )]
    pub user_ido_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

#[derive(Accounts)]
pub struct ClaimRefund<'info> {
    pub user: Signer<'info>,

    pub sale_config: Box<Account<'info, SaleConfig>>,

    #[account(
        mut,
        seeds = [SALE_LEDGER_SEED, sale_config.key().as_ref()],
        bump = sale_ledger.bump,
    )]
    pub sale_ledger: Box<Account<'info, SaleLedger>>,

    /// CHECK: buyer row PDA, possibly uninitialized; loaded in the handler.
    #[account(
        mut,
        seeds = [sale_config.key().as_ref(), BUYER_INFO_SEED, user.key().as_ref()],
        bump,
    )]
    pub buyer_info: UncheckedAccount<'info>,

    /// CHECK: vault authority PDA; signs the refund.
    #[account(
        seeds = [SALE_AUTHORITY_SEED, sale_config.key().as_ref()],
        bump = sale_config.authority_bump,
    )]
    pub sale_authority: UncheckedAccount<'info>,

    #[account(address = sale_config.pay_mint @ SaleError::InvalidMint)]
    pub pay_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        seeds = [PAY_VAULT_SEED, sale_config.key().as_ref()],
        bump = sale_config.pay_vault_bump,
    )]
    pub pay_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = pay_mint,
        token::authority = user,
    )]
    pub user_pay_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

#[derive(Accounts)]
pub struct WithdrawPayment<'info> {
    pub admin: Signer<'info>,

    #[account(has_one = admin @ SaleError::Unauthorized)]
    pub sale_config: Box<Account<'info, SaleConfig>>,

    /// CHECK: vault authority PDA; signs the withdrawal.
    #[account(
        seeds = [SALE_AUTHORITY_SEED, sale_config.key().as_ref()],
        bump = sale_config.authority_bump,
    )]
    pub sale_authority: UncheckedAccount<'info>,

    #[account(address = sale_config.pay_mint @ SaleError::InvalidMint)]
    pub pay_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        seeds = [PAY_VAULT_SEED, sale_config.key().as_ref()],
        bump = sale_config.pay_vault_bump,
    )]
    pub pay_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, token::mint = pay_mint)]
    pub admin_pay_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

#[derive(Accounts)]
pub struct WithdrawUnsoldTokens<'info> {
    pub admin: Signer<'info>,

    #[account(has_one = admin @ SaleError::Unauthorized)]
    pub sale_config: Box<Account<'info, SaleConfig>>,

    #[account(
        seeds = [SALE_LEDGER_SEED, sale_config.key().as_ref()],
        bump = sale_ledger.bump,
    )]
    pub sale_ledger: Box<Account<'info, SaleLedger>>,

    /// CHECK: vault authority PDA; signs the withdrawal.
    #[account(
        seeds = [SALE_AUTHORITY_SEED, sale_config.key().as_ref()],
        bump = sale_config.authority_bump,
    )]
    pub sale_authority: UncheckedAccount<'info>,

    #[account(address = sale_config.ido_mint @ SaleError::InvalidMint)]
    pub ido_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        seeds = [IDO_VAULT_SEED, sale_config.key().as_ref()],
        bump = sale_config.ido_vault_bump,
    )]
    pub ido_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, token::mint = ido_mint)]
    pub admin_ido_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

#[derive(Accounts)]
pub struct SaleView<'info> {
    pub sale_config: Account<'info, SaleConfig>,
}

#[derive(Accounts)]
#[instruction(buyer: Pubkey)]
pub struct BuyerView<'info> {
    pub sale_config: Account<'info, SaleConfig>,

    /// CHECK: buyer row PDA, possibly uninitialized; read in the handler.
    #[account(
        seeds = [sale_config.key().as_ref(), BUYER_INFO_SEED, buyer.as_ref()],
        bump,
    )]
    pub buyer_info: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct LedgerView<'info> {
    pub sale_config: Account<'info, SaleConfig>,

    #[account(
        seeds = [SALE_LEDGER_SEED, sale_config.key().as_ref()],
        bump = sale_ledger.bump,
    )]
    pub sale_ledger: Account<'info, SaleLedger>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::error_code;

    fn row_account_data(row: &BuyerInfo) -> Vec<u8> {
        let mut data = vec![0u8; BuyerInfo::MAX_SIZE];
        row.try_serialize(&mut &mut data[..]).unwrap();
        data
    }

    #[test]
    fn missing_row_loads_as_none() {
        let key = Pubkey::new_unique();
        let mut lamports = 0;
        let mut data: Vec<u8> = Vec::new();
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &crate::ID, false, 0);

        assert!(load_buyer_info(&info).unwrap().is_none());
        save_buyer_info(&info, None).unwrap();
    }

    #[test]
    fn row_written_by_handler_reads_back() {
        let key = Pubkey::new_unique();
        let mut lamports = 1;
        let mut row = BuyerInfo {
            sale: Pubkey::new_unique(),
            buyer: Pubkey::new_unique(),
            allocation_ceiling: 10,
            ..BuyerInfo::default()
        };
        let mut data = row_account_data(&row);
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &crate::ID, false, 0);

        row.entitlement = 7;
        row.paid = 3;
        save_buyer_info(&info, Some(&row)).unwrap();

        let loaded = load_buyer_info(&info).unwrap().unwrap();
        assert_eq!(loaded.entitlement, 7);
        assert_eq!(loaded.paid, 3);
        assert_eq!(loaded.buyer, row.buyer);
    }

    #[test]
    fn foreign_owned_row_is_not_a_buyer() {
        let key = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let mut lamports = 1;
        let mut data = row_account_data(&BuyerInfo::default());
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &owner, false, 0);

        let err = load_buyer_info(&info).unwrap_err();
        assert_eq!(error_code(err), u32::from(SaleError::NotABuyer));
    }
}
