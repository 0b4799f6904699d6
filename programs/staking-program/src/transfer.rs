use crate::{constants::*, error::ErrorCode};
use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, TransferChecked};

/// Moves units of the staked asset between a holder and the ledger's custody.
///
/// The ledger never mints or burns. Every failure is reported as
/// `ErrorCode::TransferFailed` (or `UnauthorizedUser` for a holder the port
/// cannot act for) and must leave balances untouched.
pub trait AssetTransferPort {
    fn transfer_in(&mut self, from: &Pubkey, amount: u64) -> Result<()>;
    fn transfer_out(&mut self, to: &Pubkey, amount: u64) -> Result<()>;
    fn balance_of(&self, account: &Pubkey) -> u64;
}

/// SPL Token adapter between one holder's token account and the pool vault.
///
/// Inbound transfers are authorized by the holder's signature, outbound ones
/// by the vault-authority PDA. Balances are snapshots taken when the accounts
/// were loaded and kept current as transfers go through.
pub struct VaultTransfer<'info> {
    token_program: AccountInfo<'info>,
    mint: AccountInfo<'info>,
    decimals: u8,
    vault: AccountInfo<'info>,
    vault_balance: u64,
    vault_authority: AccountInfo<'info>,
    vault_authority_bump: u8,
    pool: Pubkey,
    holder: AccountInfo<'info>,
    holder_token: AccountInfo<'info>,
    holder_balance: u64,
}

impl<'info> VaultTransfer<'info> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        token_program: &Program<'info, Token>,
        mint: &Account<'info, Mint>,
        vault: &Account<'info, TokenAccount>,
        vault_authority: &UncheckedAccount<'info>,
        vault_authority_bump: u8,
        pool: Pubkey,
        holder: &Signer<'info>,
        holder_token: &Account<'info, TokenAccount>,
    ) -> Self {
        Self {
            token_program: token_program.to_account_info(),
            mint: mint.to_account_info(),
            decimals: mint.decimals,
            vault: vault.to_account_info(),
            vault_balance: vault.amount,
            vault_authority: vault_authority.to_account_info(),
            vault_authority_bump,
            pool,
            holder: holder.to_account_info(),
            holder_token: holder_token.to_account_info(),
            holder_balance: holder_token.amount,
        }
    }

    fn ensure_holder(&self, account: &Pubkey) -> Result<()> {
        require_keys_eq!(*account, *self.holder.key, ErrorCode::UnauthorizedUser);
        Ok(())
    }
}

impl<'info> AssetTransferPort for VaultTransfer<'info> {
    fn transfer_in(&mut self, from: &Pubkey, amount: u64) -> Result<()> {
        self.ensure_holder(from)?;
        // A failed CPI aborts the transaction, so TransferFailed is only
        // reported from these balance checks.
        if self.holder_balance < amount {
            msg!(
                "Holder {} has {} tokens, cannot move {} into the vault",
                from,
                self.holder_balance,
                amount
            );
            return err!(ErrorCode::TransferFailed);
        }

        let cpi_ctx = CpiContext::new(
            self.token_program.clone(),
            TransferChecked {
                from: self.holder_token.clone(),
                mint: self.mint.clone(),
                to: self.vault.clone(),
                authority: self.holder.clone(),
            },
        );
        token::transfer_checked(cpi_ctx, amount, self.decimals)?;

        self.holder_balance -= amount;
        self.vault_balance = self
            .vault_balance
            .checked_add(amount)
            .ok_or(ErrorCode::ArithmeticOverflow)?;
        Ok(())
    }

    fn transfer_out(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
        self.ensure_holder(to)?;
        // Same as transfer_in: reported before the CPI or not at all.
        if self.vault_balance < amount {
            msg!(
                "Vault holds {} tokens, cannot pay out {}",
                self.vault_balance,
                amount
            );
            return err!(ErrorCode::TransferFailed);
        }

        let signer_seeds: &[&[&[u8]]] = &[&[
            VAULT_AUTHORITY_SEED.as_bytes(),
            self.pool.as_ref(),
            &[self.vault_authority_bump],
        ]];
        let cpi_ctx = CpiContext::new_with_signer(
            self.token_program.clone(),
            TransferChecked {
                from: self.vault.clone(),
                mint: self.mint.clone(),
                to: self.holder_token.clone(),
                authority: self.vault_authority.clone(),
            },
            signer_seeds,
        );
        token::transfer_checked(cpi_ctx, amount, self.decimals)?;

        self.vault_balance -= amount;
        self.holder_balance = self
            .holder_balance
            .checked_add(amount)
            .ok_or(ErrorCode::ArithmeticOverflow)?;
        Ok(())
    }

    fn balance_of(&self, account: &Pubkey) -> u64 {
        if *account == *self.holder.key {
            self.holder_balance
        } else if *account == *self.vault.key {
            self.vault_balance
        } else {
            0
        }
    }
}
