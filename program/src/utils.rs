// Keeper Raffle - Utility Functions
use solana_program::{account_info::AccountInfo, msg};

use crate::error::RaffleError;

/// Move `amount` lamports out of a program-owned account.
///
/// `from` keeps at least `reserve` lamports (its rent-exempt minimum).
pub fn pay_from_program_account(
    from: &AccountInfo,
    to: &AccountInfo,
    amount: u64,
    reserve: u64,
) -> Result<(), RaffleError> {
    if !to.is_writable {
        msg!("Winner account {} is not writable", to.key);
        return Err(RaffleError::PayoutFailed);
    }

    let available = from.lamports().saturating_sub(reserve);
    if available < amount {
        msg!(
            "Pool holds {} spendable lamports, payout needs {}",
            available,
            amount
        );
        return Err(RaffleError::PayoutFailed);
    }

    let credited = to
        .lamports()
        .checked_add(amount)
        .ok_or(RaffleError::PayoutFailed)?;

    let mut from_lamports = from
        .try_borrow_mut_lamports()
        .map_err(|_| RaffleError::PayoutFailed)?;
    let mut to_lamports = to
        .try_borrow_mut_lamports()
        .map_err(|_| RaffleError::PayoutFailed)?;
    **from_lamports -= amount;
    **to_lamports = credited;

    Ok(())
}
