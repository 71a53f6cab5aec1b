// Randomness oracle boundary for the Keeper Raffle program
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{account_info::AccountInfo, msg, pubkey::Pubkey};

use crate::{
    constants::{NUM_WORDS, REQUEST_CONFIRMATIONS},
    error::RaffleError,
};

/// Request parameters forwarded to the oracle as-is
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OracleParams {
    /// Oracle key / price lane selector
    pub key_hash: [u8; 32],
    /// Confirmations the oracle waits for before answering
    pub request_confirmations: u16,
    /// Compute budget the oracle should attach to its callback
    pub callback_gas_limit: u32,
    /// Random words requested per draw
    pub num_words: u32,
}

impl OracleParams {
    pub fn new(key_hash: [u8; 32], callback_gas_limit: u32) -> Self {
        Self {
            key_hash,
            request_confirmations: REQUEST_CONFIRMATIONS,
            callback_gas_limit,
            num_words: NUM_WORDS,
        }
    }
}

/// A randomness request issued to the oracle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RandomnessRequest {
    pub request_id: u64,
    pub oracle: Pubkey,
    pub params: OracleParams,
}

// Only the configured oracle, signing the transaction, may deliver randomness
pub fn verify_oracle_caller(
    oracle_info: &AccountInfo,
    expected_oracle: &Pubkey,
) -> Result<(), RaffleError> {
    if !oracle_info.is_signer {
        msg!("Oracle account must sign the fulfillment");
        return Err(RaffleError::UnauthorizedCaller);
    }

    if oracle_info.key != expected_oracle {
        msg!(
            "Fulfillment signed by {}, expected oracle {}",
            oracle_info.key,
            expected_oracle
        );
        return Err(RaffleError::UnauthorizedCaller);
    }

    Ok(())
}

// Get the winning slot from the oracle's random word
pub fn winner_index(random_word: u64, player_count: usize) -> Option<usize> {
    if player_count == 0 {
        return None;
    }

    Some((random_word % player_count as u64) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winner_index_wraps_random_word() {
        assert_eq!(winner_index(7, 3), Some(1));
        assert_eq!(winner_index(u64::MAX, 1), Some(0));
        assert_eq!(winner_index(2, 5), Some(2));
    }

    #[test]
    fn test_winner_index_without_players() {
        assert_eq!(winner_index(7, 0), None);
    }
}
