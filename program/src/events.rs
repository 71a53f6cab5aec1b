// Keeper Raffle - Events
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{log::sol_log_data, msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{
    constants::{
        RAFFLE_ENTERED_DISCRIMINATOR, RANDOM_WORDS_REQUESTED_DISCRIMINATOR,
        WINNER_PICKED_DISCRIMINATOR,
    },
    oracle::{OracleParams, RandomnessRequest},
};

/// An event written to the program log as `[discriminator, borsh payload]`
pub trait Event: BorshSerialize {
    const DISCRIMINATOR: [u8; 8];

    fn emit(&self) -> Result<(), ProgramError> {
        let payload = self
            .try_to_vec()
            .map_err(|e| ProgramError::BorshIoError(e.to_string()))?;
        sol_log_data(&[Self::DISCRIMINATOR.as_ref(), payload.as_slice()]);
        Ok(())
    }
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RaffleEntered {
    pub player: Pubkey,
    pub amount: u64,
}

impl Event for RaffleEntered {
    const DISCRIMINATOR: [u8; 8] = RAFFLE_ENTERED_DISCRIMINATOR;
}

/// Picked up by the off-chain oracle; it answers with `FulfillRandomWords`
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RandomWordsRequested {
    pub request_id: u64,
    pub oracle: Pubkey,
    pub params: OracleParams,
}

impl Event for RandomWordsRequested {
    const DISCRIMINATOR: [u8; 8] = RANDOM_WORDS_REQUESTED_DISCRIMINATOR;
}

impl From<RandomnessRequest> for RandomWordsRequested {
    fn from(request: RandomnessRequest) -> Self {
        Self {
            request_id: request.request_id,
            oracle: request.oracle,
            params: request.params,
        }
    }
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct WinnerPicked {
    pub winner: Pubkey,
    pub amount: u64,
    pub request_id: u64,
}

impl Event for WinnerPicked {
    const DISCRIMINATOR: [u8; 8] = WINNER_PICKED_DISCRIMINATOR;
}

pub fn emit_raffle_entered(player: Pubkey, amount: u64) -> Result<(), ProgramError> {
    msg!("RaffleEntered: player={}, amount={}", player, amount);
    RaffleEntered { player, amount }.emit()
}

pub fn emit_random_words_requested(request: RandomnessRequest) -> Result<(), ProgramError> {
    msg!(
        "RandomWordsRequested: request_id={}, oracle={}, confirmations={}, num_words={}",
        request.request_id,
        request.oracle,
        request.params.request_confirmations,
        request.params.num_words
    );
    RandomWordsRequested::from(request).emit()
}

pub fn emit_winner_picked(winner: Pubkey, amount: u64, request_id: u64) -> Result<(), ProgramError> {
    msg!(
        "WinnerPicked: winner={}, amount={}, request_id={}",
        winner,
        amount,
        request_id
    );
    WinnerPicked {
        winner,
        amount,
        request_id,
    }
    .emit()
}
