// Keeper Raffle - Instructions
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

use crate::{constants::RAFFLE_SEED, error::RaffleError, oracle::OracleParams};

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub enum RaffleInstruction {
    /// Create the raffle account and fix its configuration
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The payer funding the raffle account
    /// 1. `[writable]` The raffle account (PDA)
    /// 2. `[]` The system program
    InitializeRaffle {
        /// Minimum payment per entry in lamports
        entrance_fee: u64,
        /// Seconds between draws
        interval: i64,
        /// Key that signs randomness fulfillments
        oracle: Pubkey,
        /// Forwarded to the oracle with every request
        oracle_params: OracleParams,
    },

    /// Enter the raffle
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The player paying the entrance fee
    /// 1. `[writable]` The raffle account
    /// 2. `[]` The system program
    Enter {
        /// Lamports paid, at least the entrance fee
        amount: u64,
    },

    /// Report whether a draw may start; the answer is set as return data
    ///
    /// Accounts expected:
    /// 0. `[]` The raffle account
    CheckUpkeep,

    /// Close entries and request randomness (anyone may call)
    ///
    /// Accounts expected:
    /// 0. `[writable]` The raffle account
    PerformUpkeep {
        /// Opaque data from the automation service, ignored
        perform_data: Vec<u8>,
    },

    /// Deliver the oracle's answer, pick the winner and pay the pool
    ///
    /// Accounts expected:
    /// 0. `[signer]` The randomness oracle
    /// 1. `[writable]` The raffle account
    /// 2. `[writable]` The winning player
    FulfillRandomWords {
        /// Id from the `RandomWordsRequested` event
        request_id: u64,
        /// The random value
        random_word: u64,
    },
}

impl RaffleInstruction {
    /// Unpacks a byte buffer into a RaffleInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| RaffleError::InvalidInstruction.into())
    }
}

/// Address and bump of the raffle account
pub fn raffle_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[RAFFLE_SEED], program_id)
}

/// Create initialize_raffle instruction with the default confirmations and word count
pub fn initialize_raffle(
    program_id: &Pubkey,
    payer: &Pubkey,
    entrance_fee: u64,
    interval: i64,
    oracle: &Pubkey,
    key_hash: [u8; 32],
    callback_gas_limit: u32,
) -> Instruction {
    initialize_raffle_with_params(
        program_id,
        payer,
        entrance_fee,
        interval,
        oracle,
        OracleParams::new(key_hash, callback_gas_limit),
    )
}

/// Create initialize_raffle instruction with explicit oracle parameters
pub fn initialize_raffle_with_params(
    program_id: &Pubkey,
    payer: &Pubkey,
    entrance_fee: u64,
    interval: i64,
    oracle: &Pubkey,
    oracle_params: OracleParams,
) -> Instruction {
    let (raffle, _) = raffle_address(program_id);

    Instruction::new_with_borsh(
        *program_id,
        &RaffleInstruction::InitializeRaffle {
            entrance_fee,
            interval,
            oracle: *oracle,
            oracle_params,
        },
        vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(raffle, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

/// Create enter instruction
pub fn enter(program_id: &Pubkey, player: &Pubkey, amount: u64) -> Instruction {
    let (raffle, _) = raffle_address(program_id);

    Instruction::new_with_borsh(
        *program_id,
        &RaffleInstruction::Enter { amount },
        vec![
            AccountMeta::new(*player, true),
            AccountMeta::new(raffle, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

/// Create check_upkeep instruction
pub fn check_upkeep(program_id: &Pubkey) -> Instruction {
    let (raffle, _) = raffle_address(program_id);

    Instruction::new_with_borsh(
        *program_id,
        &RaffleInstruction::CheckUpkeep,
        vec![AccountMeta::new_readonly(raffle, false)],
    )
}

/// Create perform_upkeep instruction
pub fn perform_upkeep(program_id: &Pubkey, perform_data: Vec<u8>) -> Instruction {
    let (raffle, _) = raffle_address(program_id);

    Instruction::new_with_borsh(
        *program_id,
        &RaffleInstruction::PerformUpkeep { perform_data },
        vec![AccountMeta::new(raffle, false)],
    )
}

/// Create fulfill_random_words instruction
pub fn fulfill_random_words(
    program_id: &Pubkey,
    oracle: &Pubkey,
    winner: &Pubkey,
    request_id: u64,
    random_word: u64,
) -> Instruction {
    let (raffle, _) = raffle_address(program_id);

    Instruction::new_with_borsh(
        *program_id,
        &RaffleInstruction::FulfillRandomWords {
            request_id,
            random_word,
        },
        vec![
            AccountMeta::new_readonly(*oracle, true),
            AccountMeta::new(raffle, false),
            AccountMeta::new(*winner, false),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_rejects_garbage() {
        assert_eq!(
            RaffleInstruction::unpack(&[42, 1, 2]),
            Err(RaffleError::InvalidInstruction.into())
        );
        assert_eq!(
            RaffleInstruction::unpack(&[]),
            Err(RaffleError::InvalidInstruction.into())
        );
    }

    #[test]
    fn test_initialize_uses_default_oracle_params() {
        let program_id = Pubkey::new_unique();
        let payer = Pubkey::new_unique();
        let oracle = Pubkey::new_unique();

        let ix = initialize_raffle(&program_id, &payer, 100, 30, &oracle, [9; 32], 500_000);

        assert_eq!(ix.accounts[0], AccountMeta::new(payer, true));
        assert_eq!(
            RaffleInstruction::unpack(&ix.data),
            Ok(RaffleInstruction::InitializeRaffle {
                entrance_fee: 100,
                interval: 30,
                oracle,
                oracle_params: OracleParams {
                    key_hash: [9; 32],
                    request_confirmations: 3,
                    callback_gas_limit: 500_000,
                    num_words: 1,
                },
            })
        );
    }

    #[test]
    fn test_perform_upkeep_needs_no_signer() {
        let program_id = Pubkey::new_unique();
        let (raffle, _) = raffle_address(&program_id);

        let ix = perform_upkeep(&program_id, vec![1, 2]);

        assert_eq!(ix.accounts, vec![AccountMeta::new(raffle, false)]);
    }

    #[test]
    fn test_builders_target_raffle_pda() {
        let program_id = Pubkey::new_unique();
        let oracle = Pubkey::new_unique();
        let winner = Pubkey::new_unique();
        let (raffle, _) = raffle_address(&program_id);

        let ix = fulfill_random_words(&program_id, &oracle, &winner, 3, 7);

        assert_eq!(ix.program_id, program_id);
        assert_eq!(ix.accounts[0], AccountMeta::new_readonly(oracle, true));
        assert_eq!(ix.accounts[1], AccountMeta::new(raffle, false));
        assert_eq!(ix.accounts[2], AccountMeta::new(winner, false));
        assert_eq!(
            RaffleInstruction::unpack(&ix.data),
            Ok(RaffleInstruction::FulfillRandomWords {
                request_id: 3,
                random_word: 7,
            })
        );
    }
}
