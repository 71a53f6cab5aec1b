// Keeper Raffle
// A self-running raffle: entries close on a timer, an oracle supplies the
// randomness and the whole pool goes to the drawn player

pub mod constants;
pub mod error;
pub mod events;
pub mod instruction;
pub mod lifecycle;
pub mod oracle;
pub mod processor;
pub mod state;
pub mod utils;

#[cfg(not(feature = "no-entrypoint"))]
mod entrypoint;

use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey};

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    processor::Processor::process(program_id, accounts, instruction_data)
}
