// Keeper Raffle - Instruction Processor
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed, set_return_data},
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
    system_instruction,
    sysvar::{clock::Clock, rent::Rent, Sysvar},
};

use crate::{
    constants::RAFFLE_SEED,
    error::RaffleError,
    events,
    instruction::{raffle_address, RaffleInstruction},
    oracle,
    state::{Raffle, RaffleConfig},
    utils,
};

pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = RaffleInstruction::unpack(instruction_data)?;

        match instruction {
            RaffleInstruction::InitializeRaffle {
                entrance_fee,
                interval,
                oracle,
                oracle_params,
            } => {
                msg!("Instruction: Initialize Raffle");
                let config = RaffleConfig {
                    entrance_fee,
                    interval,
                    oracle,
                    oracle_params,
                };
                Self::process_initialize_raffle(accounts, config, program_id)
            }
            RaffleInstruction::Enter { amount } => {
                msg!("Instruction: Enter");
                Self::process_enter(accounts, amount, program_id)
            }
            RaffleInstruction::CheckUpkeep => {
                msg!("Instruction: Check Upkeep");
                Self::process_check_upkeep(accounts, program_id)
            }
            RaffleInstruction::PerformUpkeep { .. } => {
                msg!("Instruction: Perform Upkeep");
                Self::process_perform_upkeep(accounts, program_id)
            }
            RaffleInstruction::FulfillRandomWords {
                request_id,
                random_word,
            } => {
                msg!("Instruction: Fulfill Random Words");
                Self::process_fulfill_random_words(accounts, request_id, random_word, program_id)
            }
        }
    }

    fn reject(error: RaffleError) -> ProgramError {
        msg!("Rejected: {}", error);
        error.into()
    }

    /// Load the raffle PDA owned by this program
    fn load_raffle(raffle_info: &AccountInfo, program_id: &Pubkey) -> Result<Raffle, ProgramError> {
        if raffle_info.owner != program_id {
            msg!("Raffle account must be owned by the program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let (expected_raffle, _) = raffle_address(program_id);
        if *raffle_info.key != expected_raffle {
            msg!("Invalid raffle account address");
            return Err(ProgramError::InvalidSeeds);
        }

        Raffle::unpack(&raffle_info.data.borrow())
    }

    fn process_initialize_raffle(
        accounts: &[AccountInfo],
        config: RaffleConfig,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let payer_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !payer_info.is_signer {
            msg!("Payer must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        config.validate().map_err(Self::reject)?;

        let (expected_raffle, bump_seed) = raffle_address(program_id);
        if *raffle_info.key != expected_raffle {
            msg!("Invalid raffle account address");
            return Err(ProgramError::InvalidSeeds);
        }

        if raffle_info.owner == program_id {
            let existing = Raffle::unpack_unchecked(&raffle_info.data.borrow())?;
            if existing.is_initialized {
                msg!("Raffle account is already initialized");
                return Err(ProgramError::AccountAlreadyInitialized);
            }
        } else {
            Self::create_raffle_account(
                payer_info,
                raffle_info,
                system_program_info,
                bump_seed,
                program_id,
            )?;
        }

        let clock = Clock::get()?;
        let raffle = Raffle::new(bump_seed, config, clock.unix_timestamp);
        Raffle::pack(raffle, &mut raffle_info.data.borrow_mut())?;

        msg!(
            "Raffle initialized: EntranceFee={}, Interval={}s, Oracle={}",
            config.entrance_fee,
            config.interval,
            config.oracle
        );
        Ok(())
    }

    /// Create the raffle PDA, or take over an address that already holds lamports
    fn create_raffle_account<'a>(
        payer_info: &AccountInfo<'a>,
        raffle_info: &AccountInfo<'a>,
        system_program_info: &AccountInfo<'a>,
        bump_seed: u8,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let rent = Rent::get()?;
        let required_lamports = rent.minimum_balance(Raffle::LEN);
        let signer_seeds: &[&[u8]] = &[RAFFLE_SEED, &[bump_seed]];

        if raffle_info.lamports() == 0 {
            msg!("Creating raffle account");
            return invoke_signed(
                &system_instruction::create_account(
                    payer_info.key,
                    raffle_info.key,
                    required_lamports,
                    Raffle::LEN as u64,
                    program_id,
                ),
                &[
                    payer_info.clone(),
                    raffle_info.clone(),
                    system_program_info.clone(),
                ],
                &[signer_seeds],
            );
        }

        // create_account refuses funded addresses, so top up, allocate and assign
        msg!(
            "Raffle address already holds {} lamports, taking it over",
            raffle_info.lamports()
        );
        let shortfall = required_lamports.saturating_sub(raffle_info.lamports());
        if shortfall > 0 {
            invoke(
                &system_instruction::transfer(payer_info.key, raffle_info.key, shortfall),
                &[
                    payer_info.clone(),
                    raffle_info.clone(),
                    system_program_info.clone(),
                ],
            )?;
        }

        invoke_signed(
            &system_instruction::allocate(raffle_info.key, Raffle::LEN as u64),
            &[raffle_info.clone(), system_program_info.clone()],
            &[signer_seeds],
        )?;

        invoke_signed(
            &system_instruction::assign(raffle_info.key, program_id),
            &[raffle_info.clone(), system_program_info.clone()],
            &[signer_seeds],
        )
    }

    fn process_enter(accounts: &[AccountInfo], amount: u64, program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let player_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !player_info.is_signer {
            msg!("Player must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        let raffle = Self::load_raffle(raffle_info, program_id)?;
        let next = raffle.enter(*player_info.key, amount).map_err(Self::reject)?;

        invoke(
            &system_instruction::transfer(player_info.key, raffle_info.key, amount),
            &[
                player_info.clone(),
                raffle_info.clone(),
                system_program_info.clone(),
            ],
        )?;

        let entries = next.number_of_players();
        let pool_balance = next.pool_balance();
        Raffle::pack(next, &mut raffle_info.data.borrow_mut())?;

        msg!("Entry accepted: {} entries, pool {} lamports", entries, pool_balance);
        events::emit_raffle_entered(*player_info.key, amount)
    }

    fn process_check_upkeep(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let raffle_info = next_account_info(account_info_iter)?;

        let raffle = Self::load_raffle(raffle_info, program_id)?;
        let clock = Clock::get()?;
        let check = raffle.upkeep_check(clock.unix_timestamp);

        msg!(
            "Upkeep needed: {} (open={}, time_passed={}, has_balance={}, has_players={})",
            check.upkeep_needed(),
            check.is_open,
            check.time_passed,
            check.has_balance,
            check.has_players
        );
        set_return_data(&[check.upkeep_needed() as u8]);
        Ok(())
    }

    fn process_perform_upkeep(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let raffle_info = next_account_info(account_info_iter)?;

        let raffle = Self::load_raffle(raffle_info, program_id)?;
        let clock = Clock::get()?;
        let (next, request) = raffle
            .begin_draw(clock.unix_timestamp)
            .map_err(Self::reject)?;

        Raffle::pack(next, &mut raffle_info.data.borrow_mut())?;

        events::emit_random_words_requested(request)
    }

    fn process_fulfill_random_words(
        accounts: &[AccountInfo],
        request_id: u64,
        random_word: u64,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let oracle_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let winner_info = next_account_info(account_info_iter)?;

        let raffle = Self::load_raffle(raffle_info, program_id)?;
        oracle::verify_oracle_caller(oracle_info, &raffle.oracle).map_err(Self::reject)?;

        let clock = Clock::get()?;
        let (next, outcome) = raffle
            .settle_draw(oracle_info.key, request_id, random_word, clock.unix_timestamp)
            .map_err(Self::reject)?;

        msg!(
            "Request {} issued at {} drew index {} of {} at {}",
            request_id,
            outcome.requested_at,
            outcome.winner_index,
            raffle.number_of_players(),
            clock.unix_timestamp
        );

        if *winner_info.key != outcome.winner {
            msg!(
                "Winner account {} does not match drawn player {}",
                winner_info.key,
                outcome.winner
            );
            return Err(Self::reject(RaffleError::PayoutFailed));
        }

        // The raffle is reopened and the pool zeroed before any lamports move;
        // a failed payout puts the snapshot back
        Raffle::pack(next, &mut raffle_info.data.borrow_mut())?;

        let reserve = Rent::get()?.minimum_balance(raffle_info.data_len());
        if let Err(error) =
            utils::pay_from_program_account(raffle_info, winner_info, outcome.payout, reserve)
        {
            Raffle::pack(raffle, &mut raffle_info.data.borrow_mut())?;
            return Err(Self::reject(error));
        }

        events::emit_winner_picked(outcome.winner, outcome.payout, outcome.request_id)
    }
}

