// Keeper Raffle - State
use arrayref::{array_mut_ref, array_ref, array_refs, mut_array_refs};
use solana_program::{
    clock::UnixTimestamp,
    program_error::ProgramError,
    program_pack::{IsInitialized, Pack, Sealed},
    pubkey::{Pubkey, PUBKEY_BYTES},
};
use std::convert::TryFrom;

use crate::{
    constants::{FIRST_REQUEST_ID, MAX_PLAYERS},
    error::RaffleError,
    oracle::OracleParams,
};

/// Phase of the draw cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaffleState {
    /// Taking entries, a draw may be started
    Open,
    /// Waiting for the oracle to answer the outstanding request
    Drawing,
}

impl TryFrom<u8> for RaffleState {
    type Error = &'static str;

    fn try_from(val: u8) -> Result<Self, Self::Error> {
        match val {
            0 => Ok(RaffleState::Open),
            1 => Ok(RaffleState::Drawing),
            _ => Err("Invalid raffle state"),
        }
    }
}

impl From<RaffleState> for u8 {
    fn from(state: RaffleState) -> Self {
        match state {
            RaffleState::Open => 0,
            RaffleState::Drawing => 1,
        }
    }
}

/// The randomness request a draw is waiting on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    /// Identifier the oracle must echo back
    pub request_id: u64,
    /// When the draw was initiated
    pub requested_at: UnixTimestamp,
}

/// Creation-time parameters, immutable afterwards
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RaffleConfig {
    /// Minimum payment per entry, in lamports
    pub entrance_fee: u64,
    /// Seconds that must pass since the last draw before a new one starts
    pub interval: i64,
    /// The only identity allowed to fulfill randomness requests
    pub oracle: Pubkey,
    /// Passed through to the oracle untouched
    pub oracle_params: OracleParams,
}

impl RaffleConfig {
    pub fn validate(&self) -> Result<(), RaffleError> {
        if self.entrance_fee == 0 || self.interval <= 0 {
            return Err(RaffleError::InvalidConfig);
        }
        Ok(())
    }
}

/// Raffle account data
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raffle {
    /// Is the account initialized
    pub is_initialized: bool,
    /// Bump of the raffle PDA
    pub bump: u8,
    /// Current phase
    pub state: RaffleState,
    /// Minimum payment per entry in lamports
    pub entrance_fee: u64,
    /// Draw interval in seconds
    pub interval: i64,
    /// Time of the last completed draw (creation time before the first one)
    pub last_timestamp: UnixTimestamp,
    /// Trusted randomness oracle
    pub oracle: Pubkey,
    /// Opaque oracle request parameters
    pub oracle_params: OracleParams,
    /// Lamports owed to the next winner
    pub pool_balance: u64,
    /// Id handed to the next randomness request
    pub next_request_id: u64,
    /// Outstanding request, present only while drawing
    pub pending_request: Option<PendingRequest>,
    /// Winner of the last completed draw
    pub recent_winner: Pubkey,
    /// Entries in insertion order, one slot per entry
    pub players: Vec<Pubkey>,
}

impl Raffle {
    const HEADER_LEN: usize = 170;
    const PLAYERS_LEN: usize = PUBKEY_BYTES * MAX_PLAYERS;

    /// Create a freshly opened raffle
    pub fn new(bump: u8, config: RaffleConfig, now: UnixTimestamp) -> Self {
        Self {
            is_initialized: true,
            bump,
            state: RaffleState::Open,
            entrance_fee: config.entrance_fee,
            interval: config.interval,
            last_timestamp: now,
            oracle: config.oracle,
            oracle_params: config.oracle_params,
            pool_balance: 0,
            next_request_id: FIRST_REQUEST_ID,
            pending_request: None,
            recent_winner: Pubkey::default(),
            players: Vec::new(),
        }
    }

    pub fn raffle_state(&self) -> RaffleState {
        self.state
    }

    pub fn entrance_fee(&self) -> u64 {
        self.entrance_fee
    }

    pub fn interval(&self) -> i64 {
        self.interval
    }

    pub fn player(&self, index: usize) -> Option<Pubkey> {
        self.players.get(index).copied()
    }

    pub fn number_of_players(&self) -> usize {
        self.players.len()
    }

    pub fn recent_winner(&self) -> Pubkey {
        self.recent_winner
    }

    pub fn latest_timestamp(&self) -> UnixTimestamp {
        self.last_timestamp
    }

    pub fn pending_request(&self) -> Option<PendingRequest> {
        self.pending_request
    }

    pub fn pool_balance(&self) -> u64 {
        self.pool_balance
    }

    pub fn request_confirmations(&self) -> u16 {
        self.oracle_params.request_confirmations
    }

    pub fn num_words(&self) -> u32 {
        self.oracle_params.num_words
    }
}

impl Sealed for Raffle {}

impl IsInitialized for Raffle {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl Pack for Raffle {
    const LEN: usize = Raffle::HEADER_LEN + Raffle::PLAYERS_LEN;

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        let src = array_ref![src, 0, Raffle::LEN];
        let (
            is_initialized,
            bump,
            state,
            entrance_fee,
            interval,
            last_timestamp,
            oracle,
            key_hash,
            request_confirmations,
            callback_gas_limit,
            num_words,
            pool_balance,
            next_request_id,
            has_pending,
            pending_request_id,
            pending_requested_at,
            recent_winner,
            player_count,
            players,
        ) = array_refs![
            src, 1, 1, 1, 8, 8, 8, 32, 32, 2, 4, 4, 8, 8, 1, 8, 8, 32, 4, Raffle::PLAYERS_LEN
        ];

        let state = RaffleState::try_from(state[0]).map_err(|_| ProgramError::InvalidAccountData)?;

        let pending_request = match has_pending[0] {
            0 => None,
            1 => Some(PendingRequest {
                request_id: u64::from_le_bytes(*pending_request_id),
                requested_at: UnixTimestamp::from_le_bytes(*pending_requested_at),
            }),
            _ => return Err(ProgramError::InvalidAccountData),
        };

        let player_count = u32::from_le_bytes(*player_count) as usize;
        if player_count > MAX_PLAYERS {
            return Err(ProgramError::InvalidAccountData);
        }
        let players = players
            .chunks_exact(PUBKEY_BYTES)
            .take(player_count)
            .map(|slot| {
                let mut key = [0u8; PUBKEY_BYTES];
                key.copy_from_slice(slot);
                Pubkey::new_from_array(key)
            })
            .collect();

        Ok(Raffle {
            is_initialized: is_initialized[0] != 0,
            bump: bump[0],
            state,
            entrance_fee: u64::from_le_bytes(*entrance_fee),
            interval: i64::from_le_bytes(*interval),
            last_timestamp: UnixTimestamp::from_le_bytes(*last_timestamp),
            oracle: Pubkey::new_from_array(*oracle),
            oracle_params: OracleParams {
                key_hash: *key_hash,
                request_confirmations: u16::from_le_bytes(*request_confirmations),
                callback_gas_limit: u32::from_le_bytes(*callback_gas_limit),
                num_words: u32::from_le_bytes(*num_words),
            },
            pool_balance: u64::from_le_bytes(*pool_balance),
            next_request_id: u64::from_le_bytes(*next_request_id),
            pending_request,
            recent_winner: Pubkey::new_from_array(*recent_winner),
            players,
        })
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let dst = array_mut_ref![dst, 0, Raffle::LEN];
        let (
            is_initialized_dst,
            bump_dst,
            state_dst,
            entrance_fee_dst,
            interval_dst,
            last_timestamp_dst,
            oracle_dst,
            key_hash_dst,
            request_confirmations_dst,
            callback_gas_limit_dst,
            num_words_dst,
            pool_balance_dst,
            next_request_id_dst,
            has_pending_dst,
            pending_request_id_dst,
            pending_requested_at_dst,
            recent_winner_dst,
            player_count_dst,
            players_dst,
        ) = mut_array_refs![
            dst, 1, 1, 1, 8, 8, 8, 32, 32, 2, 4, 4, 8, 8, 1, 8, 8, 32, 4, Raffle::PLAYERS_LEN
        ];

        is_initialized_dst[0] = self.is_initialized as u8;
        bump_dst[0] = self.bump;
        state_dst[0] = self.state.into();
        *entrance_fee_dst = self.entrance_fee.to_le_bytes();
        *interval_dst = self.interval.to_le_bytes();
        *last_timestamp_dst = self.last_timestamp.to_le_bytes();
        oracle_dst.copy_from_slice(self.oracle.as_ref());
        *key_hash_dst = self.oracle_params.key_hash;
        *request_confirmations_dst = self.oracle_params.request_confirmations.to_le_bytes();
        *callback_gas_limit_dst = self.oracle_params.callback_gas_limit.to_le_bytes();
        *num_words_dst = self.oracle_params.num_words.to_le_bytes();
        *pool_balance_dst = self.pool_balance.to_le_bytes();
        *next_request_id_dst = self.next_request_id.to_le_bytes();

        match self.pending_request {
            Some(pending) => {
                has_pending_dst[0] = 1;
                *pending_request_id_dst = pending.request_id.to_le_bytes();
                *pending_requested_at_dst = pending.requested_at.to_le_bytes();
            }
            None => {
                has_pending_dst[0] = 0;
                *pending_request_id_dst = [0; 8];
                *pending_requested_at_dst = [0; 8];
            }
        }

        recent_winner_dst.copy_from_slice(self.recent_winner.as_ref());

        // Callers never hold more than MAX_PLAYERS entries; extra ones are not written
        let player_count = self.players.len().min(MAX_PLAYERS);
        *player_count_dst = (player_count as u32).to_le_bytes();
        players_dst.fill(0);
        for (slot, player) in players_dst
            .chunks_exact_mut(PUBKEY_BYTES)
            .zip(self.players.iter().take(player_count))
        {
            slot.copy_from_slice(player.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RaffleConfig {
        RaffleConfig {
            entrance_fee: 100,
            interval: 30,
            oracle: Pubkey::new_unique(),
            oracle_params: OracleParams {
                key_hash: [7; 32],
                request_confirmations: 3,
                callback_gas_limit: 500_000,
                num_words: 1,
            },
        }
    }

    #[test]
    fn test_new_raffle_is_open_and_empty() {
        let raffle = Raffle::new(254, config(), 1_000);

        assert_eq!(raffle.raffle_state(), RaffleState::Open);
        assert_eq!(raffle.entrance_fee(), 100);
        assert_eq!(raffle.interval(), 30);
        assert_eq!(raffle.latest_timestamp(), 1_000);
        assert_eq!(raffle.number_of_players(), 0);
        assert_eq!(raffle.player(0), None);
        assert_eq!(raffle.pending_request(), None);
        assert_eq!(raffle.recent_winner(), Pubkey::default());
        assert_eq!(raffle.next_request_id, FIRST_REQUEST_ID);
        assert_eq!(raffle.request_confirmations(), 3);
        assert_eq!(raffle.num_words(), 1);
    }

    #[test]
    fn test_account_layout_keeps_drawing_state() {
        let mut raffle = Raffle::new(9, config(), 1_000);
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        raffle.players = vec![a, b, a];
        raffle.pool_balance = 300;
        raffle.state = RaffleState::Drawing;
        raffle.next_request_id = 2;
        raffle.pending_request = Some(PendingRequest {
            request_id: 1,
            requested_at: 1_031,
        });

        let mut data = vec![0u8; Raffle::LEN];
        Raffle::pack(raffle.clone(), &mut data).unwrap();
        let unpacked = Raffle::unpack(&data).unwrap();

        assert_eq!(unpacked, raffle);
        assert_eq!(unpacked.player(2), Some(a));
    }

    #[test]
    fn test_unpack_rejects_unknown_state_byte() {
        let raffle = Raffle::new(9, config(), 1_000);
        let mut data = vec![0u8; Raffle::LEN];
        Raffle::pack(raffle, &mut data).unwrap();
        data[2] = 7;

        assert_eq!(Raffle::unpack(&data), Err(ProgramError::InvalidAccountData));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut bad = config();
        bad.entrance_fee = 0;
        assert_eq!(bad.validate(), Err(RaffleError::InvalidConfig));

        let mut bad = config();
        bad.interval = 0;
        assert_eq!(bad.validate(), Err(RaffleError::InvalidConfig));

        assert_eq!(config().validate(), Ok(()));
    }
}
