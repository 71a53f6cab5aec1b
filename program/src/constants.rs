// Keeper Raffle - Program constants

/// Seed of the raffle state PDA
pub const RAFFLE_SEED: &[u8] = b"raffle";

/// Maximum number of entries held in one draw
pub const MAX_PLAYERS: usize = 256;

/// Request ids handed out to the oracle start here
pub const FIRST_REQUEST_ID: u64 = 1;

/// Confirmations asked of the oracle unless configured otherwise
pub const REQUEST_CONFIRMATIONS: u16 = 3;

/// One word picks one winner
pub const NUM_WORDS: u32 = 1;

// Event discriminators written in front of every `sol_log_data` payload
pub const RAFFLE_ENTERED_DISCRIMINATOR: [u8; 8] = *b"rfl_entr";
pub const RANDOM_WORDS_REQUESTED_DISCRIMINATOR: [u8; 8] = *b"rfl_rqst";
pub const WINNER_PICKED_DISCRIMINATOR: [u8; 8] = *b"rfl_winr";
