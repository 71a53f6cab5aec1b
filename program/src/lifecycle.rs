// Keeper Raffle - Draw lifecycle
//
// Every transition reads the current raffle and returns its successor. The
// processor writes the successor back only once the whole instruction has
// succeeded, so a rejected call leaves the stored raffle untouched.
use solana_program::{clock::UnixTimestamp, msg, pubkey::Pubkey};

use crate::{
    constants::MAX_PLAYERS,
    error::RaffleError,
    oracle::{self, RandomnessRequest},
    state::{PendingRequest, Raffle, RaffleState},
};

/// The four conditions a draw needs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpkeepCheck {
    pub is_open: bool,
    pub time_passed: bool,
    pub has_balance: bool,
    pub has_players: bool,
}

impl UpkeepCheck {
    pub fn upkeep_needed(&self) -> bool {
        self.is_open && self.time_passed && self.has_balance && self.has_players
    }
}

/// Result of a settled draw
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawOutcome {
    pub request_id: u64,
    pub winner: Pubkey,
    pub winner_index: usize,
    /// Whole pool balance at the time of the draw
    pub payout: u64,
    /// When the draw was initiated
    pub requested_at: UnixTimestamp,
}

impl Raffle {
    pub fn upkeep_check(&self, now: UnixTimestamp) -> UpkeepCheck {
        UpkeepCheck {
            is_open: self.state == RaffleState::Open,
            time_passed: now.saturating_sub(self.last_timestamp) >= self.interval,
            has_balance: self.pool_balance > 0,
            has_players: !self.players.is_empty(),
        }
    }

    /// Whether a draw may start at `now`
    pub fn check_upkeep(&self, now: UnixTimestamp) -> bool {
        self.upkeep_check(now).upkeep_needed()
    }

    /// Admit one entry for `player`
    pub fn enter(&self, player: Pubkey, payment: u64) -> Result<Raffle, RaffleError> {
        if payment < self.entrance_fee {
            msg!(
                "Payment of {} lamports is below the entrance fee of {}",
                payment,
                self.entrance_fee
            );
            return Err(RaffleError::InsufficientPayment);
        }

        if self.state != RaffleState::Open {
            msg!("Raffle is drawing, entries are closed");
            return Err(RaffleError::NotOpen);
        }

        if self.players.len() >= MAX_PLAYERS {
            msg!("Raffle already holds {} entries", MAX_PLAYERS);
            return Err(RaffleError::RaffleFull);
        }

        let mut next = self.clone();
        next.pool_balance = next
            .pool_balance
            .checked_add(payment)
            .ok_or_else(|| {
                msg!("Pool of {} lamports cannot take {} more", self.pool_balance, payment);
                RaffleError::AmountOverflow
            })?;
        next.players.push(player);
        Ok(next)
    }

    /// Close entries and issue the randomness request
    pub fn begin_draw(
        &self,
        now: UnixTimestamp,
    ) -> Result<(Raffle, RandomnessRequest), RaffleError> {
        let check = self.upkeep_check(now);
        if !check.upkeep_needed() {
            msg!(
                "Upkeep not needed: balance={}, players={}, state={:?}, time_passed={}",
                self.pool_balance,
                self.players.len(),
                self.state,
                check.time_passed
            );
            return Err(RaffleError::UpkeepNotNeeded);
        }

        let request = RandomnessRequest {
            request_id: self.next_request_id,
            oracle: self.oracle,
            params: self.oracle_params,
        };

        let mut next = self.clone();
        next.state = RaffleState::Drawing;
        next.next_request_id = self.next_request_id.wrapping_add(1);
        next.pending_request = Some(PendingRequest {
            request_id: request.request_id,
            requested_at: now,
        });
        Ok((next, request))
    }

    /// Pick the winner for the outstanding request and reopen the raffle.
    ///
    /// The returned raffle already has the pool reset to zero; paying out
    /// `DrawOutcome::payout` is left to the caller.
    pub fn settle_draw(
        &self,
        caller: &Pubkey,
        request_id: u64,
        random_word: u64,
        now: UnixTimestamp,
    ) -> Result<(Raffle, DrawOutcome), RaffleError> {
        if *caller != self.oracle {
            msg!("Fulfillment from {} rejected, oracle is {}", caller, self.oracle);
            return Err(RaffleError::UnauthorizedCaller);
        }

        let pending = match (self.state, self.pending_request) {
            (RaffleState::Drawing, Some(pending)) if pending.request_id == request_id => pending,
            (_, Some(pending)) => {
                msg!(
                    "Request {} does not match outstanding request {}",
                    request_id,
                    pending.request_id
                );
                return Err(RaffleError::UnknownRequest);
            }
            (_, None) => {
                msg!("No randomness request outstanding, got {}", request_id);
                return Err(RaffleError::UnknownRequest);
            }
        };

        let winner_index =
            oracle::winner_index(random_word, self.players.len()).ok_or_else(|| {
                msg!("Draw has no participants");
                RaffleError::NoParticipants
            })?;
        let winner = self.players[winner_index];

        let mut next = self.clone();
        next.players.clear();
        next.pending_request = None;
        next.last_timestamp = now;
        next.state = RaffleState::Open;
        next.recent_winner = winner;
        next.pool_balance = 0;

        Ok((
            next,
            DrawOutcome {
                request_id,
                winner,
                winner_index,
                payout: self.pool_balance,
                requested_at: pending.requested_at,
            },
        ))
    }
}
