use solana_program::{
    decode_error::DecodeError,
    msg,
    program_error::{PrintProgramError, ProgramError},
};
use thiserror::Error;

/// Errors that may be returned by the Keeper Raffle program
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RaffleError {
    /// Payment is below the entrance fee
    #[error("Payment is below the entrance fee")]
    InsufficientPayment,

    /// The raffle is drawing and does not take entries
    #[error("Raffle is not open")]
    NotOpen,

    /// At least one upkeep condition does not hold
    #[error("Upkeep not needed")]
    UpkeepNotNeeded,

    /// Fulfillment was not signed by the configured oracle
    #[error("Caller is not the randomness oracle")]
    UnauthorizedCaller,

    /// Fulfillment does not match the outstanding request
    #[error("Unknown randomness request")]
    UnknownRequest,

    /// No participants to draw from
    #[error("No participants in the draw")]
    NoParticipants,

    /// Pool could not be paid to the winner
    #[error("Payout to the winner failed")]
    PayoutFailed,

    /// Participant list has reached its capacity
    #[error("Raffle is full")]
    RaffleFull,

    /// Creation parameters are out of range
    #[error("Invalid raffle configuration")]
    InvalidConfig,

    /// Instruction data could not be decoded
    #[error("Invalid instruction")]
    InvalidInstruction,

    /// Accepting the payment would overflow the pool balance
    #[error("Pool balance overflow")]
    AmountOverflow,
}

impl From<RaffleError> for ProgramError {
    fn from(e: RaffleError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for RaffleError {
    fn type_of() -> &'static str {
        "Raffle Error"
    }
}

impl PrintProgramError for RaffleError {
    fn print<E>(&self) {
        msg!(&self.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_program_error<E: DecodeError<E> + PrintProgramError>() {}

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            ProgramError::from(RaffleError::InsufficientPayment),
            ProgramError::Custom(0)
        );
        assert_eq!(ProgramError::from(RaffleError::PayoutFailed), ProgramError::Custom(6));
        assert_eq!(ProgramError::from(RaffleError::AmountOverflow), ProgramError::Custom(10));
    }

    #[test]
    fn test_error_is_printable_and_decodable() {
        assert_program_error::<RaffleError>();
        assert_eq!(<RaffleError as DecodeError<RaffleError>>::type_of(), "Raffle Error");
    }
}
