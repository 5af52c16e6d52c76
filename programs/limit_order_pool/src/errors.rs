/// Limit Order Pool Error Definitions
///
/// Every fallible operation in the pool surfaces one of these codes. The `#[msg]`
/// strings are stable so that callers (routers, off-chain clients) can match on the
/// failure reason; [`ErrorCode::kind`] groups the codes into the broader taxonomy
/// used for retry decisions.
use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    /// A tick index lies outside `[MIN_TICK, MAX_TICK]`.
    #[msg("Tick is outside the representable range")]
    TickOutOfRange,

    /// A square-root ratio lies outside `[MIN_SQRT_RATIO, MAX_SQRT_RATIO)`.
    #[msg("Sqrt price is outside the representable range")]
    SqrtPriceOutOfRange,

    /// Returned when a range is malformed:
    /// - lower tick is not strictly below the upper tick
    /// - a boundary lies outside the pool's usable tick range
    #[msg("The provided tick range is invalid")]
    InvalidTickRange,

    /// A tick is not a multiple of the pool's tick spacing.
    #[msg("Tick is not aligned to the pool tick spacing")]
    TickNotAligned,

    #[msg("Liquidity amount must be non-zero")]
    ZeroLiquidity,

    #[msg("Swap amount must be non-zero")]
    ZeroAmountSpecified,

    /// The swap price limit is on the wrong side of the current price or beyond
    /// the representable extreme.
    #[msg("Invalid sqrt price limit")]
    InvalidSqrtPriceLimit,

    #[msg("Fee rate is outside the allowed range")]
    InvalidFeeRate,

    #[msg("Invalid tick spacing")]
    InvalidTickSpacing,

    #[msg("Initial price is outside acceptable range")]
    InvalidInitialPrice,

    #[msg("Token mints must be different")]
    MintsMustDiffer,

    #[msg("Token mints must be passed in ascending order")]
    InvalidMintOrder,

    #[msg("Pool is already initialized")]
    PoolAlreadyInitialized,

    #[msg("Pool is not initialized")]
    PoolNotInitialized,

    /// A limit order range must sit entirely on one side of the current price so
    /// that the deposit is single-asset.
    #[msg("Limit order range must not contain the current price")]
    PriceInsideOrderRange,

    /// A non-terminal order (open, or filled and not yet collected) already rests
    /// on the tick.
    #[msg("Previous limit order on this tick must be filled or canceled before placing new limit order")]
    TickOccupied,

    #[msg("No limit order exists on this tick")]
    OrderNotFound,

    #[msg("Filled order cannot be canceled")]
    OrderAlreadyFilled,

    #[msg("Order not ready to collect")]
    OrderNotFilled,

    /// The order has already reached a terminal state.
    #[msg("Order is no longer open")]
    OrderNotOpen,

    #[msg("Only the order owner may settle this order")]
    NotOrderOwner,

    #[msg("Position does not exist")]
    PositionNotFound,

    #[msg("Position does not have enough liquidity")]
    PositionLiquidityTooLow,

    /// Gross liquidity referencing a tick would exceed the per-tick cap.
    #[msg("Tick liquidity exceeds the per-tick maximum")]
    TickLiquidityOverflow,

    #[msg("Operation would result in math overflow")]
    MathOverflow,

    #[msg("Division by zero")]
    DivisionByZero,

    /// No active liquidity and no initialized tick left to advance to while the
    /// swap still has input to consume.
    #[msg("Insufficient liquidity available")]
    InsufficientLiquidity,

    /// The swap output fell below (or its input rose above) the caller's bound.
    #[msg("Swap amount exceeds slippage tolerance")]
    SlippageExceeded,

    #[msg("Insufficient token balance")]
    InsufficientBalance,

    /// An operation was entered while another operation on the same pool was
    /// still in progress.
    #[msg("Reentrant call into the pool")]
    ReentrancyDetected,

    #[msg("Invalid token vault")]
    InvalidTokenVault,

    #[msg("Token account does not match the pool mint")]
    InvalidTokenAccount,

    #[msg("Unauthorized access attempted")]
    UnauthorizedAccess,
}

/// Coarse classification of [`ErrorCode`]s.
///
/// No error is retried inside the pool; callers use the kind to decide whether a
/// retry can ever succeed (a `StateConflict` may clear after another call, an
/// `InputValidation` never will).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputValidation,
    StateConflict,
    ArithmeticOverflow,
    InsufficientLiquidity,
    Ledger,
    Reentrancy,
}

impl ErrorCode {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::TickOutOfRange
            | ErrorCode::SqrtPriceOutOfRange
            | ErrorCode::InvalidTickRange
            | ErrorCode::TickNotAligned
            | ErrorCode::ZeroLiquidity
            | ErrorCode::ZeroAmountSpecified
            | ErrorCode::InvalidSqrtPriceLimit
            | ErrorCode::InvalidFeeRate
            | ErrorCode::InvalidTickSpacing
            | ErrorCode::InvalidInitialPrice
            | ErrorCode::MintsMustDiffer
            | ErrorCode::InvalidMintOrder
            | ErrorCode::PriceInsideOrderRange
            | ErrorCode::InvalidTokenVault
            | ErrorCode::InvalidTokenAccount
            | ErrorCode::UnauthorizedAccess
            | ErrorCode::NotOrderOwner => ErrorKind::InputValidation,
            ErrorCode::PoolAlreadyInitialized
            | ErrorCode::PoolNotInitialized
            | ErrorCode::TickOccupied
            | ErrorCode::OrderNotFound
            | ErrorCode::OrderAlreadyFilled
            | ErrorCode::OrderNotFilled
            | ErrorCode::OrderNotOpen
            | ErrorCode::PositionNotFound
            | ErrorCode::PositionLiquidityTooLow
            | ErrorCode::SlippageExceeded => ErrorKind::StateConflict,
            ErrorCode::TickLiquidityOverflow
            | ErrorCode::MathOverflow
            | ErrorCode::DivisionByZero => ErrorKind::ArithmeticOverflow,
            ErrorCode::InsufficientLiquidity => ErrorKind::InsufficientLiquidity,
            ErrorCode::InsufficientBalance => ErrorKind::Ledger,
            ErrorCode::ReentrancyDetected => ErrorKind::Reentrancy,
        }
    }
}
