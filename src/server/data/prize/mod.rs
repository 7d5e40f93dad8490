//! Prize catalogue, redemption and credit ledger repositories.

pub mod credit;
pub mod prize;
pub mod redemption;

pub use credit::CreditTransactionRepository;
pub use prize::PrizeRepository;
pub use redemption::RedemptionRepository;
