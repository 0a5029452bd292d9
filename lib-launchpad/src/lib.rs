//! Token-Launch Economic Core
//!
//! Tokens launch on a bonding curve with their entire fixed supply held in
//! engine custody. Buys pull tokens out of custody against ETH, sells push
//! them back; prices come from `lib-curve` and are deterministic for every
//! participant. Once a token has collected enough ETH it graduates: the
//! unsold reserve and the collected ETH (minus a flat fee) move to an
//! external liquidity sink and curve trading closes forever.
//!
//! # Module Map
//!
//! * [`config`] - platform defaults and frozen per-token snapshots
//! * [`ledger`] - per-token balance sheets with the pre-graduation sink gate
//! * [`fees`] - trading-fee math and treasury accrual
//! * [`registry`] - token entries, id and custody-address derivation
//! * [`trading`] - buy/sell quoting and execution
//! * [`graduation`] - the one-way exit to external liquidity
//! * [`sink`] - the liquidity-sink collaborator boundary
//! * [`engine`] - the thread-safe facade tying it all together
//! * [`testing`] - in-memory sinks for tests and downstream consumers
//!
//! # Invariants
//!
//! * Supply conservation: per token, the balance sheet always sums to the
//!   minted supply; there is no mint or burn after creation.
//! * Failed operations are no-ops: any `Err` leaves all state untouched.
//! * Graduation is terminal: no trading or re-graduation afterwards.

pub mod config;
pub mod engine;
pub mod errors;
pub mod fees;
pub mod graduation;
pub mod ledger;
pub mod registry;
pub mod sink;
pub mod testing;
pub mod trading;

pub use config::{GlobalConfig, TokenConfig, TokenDefaults, TokenState, MAX_FEE_BPS};
pub use engine::Launchpad;
pub use errors::{LaunchpadError, LaunchpadResult};
pub use fees::{FeeLedger, FeeSplit};
pub use graduation::GraduationReceipt;
pub use ledger::{BalanceSheet, TransferGate};
pub use registry::{custody_address, derive_token_id, TokenEntry, TokenInfo};
pub use sink::{LiquiditySink, SinkDepositReceipt, SinkError};
pub use trading::{TradeQuote, TradeReceipt, TradeSide};
