//! Buy/sell execution against the bonding curve.
//!
//! All functions here are pure over a single `TokenEntry`: the engine owns
//! locking and fee-ledger plumbing. Execution validates everything first
//! and mutates only once every check has passed, so any `Err` means the
//! entry is bit-for-bit unchanged.

use lib_curve::BondingCurve;
use lib_types::{Address, Amount, Timestamp, TokenId};
use serde::{Deserialize, Serialize};

use crate::errors::{LaunchpadError, LaunchpadResult};
use crate::fees::{split_trade_fee, trade_fee, FeeSplit};
use crate::ledger::TransferGate;
use crate::registry::{custody_address, TokenEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

/// Price quote with the fee already carved out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeQuote {
    /// Tokens out (buy) or net ETH out (sell)
    pub amount_out: Amount,
    pub fee: Amount,
}

/// Record of an executed trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeReceipt {
    pub token: TokenId,
    pub trader: Address,
    pub side: TradeSide,
    /// ETH paid in (buy) or ETH released by the curve before fees (sell)
    pub eth_gross: Amount,
    /// ETH applied to the curve (buy) or paid out to the trader (sell)
    pub eth_net: Amount,
    pub fee: Amount,
    pub fee_split: FeeSplit,
    pub token_amount: Amount,
    pub eth_collected_after: Amount,
}

// ============================================================================
// QUOTES
// ============================================================================

/// Tokens a buyer would receive for `eth_in`, after the buy fee.
pub fn quote_buy(
    entry: &TokenEntry,
    curve: &dyn BondingCurve,
    eth_in: Amount,
) -> LaunchpadResult<TradeQuote> {
    if entry.state.graduated {
        return Err(LaunchpadError::AlreadyGraduated);
    }
    if eth_in == 0 {
        return Err(LaunchpadError::ZeroAmount);
    }
    let fee = trade_fee(eth_in, entry.config.buy_fee_bps);
    let eth_for_curve = eth_in - fee;
    if eth_for_curve == 0 {
        return Err(LaunchpadError::ZeroAmount);
    }
    let tokens = curve.tokens_for_eth(entry.state.eth_collected, eth_for_curve)?;
    Ok(TradeQuote { amount_out: tokens, fee })
}

/// Net ETH a seller would receive for `token_amount`, after the sell fee.
pub fn quote_sell(
    entry: &TokenEntry,
    curve: &dyn BondingCurve,
    token_amount: Amount,
) -> LaunchpadResult<TradeQuote> {
    if entry.state.graduated {
        return Err(LaunchpadError::AlreadyGraduated);
    }
    if token_amount == 0 {
        return Err(LaunchpadError::ZeroAmount);
    }
    let gross = curve.eth_for_tokens(entry.state.eth_collected, token_amount)?;
    if gross > entry.state.eth_collected {
        return Err(LaunchpadError::InsufficientEthReserves {
            have: entry.state.eth_collected,
            need: gross,
        });
    }
    let fee = trade_fee(gross, entry.config.sell_fee_bps);
    Ok(TradeQuote { amount_out: gross - fee, fee })
}

// ============================================================================
// EXECUTION
// ============================================================================

/// Execute a buy: `eth_in` gross, fee carved out, remainder priced on the
/// curve, tokens released from custody to the buyer.
#[allow(clippy::too_many_arguments)]
pub fn execute_buy(
    id: TokenId,
    entry: &mut TokenEntry,
    curve: &dyn BondingCurve,
    buyer: Address,
    eth_in: Amount,
    min_tokens_out: Amount,
    deadline: Timestamp,
    now: Timestamp,
) -> LaunchpadResult<TradeReceipt> {
    if now > deadline {
        return Err(LaunchpadError::DeadlineExpired { now, deadline });
    }
    let quote = quote_buy(entry, curve, eth_in)?;
    let tokens = quote.amount_out;
    let eth_for_curve = eth_in - quote.fee;

    let custody = custody_address(&id);
    let custody_balance = entry.balances.balance_of(&custody);
    if tokens > custody_balance {
        return Err(LaunchpadError::InsufficientReserve {
            have: custody_balance,
            need: tokens,
        });
    }
    if tokens < min_tokens_out {
        return Err(LaunchpadError::SlippageExceeded { got: tokens, min: min_tokens_out });
    }

    // all checks passed; stage the new state, then move tokens. The
    // transfer is the last fallible step and is itself atomic, so an
    // `Err` from here on has written nothing.
    let split = split_trade_fee(quote.fee, entry.config.creator_fee_share_bps);
    let new_eth_collected = entry
        .state
        .eth_collected
        .checked_add(eth_for_curve)
        .ok_or(LaunchpadError::Overflow)?;
    let new_circulating = entry
        .state
        .circulating_supply
        .checked_add(tokens)
        .ok_or(LaunchpadError::Overflow)?;
    let new_creator_fees = entry
        .state
        .creator_fees_accrued
        .checked_add(split.creator)
        .ok_or(LaunchpadError::Overflow)?;
    entry.balances.transfer(
        &custody,
        &buyer,
        tokens,
        TransferGate {
            sink_address: entry.config.sink_address,
            graduated: entry.state.graduated,
        },
    )?;
    entry.state.eth_collected = new_eth_collected;
    entry.state.circulating_supply = new_circulating;
    entry.state.creator_fees_accrued = new_creator_fees;

    Ok(TradeReceipt {
        token: id,
        trader: buyer,
        side: TradeSide::Buy,
        eth_gross: eth_in,
        eth_net: eth_for_curve,
        fee: quote.fee,
        fee_split: split,
        token_amount: tokens,
        eth_collected_after: entry.state.eth_collected,
    })
}

/// Execute a sell: tokens move back to custody, the curve releases gross
/// ETH, fee is carved out, net ETH goes to the seller.
#[allow(clippy::too_many_arguments)]
pub fn execute_sell(
    id: TokenId,
    entry: &mut TokenEntry,
    curve: &dyn BondingCurve,
    seller: Address,
    token_amount: Amount,
    min_eth_out: Amount,
    deadline: Timestamp,
    now: Timestamp,
) -> LaunchpadResult<TradeReceipt> {
    if now > deadline {
        return Err(LaunchpadError::DeadlineExpired { now, deadline });
    }
    if entry.state.graduated {
        return Err(LaunchpadError::AlreadyGraduated);
    }
    if token_amount == 0 {
        return Err(LaunchpadError::ZeroAmount);
    }
    let have = entry.balances.balance_of(&seller);
    if have < token_amount {
        return Err(LaunchpadError::InsufficientBalance { have, need: token_amount });
    }

    let gross = curve.eth_for_tokens(entry.state.eth_collected, token_amount)?;
    if gross > entry.state.eth_collected {
        return Err(LaunchpadError::InsufficientEthReserves {
            have: entry.state.eth_collected,
            need: gross,
        });
    }
    let fee = trade_fee(gross, entry.config.sell_fee_bps);
    let net = gross - fee;
    if net < min_eth_out {
        return Err(LaunchpadError::SlippageExceeded { got: net, min: min_eth_out });
    }

    // all checks passed; stage the new state, then move tokens
    let custody = custody_address(&id);
    let split = split_trade_fee(fee, entry.config.creator_fee_share_bps);
    let new_eth_collected = entry.state.eth_collected - gross;
    let new_circulating = entry
        .state
        .circulating_supply
        .checked_sub(token_amount)
        .ok_or(LaunchpadError::Overflow)?;
    let new_creator_fees = entry
        .state
        .creator_fees_accrued
        .checked_add(split.creator)
        .ok_or(LaunchpadError::Overflow)?;
    entry.balances.transfer(
        &seller,
        &custody,
        token_amount,
        TransferGate {
            sink_address: entry.config.sink_address,
            graduated: entry.state.graduated,
        },
    )?;
    entry.state.eth_collected = new_eth_collected;
    entry.state.circulating_supply = new_circulating;
    entry.state.creator_fees_accrued = new_creator_fees;

    Ok(TradeReceipt {
        token: id,
        trader: seller,
        side: TradeSide::Sell,
        eth_gross: gross,
        eth_net: net,
        fee,
        fee_split: split,
        token_amount,
        eth_collected_after: entry.state.eth_collected,
    })
}
