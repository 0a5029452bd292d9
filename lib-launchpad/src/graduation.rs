//! Graduation: the one-way exit from curve trading to external liquidity.
//!
//! Ordering is deliberate: the `graduated` latch is set and custody is moved
//! *before* the sink is called, which closes the re-entrancy window (a sink
//! that calls back into trading sees the token already graduated). If the
//! sink rejects the deposit, both effects are compensated and the token
//! resumes trading as if nothing happened.

use lib_types::{Amount, TokenId};
use serde::{Deserialize, Serialize};

use crate::errors::{LaunchpadError, LaunchpadResult};
use crate::ledger::TransferGate;
use crate::registry::{custody_address, TokenEntry};
use crate::sink::{LiquiditySink, SinkDepositReceipt};

/// Record of a completed graduation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraduationReceipt {
    pub token: TokenId,
    /// ETH deposited into the sink (collected minus the graduation fee)
    pub eth_for_liquidity: Amount,
    /// Flat ETH fee retained for the treasury
    pub graduation_fee: Amount,
    /// Unsold token reserve moved from custody to the sink
    pub tokens_to_sink: Amount,
    pub sink_receipt: SinkDepositReceipt,
}

/// Graduate `entry`, depositing its remaining reserve and collected ETH
/// into `sink`.
///
/// Returns the receipt together with the ETH amount the caller must credit
/// to the treasury (the graduation fee). On `Err` the entry is unchanged.
pub fn execute_graduation(
    id: TokenId,
    entry: &mut TokenEntry,
    sink: &mut dyn LiquiditySink,
) -> LaunchpadResult<(GraduationReceipt, Amount)> {
    if entry.state.graduated {
        return Err(LaunchpadError::AlreadyGraduated);
    }
    if !entry.is_graduation_eligible() {
        return Err(LaunchpadError::GraduationCriteriaNotMet {
            collected: entry.state.eth_collected,
            threshold: entry.config.graduation_threshold,
        });
    }

    let graduation_fee = entry.config.graduation_eth_fee;
    // eligibility implies collected >= threshold > fee (config invariant)
    let eth_for_liquidity = entry
        .state
        .eth_collected
        .checked_sub(graduation_fee)
        .ok_or(LaunchpadError::Overflow)?;

    let custody = custody_address(&id);
    let sink_address = sink.address();
    let tokens_to_sink = entry.balances.balance_of(&custody);

    // latch first, then move custody; both undone if anything downstream
    // fails. Custody can be empty if holders bought out the whole reserve,
    // in which case the deposit carries ETH only.
    entry.state.graduated = true;
    if tokens_to_sink > 0 {
        if let Err(e) = entry.balances.transfer(
            &custody,
            &sink_address,
            tokens_to_sink,
            TransferGate { sink_address, graduated: true },
        ) {
            entry.state.graduated = false;
            return Err(e);
        }
    }

    match sink.deposit_liquidity(id, tokens_to_sink, eth_for_liquidity) {
        Ok(sink_receipt) => {
            entry.state.eth_collected = 0;
            Ok((
                GraduationReceipt {
                    token: id,
                    eth_for_liquidity,
                    graduation_fee,
                    tokens_to_sink,
                    sink_receipt,
                },
                graduation_fee,
            ))
        }
        Err(e) => {
            // compensate: release the latch, return custody. The return
            // transfer cannot fail: the sink was just credited, its
            // destination is custody (never gated), and the forward leg
            // already ruled out custody == sink.
            entry.state.graduated = false;
            if tokens_to_sink > 0 {
                entry.balances.transfer(
                    &sink_address,
                    &custody,
                    tokens_to_sink,
                    TransferGate { sink_address, graduated: false },
                )?;
            }
            Err(LaunchpadError::SinkDepositFailed(e))
        }
    }
}
