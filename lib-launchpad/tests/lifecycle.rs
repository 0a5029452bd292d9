//! End-to-end lifecycle: launch, trade, graduate.

use std::sync::Arc;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lib_curve::{BondingCurve, ConstantProductCurve};
use lib_launchpad::testing::{FailingSink, MockSink};
use lib_launchpad::{custody_address, Launchpad, LaunchpadError, TradeSide};
use lib_types::{Address, Amount, CurveId, SinkId, Timestamp, TokenId, WAD};

const FAR_FUTURE: Timestamp = u64::MAX;
const CURVE: CurveId = CurveId(0);
const SINK: SinkId = SinkId(0);

fn addr(n: u8) -> Address {
    Address::new([n; 32])
}

fn admin() -> Address {
    addr(0xad)
}

fn treasury() -> Address {
    addr(0x77)
}

fn setup() -> (Launchpad, MockSink) {
    let pad = Launchpad::new(admin(), treasury());
    let sink = MockSink::new(addr(0xee));
    pad.allow_curve(&admin(), CURVE, Arc::new(ConstantProductCurve::canonical()))
        .unwrap();
    pad.allow_sink(&admin(), SINK, Box::new(sink.clone())).unwrap();
    (pad, sink)
}

fn launch(pad: &Launchpad, creator: &Address) -> TokenId {
    pad.create_token(creator, "Lifecycle Token", "LIFE", "ipfs://life", CURVE, SINK)
        .unwrap()
}

#[test]
fn test_full_lifecycle_to_graduation() {
    let (pad, sink) = setup();
    let creator = addr(1);
    let token = launch(&pad, &creator);
    let custody = custody_address(&token);
    let total_supply = ConstantProductCurve::canonical().total_supply();

    // Two buyers, 4.04 ETH gross each; 1% fee leaves 3.9996 ETH per buy on
    // the curve, so the second buy crosses the 7.956 ETH threshold.
    let gross: Amount = 4_040_000_000_000_000_000;

    let r1 = pad.buy_at(0, &addr(10), token, gross, 0, FAR_FUTURE).unwrap();
    assert_eq!(r1.side, TradeSide::Buy);
    assert_eq!(r1.fee, gross / 100);
    assert_eq!(r1.eth_net, 3_999_600_000_000_000_000);
    assert!(!pad.is_graduation_eligible(token).unwrap());

    let r2 = pad.buy_at(0, &addr(11), token, gross, 0, FAR_FUTURE).unwrap();
    assert_eq!(r2.eth_collected_after, 7_999_200_000_000_000_000);
    assert!(pad.is_graduation_eligible(token).unwrap());

    // later buyers pay more per token
    assert!(r2.token_amount < r1.token_amount);

    // supply conservation before graduation
    let in_custody = pad.balance_of(token, &custody).unwrap();
    let held = pad.balance_of(token, &addr(10)).unwrap()
        + pad.balance_of(token, &addr(11)).unwrap();
    assert_eq!(in_custody + held, total_supply);
    assert_eq!(pad.token_info(token).unwrap().state.circulating_supply, held);

    // graduate: 0.5 ETH fee carved out, the rest deposited with the reserve
    let receipt = pad.graduate(token).unwrap();
    assert_eq!(receipt.graduation_fee, 500_000_000_000_000_000);
    assert_eq!(receipt.eth_for_liquidity, 7_499_200_000_000_000_000);
    assert_eq!(receipt.tokens_to_sink, in_custody);

    let deposits = sink.recorded();
    assert_eq!(deposits.len(), 1);
    assert_eq!(deposits[0].eth_amount, 7_499_200_000_000_000_000);
    assert_eq!(deposits[0].token_amount, in_custody);

    // custody emptied into the sink, conservation still holds
    assert_eq!(pad.balance_of(token, &custody).unwrap(), 0);
    assert_eq!(
        pad.balance_of(token, &addr(0xee)).unwrap() + held,
        total_supply
    );

    // trading is closed forever
    assert_eq!(
        pad.buy_at(0, &addr(12), token, WAD, 0, FAR_FUTURE),
        Err(LaunchpadError::AlreadyGraduated)
    );
    assert_eq!(
        pad.sell_at(0, &addr(10), token, 1, 0, FAR_FUTURE),
        Err(LaunchpadError::AlreadyGraduated)
    );
    assert!(matches!(
        pad.graduate(token),
        Err(LaunchpadError::AlreadyGraduated)
    ));

    // the sink gate opens after graduation
    pad.transfer(token, &addr(10), &addr(0xee), 1).unwrap();
}

#[test]
fn test_fee_accounting_is_exact() {
    let (pad, _) = setup();
    let creator = addr(1);
    let token = launch(&pad, &creator);

    let mut total_fees: Amount = 0;
    let mut creator_fees: Amount = 0;
    let mut treasury_fees: Amount = 0;

    for i in 0u8..5 {
        let r = pad
            .buy_at(0, &addr(20 + i), token, WAD + i as Amount, 0, FAR_FUTURE)
            .unwrap();
        total_fees += r.fee;
        creator_fees += r.fee_split.creator;
        treasury_fees += r.fee_split.treasury;
        assert_eq!(r.fee_split.creator + r.fee_split.treasury, r.fee);
    }

    let sold = pad.balance_of(token, &addr(20)).unwrap();
    let r = pad
        .sell_at(0, &addr(20), token, sold, 0, FAR_FUTURE)
        .unwrap();
    total_fees += r.fee;
    creator_fees += r.fee_split.creator;
    treasury_fees += r.fee_split.treasury;

    assert_eq!(creator_fees + treasury_fees, total_fees);
    assert_eq!(
        pad.token_info(token).unwrap().state.creator_fees_accrued,
        creator_fees
    );
    assert_eq!(pad.treasury_accrued(), treasury_fees);

    // claims drain both sides exactly once
    assert_eq!(pad.claim_creator_fees(&creator, token).unwrap(), creator_fees);
    assert_eq!(pad.claim_treasury_fees(&admin()).unwrap(), treasury_fees);
    assert_eq!(pad.treasury_accrued(), 0);
}

#[test]
fn test_supply_conservation_under_churn() -> Result<()> {
    let (pad, _) = setup();
    let token = launch(&pad, &addr(1));
    let custody = custody_address(&token);
    let total_supply = ConstantProductCurve::canonical().total_supply();
    let traders: Vec<Address> = (0u8..6).map(|i| addr(30 + i)).collect();
    let mut rng = StdRng::seed_from_u64(42);

    for round in 0..40 {
        let trader = traders[rng.gen_range(0..traders.len())];
        pad.buy_at(0, &trader, token, rng.gen_range(WAD / 100..WAD / 4), 0, FAR_FUTURE)?;
        if round % 3 == 2 {
            let held = pad.balance_of(token, &trader)?;
            pad.sell_at(0, &trader, token, held / 3, 0, FAR_FUTURE)?;
        }

        let held: Amount = traders
            .iter()
            .map(|t| pad.balance_of(token, t).unwrap())
            .sum();
        let info = pad.token_info(token)?;
        assert_eq!(pad.balance_of(token, &custody)? + held, total_supply);
        assert_eq!(info.state.circulating_supply, held);
    }
    Ok(())
}

#[test]
fn test_buy_for_sink_destination_rejected_cleanly() {
    let (pad, _) = setup();
    let token = launch(&pad, &addr(1));
    let custody = custody_address(&token);
    let custody_before = pad.balance_of(token, &custody).unwrap();
    let before = pad.token_info(token).unwrap();

    // a buy delivering to the gated sink address must fail without
    // collecting ETH, inflating circulating supply, or accruing fees
    let err = pad.buy_at(0, &addr(0xee), token, WAD, 0, FAR_FUTURE);
    assert_eq!(err, Err(LaunchpadError::PreGraduationSinkTransferForbidden));

    let after = pad.token_info(token).unwrap();
    assert_eq!(after.state, before.state);
    assert_eq!(pad.balance_of(token, &custody).unwrap(), custody_before);
    assert_eq!(pad.treasury_accrued(), 0);
}

#[test]
fn test_failed_operations_change_nothing() {
    let (pad, _) = setup();
    let trader = addr(9);
    let token = launch(&pad, &addr(1));
    pad.buy_at(0, &trader, token, WAD, 0, FAR_FUTURE).unwrap();
    let before = pad.token_info(token).unwrap();
    let balance_before = pad.balance_of(token, &trader).unwrap();

    // oversized sell
    let err = pad.sell_at(0, &trader, token, balance_before + 1, 0, FAR_FUTURE);
    assert!(matches!(err, Err(LaunchpadError::InsufficientBalance { .. })));

    // expired buy
    let err = pad.buy_at(1_000, &trader, token, WAD, 0, 999);
    assert!(matches!(err, Err(LaunchpadError::DeadlineExpired { .. })));

    // premature graduation
    let err = pad.graduate(token);
    assert!(matches!(
        err,
        Err(LaunchpadError::GraduationCriteriaNotMet { .. })
    ));

    let after = pad.token_info(token).unwrap();
    assert_eq!(after.state, before.state);
    assert_eq!(pad.balance_of(token, &trader).unwrap(), balance_before);
}

#[test]
fn test_sink_failure_keeps_token_tradeable() {
    let pad = Launchpad::new(admin(), treasury());
    pad.allow_curve(&admin(), CURVE, Arc::new(ConstantProductCurve::canonical()))
        .unwrap();
    pad.allow_sink(&admin(), SINK, Box::new(FailingSink::new(addr(0xee))))
        .unwrap();
    let token = launch(&pad, &addr(1));

    // push past the threshold
    pad.buy_at(0, &addr(10), token, 9 * WAD, 0, FAR_FUTURE).unwrap();
    assert!(pad.is_graduation_eligible(token).unwrap());
    let before = pad.token_info(token).unwrap();
    let treasury_before = pad.treasury_accrued();

    let err = pad.graduate(token);
    assert!(matches!(err, Err(LaunchpadError::SinkDepositFailed(_))));

    // rollback complete: still eligible, still tradeable, nothing accrued
    let after = pad.token_info(token).unwrap();
    assert_eq!(after.state, before.state);
    assert!(pad.is_graduation_eligible(token).unwrap());
    assert_eq!(pad.treasury_accrued(), treasury_before);
    pad.buy_at(0, &addr(11), token, WAD, 0, FAR_FUTURE).unwrap();
    pad.sell_at(
        0,
        &addr(11),
        token,
        pad.balance_of(token, &addr(11)).unwrap(),
        0,
        FAR_FUTURE,
    )
    .unwrap();
}
