#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use stepstake_escrow::distribution::receiver_shares;
use stepstake_escrow::AwardReceiver;
use stepstake_types::{Address, Amount};

#[derive(Debug, Arbitrary)]
struct SplitInput {
    pool: u128,
    current_status: u64,
    day_required: u64,
    awards: Vec<u128>,
}

// The proportional split must never panic. When the status is within the
// requirement and the awards fit in the pool, receivers never get more than
// the pool in total.
fuzz_target!(|input: SplitInput| {
    let awards: Vec<AwardReceiver> = input
        .awards
        .iter()
        .take(16)
        .enumerate()
        .map(|(i, &amount)| AwardReceiver {
            address: Address::new([i as u8; 20]),
            amount: Amount::new(amount),
        })
        .collect();
    let pool = Amount::new(input.pool);

    let Ok(shares) = receiver_shares(&awards, pool, input.current_status, input.day_required) else {
        return;
    };

    let award_sum = awards
        .iter()
        .try_fold(0u128, |acc, a| acc.checked_add(a.amount.raw()));
    if input.current_status <= input.day_required && award_sum.is_some_and(|s| s <= input.pool) {
        let paid = shares
            .iter()
            .try_fold(0u128, |acc, (_, share)| acc.checked_add(share.raw()));
        assert!(paid.is_some_and(|p| p <= input.pool));
    }
});
