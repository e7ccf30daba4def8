use proptest::prelude::*;

use stepstake_types::{Address, Amount};

proptest! {
    /// Checked addition never wraps: it either matches the exact sum or refuses.
    #[test]
    fn amount_add_never_wraps(a in any::<u128>(), b in any::<u128>()) {
        match Amount::new(a).checked_add(Amount::new(b)) {
            Some(sum) => {
                prop_assert!(sum.raw() >= a && sum.raw() >= b);
                prop_assert_eq!(sum.raw() - b, a);
            }
            None => prop_assert!(a > u128::MAX - b),
        }
    }

    /// Checked subtraction refuses exactly when the result would be negative.
    #[test]
    fn amount_sub_refuses_underflow(a in any::<u128>(), b in any::<u128>()) {
        let result = Amount::new(a).checked_sub(Amount::new(b));
        prop_assert_eq!(result.is_none(), b > a);
    }

    /// Truncating division times the divisor never exceeds the dividend.
    #[test]
    fn amount_div_truncates_down(a in any::<u128>(), d in 1u128..1_000_000) {
        let q = Amount::new(a).checked_div(d).unwrap();
        prop_assert!(q.raw() * d <= a);
        prop_assert!(a - q.raw() * d < d);
    }

    /// Any 20 bytes parse back from their text form.
    #[test]
    fn address_text_form_is_lossless(bytes in prop::array::uniform20(0u8..)) {
        let addr = Address::new(bytes);
        let parsed: Address = addr.to_string().parse().unwrap();
        prop_assert_eq!(parsed, addr);
    }

    /// Where the product fits in 128 bits, the wide multiply-divide matches
    /// plain integer math.
    #[test]
    fn mul_div_matches_narrow_math(a in any::<u64>(), b in any::<u64>(), d in 1u128..) {
        let expected = u128::from(a) * u128::from(b) / d;
        prop_assert_eq!(Amount::new(u128::from(a)).checked_mul_div(u128::from(b), d), Some(Amount::new(expected)));
    }

    /// A multiplier no larger than the divisor never grows the amount, however
    /// wide the intermediate product.
    #[test]
    fn mul_div_by_fraction_never_grows(a in any::<u128>(), d in 1u128.., n in any::<u128>()) {
        let mul = n % d + 1;
        let scaled = Amount::new(a).checked_mul_div(mul, d).unwrap();
        prop_assert!(scaled.raw() <= a);
    }
}
