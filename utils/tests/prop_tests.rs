use proptest::prelude::*;

use nexus_types::{Timestamp, U256};
use nexus_utils::{format_ether, format_relative};

proptest! {
    /// The formatted string always parses back to the same wei amount.
    #[test]
    fn format_ether_is_lossless(wei in any::<u128>()) {
        let s = format_ether(U256::from(wei));
        let (whole, frac) = s.split_once('.').unwrap();
        let mut frac = frac.to_string();
        while frac.len() < 18 {
            frac.push('0');
        }
        let rebuilt: u128 = whole.parse::<u128>().unwrap() * 1_000_000_000_000_000_000
            + frac.parse::<u128>().unwrap();
        prop_assert_eq!(rebuilt, wei);
    }

    /// Relative labels never panic and are never empty.
    #[test]
    fn relative_never_empty(then in any::<u64>(), now in any::<u64>()) {
        let label = format_relative(Timestamp::new(then), Timestamp::new(now));
        prop_assert!(!label.is_empty());
    }
}
