//! Wei → ether formatting.

use alloy_primitives::U256;

const WEI_PER_ETHER: u64 = 1_000_000_000_000_000_000;

/// Format a wei amount as ether with trailing zeros trimmed, e.g. `0.05`.
pub fn format_ether(wei: U256) -> String {
    let unit = U256::from(WEI_PER_ETHER);
    let whole = wei / unit;
    let frac = wei % unit;
    if frac.is_zero() {
        return format!("{whole}.0");
    }
    let frac = format!("{:018}", frac.to::<u64>());
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_ether() {
        assert_eq!(format_ether(U256::from(WEI_PER_ETHER)), "1.0");
        assert_eq!(format_ether(U256::ZERO), "0.0");
    }

    #[test]
    fn fractional_ether() {
        assert_eq!(format_ether(U256::from(50_000_000_000_000_000u64)), "0.05");
        assert_eq!(format_ether(U256::from(1u64)), "0.000000000000000001");
    }

    #[test]
    fn large_amounts() {
        let wei = U256::from(WEI_PER_ETHER) * U256::from(1_000_000u64)
            + U256::from(120_000_000_000_000_000u64);
        assert_eq!(format_ether(wei), "1000000.12");
    }
}
