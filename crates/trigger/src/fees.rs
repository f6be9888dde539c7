use alloy_primitives::U256;

/// The margin applied on the retryable submission fee quoted by the inbox, in percent.
pub const SUBMISSION_FEE_MARGIN_PERCENT: u64 = 120;

/// The fees paid to create the retryable ticket carrying the routed funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteFees {
    /// The maximum submission cost of the ticket.
    pub max_submission_cost: U256,
    /// The gas limit of the auto-redeem.
    pub gas_limit: U256,
    /// The gas price of the auto-redeem.
    pub max_fee_per_gas: U256,
    /// The value sent along the routing transaction.
    pub value: U256,
}

/// Computes the routing fees.
///
/// The submission fee quoted by the inbox gets a 20% margin, the gas price is floored at the
/// minimum gas price of the router and the gas limit is the minimum gas limit of the router.
pub fn compute_route_fees(
    quoted_submission_fee: U256,
    child_gas_price: U256,
    min_gas_price: U256,
    min_gas_limit: U256,
) -> RouteFees {
    let max_submission_cost =
        quoted_submission_fee * U256::from(SUBMISSION_FEE_MARGIN_PERCENT) / U256::from(100);
    let max_fee_per_gas = child_gas_price.max(min_gas_price);
    let value = max_submission_cost + max_fee_per_gas * min_gas_limit;

    RouteFees { max_submission_cost, gas_limit: min_gas_limit, max_fee_per_gas, value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_apply_submission_margin() {
        let fees = compute_route_fees(U256::from(1_000), U256::from(10), U256::from(1), U256::from(100));

        assert_eq!(fees.max_submission_cost, U256::from(1_200));
        assert_eq!(fees.max_fee_per_gas, U256::from(10));
        assert_eq!(fees.gas_limit, U256::from(100));
        assert_eq!(fees.value, U256::from(1_200 + 10 * 100));
    }

    #[test]
    fn test_should_floor_gas_price_at_router_minimum() {
        let fees = compute_route_fees(U256::from(50), U256::from(2), U256::from(7), U256::from(10));

        assert_eq!(fees.max_fee_per_gas, U256::from(7));
        assert_eq!(fees.value, U256::from(60 + 70));
    }

    #[test]
    fn test_should_round_margin_down() {
        let fees = compute_route_fees(U256::from(7), U256::ZERO, U256::ZERO, U256::ZERO);
        assert_eq!(fees.max_submission_cost, U256::from(8));
    }
}
