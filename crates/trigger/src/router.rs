use crate::{
    compute_route_fees, error::TriggerResult, extract_retryable, settle_retryable, RouteFees,
    RetryableTracker, Settlement,
};

use std::str::FromStr;

use alloy_primitives::{hex::FromHexError, Address, TxHash, B256, U256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::TransactionReceipt;
use router_bindings::{
    calls::{IERC20, IInbox, IParentToChildRewardRouter},
    NATIVE_TOKEN_ADDRESS,
};
use router_bridge::{poll::Poll, ContractProvider};
use tokio_util::sync::CancellationToken;

/// The inbox data length of a native route: a plain transfer.
const NATIVE_ROUTE_DATA_LENGTH: u64 = 0;

/// The inbox data length of a token route: `abi.encode(maxSubmissionCost, bytes(""))`.
const TOKEN_ROUTE_DATA_LENGTH: u64 = 96;

/// The asset routed to the child chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum RouteAsset {
    /// The native asset of the parent chain.
    #[display("ETH")]
    Native,
    /// An ERC20 token.
    #[display("{_0}")]
    Token(Address),
}

impl RouteAsset {
    /// Returns the address the router designates the asset with.
    pub const fn router_address(&self) -> Address {
        match self {
            Self::Native => NATIVE_TOKEN_ADDRESS,
            Self::Token(token) => *token,
        }
    }

    /// Returns the length of the retryable data created by the route.
    const fn data_length(&self) -> u64 {
        match self {
            Self::Native => NATIVE_ROUTE_DATA_LENGTH,
            Self::Token(_) => TOKEN_ROUTE_DATA_LENGTH,
        }
    }
}

impl FromStr for RouteAsset {
    type Err = FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("eth") {
            return Ok(Self::Native);
        }
        Ok(Self::Token(s.parse()?))
    }
}

/// The outcome of [`check_and_route_funds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The balance of the router is below the threshold.
    BelowThreshold {
        /// The balance of the router.
        balance: U256,
    },
    /// The router cannot distribute the asset yet.
    NotDue,
    /// The funds were routed.
    Routed {
        /// The routing transaction.
        tx_hash: TxHash,
        /// The retryable ticket carrying the funds.
        ticket_id: B256,
        /// How the ticket was redeemed.
        settlement: Settlement,
    },
}

/// A parent to child reward router.
#[derive(Debug)]
pub struct ParentToChildRouter<P> {
    /// The parent chain provider. Must hold a wallet to route funds.
    provider: P,
    /// The address of the router.
    address: Address,
}

impl<P: Provider> ParentToChildRouter<P> {
    /// Returns a new [`ParentToChildRouter`] at the provided address.
    pub const fn new(provider: P, address: Address) -> Self {
        Self { provider, address }
    }

    /// Returns the balance of the router in the asset.
    pub async fn balance(&self, asset: RouteAsset) -> TriggerResult<U256> {
        Ok(match asset {
            RouteAsset::Native => self.provider.get_balance(self.address).await?,
            RouteAsset::Token(token) => {
                self.provider
                    .call_contract(token, IERC20::balanceOfCall { account: self.address })
                    .await?
            }
        })
    }

    /// Returns true if the router can distribute the asset.
    pub async fn can_distribute(&self, asset: RouteAsset) -> TriggerResult<bool> {
        let call = IParentToChildRewardRouter::canDistributeCall { token: asset.router_address() };
        Ok(self.provider.call_contract(self.address, call).await?)
    }

    /// Returns the fees of routing the asset, given the gas price of the child chain.
    pub async fn route_fees(
        &self,
        asset: RouteAsset,
        child_gas_price: U256,
    ) -> TriggerResult<RouteFees> {
        let inbox = self
            .provider
            .call_contract(self.address, IParentToChildRewardRouter::inboxCall {})
            .await?;
        let parent_gas_price = self.provider.get_gas_price().await?;
        let quoted_submission_fee = self
            .provider
            .call_contract(
                inbox,
                IInbox::calculateRetryableSubmissionFeeCall {
                    dataLength: U256::from(asset.data_length()),
                    baseFee: U256::from(parent_gas_price),
                },
            )
            .await?;
        let min_gas_price = self
            .provider
            .call_contract(self.address, IParentToChildRewardRouter::minGasPriceCall {})
            .await?;
        let min_gas_limit = self
            .provider
            .call_contract(self.address, IParentToChildRewardRouter::minGasLimitCall {})
            .await?;

        Ok(compute_route_fees(quoted_submission_fee, child_gas_price, min_gas_price, min_gas_limit))
    }

    /// Routes the asset with the provided fees and returns the receipt of the routing
    /// transaction.
    pub async fn route(
        &self,
        asset: RouteAsset,
        fees: &RouteFees,
    ) -> TriggerResult<TransactionReceipt> {
        let receipt = match asset {
            RouteAsset::Native => {
                let call = IParentToChildRewardRouter::routeNativeFundsCall {
                    maxSubmissionCost: fees.max_submission_cost,
                    gasLimit: fees.gas_limit,
                    maxFeePerGas: fees.max_fee_per_gas,
                };
                self.provider.submit_call(self.address, call, fees.value, 1).await?
            }
            RouteAsset::Token(token) => {
                let call = IParentToChildRewardRouter::routeTokenCall {
                    token,
                    maxSubmissionCost: fees.max_submission_cost,
                    gasLimit: fees.gas_limit,
                    maxFeePerGas: fees.max_fee_per_gas,
                };
                self.provider.submit_call(self.address, call, fees.value, 1).await?
            }
        };
        Ok(receipt)
    }
}

/// Routes the asset held by the router to the child chain if its balance reaches `min_balance`
/// and the router can distribute it, then waits for the retryable ticket carrying the funds to be
/// redeemed, redeeming it once if its auto-redeem failed.
pub async fn check_and_route_funds<P, C, T>(
    router: &ParentToChildRouter<P>,
    child: &C,
    tracker: &T,
    asset: RouteAsset,
    min_balance: U256,
    poll: &Poll,
    cancel: &CancellationToken,
) -> TriggerResult<TriggerOutcome>
where
    P: Provider,
    C: Provider,
    T: RetryableTracker,
{
    let balance = router.balance(asset).await?;
    if balance < min_balance {
        tracing::info!(target: "router::trigger", %asset, %balance, %min_balance, "router balance below threshold");
        return Ok(TriggerOutcome::BelowThreshold { balance });
    }
    if !router.can_distribute(asset).await? {
        tracing::info!(target: "router::trigger", %asset, "router cannot distribute yet");
        return Ok(TriggerOutcome::NotDue);
    }

    let child_gas_price = U256::from(child.get_gas_price().await?);
    let fees = router.route_fees(asset, child_gas_price).await?;
    tracing::info!(target: "router::trigger", %asset, ?fees, "routing funds to the child chain");

    let receipt = router.route(asset, &fees).await?;
    let tx_hash = receipt.transaction_hash;
    let retryable = extract_retryable(tx_hash, receipt.inner.logs())?;
    let ticket_id = retryable.ticket_id(child.get_chain_id().await?);
    tracing::info!(target: "router::trigger", ?tx_hash, ?ticket_id, "waiting for retryable ticket");

    let settlement = settle_retryable(tracker, ticket_id, poll, cancel).await?;
    Ok(TriggerOutcome::Routed { tx_hash, ticket_id, settlement })
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloy_primitives::address;

    #[test]
    fn test_should_parse_route_asset() -> eyre::Result<()> {
        let token = address!("0x00000000000000000000000000000000000000dd");

        assert_eq!("ETH".parse::<RouteAsset>()?, RouteAsset::Native);
        assert_eq!("eth".parse::<RouteAsset>()?, RouteAsset::Native);
        assert_eq!(token.to_string().parse::<RouteAsset>()?, RouteAsset::Token(token));
        assert!("0x1234".parse::<RouteAsset>().is_err());

        Ok(())
    }

    #[test]
    fn test_should_designate_native_asset_with_sentinel() {
        let token = address!("0x00000000000000000000000000000000000000dd");

        assert_eq!(RouteAsset::Native.router_address(), NATIVE_TOKEN_ADDRESS);
        assert_eq!(RouteAsset::Token(token).router_address(), token);
        assert_eq!(RouteAsset::Native.data_length(), 0);
        assert_eq!(RouteAsset::Token(token).data_length(), 96);
    }
}
