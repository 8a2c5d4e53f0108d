//! The bank service object
//!
//! Owns the reserve, the vault store and the config behind one lock, and
//! funnels every mutation through the same pipeline: read prices, accrue a
//! working copy, run the risk checks, issue external transfers, commit.
//! A failure anywhere leaves the bank exactly as it was.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, info};
use vaultbank_core::{math, Amount};
use vaultbank_ledger::AssetLedger;
use vaultbank_oracle::{OracleError, PriceOracle};

use crate::accrual;
use crate::clock::Clock;
use crate::config::{AssetRegistration, AssetRole, BankConfig};
use crate::error::BankError;
use crate::liquidation::{self, LiquidationOutcome};
use crate::reserve::ReserveAccount;
use crate::risk;
use crate::vault::{Vault, VaultStore};

/// Divisor for the reserve-withdrawal protocol fee (1/200 = 0.5%)
const RESERVE_WITHDRAW_FEE_DIVISOR: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

/// Everything the bank owns, guarded by one lock
#[derive(Debug)]
struct BankState {
    config: BankConfig,
    collateral_asset: Option<AssetRegistration>,
    debt_asset: Option<AssetRegistration>,
    reserve: ReserveAccount,
    vaults: VaultStore,
}

impl BankState {
    fn registration(&self, role: AssetRole) -> Result<&AssetRegistration, BankError> {
        let reg = match role {
            AssetRole::Collateral => self.collateral_asset.as_ref(),
            AssetRole::Debt => self.debt_asset.as_ref(),
        };
        reg.ok_or(BankError::AssetNotRegistered { role })
    }

    /// Both registrations must exist before any reserve or vault operation
    fn require_registered(&self) -> Result<(), BankError> {
        self.registration(AssetRole::Collateral)?;
        self.registration(AssetRole::Debt)?;
        Ok(())
    }
}

/// Prices of both registered assets, fetched together at operation start
#[derive(Debug, Clone, Copy)]
struct PricePair {
    collateral: Decimal,
    debt: Decimal,
}

fn ensure_owner(config: &BankConfig, caller: &str) -> Result<(), BankError> {
    if caller != config.owner {
        return Err(BankError::NotOwner {
            caller: caller.to_string(),
        });
    }
    Ok(())
}

fn refresh_prices(state: &mut BankState, prices: &PricePair) {
    if let Some(reg) = state.collateral_asset.as_mut() {
        reg.last_known_price = prices.collateral;
    }
    if let Some(reg) = state.debt_asset.as_mut() {
        reg.last_known_price = prices.debt;
    }
}

/// One administered lending pool.
///
/// All state mutation goes through `&self` methods that serialize behind an
/// internal mutex; the oracle, ledger and clock are injected capabilities.
pub struct Bank {
    oracle: Arc<dyn PriceOracle>,
    ledger: Arc<dyn AssetLedger>,
    clock: Arc<dyn Clock>,
    state: Mutex<BankState>,
}

impl Bank {
    /// Initialize a bank from its config and collaborators.
    ///
    /// Reserve balances start at zero; assets must be registered before the
    /// first reserve or vault operation.
    pub fn new(
        config: BankConfig,
        oracle: Arc<dyn PriceOracle>,
        ledger: Arc<dyn AssetLedger>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, BankError> {
        config.validate()?;
        Ok(Self {
            oracle,
            ledger,
            clock,
            state: Mutex::new(BankState {
                config,
                collateral_asset: None,
                debt_asset: None,
                reserve: ReserveAccount::new(),
                vaults: VaultStore::new(),
            }),
        })
    }

    // === Administration ===

    /// Register the collateral-side asset (owner-only, overwrites)
    pub async fn register_collateral_asset(
        &self,
        caller: &str,
        registration: AssetRegistration,
    ) -> Result<(), BankError> {
        let mut state = self.state.lock().await;
        ensure_owner(&state.config, caller)?;
        debug!(asset = %registration.asset, feed = %registration.price_feed, "collateral asset registered");
        state.collateral_asset = Some(registration);
        Ok(())
    }

    /// Register the debt-side asset (owner-only, overwrites)
    pub async fn register_debt_asset(
        &self,
        caller: &str,
        registration: AssetRegistration,
    ) -> Result<(), BankError> {
        let mut state = self.state.lock().await;
        ensure_owner(&state.config, caller)?;
        debug!(asset = %registration.asset, feed = %registration.price_feed, "debt asset registered");
        state.debt_asset = Some(registration);
        Ok(())
    }

    /// Change the annualized interest rate (owner-only)
    pub async fn set_interest_rate_bps(&self, caller: &str, rate_bps: u64) -> Result<(), BankError> {
        let mut state = self.state.lock().await;
        ensure_owner(&state.config, caller)?;
        debug!(rate_bps, "interest rate updated");
        state.config.interest_rate_bps = rate_bps;
        Ok(())
    }

    /// Change the protocol fee recipient (owner-only)
    pub async fn set_fee_recipient(&self, caller: &str, recipient: &str) -> Result<(), BankError> {
        let mut state = self.state.lock().await;
        ensure_owner(&state.config, caller)?;
        if recipient.is_empty() {
            return Err(BankError::InvalidConfig {
                reason: "fee_recipient must not be empty".to_string(),
            });
        }
        debug!(recipient, "fee recipient updated");
        state.config.fee_recipient = recipient.to_string();
        Ok(())
    }

    // === Reserve ===

    /// Fund the reserve with debt asset pulled from the owner
    pub async fn deposit_reserve(&self, caller: &str, amount: Amount) -> Result<(), BankError> {
        let mut state = self.state.lock().await;
        ensure_owner(&state.config, caller)?;

        let debt_asset = state.registration(AssetRole::Debt)?.asset.clone();
        let bank = state.config.name.clone();
        self.ledger.transfer(&debt_asset, caller, &bank, amount).await?;

        state.reserve.debt_asset_balance = state
            .reserve
            .debt_asset_balance
            .checked_add(amount)
            .ok_or(BankError::ArithmeticOverflow {
                context: "reserve deposit",
            })?;
        debug!(amount = %amount, balance = %state.reserve.debt_asset_balance, "reserve funded");
        Ok(())
    }

    /// Withdraw debt asset from the reserve to the owner, minus the 0.5%
    /// protocol fee paid to the fee recipient
    pub async fn withdraw_reserve(&self, caller: &str, amount: Amount) -> Result<(), BankError> {
        let mut state = self.state.lock().await;
        ensure_owner(&state.config, caller)?;

        if !state.reserve.can_fund(amount) {
            return Err(BankError::InsufficientReserve {
                available: state.reserve.debt_asset_balance.to_string(),
                required: amount.to_string(),
            });
        }

        let fee = amount
            .value()
            .checked_div(RESERVE_WITHDRAW_FEE_DIVISOR)
            .map(Amount::new_unchecked)
            .ok_or(BankError::ArithmeticOverflow {
                context: "reserve withdrawal fee",
            })?;
        let payout = amount.checked_sub(fee).ok_or(BankError::ArithmeticOverflow {
            context: "reserve withdrawal payout",
        })?;

        let debt_asset = state.registration(AssetRole::Debt)?.asset.clone();
        let bank = state.config.name.clone();
        let fee_recipient = state.config.fee_recipient.clone();

        // The funds check above covers both legs: they draw on the same
        // bank account, so the second transfer cannot run out of funds
        // after the first succeeded.
        self.ledger.transfer(&debt_asset, &bank, caller, payout).await?;
        if !fee.is_zero() {
            self.ledger
                .transfer(&debt_asset, &bank, &fee_recipient, fee)
                .await?;
        }

        state.reserve.debt_asset_balance = state
            .reserve
            .debt_asset_balance
            .checked_sub(amount)
            .ok_or(BankError::ArithmeticOverflow {
                context: "reserve withdrawal",
            })?;
        debug!(amount = %amount, fee = %fee, balance = %state.reserve.debt_asset_balance, "reserve withdrawn");
        Ok(())
    }

    // === Vault collateral ===

    /// Deposit collateral into the borrower's vault, creating it on first use
    pub async fn vault_deposit(&self, borrower: &str, amount: Amount) -> Result<(), BankError> {
        let mut state = self.state.lock().await;
        state.require_registered()?;
        let now = self.clock.now();

        let collateral_asset = state.registration(AssetRole::Collateral)?.asset.clone();
        let bank = state.config.name.clone();
        self.ledger
            .transfer(&collateral_asset, borrower, &bank, amount)
            .await?;

        let vault = state.vaults.get_or_create(borrower, now);
        vault.collateral = vault
            .collateral
            .checked_add(amount)
            .ok_or(BankError::ArithmeticOverflow {
                context: "vault collateral",
            })?;
        debug!(borrower, amount = %amount, collateral = %vault.collateral, "collateral deposited");
        Ok(())
    }

    /// Withdraw collateral, refusing to leave a borrowing vault below the
    /// minimum collateralization ratio
    pub async fn vault_withdraw(&self, borrower: &str, amount: Amount) -> Result<(), BankError> {
        let mut state = self.state.lock().await;
        state.require_registered()?;
        let now = self.clock.now();
        let config = state.config.clone();

        let Some(mut vault) = state.vaults.get(borrower).cloned() else {
            return Err(BankError::InsufficientVaultCollateral {
                held: Amount::ZERO.to_string(),
                requested: amount.to_string(),
            });
        };
        accrual::accrue(
            &mut vault,
            config.interest_rate_bps,
            config.accrual_period_secs,
            now,
        )?;

        if amount > vault.collateral {
            return Err(BankError::InsufficientVaultCollateral {
                held: vault.collateral.to_string(),
                requested: amount.to_string(),
            });
        }
        let remaining = vault
            .collateral
            .checked_sub(amount)
            .ok_or(BankError::ArithmeticOverflow {
                context: "vault withdrawal",
            })?;

        // Debt-free collateral is unencumbered; with debt outstanding the
        // post-withdrawal position must still clear the minimum ratio.
        let mut prices = None;
        if vault.has_debt() {
            let pair = self.fetch_prices(&state, now).await?;
            if let Some(ratio) =
                risk::position_ratio_bps(remaining, vault.debt, pair.collateral, pair.debt)?
            {
                if !risk::meets_minimum(ratio, config.min_ratio_bps()) {
                    return Err(BankError::Undercollateralized {
                        ratio_bps: ratio.to_string(),
                        min_bps: config.min_ratio_bps().to_string(),
                    });
                }
            }
            prices = Some(pair);
        }

        let collateral_asset = state.registration(AssetRole::Collateral)?.asset.clone();
        self.ledger
            .transfer(&collateral_asset, &config.name, borrower, amount)
            .await?;

        vault.collateral = remaining;
        state.vaults.put(borrower, vault);
        if let Some(pair) = prices {
            refresh_prices(&mut state, &pair);
        }
        debug!(borrower, amount = %amount, "collateral withdrawn");
        Ok(())
    }

    // === Borrow / repay ===

    /// Borrow debt asset from the reserve against the vault's collateral.
    ///
    /// The origination fee is added to the owed balance, not transferred.
    pub async fn vault_borrow(&self, borrower: &str, amount: Amount) -> Result<(), BankError> {
        let mut state = self.state.lock().await;
        state.require_registered()?;
        let now = self.clock.now();
        let config = state.config.clone();
        let prices = self.fetch_prices(&state, now).await?;

        let mut vault = state
            .vaults
            .get(borrower)
            .cloned()
            .unwrap_or_else(|| Vault::new(now));
        accrual::accrue(
            &mut vault,
            config.interest_rate_bps,
            config.accrual_period_secs,
            now,
        )?;

        let fee = math::bps_of(amount.value(), config.origination_fee_bps)
            .map(Amount::new_unchecked)
            .ok_or(BankError::ArithmeticOverflow {
                context: "origination fee",
            })?;
        let tentative_debt = vault
            .debt
            .checked_add(amount)
            .and_then(|d| d.checked_add(fee))
            .ok_or(BankError::ArithmeticOverflow {
                context: "tentative debt",
            })?;

        if let Some(ratio) = risk::position_ratio_bps(
            vault.collateral,
            tentative_debt,
            prices.collateral,
            prices.debt,
        )? {
            if !risk::meets_minimum(ratio, config.min_ratio_bps()) {
                return Err(BankError::InsufficientCollateral {
                    ratio_bps: ratio.to_string(),
                    min_bps: config.min_ratio_bps().to_string(),
                });
            }
        }

        if !state.reserve.can_fund(amount) {
            return Err(BankError::InsufficientReserve {
                available: state.reserve.debt_asset_balance.to_string(),
                required: amount.to_string(),
            });
        }

        let debt_asset = state.registration(AssetRole::Debt)?.asset.clone();
        self.ledger
            .transfer(&debt_asset, &config.name, borrower, amount)
            .await?;

        vault.debt = tentative_debt;
        state.vaults.put(borrower, vault);
        state.reserve.debt_asset_balance = state
            .reserve
            .debt_asset_balance
            .checked_sub(amount)
            .ok_or(BankError::ArithmeticOverflow {
                context: "reserve funding",
            })?;
        refresh_prices(&mut state, &prices);
        debug!(borrower, amount = %amount, fee = %fee, debt = %tentative_debt, "borrowed against vault");
        Ok(())
    }

    /// Repay debt; amounts beyond what is owed are clamped, and the clamped
    /// amount actually transferred is returned
    pub async fn vault_repay(&self, borrower: &str, amount: Amount) -> Result<Amount, BankError> {
        let mut state = self.state.lock().await;
        state.require_registered()?;
        let now = self.clock.now();
        let config = state.config.clone();

        let Some(mut vault) = state.vaults.get(borrower).cloned() else {
            return Ok(Amount::ZERO);
        };
        accrual::accrue(
            &mut vault,
            config.interest_rate_bps,
            config.accrual_period_secs,
            now,
        )?;

        let repaid = amount.min(vault.debt);
        if !repaid.is_zero() {
            let debt_asset = state.registration(AssetRole::Debt)?.asset.clone();
            self.ledger
                .transfer(&debt_asset, borrower, &config.name, repaid)
                .await?;
        }

        vault.debt = vault
            .debt
            .checked_sub(repaid)
            .ok_or(BankError::ArithmeticOverflow {
                context: "debt repayment",
            })?;
        state.vaults.put(borrower, vault);
        state.reserve.debt_asset_balance = state
            .reserve
            .debt_asset_balance
            .checked_add(repaid)
            .ok_or(BankError::ArithmeticOverflow {
                context: "reserve repayment",
            })?;
        debug!(borrower, repaid = %repaid, "debt repaid");
        Ok(repaid)
    }

    /// The exact amount that would fully close the vault if repaid now.
    ///
    /// Accrues a scratch copy; stored state is untouched.
    pub async fn repay_amount(&self, borrower: &str) -> Result<Amount, BankError> {
        let state = self.state.lock().await;
        let now = self.clock.now();

        let Some(vault) = state.vaults.get(borrower) else {
            return Ok(Amount::ZERO);
        };
        let mut scratch = vault.clone();
        accrual::accrue(
            &mut scratch,
            state.config.interest_rate_bps,
            state.config.accrual_period_secs,
            now,
        )?;
        Ok(scratch.debt)
    }

    /// Current collateralization ratio in basis points of percent, `None`
    /// for a vault with no (accrued) debt
    pub async fn collateralization_ratio(
        &self,
        borrower: &str,
    ) -> Result<Option<Decimal>, BankError> {
        let state = self.state.lock().await;
        state.require_registered()?;
        let now = self.clock.now();

        let Some(vault) = state.vaults.get(borrower) else {
            return Ok(None);
        };
        let mut scratch = vault.clone();
        accrual::accrue(
            &mut scratch,
            state.config.interest_rate_bps,
            state.config.accrual_period_secs,
            now,
        )?;
        if !scratch.has_debt() {
            return Ok(None);
        }

        let prices = self.fetch_prices(&state, now).await?;
        risk::position_ratio_bps(scratch.collateral, scratch.debt, prices.collateral, prices.debt)
    }

    // === Liquidation ===

    /// Force-close an undercollateralized vault.
    ///
    /// The vault's debt is written off in full even when its collateral
    /// caps the seizure; the uncovered value is reported as `shortfall`.
    pub async fn liquidate(&self, borrower: &str) -> Result<LiquidationOutcome, BankError> {
        let mut state = self.state.lock().await;
        state.require_registered()?;
        let now = self.clock.now();
        let config = state.config.clone();
        let prices = self.fetch_prices(&state, now).await?;

        let Some(mut vault) = state.vaults.get(borrower).cloned() else {
            return Err(BankError::NotUndercollateralized {
                borrower: borrower.to_string(),
            });
        };
        accrual::accrue(
            &mut vault,
            config.interest_rate_bps,
            config.accrual_period_secs,
            now,
        )?;

        let eligible = match risk::position_ratio_bps(
            vault.collateral,
            vault.debt,
            prices.collateral,
            prices.debt,
        )? {
            Some(ratio) => !risk::meets_minimum(ratio, config.min_ratio_bps()),
            None => false,
        };
        if !eligible {
            return Err(BankError::NotUndercollateralized {
                borrower: borrower.to_string(),
            });
        }

        let outcome = liquidation::plan(
            borrower,
            &vault,
            config.liquidation_penalty_pct,
            prices.collateral,
            prices.debt,
        )?;

        if !outcome.protocol_fee.is_zero() {
            let collateral_asset = state.registration(AssetRole::Collateral)?.asset.clone();
            self.ledger
                .transfer(
                    &collateral_asset,
                    &config.name,
                    &config.fee_recipient,
                    outcome.protocol_fee,
                )
                .await?;
        }

        let reserve_gain = outcome
            .collateral_seized
            .checked_sub(outcome.protocol_fee)
            .ok_or(BankError::ArithmeticOverflow {
                context: "seized collateral",
            })?;

        vault.collateral = vault
            .collateral
            .checked_sub(outcome.collateral_seized)
            .ok_or(BankError::ArithmeticOverflow {
                context: "vault seizure",
            })?;
        vault.debt = Amount::ZERO;
        state.vaults.put(borrower, vault);

        state.reserve.collateral_asset_balance = state
            .reserve
            .collateral_asset_balance
            .checked_add(reserve_gain)
            .ok_or(BankError::ArithmeticOverflow {
                context: "reserve collateral",
            })?;
        state.reserve.debt_asset_balance = state
            .reserve
            .debt_asset_balance
            .checked_add(outcome.debt_recovered)
            .ok_or(BankError::ArithmeticOverflow {
                context: "reserve recovery",
            })?;
        refresh_prices(&mut state, &prices);

        info!(
            borrower,
            seized = %outcome.collateral_seized,
            fee = %outcome.protocol_fee,
            shortfall = %outcome.shortfall,
            "vault liquidated"
        );
        Ok(outcome)
    }

    // === Read-only accessors ===

    pub async fn config(&self) -> BankConfig {
        self.state.lock().await.config.clone()
    }

    pub async fn reserve(&self) -> ReserveAccount {
        self.state.lock().await.reserve.clone()
    }

    pub async fn vault(&self, borrower: &str) -> Option<Vault> {
        self.state.lock().await.vaults.get(borrower).cloned()
    }

    pub async fn vault_count(&self) -> usize {
        self.state.lock().await.vaults.len()
    }

    pub async fn collateral_registration(&self) -> Option<AssetRegistration> {
        self.state.lock().await.collateral_asset.clone()
    }

    pub async fn debt_registration(&self) -> Option<AssetRegistration> {
        self.state.lock().await.debt_asset.clone()
    }

    // === Price plumbing ===

    async fn fetch_prices(
        &self,
        state: &BankState,
        now: DateTime<Utc>,
    ) -> Result<PricePair, BankError> {
        let max_age = state.config.max_price_age_secs;
        let collateral = self
            .fetch_price(state.registration(AssetRole::Collateral)?, max_age, now)
            .await?;
        let debt = self
            .fetch_price(state.registration(AssetRole::Debt)?, max_age, now)
            .await?;
        Ok(PricePair { collateral, debt })
    }

    /// One registered asset's current price.
    ///
    /// A feed the oracle has never heard of falls back to the registration's
    /// last known price; zero/negative and stale quotes are hard errors.
    async fn fetch_price(
        &self,
        registration: &AssetRegistration,
        max_age_secs: Option<u64>,
        now: DateTime<Utc>,
    ) -> Result<Decimal, BankError> {
        let quote = match self.oracle.price(&registration.price_feed).await {
            Ok(quote) => quote,
            Err(OracleError::FeedNotFound { .. }) => return Ok(registration.last_known_price),
            Err(err) => return Err(err.into()),
        };

        if let Some(max_age_secs) = max_age_secs {
            if quote.is_stale(max_age_secs, now) {
                return Err(OracleError::StalePrice {
                    feed: registration.price_feed.clone(),
                    age_secs: quote.age_secs(now),
                    max_age_secs,
                }
                .into());
            }
        }

        let price = quote.normalized();
        if price <= Decimal::ZERO {
            return Err(OracleError::InvalidPrice {
                feed: registration.price_feed.clone(),
                reason: format!("non-positive price {price}"),
            }
            .into());
        }
        Ok(price)
    }
}
