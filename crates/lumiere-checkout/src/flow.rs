//! # Checkout Flow
//!
//! The per-attempt checkout state machine.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout State Machine                               │
//! │                                                                         │
//! │  ┌──────┐  begin   ┌──────────────────┐  resolved  ┌───────┐           │
//! │  │ Idle │─────────►│ AddressResolving │───────────►│ Ready │◄────┐     │
//! │  └──────┘ (auth)   └──────────────────┘            └───┬───┘     │     │
//! │      │                                                 │         │     │
//! │      │ begin (guest)                            submit │         │     │
//! │      └────────────────────────────────────────►┌───────▼──────┐  │     │
//! │                                                │  Submitting  │  │     │
//! │                                                └───────┬──────┘  │     │
//! │                                 order created          │         │     │
//! │                              ┌─────────────────────────┤ failure │     │
//! │                              ▼                         └─────────┘     │
//! │                        ┌───────────┐              (retryable, data     │
//! │                        │ Completed │               intact)             │
//! │                        └───────────┘                                   │
//! │                                                                         │
//! │  Local validation failures (missing field, stale points, empty cart)   │
//! │  never reach the order gateway and leave the phase at Ready.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One `CheckoutFlow` is built per checkout attempt and handed the session's
//! `CartStore`; on success it resets the cart and parks at `Completed`.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::collaborators::{AddressBook, CustomerProfile, OrderGateway};
use crate::error::{CheckoutError, CheckoutResult};
use crate::form::{ShippingField, ShippingForm};
use lumiere_cart::CartStore;
use lumiere_core::loyalty::validate_redemption;
use lumiere_core::order::payable_total;
use lumiere_core::{Money, OrderDraft, OrderReference, PaymentMethod, PointRate, ShippingAddress};

// =============================================================================
// Checkout Phase
// =============================================================================

/// Phase of the checkout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutPhase {
    /// Nothing started yet.
    Idle,
    /// Fetching saved addresses and the loyalty balance.
    AddressResolving,
    /// Form editable, submission possible.
    Ready,
    /// An order submission is outstanding.
    Submitting,
    /// The order was created; the flow is finished.
    Completed,
}

impl Default for CheckoutPhase {
    fn default() -> Self {
        CheckoutPhase::Idle
    }
}

impl fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutPhase::Idle => "idle",
            CheckoutPhase::AddressResolving => "address-resolving",
            CheckoutPhase::Ready => "ready",
            CheckoutPhase::Submitting => "submitting",
            CheckoutPhase::Completed => "completed",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Checkout State
// =============================================================================

/// Mutable state guarded by the flow's mutex.
#[derive(Debug, Default)]
struct CheckoutState {
    phase: CheckoutPhase,
    customer_id: Option<String>,
    loyalty_balance: i64,
    candidates: Vec<ShippingAddress>,
    form: ShippingForm,
    payment_method: PaymentMethod,
    redeemed_points: i64,
    order_ref: Option<OrderReference>,
}

impl CheckoutState {
    /// Guards an operation that is only legal in the `Ready` phase.
    fn require_ready(&self) -> CheckoutResult<()> {
        if self.phase != CheckoutPhase::Ready {
            return Err(CheckoutError::InvalidPhase(self.phase));
        }
        Ok(())
    }
}

// =============================================================================
// Checkout Flow
// =============================================================================

/// Orchestrates one checkout attempt against the session cart.
///
/// ## Thread Safety
/// State sits behind a `Mutex` that is never held across an await; the
/// `Submitting` phase is claimed inside the guard, so a second `submit`
/// while one is outstanding is rejected without reaching the gateway.
pub struct CheckoutFlow {
    cart: Arc<CartStore>,
    addresses: Arc<dyn AddressBook>,
    profiles: Arc<dyn CustomerProfile>,
    orders: Arc<dyn OrderGateway>,
    rate: PointRate,
    state: Mutex<CheckoutState>,
}

impl CheckoutFlow {
    /// Creates a flow over the session cart and its collaborators.
    pub fn new(
        cart: Arc<CartStore>,
        addresses: Arc<dyn AddressBook>,
        profiles: Arc<dyn CustomerProfile>,
        orders: Arc<dyn OrderGateway>,
    ) -> Self {
        CheckoutFlow {
            cart,
            addresses,
            profiles,
            orders,
            rate: PointRate::default(),
            state: Mutex::new(CheckoutState::default()),
        }
    }

    /// Overrides the point conversion rate (promotions).
    pub fn with_point_rate(mut self, rate: PointRate) -> Self {
        self.rate = rate;
        self
    }

    fn lock_state(&self) -> MutexGuard<'_, CheckoutState> {
        self.state.lock().expect("checkout state mutex poisoned")
    }

    // =========================================================================
    // Begin / Address Resolution
    // =========================================================================

    /// Starts the attempt.
    ///
    /// ## Behavior
    /// - Guest (`None`): straight to `Ready` with an empty form
    /// - Authenticated: `AddressResolving` while the profile snapshot and
    ///   saved addresses are fetched; the default-flagged address, if any,
    ///   is pre-selected into the form; then `Ready`
    /// - A fetch failure still settles the phase at `Ready` (the customer
    ///   can type an address by hand) and surfaces as a retryable error
    pub async fn begin(&self, customer_id: Option<&str>) -> CheckoutResult<()> {
        {
            let mut st = self.lock_state();
            if st.phase != CheckoutPhase::Idle {
                return Err(CheckoutError::InvalidPhase(st.phase));
            }
            st.customer_id = customer_id.map(str::to_string);
            st.phase = if customer_id.is_some() {
                CheckoutPhase::AddressResolving
            } else {
                CheckoutPhase::Ready
            };
        }

        let Some(customer) = customer_id else {
            debug!("Guest checkout started");
            return Ok(());
        };

        debug!(customer_id = %customer, "Resolving customer data");
        let profile = self.profiles.get(customer).await;
        let candidates = self.addresses.list(customer).await;

        let mut st = self.lock_state();
        st.phase = CheckoutPhase::Ready;

        if let Ok(snapshot) = &profile {
            st.loyalty_balance = snapshot.loyalty_points;
        }
        if let Ok(list) = &candidates {
            st.candidates = list.clone();
            if let Some(default) = list.iter().find(|a| a.is_default) {
                debug!(address_id = %default.id, "Pre-selected default address");
                st.form.select_saved(default);
            }
        }
        drop(st);

        profile.map(|_| ()).map_err(CheckoutError::Profile)?;
        candidates.map(|_| ()).map_err(CheckoutError::AddressLookup)?;
        Ok(())
    }

    /// Retries the customer-data fetches after a failed `begin`.
    ///
    /// Refreshes the loyalty balance and candidate list without touching
    /// whatever the customer already typed into the form.
    pub async fn refresh_customer_data(&self) -> CheckoutResult<()> {
        let customer = {
            let st = self.lock_state();
            st.require_ready()?;
            st.customer_id
                .clone()
                .ok_or(CheckoutError::NotAuthenticated)?
        };

        let profile = self.profiles.get(&customer).await;
        let candidates = self.addresses.list(&customer).await;

        let mut st = self.lock_state();
        if let Ok(snapshot) = &profile {
            st.loyalty_balance = snapshot.loyalty_points;
        }
        if let Ok(list) = &candidates {
            st.candidates = list.clone();
        }
        drop(st);

        profile.map(|_| ()).map_err(CheckoutError::Profile)?;
        candidates.map(|_| ()).map_err(CheckoutError::AddressLookup)?;
        Ok(())
    }

    // =========================================================================
    // Shipping & Payment Selection
    // =========================================================================

    /// Copies a saved address into the form.
    pub fn select_address(&self, address_id: &str) -> CheckoutResult<()> {
        let mut st = self.lock_state();
        st.require_ready()?;

        let address = st
            .candidates
            .iter()
            .find(|a| a.id == address_id)
            .cloned()
            .ok_or_else(|| CheckoutError::UnknownAddress(address_id.to_string()))?;

        st.form.select_saved(&address);
        Ok(())
    }

    /// Edits one shipping field by hand, dropping any saved-address
    /// selection.
    pub fn edit_field(&self, field: ShippingField, value: &str) -> CheckoutResult<()> {
        let mut st = self.lock_state();
        st.require_ready()?;
        st.form.set(field, value);
        Ok(())
    }

    /// Chooses the payment method. Defaults to COD when never called.
    pub fn set_payment_method(&self, method: PaymentMethod) -> CheckoutResult<()> {
        let mut st = self.lock_state();
        st.require_ready()?;
        st.payment_method = method;
        Ok(())
    }

    /// Forwards a new address to the address book and adds it to the
    /// candidate list.
    pub async fn save_address(&self, address: ShippingAddress) -> CheckoutResult<ShippingAddress> {
        let customer = self
            .lock_state()
            .customer_id
            .clone()
            .ok_or(CheckoutError::NotAuthenticated)?;

        let created = self
            .addresses
            .create(&customer, address)
            .await
            .map_err(CheckoutError::AddressLookup)?;

        self.lock_state().candidates.push(created.clone());
        Ok(created)
    }

    // =========================================================================
    // Loyalty Points
    // =========================================================================

    /// The redemption cap right now: min(balance, floor(payable ÷ rate)),
    /// recomputed against the live voucher-adjusted cart total.
    pub async fn usable_points(&self) -> i64 {
        let balance = self.lock_state().loyalty_balance;
        let payable = self.cart.total().await;
        self.rate.redeemable_points(balance, payable)
    }

    /// Elects points to redeem on this attempt.
    ///
    /// A request above the current cap is refused outright; nothing is
    /// clamped. Zero clears the redemption.
    pub async fn redeem_points(&self, points: i64) -> CheckoutResult<()> {
        let balance = {
            let st = self.lock_state();
            st.require_ready()?;
            st.loyalty_balance
        };

        let payable = self.cart.total().await;
        validate_redemption(self.rate, points, balance, payable)?;

        debug!(points = %points, "Loyalty redemption accepted");
        self.lock_state().redeemed_points = points;
        Ok(())
    }

    /// The final payable amount: cart total minus the points discount,
    /// floored at zero.
    pub async fn payable(&self) -> Money {
        let redeemed = self.lock_state().redeemed_points;
        let rate = self.rate;
        self.cart
            .with_cart(move |cart| payable_total(cart, redeemed, rate))
            .await
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Builds the order draft and hands it to the order gateway.
    ///
    /// ## Behavior
    /// - Rejected without a gateway call: submission already outstanding,
    ///   missing shipping field, empty cart, stale points redemption
    /// - Gateway success: the cart is reset, the phase parks at `Completed`
    ///   and the order reference is returned
    /// - Gateway failure: retryable error, phase back at `Ready`, cart and
    ///   form untouched
    pub async fn submit(&self) -> CheckoutResult<OrderReference> {
        let (customer_id, summary, payment_method, redeemed_points, balance);
        {
            let mut st = self.lock_state();
            match st.phase {
                CheckoutPhase::Submitting => return Err(CheckoutError::SubmissionInFlight),
                CheckoutPhase::Ready => {}
                other => return Err(CheckoutError::InvalidPhase(other)),
            }

            // Field-level validation happens before the phase is claimed;
            // the gateway is never called for an incomplete form.
            st.form.validate()?;

            customer_id = st.customer_id.clone();
            summary = st.form.summary();
            payment_method = st.payment_method;
            redeemed_points = st.redeemed_points;
            balance = st.loyalty_balance;
            st.phase = CheckoutPhase::Submitting;
        }

        // Assemble against one consistent view of the cart. The points cap
        // is re-clamped here: a redemption made stale by cart or voucher
        // mutation rejects instead of over-crediting.
        let rate = self.rate;
        let draft = self
            .cart
            .with_cart(move |cart| -> CheckoutResult<OrderDraft> {
                if cart.is_empty() {
                    return Err(CheckoutError::EmptyCart);
                }
                validate_redemption(rate, redeemed_points, balance, cart.total())?;
                Ok(OrderDraft::assemble(
                    cart,
                    customer_id.as_deref(),
                    summary,
                    payment_method,
                    redeemed_points,
                    rate,
                )?)
            })
            .await;

        let draft = match draft {
            Ok(draft) => draft,
            Err(e) => {
                self.lock_state().phase = CheckoutPhase::Ready;
                return Err(e);
            }
        };

        let attempt = Uuid::new_v4();
        info!(
            attempt = %attempt,
            total_vnd = draft.total_vnd,
            lines = draft.lines.len(),
            redeemed_points = draft.redeemed_points,
            "Submitting order"
        );

        match self.orders.create(&draft).await {
            Ok(reference) => {
                // The order exists either way; a failed reset only leaves
                // stale lines that the next snapshot rewrite replaces.
                if let Err(e) = self.cart.clear().await {
                    warn!(attempt = %attempt, error = %e, "Cart reset after submission failed");
                }

                let mut st = self.lock_state();
                st.phase = CheckoutPhase::Completed;
                st.order_ref = Some(reference.clone());
                info!(attempt = %attempt, order_id = %reference.id, "Order created");
                Ok(reference)
            }
            Err(e) => {
                self.lock_state().phase = CheckoutPhase::Ready;
                warn!(attempt = %attempt, error = %e, "Order submission failed");
                Err(CheckoutError::Submission(e))
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current phase.
    pub fn phase(&self) -> CheckoutPhase {
        self.lock_state().phase
    }

    /// Copy of the shipping form.
    pub fn shipping_form(&self) -> ShippingForm {
        self.lock_state().form.clone()
    }

    /// The fetched saved-address candidates.
    pub fn saved_addresses(&self) -> Vec<ShippingAddress> {
        self.lock_state().candidates.clone()
    }

    /// Selected payment method.
    pub fn payment_method(&self) -> PaymentMethod {
        self.lock_state().payment_method
    }

    /// Loyalty balance fetched at `begin`.
    pub fn loyalty_balance(&self) -> i64 {
        self.lock_state().loyalty_balance
    }

    /// Points elected for this attempt.
    pub fn redeemed_points(&self) -> i64 {
        self.lock_state().redeemed_points
    }

    /// The created order, once `Completed`.
    pub fn order_reference(&self) -> Option<OrderReference> {
        self.lock_state().order_ref.clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{CollaboratorError, CollaboratorResult};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    use lumiere_cart::{MemorySnapshotStore, StaticVoucherCatalog};
    use lumiere_core::types::{CustomerSnapshot, Product, ProductVariant};

    // -------------------------------------------------------------------------
    // Stub collaborators
    // -------------------------------------------------------------------------

    struct StubAddressBook {
        addresses: Vec<ShippingAddress>,
        fail: bool,
    }

    #[async_trait]
    impl AddressBook for StubAddressBook {
        async fn list(&self, _customer_id: &str) -> CollaboratorResult<Vec<ShippingAddress>> {
            if self.fail {
                return Err(CollaboratorError::Transport("address book down".to_string()));
            }
            Ok(self.addresses.clone())
        }

        async fn create(
            &self,
            _customer_id: &str,
            mut address: ShippingAddress,
        ) -> CollaboratorResult<ShippingAddress> {
            address.id = "addr-new".to_string();
            Ok(address)
        }
    }

    struct StubProfile {
        loyalty_points: i64,
    }

    #[async_trait]
    impl CustomerProfile for StubProfile {
        async fn get(&self, customer_id: &str) -> CollaboratorResult<CustomerSnapshot> {
            Ok(CustomerSnapshot {
                id: customer_id.to_string(),
                loyalty_points: self.loyalty_points,
            })
        }
    }

    fn order_ref(id: &str) -> OrderReference {
        OrderReference {
            id: id.to_string(),
            created_at: Utc::now(),
        }
    }

    /// Gateway that records every draft and plays back a script of results.
    /// An empty script answers `Ok`.
    #[derive(Default)]
    struct ScriptedGateway {
        calls: AtomicUsize,
        script: Mutex<VecDeque<CollaboratorResult<OrderReference>>>,
        last_draft: Mutex<Option<OrderDraft>>,
    }

    #[async_trait]
    impl OrderGateway for ScriptedGateway {
        async fn create(&self, draft: &OrderDraft) -> CollaboratorResult<OrderReference> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_draft.lock().unwrap() = Some(draft.clone());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(order_ref("ord-1")))
        }
    }

    /// Gateway that parks every call until released, for in-flight tests.
    struct BlockingGateway {
        calls: AtomicUsize,
        release: Notify,
    }

    #[async_trait]
    impl OrderGateway for BlockingGateway {
        async fn create(&self, _draft: &OrderDraft) -> CollaboratorResult<OrderReference> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            Ok(order_ref("ord-blocked"))
        }
    }

    // -------------------------------------------------------------------------
    // Fixtures
    // -------------------------------------------------------------------------

    fn saved_address(id: &str, is_default: bool) -> ShippingAddress {
        ShippingAddress {
            id: id.to_string(),
            full_name: "Linh Trần".to_string(),
            phone: "0901234567".to_string(),
            street: "12 Lê Lợi".to_string(),
            city: "Đà Nẵng".to_string(),
            is_default,
        }
    }

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn variant(id: &str, price_vnd: i64) -> ProductVariant {
        ProductVariant {
            id: id.to_string(),
            name: "30ml".to_string(),
            price_vnd,
        }
    }

    async fn cart_with_total(subtotal_vnd: i64) -> Arc<CartStore> {
        let cart = Arc::new(
            CartStore::restore(
                Arc::new(MemorySnapshotStore::new()),
                Arc::new(StaticVoucherCatalog::storefront()),
            )
            .await,
        );
        cart.add_item(
            product("p1", "Sérum Éclat"),
            variant("v1", subtotal_vnd),
            1,
        )
        .await
        .unwrap();
        cart
    }

    struct Fixture {
        cart: Arc<CartStore>,
        gateway: Arc<ScriptedGateway>,
        flow: CheckoutFlow,
    }

    async fn fixture(subtotal_vnd: i64, loyalty_points: i64) -> Fixture {
        let cart = cart_with_total(subtotal_vnd).await;
        let gateway = Arc::new(ScriptedGateway::default());
        let flow = CheckoutFlow::new(
            Arc::clone(&cart),
            Arc::new(StubAddressBook {
                addresses: vec![saved_address("addr-1", false), saved_address("addr-2", true)],
                fail: false,
            }),
            Arc::new(StubProfile { loyalty_points }),
            Arc::clone(&gateway) as Arc<dyn OrderGateway>,
        );
        Fixture {
            cart,
            gateway,
            flow,
        }
    }

    // -------------------------------------------------------------------------
    // Begin / address resolution
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_guest_begin_goes_straight_to_ready() {
        let fx = fixture(300_000, 0).await;
        fx.flow.begin(None).await.unwrap();

        assert_eq!(fx.flow.phase(), CheckoutPhase::Ready);
        assert!(fx.flow.saved_addresses().is_empty());
        assert!(fx.flow.shipping_form().saved_address_id().is_none());
    }

    #[tokio::test]
    async fn test_authenticated_begin_preselects_default_address() {
        let fx = fixture(300_000, 10_000).await;
        fx.flow.begin(Some("cust-1")).await.unwrap();

        assert_eq!(fx.flow.phase(), CheckoutPhase::Ready);
        assert_eq!(fx.flow.loyalty_balance(), 10_000);
        assert_eq!(fx.flow.saved_addresses().len(), 2);

        // addr-2 carries the default flag and was copied into the form
        let form = fx.flow.shipping_form();
        assert_eq!(form.saved_address_id(), Some("addr-2"));
        assert_eq!(form.full_name, "Linh Trần");
    }

    #[tokio::test]
    async fn test_begin_twice_is_rejected() {
        let fx = fixture(300_000, 0).await;
        fx.flow.begin(None).await.unwrap();

        let err = fx.flow.begin(None).await.unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidPhase(_)));
    }

    #[tokio::test]
    async fn test_address_fetch_failure_is_retryable_and_settles_ready() {
        let cart = cart_with_total(300_000).await;
        let gateway = Arc::new(ScriptedGateway::default());
        let flow = CheckoutFlow::new(
            cart,
            Arc::new(StubAddressBook {
                addresses: vec![],
                fail: true,
            }),
            Arc::new(StubProfile {
                loyalty_points: 500,
            }),
            gateway as Arc<dyn OrderGateway>,
        );

        let err = flow.begin(Some("cust-1")).await.unwrap_err();
        assert!(matches!(err, CheckoutError::AddressLookup(_)));
        assert!(err.is_retryable());

        // The customer can still type an address and check out
        assert_eq!(flow.phase(), CheckoutPhase::Ready);
        // The profile fetch succeeded independently
        assert_eq!(flow.loyalty_balance(), 500);
    }

    // -------------------------------------------------------------------------
    // Shipping form selection modes
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_select_then_edit_clears_saved_marker() {
        let fx = fixture(300_000, 0).await;
        fx.flow.begin(Some("cust-1")).await.unwrap();

        fx.flow.select_address("addr-1").unwrap();
        assert_eq!(fx.flow.shipping_form().saved_address_id(), Some("addr-1"));

        fx.flow
            .edit_field(ShippingField::Street, "45 Trần Phú")
            .unwrap();
        let form = fx.flow.shipping_form();
        assert!(form.saved_address_id().is_none());
        assert_eq!(form.street, "45 Trần Phú");
    }

    #[tokio::test]
    async fn test_select_unknown_address_is_rejected() {
        let fx = fixture(300_000, 0).await;
        fx.flow.begin(Some("cust-1")).await.unwrap();

        let err = fx.flow.select_address("addr-ghost").unwrap_err();
        assert!(matches!(err, CheckoutError::UnknownAddress(_)));
    }

    // -------------------------------------------------------------------------
    // Loyalty points
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_usable_points_cap() {
        // Balance 10,000 points, total 300,000₫ at 1,000₫/point
        let fx = fixture(300_000, 10_000).await;
        fx.flow.begin(Some("cust-1")).await.unwrap();

        assert_eq!(fx.flow.usable_points().await, 300);
        fx.flow.redeem_points(300).await.unwrap();
        assert_eq!(fx.flow.redeemed_points(), 300);
    }

    #[tokio::test]
    async fn test_redeem_over_cap_is_refused_whole() {
        let fx = fixture(300_000, 10_000).await;
        fx.flow.begin(Some("cust-1")).await.unwrap();

        let err = fx.flow.redeem_points(301).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::PointsExceedCap {
                requested: 301,
                cap: 300
            }
        ));
        // Nothing was clamped
        assert_eq!(fx.flow.redeemed_points(), 0);
    }

    #[tokio::test]
    async fn test_usable_points_shrink_with_voucher() {
        let fx = fixture(300_000, 10_000).await;
        fx.flow.begin(Some("cust-1")).await.unwrap();

        // Voucher drops the payable total to 270,000₫, so the cap follows
        assert!(fx.cart.apply_voucher("LUMIERE10").await.is_applied());
        assert_eq!(fx.flow.usable_points().await, 270);
    }

    #[tokio::test]
    async fn test_payable_subtracts_points_after_voucher() {
        let fx = fixture(500_000, 10_000).await;
        fx.flow.begin(Some("cust-1")).await.unwrap();

        fx.cart.apply_voucher("LUMIERE10").await;
        fx.flow.redeem_points(100).await.unwrap();

        // 500,000 − 50,000 (voucher) − 100,000 (points)
        assert_eq!(fx.flow.payable().await, Money::from_vnd(350_000));
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    async fn make_ready(fx: &Fixture) {
        fx.flow.begin(Some("cust-1")).await.unwrap();
        // Default address was preselected; the form is complete
    }

    #[tokio::test]
    async fn test_submit_success_resets_cart_and_completes() {
        let fx = fixture(300_000, 0).await;
        make_ready(&fx).await;

        let reference = fx.flow.submit().await.unwrap();
        assert_eq!(reference.id, "ord-1");

        assert_eq!(fx.flow.phase(), CheckoutPhase::Completed);
        assert_eq!(fx.flow.order_reference().unwrap().id, "ord-1");
        assert!(fx.cart.is_empty().await);
        assert!(fx.cart.voucher().await.is_none());
        assert_eq!(fx.gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_submit_missing_field_never_calls_gateway() {
        let fx = fixture(300_000, 0).await;
        fx.flow.begin(None).await.unwrap(); // guest, empty form

        let err = fx.flow.submit().await.unwrap_err();
        match err {
            CheckoutError::Validation(e) => assert_eq!(e.field(), "fullName"),
            other => panic!("expected validation error, got {other:?}"),
        }

        assert_eq!(fx.gateway.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.flow.phase(), CheckoutPhase::Ready);
        // Cart untouched
        assert!(!fx.cart.is_empty().await);
    }

    #[tokio::test]
    async fn test_submit_empty_cart_never_calls_gateway() {
        let fx = fixture(300_000, 0).await;
        make_ready(&fx).await;
        fx.cart.clear().await.unwrap();

        let err = fx.flow.submit().await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
        assert_eq!(fx.gateway.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.flow.phase(), CheckoutPhase::Ready);
    }

    #[tokio::test]
    async fn test_submit_rejects_stale_points_after_cart_shrinks() {
        let fx = fixture(300_000, 10_000).await;
        make_ready(&fx).await;

        // Cap is 300 at a 300,000₫ total
        fx.flow.redeem_points(300).await.unwrap();

        // Cart mutation shrinks the total to 100,000₫; the old redemption
        // is now stale and must be re-clamped at submit
        fx.cart.remove_item("v1").await.unwrap();
        fx.cart
            .add_item(product("p2", "Baume Lèvres"), variant("v2", 100_000), 1)
            .await
            .unwrap();

        let err = fx.flow.submit().await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::PointsExceedCap {
                requested: 300,
                cap: 100
            }
        ));
        assert_eq!(fx.gateway.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.flow.phase(), CheckoutPhase::Ready);
    }

    #[tokio::test]
    async fn test_submit_transport_failure_returns_to_ready_with_data_intact() {
        let fx = fixture(300_000, 0).await;
        make_ready(&fx).await;
        fx.gateway.script.lock().unwrap().push_back(Err(
            CollaboratorError::Transport("order service timeout".to_string()),
        ));

        let err = fx.flow.submit().await.unwrap_err();
        assert!(matches!(err, CheckoutError::Submission(_)));
        assert!(err.is_retryable());

        // Nothing was lost: cart, form, phase all intact
        assert_eq!(fx.flow.phase(), CheckoutPhase::Ready);
        assert!(!fx.cart.is_empty().await);
        assert_eq!(fx.flow.shipping_form().full_name, "Linh Trần");

        // Resubmission without re-entering data succeeds
        let reference = fx.flow.submit().await.unwrap();
        assert_eq!(reference.id, "ord-1");
        assert_eq!(fx.flow.phase(), CheckoutPhase::Completed);
        assert_eq!(fx.gateway.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_second_submit_while_outstanding_is_rejected() {
        let cart = cart_with_total(300_000).await;
        let gateway = Arc::new(BlockingGateway {
            calls: AtomicUsize::new(0),
            release: Notify::new(),
        });
        let flow = Arc::new(CheckoutFlow::new(
            Arc::clone(&cart),
            Arc::new(StubAddressBook {
                addresses: vec![saved_address("addr-1", true)],
                fail: false,
            }),
            Arc::new(StubProfile { loyalty_points: 0 }),
            Arc::clone(&gateway) as Arc<dyn OrderGateway>,
        ));
        flow.begin(Some("cust-1")).await.unwrap();

        // First submission parks inside the gateway
        let first = {
            let flow = Arc::clone(&flow);
            tokio::spawn(async move { flow.submit().await })
        };
        while gateway.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        // Second submission is rejected without a second gateway call
        let err = flow.submit().await.unwrap_err();
        assert!(matches!(err, CheckoutError::SubmissionInFlight));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);

        // Releasing the gateway lets the first submission complete
        gateway.release.notify_one();
        let reference = first.await.unwrap().unwrap();
        assert_eq!(reference.id, "ord-blocked");
        assert_eq!(flow.phase(), CheckoutPhase::Completed);
    }

    // -------------------------------------------------------------------------
    // Draft contents
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_draft_carries_discounts_statuses_and_lines() {
        let fx = fixture(500_000, 10_000).await;
        make_ready(&fx).await;

        fx.cart.apply_voucher("LUMIERE10").await;
        fx.flow.redeem_points(100).await.unwrap();
        fx.flow.set_payment_method(PaymentMethod::ZaloPay).unwrap();

        fx.flow.submit().await.unwrap();

        let draft = fx.gateway.last_draft.lock().unwrap().clone().unwrap();
        assert_eq!(draft.customer_id.as_deref(), Some("cust-1"));
        assert_eq!(draft.payment_method, PaymentMethod::ZaloPay);
        assert_eq!(draft.redeemed_points, 100);
        // 500,000 − 50,000 (voucher) − 100,000 (points)
        assert_eq!(draft.total_vnd, 350_000);
        assert_eq!(
            draft.shipping_summary,
            "Linh Trần, 0901234567, 12 Lê Lợi, Đà Nẵng"
        );

        assert_eq!(draft.lines.len(), 1);
        assert_eq!(draft.lines[0].variant_id, "v1");
        assert_eq!(draft.lines[0].quantity, 1);
        assert_eq!(draft.lines[0].unit_price_vnd, 500_000);
        assert_eq!(draft.lines[0].line_total_vnd, 500_000);
    }

    #[tokio::test]
    async fn test_guest_draft_has_no_customer_and_cod_is_unpaid() {
        let fx = fixture(300_000, 0).await;
        fx.flow.begin(None).await.unwrap();
        fx.flow
            .edit_field(ShippingField::FullName, "Minh Phạm")
            .unwrap();
        fx.flow
            .edit_field(ShippingField::Phone, "0912345678")
            .unwrap();
        fx.flow
            .edit_field(ShippingField::Street, "7 Nguyễn Huệ")
            .unwrap();
        fx.flow.edit_field(ShippingField::City, "Huế").unwrap();

        fx.flow.submit().await.unwrap();

        let draft = fx.gateway.last_draft.lock().unwrap().clone().unwrap();
        assert!(draft.customer_id.is_none());
        assert_eq!(draft.payment_method, PaymentMethod::Cod);
        assert_eq!(draft.payment_status, lumiere_core::PaymentStatus::Unpaid);
        assert_eq!(draft.status, lumiere_core::OrderStatus::Pending);
        assert_eq!(
            draft.fulfillment_status,
            lumiere_core::FulfillmentStatus::Unfulfilled
        );
    }

    #[tokio::test]
    async fn test_save_address_requires_authentication() {
        let fx = fixture(300_000, 0).await;
        fx.flow.begin(None).await.unwrap();

        let err = fx.flow.save_address(saved_address("ignored", false)).await;
        assert!(matches!(err, Err(CheckoutError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_save_address_extends_candidates() {
        let fx = fixture(300_000, 0).await;
        fx.flow.begin(Some("cust-1")).await.unwrap();

        let created = fx
            .flow
            .save_address(saved_address("ignored", false))
            .await
            .unwrap();
        assert_eq!(created.id, "addr-new");
        assert!(fx
            .flow
            .saved_addresses()
            .iter()
            .any(|a| a.id == "addr-new"));
    }
}
