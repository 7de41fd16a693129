//! # Voucher Catalog
//!
//! Lookup seam for voucher codes. The shipped implementation is a static
//! table; a remote validation service can back the same trait without
//! changing any `CartStore` operation.

use async_trait::async_trait;

use lumiere_core::Voucher;

// =============================================================================
// Catalog Trait
// =============================================================================

/// Resolves voucher codes to their discounts.
#[async_trait]
pub trait VoucherCatalog: Send + Sync {
    /// Resolves a code, `None` when unknown. Matching is case-insensitive.
    async fn resolve(&self, code: &str) -> Option<Voucher>;
}

// =============================================================================
// Static Catalog
// =============================================================================

/// Fixed in-process voucher table.
#[derive(Debug, Clone)]
pub struct StaticVoucherCatalog {
    vouchers: Vec<Voucher>,
}

impl StaticVoucherCatalog {
    /// Creates a catalog over a fixed voucher list.
    pub fn new(vouchers: Vec<Voucher>) -> Self {
        StaticVoucherCatalog { vouchers }
    }

    /// The storefront's current promotion table.
    pub fn storefront() -> Self {
        StaticVoucherCatalog::new(vec![Voucher::new("LUMIERE10", 10)])
    }
}

impl Default for StaticVoucherCatalog {
    fn default() -> Self {
        StaticVoucherCatalog::storefront()
    }
}

#[async_trait]
impl VoucherCatalog for StaticVoucherCatalog {
    async fn resolve(&self, code: &str) -> Option<Voucher> {
        self.vouchers.iter().find(|v| v.matches(code)).cloned()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
