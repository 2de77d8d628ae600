//! Resource kinds and the registry that names them.
//!
//! A [`ResourceKind`] maps a name such as `Customer` to its route under a
//! company file (`Contact/Customer`). The company-file list itself is the
//! *root* kind, with an empty route, served at the API base URL.
//!
//! The set of kinds is open: [`ResourceRegistry::with_defaults`] covers the
//! common AccountRight resources and [`ResourceRegistry::register`] adds
//! more at runtime.
//!
//! # Example
//!
//! ```rust
//! use myob_api::rest::ResourceRegistry;
//!
//! let mut registry = ResourceRegistry::with_defaults();
//! registry.register("BankAccount", "Banking/BankAccount");
//!
//! assert_eq!(registry.get("Customer").unwrap().route(), "Contact/Customer");
//! assert!(registry.get("CompanyFile").unwrap().is_root());
//! ```

use std::collections::HashMap;

/// Name of the root kind listing the available company files.
pub const COMPANY_FILE_KIND: &str = "CompanyFile";

/// Kinds registered by [`ResourceRegistry::with_defaults`], as `(name, route)`.
const DEFAULT_KINDS: &[(&str, &str)] = &[
    (COMPANY_FILE_KIND, ""),
    ("CurrentUser", "CurrentUser"),
    ("Contact", "Contact"),
    ("Customer", "Contact/Customer"),
    ("Supplier", "Contact/Supplier"),
    ("Employee", "Contact/Employee"),
    ("PersonalContact", "Contact/Personal"),
    ("Account", "GeneralLedger/Account"),
    ("TaxCode", "GeneralLedger/TaxCode"),
    ("Job", "GeneralLedger/Job"),
    ("Category", "GeneralLedger/Category"),
    ("JournalTransaction", "GeneralLedger/JournalTransaction"),
    ("GeneralJournal", "GeneralLedger/GeneralJournal"),
    ("Item", "Inventory/Item"),
    ("Invoice", "Sale/Invoice"),
    ("ItemInvoice", "Sale/Invoice/Item"),
    ("ServiceInvoice", "Sale/Invoice/Service"),
    ("CustomerPayment", "Sale/CustomerPayment"),
    ("ItemOrder", "Sale/Order/Item"),
    ("ItemPurchaseBill", "Purchase/Bill/Item"),
    ("ServicePurchaseBill", "Purchase/Bill/Service"),
    ("PurchaseOrder", "Purchase/Order"),
    ("SupplierPayment", "Purchase/SupplierPayment"),
    ("Timesheet", "Payroll/Timesheet"),
    ("PayrollCategory", "Payroll/PayrollCategory"),
];

/// A named category of record and its route.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceKind {
    name: String,
    route: String,
}

impl ResourceKind {
    /// Creates a kind. Leading and trailing slashes are stripped from `route`.
    #[must_use]
    pub fn new(name: impl Into<String>, route: impl Into<String>) -> Self {
        let route: String = route.into();
        Self {
            name: name.into(),
            route: route.trim_matches('/').to_string(),
        }
    }

    /// The root kind listing the available company files.
    #[must_use]
    pub fn company_file() -> Self {
        Self::new(COMPANY_FILE_KIND, "")
    }

    /// Returns the kind's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the route relative to a company file.
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Returns `true` for the root kind, which has no route.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.route.is_empty()
    }
}

/// Registry of resource kinds by name.
#[derive(Clone, Debug, Default)]
pub struct ResourceRegistry {
    kinds: HashMap<String, ResourceKind>,
}

impl ResourceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the common AccountRight kinds.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (name, route) in DEFAULT_KINDS {
            registry.register(*name, *route);
        }
        registry
    }

    /// Registers a kind, returning the kind it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        route: impl Into<String>,
    ) -> Option<ResourceKind> {
        let kind = ResourceKind::new(name, route);
        self.kinds.insert(kind.name.clone(), kind)
    }

    /// Looks up a kind by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ResourceKind> {
        self.kinds.get(name)
    }

    /// Returns `true` if a kind is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Returns the number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns `true` if no kinds are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Iterates over the registered kinds in no particular order.
    pub fn kinds(&self) -> impl Iterator<Item = &ResourceKind> {
        self.kinds.values()
    }
}
