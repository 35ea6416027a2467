use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a tradable currency.
///
/// Any string works: fiat codes, token symbols, or goods traded as money
/// ("SeaShells", "Pizzas"). No currency is privileged by its name; the home
/// currency is chosen per search.
///
/// # Examples
///
/// ```
/// use conversion_engine::core::currency::CurrencyCode;
///
/// let shells = CurrencyCode::new("SeaShells");
/// let pizzas = CurrencyCode::new("Pizzas");
/// assert_ne!(shells, pizzas);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The finite set of currencies a search may route through.
///
/// Membership is duplicate-free and the registration order is kept: it is the
/// canonical order in which successors are enumerated, and therefore decides
/// which of several equally profitable paths a search reports.
///
/// # Examples
///
/// ```
/// use conversion_engine::core::currency::{CurrencyCode, CurrencyUniverse};
///
/// let universe: CurrencyUniverse = ["A", "B", "A", "C"].into_iter().collect();
/// assert_eq!(universe.len(), 3);
/// assert_eq!(universe.index_of(&CurrencyCode::new("C")), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyUniverse {
    currencies: Vec<CurrencyCode>,
}

impl CurrencyUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a currency. Returns `false` if it was already a member.
    pub fn insert(&mut self, currency: CurrencyCode) -> bool {
        if self.contains(&currency) {
            return false;
        }
        self.currencies.push(currency);
        true
    }

    pub fn contains(&self, currency: &CurrencyCode) -> bool {
        self.currencies.contains(currency)
    }

    /// Position of a currency in canonical order.
    pub fn index_of(&self, currency: &CurrencyCode) -> Option<usize> {
        self.currencies.iter().position(|c| c == currency)
    }

    /// Members in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.currencies.iter()
    }

    pub fn as_slice(&self) -> &[CurrencyCode] {
        &self.currencies
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }
}

impl<C: Into<CurrencyCode>> FromIterator<C> for CurrencyUniverse {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        let mut universe = Self::new();
        for currency in iter {
            universe.insert(currency.into());
        }
        universe
    }
}

impl<'a> IntoIterator for &'a CurrencyUniverse {
    type Item = &'a CurrencyCode;
    type IntoIter = std::slice::Iter<'a, CurrencyCode>;

    fn into_iter(self) -> Self::IntoIter {
        self.currencies.iter()
    }
}
