//! USD/LYD Exchange Rates: Upstream Fetcher and Derived Ticker Pairs
//!
//! Only USD/LYD is authoritative. It is fetched from the upstream source by
//! [`UpstreamClient`]. The other pairs shown on the ticker are presentation
//! approximations: the USD average times a static multiplier. Pairs are
//! defined declaratively with a macro that generates marker types, the
//! runtime [`PairCode`] enum and its lookups.
//!
//! # Adding a New Pair
//! Add a line to the `define_pairs!` invocation:
//! ```ignore
//! define_pairs! {
//!     // ... existing pairs ...
//!     TND => ("TND", "TND/LYD", "د.ت", 0.32),
//! }
//! ```
//!
//! # Example
//! ```
//! use exchange_rates::{EUR, PairCode, TickerPair, ticker};
//!
//! assert_eq!(EUR::derive(Some(4.8)), Some(4.8 * 1.08));
//!
//! let quotes = ticker(None);
//! assert_eq!(quotes.len(), PairCode::all().len());
//! assert!(quotes.iter().all(|q| q.display == "---"));
//! ```

mod client;

pub use client::UpstreamClient;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use nakhla_types::{RateSnapshot, RateStatus};

/// Placeholder rendered when a rate cannot be derived.
pub const UNAVAILABLE: &str = "---";

// ─────────────────────────────────────────────────────────────────────────────
// Ticker Pair Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait defining a ticker pair quoted against LYD.
pub trait TickerPair: Default + Clone + Copy + Send + Sync + 'static {
    const CODE: &'static str;
    const LABEL: &'static str;
    const SYMBOL: &'static str;
    const MULTIPLIER: f64;

    /// Derived rate; undefined whenever the USD average is.
    fn derive(average: Option<f64>) -> Option<f64> {
        average.map(|avg| avg * Self::MULTIPLIER)
    }
}

/// Formats a rate with four decimals, or the placeholder.
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.4}", rate),
        None => UNAVAILABLE.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// THE MACRO: Defines all pairs, the PairCode enum, and runtime dispatch
// ─────────────────────────────────────────────────────────────────────────────

/// Macro to define ticker pairs with auto-generated types and lookups.
///
/// # Syntax
/// ```ignore
/// define_pairs! {
///     Name => ("CODE", "CODE/LYD", "SYMBOL", multiplier_of_usd_average),
/// }
/// ```
#[macro_export]
macro_rules! define_pairs {
    (
        $(
            $name:ident => ($code:literal, $label:literal, $symbol:literal, $multiplier:expr)
        ),* $(,)?
    ) => {
        $(
            #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $name;

            impl $crate::TickerPair for $name {
                const CODE: &'static str = $code;
                const LABEL: &'static str = $label;
                const SYMBOL: &'static str = $symbol;
                const MULTIPLIER: f64 = $multiplier;
            }
        )*

        /// Runtime identifier of a ticker pair.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
        #[serde(rename_all = "UPPERCASE")]
        pub enum PairCode {
            $($name),*
        }

        impl PairCode {
            pub fn code(&self) -> &'static str {
                match self {
                    $(PairCode::$name => <$name as $crate::TickerPair>::CODE),*
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $(PairCode::$name => <$name as $crate::TickerPair>::LABEL),*
                }
            }

            pub fn symbol(&self) -> &'static str {
                match self {
                    $(PairCode::$name => <$name as $crate::TickerPair>::SYMBOL),*
                }
            }

            pub fn multiplier(&self) -> f64 {
                match self {
                    $(PairCode::$name => <$name as $crate::TickerPair>::MULTIPLIER),*
                }
            }

            pub fn derive(&self, average: Option<f64>) -> Option<f64> {
                match self {
                    $(PairCode::$name => <$name as $crate::TickerPair>::derive(average)),*
                }
            }

            pub fn all() -> &'static [PairCode] {
                &[$(PairCode::$name),*]
            }
        }

        impl std::fmt::Display for PairCode {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.label())
            }
        }

        impl std::str::FromStr for PairCode {
            type Err = String;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_uppercase().as_str() {
                    $($code | $label => Ok(PairCode::$name),)*
                    _ => Err(format!("Unknown pair: {}", s)),
                }
            }
        }
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// PAIR DEFINITIONS - Add new pairs here!
// ─────────────────────────────────────────────────────────────────────────────

define_pairs! {
    USD => ("USD", "USD/LYD", "$", 1.0),
    EUR => ("EUR", "EUR/LYD", "€", 1.08),
    GBP => ("GBP", "GBP/LYD", "£", 1.25),
}

// ─────────────────────────────────────────────────────────────────────────────
// Derived Quotes
// ─────────────────────────────────────────────────────────────────────────────

/// One ticker line. Not persisted; recomputed from the current average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DerivedRate {
    pub pair: PairCode,
    #[schema(example = "EUR/LYD")]
    pub label: String,
    #[schema(example = "€")]
    pub symbol: String,
    /// `average * multiplier`, absent when no average is available
    #[schema(example = 5.265)]
    pub rate: Option<f64>,
    /// Four-decimal rendering, or `---`
    #[schema(example = "5.2650")]
    pub display: String,
}

impl DerivedRate {
    pub fn of(pair: PairCode, average: Option<f64>) -> Self {
        let rate = pair.derive(average);
        Self {
            pair,
            label: pair.label().to_string(),
            symbol: pair.symbol().to_string(),
            rate,
            display: format_rate(rate),
        }
    }
}

/// Derives every ticker line from the USD average.
pub fn ticker(average: Option<f64>) -> Vec<DerivedRate> {
    PairCode::all()
        .iter()
        .map(|&pair| DerivedRate::of(pair, average))
        .collect()
}

/// Ticker body served to presentation surfaces.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TickerResponse {
    pub status: RateStatus,
    pub pairs: Vec<DerivedRate>,
}

impl TickerResponse {
    pub fn from_snapshot(snapshot: &RateSnapshot) -> Self {
        Self {
            status: snapshot.status,
            pairs: ticker(snapshot.average()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
