//! Static plan catalog and price resolution.

use super::DomainError;
use crate::models::{BillingPeriod, PlanId};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

/// Currency every amount is expressed in. No decimal subunits are billed.
pub const CURRENCY: &str = "DZD";

/// Catalog sentinel for plans priced per customer.
pub const QUOTE_ON_REQUEST: Decimal = Decimal::NEGATIVE_ONE;

#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: &'static str,
    /// `None` means unlimited.
    pub max_vehicles: Option<u32>,
    pub monthly_price: Decimal,
    pub annual_price: Decimal,
    /// Length of the trial; paid plans run for their billing period.
    pub duration_days: u32,
    pub features: Vec<&'static str>,
}

impl Plan {
    pub fn price(&self, period: BillingPeriod) -> PlanPrice {
        let raw = match period {
            BillingPeriod::Monthly => self.monthly_price,
            BillingPeriod::Annual => self.annual_price,
        };
        PlanPrice::from_catalog(raw)
    }

    pub fn allows_vehicles(&self, count: usize) -> bool {
        self.max_vehicles
            .map(|max| count <= max as usize)
            .unwrap_or(true)
    }
}

/// Resolved price of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanPrice {
    Amount(Decimal),
    OnRequest,
}

impl PlanPrice {
    pub fn from_catalog(raw: Decimal) -> Self {
        if raw == QUOTE_ON_REQUEST {
            PlanPrice::OnRequest
        } else {
            PlanPrice::Amount(raw)
        }
    }

    pub fn amount(&self) -> Option<Decimal> {
        match self {
            PlanPrice::Amount(amount) => Some(*amount),
            PlanPrice::OnRequest => None,
        }
    }
}

impl fmt::Display for PlanPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanPrice::Amount(amount) => write!(f, "{} {}", amount, CURRENCY),
            PlanPrice::OnRequest => f.write_str("quote on request"),
        }
    }
}

impl Serialize for PlanPrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

static CATALOG: OnceLock<Vec<Plan>> = OnceLock::new();

pub fn catalog() -> &'static [Plan] {
    CATALOG.get_or_init(|| {
        vec![
            Plan {
                id: PlanId::Trial,
                name: "Trial",
                max_vehicles: Some(3),
                monthly_price: Decimal::ZERO,
                annual_price: Decimal::ZERO,
                duration_days: 14,
                features: vec!["fleet", "rentals", "customers"],
            },
            Plan {
                id: PlanId::Basic,
                name: "Basic",
                max_vehicles: Some(10),
                monthly_price: Decimal::from(2900),
                annual_price: Decimal::from(29000),
                duration_days: 30,
                features: vec!["fleet", "rentals", "customers", "invoices"],
            },
            Plan {
                id: PlanId::Pro,
                name: "Pro",
                max_vehicles: Some(30),
                monthly_price: Decimal::from(5900),
                annual_price: Decimal::from(59000),
                duration_days: 30,
                features: vec![
                    "fleet",
                    "rentals",
                    "customers",
                    "invoices",
                    "cash_journal",
                    "dashboard",
                ],
            },
            Plan {
                id: PlanId::Enterprise,
                name: "Enterprise",
                max_vehicles: None,
                monthly_price: QUOTE_ON_REQUEST,
                annual_price: QUOTE_ON_REQUEST,
                duration_days: 30,
                features: vec![
                    "fleet",
                    "rentals",
                    "customers",
                    "invoices",
                    "cash_journal",
                    "dashboard",
                    "priority_support",
                ],
            },
        ]
    })
}

pub fn plan(id: PlanId) -> &'static Plan {
    // Catalog order matches `PlanId::ALL`.
    let index = match id {
        PlanId::Trial => 0,
        PlanId::Basic => 1,
        PlanId::Pro => 2,
        PlanId::Enterprise => 3,
    };
    &catalog()[index]
}

pub fn resolve_price(id: PlanId, period: BillingPeriod) -> PlanPrice {
    plan(id).price(period)
}

/// Price to store on a self-service subscription.
pub fn billable_price(id: PlanId, period: BillingPeriod) -> Result<Decimal, DomainError> {
    resolve_price(id, period).amount().ok_or_else(|| {
        DomainError::InvalidInput(format!(
            "plan '{}' is quoted on request and cannot be self-subscribed",
            id
        ))
    })
}
