//! Custom cake price quotes.
//!
//! Mirrors the shop's price card: a per-kilogram base rate by decoration
//! complexity, dummy tiers at half rate, a flat per-kilogram flavor
//! surcharge, fixed-price toy toppers, and an optional 10% discount on the
//! whole order. All amounts are exact decimals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Decoration complexity tiers with their per-kilogram base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CakeComplexity {
    CreamEasy,
    CreamMedium,
    CreamHard,
    CreamSuperHard,
    SugarpasteMedium,
    SugarpasteHard,
    SugarpasteSuperHard,
    SugarpasteVip,
}

impl CakeComplexity {
    /// Base price per kilogram of real cake.
    pub fn base_price(&self) -> Decimal {
        match self {
            CakeComplexity::CreamEasy => Decimal::new(12600, 2),
            CakeComplexity::CreamMedium => Decimal::new(14700, 2),
            CakeComplexity::CreamHard => Decimal::new(15750, 2),
            CakeComplexity::CreamSuperHard => Decimal::new(18375, 2),
            CakeComplexity::SugarpasteMedium => Decimal::new(18375, 2),
            CakeComplexity::SugarpasteHard => Decimal::new(20475, 2),
            CakeComplexity::SugarpasteSuperHard => Decimal::new(22575, 2),
            CakeComplexity::SugarpasteVip => Decimal::new(24675, 2),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CakeComplexity::CreamEasy => "Design by Cream Easy",
            CakeComplexity::CreamMedium => "Design by Cream Medium",
            CakeComplexity::CreamHard => "Design by Cream Hard",
            CakeComplexity::CreamSuperHard => "Design by Cream Super Hard",
            CakeComplexity::SugarpasteMedium => "Design by Sugarpaste Medium",
            CakeComplexity::SugarpasteHard => "Design by Sugarpaste Hard",
            CakeComplexity::SugarpasteSuperHard => "Design by Sugarpaste Super Hard",
            CakeComplexity::SugarpasteVip => "Design by Sugarpaste VIP",
        }
    }
}

/// Toy topper tiers with fixed unit prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToyComplexity {
    Easy,
    Medium,
    Hard,
}

impl ToyComplexity {
    pub fn unit_price(&self) -> Decimal {
        match self {
            ToyComplexity::Easy => Decimal::new(2625, 2),
            ToyComplexity::Medium => Decimal::new(5250, 2),
            ToyComplexity::Hard => Decimal::new(8400, 2),
        }
    }
}

/// One custom cake order as entered by staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteInput {
    /// No complexity selected yet means the cake itself prices at zero.
    pub complexity: Option<CakeComplexity>,
    /// Real (edible) cake weight in kilograms.
    pub real_kg: Decimal,
    /// Dummy (display) tier weight in kilograms, priced at half rate.
    pub dummy_kg: Decimal,
    pub flavor_surcharge: bool,
    pub toy: Option<ToyComplexity>,
    pub toy_quantity: u32,
    /// 10% off the whole order.
    pub apply_discount: bool,
}

/// Itemized quote breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub real_cake: Decimal,
    pub dummy_cake: Decimal,
    pub flavor: Decimal,
    pub toys: Decimal,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

/// Flat flavor surcharge per kilogram of real cake.
fn flavor_rate() -> Decimal {
    Decimal::new(21, 0)
}

/// Discount fraction applied when requested.
fn discount_rate() -> Decimal {
    Decimal::new(10, 2)
}

/// Computes an itemized quote for one order.
pub fn quote(input: &QuoteInput) -> Quote {
    let base = input
        .complexity
        .map(|complexity| complexity.base_price())
        .unwrap_or(Decimal::ZERO);

    let real_cake = base * input.real_kg;
    // Dummy tiers price at half the selected base rate; without a selected
    // complexity there is no rate to halve.
    let dummy_cake = (base / Decimal::from(2)) * input.dummy_kg;
    let flavor = if input.flavor_surcharge {
        flavor_rate() * input.real_kg
    } else {
        Decimal::ZERO
    };
    let toys = input
        .toy
        .map(|toy| toy.unit_price())
        .unwrap_or(Decimal::ZERO)
        * Decimal::from(input.toy_quantity);

    let subtotal = real_cake + dummy_cake + flavor + toys;
    let discount = if input.apply_discount {
        subtotal * discount_rate()
    } else {
        Decimal::ZERO
    };

    Quote {
        real_cake,
        dummy_cake,
        flavor,
        toys,
        subtotal,
        discount,
        total: subtotal - discount,
    }
}
