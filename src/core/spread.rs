// Spread evaluation: the pure decision half of the engine

use serde::Serialize;

/// Which configured exchange a leg refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Venue {
    First,
    Second,
}

impl Venue {
    pub fn other(self) -> Venue {
        match self {
            Venue::First => Venue::Second,
            Venue::Second => Venue::First,
        }
    }
}

/// Buy on the cheap venue, sell on the dear one
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArbitrageLeg {
    pub buy: Venue,
    pub buy_price: f64,
    pub sell_price: f64,
}

impl ArbitrageLeg {
    pub fn sell(&self) -> Venue {
        self.buy.other()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpreadAnalysis {
    pub price_diff: f64,
    pub avg_price: f64,
    pub percent_diff: f64,
    pub opportunity: Option<ArbitrageLeg>,
}

/// Compare two quotes against a percentage threshold.
///
/// A trade fires only when the spread is strictly greater than the threshold.
/// The first venue is the buy side only when strictly cheaper; on equal prices
/// the second venue would be bought, although equal prices never clear a
/// positive threshold.
pub fn evaluate_spread(price1: f64, price2: f64, threshold_percent: f64) -> SpreadAnalysis {
    let price_diff = (price1 - price2).abs();
    let avg_price = (price1 + price2) / 2.0;
    let percent_diff = if avg_price > 0.0 { price_diff / avg_price * 100.0 } else { 0.0 };

    let opportunity = if percent_diff > threshold_percent {
        let leg = if price1 < price2 {
            ArbitrageLeg { buy: Venue::First, buy_price: price1, sell_price: price2 }
        } else {
            ArbitrageLeg { buy: Venue::Second, buy_price: price2, sell_price: price1 }
        };
        Some(leg)
    } else {
        None
    };

    SpreadAnalysis {
        price_diff,
        avg_price,
        percent_diff,
        opportunity,
    }
}
