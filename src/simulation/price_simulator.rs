// Short-term synthetic price process
//
// A random walk tuned for one-second ticks: gaussian noise, pull back to the
// anchor price, a sine oscillation, rare shocks and an optional divergence
// away from the sibling exchange's last price.

use rand::Rng;
use rand_distr::StandardNormal;
use std::f64::consts::PI;

use crate::config::{SimulatorConfig, SimulatorProfile};

/// Fixed parameters of one simulated price stream
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorParams {
    pub starting_price: f64,
    pub volatility: f64,
    pub mean_reversion: f64,
    pub oscillation_amplitude: f64,
    pub oscillation_period: f64, // seconds per cycle
    pub divergence_factor: f64,
    pub shock_probability: f64,
    pub divergence_chance: f64,
    pub clamp_lower: f64,
    pub clamp_upper: f64,
}

impl SimulatorParams {
    /// Draw one parameter set from a profile's ranges
    pub fn draw<R: Rng + ?Sized>(profile: &SimulatorProfile, config: &SimulatorConfig, rng: &mut R) -> Self {
        Self {
            starting_price: config.base_price * sample_range(rng, profile.starting_price_jitter),
            volatility: sample_range(rng, profile.volatility),
            mean_reversion: sample_range(rng, profile.mean_reversion),
            oscillation_amplitude: sample_range(rng, profile.oscillation_amplitude),
            oscillation_period: rng
                .gen_range(profile.oscillation_period[0]..=profile.oscillation_period[1]) as f64,
            divergence_factor: sample_range(rng, profile.divergence_factor),
            shock_probability: config.shock_probability,
            divergence_chance: config.divergence_chance,
            clamp_lower: config.clamp_lower,
            clamp_upper: config.clamp_upper,
        }
    }
}

impl Default for SimulatorParams {
    fn default() -> Self {
        Self {
            starting_price: 10.0,
            volatility: 0.06,
            mean_reversion: 0.01,
            oscillation_amplitude: 0.05,
            oscillation_period: 15.0,
            divergence_factor: 0.1,
            shock_probability: 0.05,
            divergence_chance: 0.1,
            clamp_lower: 0.7,
            clamp_upper: 1.3,
        }
    }
}

fn sample_range<R: Rng + ?Sized>(rng: &mut R, [low, high]: [f64; 2]) -> f64 {
    if low < high {
        rng.gen_range(low..high)
    } else {
        low
    }
}

#[derive(Debug, Clone)]
pub struct ShortTermPriceSimulator {
    current_price: f64,
    base_price: f64,
    params: SimulatorParams,
    tick_counter: u64,
}

impl ShortTermPriceSimulator {
    pub fn new(params: SimulatorParams) -> Self {
        Self {
            current_price: params.starting_price,
            base_price: params.starting_price,
            params,
            tick_counter: 0,
        }
    }

    pub fn from_profile<R: Rng + ?Sized>(profile: &SimulatorProfile, config: &SimulatorConfig, rng: &mut R) -> Self {
        Self::new(SimulatorParams::draw(profile, config, rng))
    }

    /// Advance one tick and return the new price rounded to 4 decimals
    pub fn next_price<R: Rng + ?Sized>(&mut self, other_price: Option<f64>, rng: &mut R) -> f64 {
        let p = &self.params;
        self.tick_counter += 1;

        let noise: f64 = rng.sample(StandardNormal);
        let random_change = p.volatility * noise;

        let reversion = p.mean_reversion * (self.base_price - self.current_price) / self.base_price;

        let oscillation = p.oscillation_amplitude
            * (2.0 * PI * self.tick_counter as f64 / p.oscillation_period).sin();

        let mut shock = 0.0;
        if rng.gen::<f64>() < p.shock_probability {
            let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            shock = direction * rng.gen_range(0.2..0.7);
        }

        let mut divergence = 0.0;
        if let Some(other) = other_price {
            if rng.gen::<f64>() < p.divergence_chance {
                divergence = p.divergence_factor * (self.current_price - other) / self.current_price;
            }
        }

        let total_change = random_change + reversion + oscillation + shock + divergence;
        self.current_price *= 1.0 + total_change;

        // A shock above 100% would otherwise flip the sign
        self.current_price = self
            .current_price
            .max(self.base_price * p.clamp_lower)
            .min(self.base_price * p.clamp_upper);

        round_price(self.current_price)
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    pub fn tick_counter(&self) -> u64 {
        self.tick_counter
    }

    pub fn params(&self) -> &SimulatorParams {
        &self.params
    }

    /// Inclusive bounds the unrounded price is clamped to
    pub fn price_bounds(&self) -> (f64, f64) {
        (
            self.base_price * self.params.clamp_lower,
            self.base_price * self.params.clamp_upper,
        )
    }
}

pub fn round_price(price: f64) -> f64 {
    (price * 10_000.0).round() / 10_000.0
}
