//! Rule-Based Advice Engine
//!
//! Turns predicted weather and pollution readings into health advice using a
//! fixed decision table. Used whenever the generative advisor is unavailable.

mod aqi;
mod readings;
mod rules;

pub use aqi::{classify_aqi, AqiCategory};
pub use readings::{PollutionReading, WeatherReading};
pub use rules::{
    generate_fallback_advice, ActivityNote, AdviceReport, Concern, ConcernCategory,
    FallbackEngine, Severity,
};
