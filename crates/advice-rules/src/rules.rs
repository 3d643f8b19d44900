//! Fallback Advice Rules
//!
//! Each dimension (temperature, AQI, PM2.5, humidity, wind) is checked against
//! its brackets from most to least severe and contributes at most one concern.
//! Concerns are then ordered by a fixed category priority and cut to the top
//! three.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::readings::{PollutionReading, WeatherReading};

/// Maximum number of concerns kept in a report
const MAX_CONCERNS: usize = 3;

/// Question words that trigger the exercise closing note
const EXERCISE_KEYWORDS: [&str; 5] = ["run", "jog", "exercise", "workout", "gym"];

const CONDITIONS_NORMAL: &str = "📊 **Conditions Normal**: Weather and air quality are within comfortable ranges. Standard seasonal precautions apply - stay hydrated and use sun protection during daytime.";

/// Severity of the bracket that produced a concern
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Advice dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcernCategory {
    Aqi,
    Pm25,
    Temperature,
    Humidity,
    Wind,
}

impl ConcernCategory {
    /// Ordering priority, lower comes first
    pub fn priority(&self) -> u8 {
        match self {
            ConcernCategory::Aqi => 0,
            ConcernCategory::Pm25 => 1,
            ConcernCategory::Temperature => 2,
            ConcernCategory::Humidity => 3,
            ConcernCategory::Wind => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConcernCategory::Aqi => "aqi",
            ConcernCategory::Pm25 => "pm25",
            ConcernCategory::Temperature => "temperature",
            ConcernCategory::Humidity => "humidity",
            ConcernCategory::Wind => "wind",
        }
    }
}

/// A triggered advice category with its message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concern {
    pub category: ConcernCategory,
    pub severity: Severity,
    pub message: String,
}

impl Concern {
    fn new(category: ConcernCategory, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            category,
            severity,
            message: message.into(),
        }
    }
}

/// Closing note for exercise questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityNote {
    Unsuitable,
    LimitIntensity,
    Suitable,
}

impl ActivityNote {
    /// Pick the note from AQI and temperature alone
    pub fn for_conditions(aqi: f64, temperature_c: f64) -> Self {
        if aqi > 150.0 || temperature_c > 35.0 {
            ActivityNote::Unsuitable
        } else if aqi > 100.0 || temperature_c > 30.0 {
            ActivityNote::LimitIntensity
        } else {
            ActivityNote::Suitable
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ActivityNote::Unsuitable => "💪 **For Exercise**: Current conditions are NOT suitable for outdoor exercise. Consider indoor alternatives like gym workouts, yoga, or home exercises.",
            ActivityNote::LimitIntensity => "💪 **For Exercise**: Limit intensity and duration. Early morning (6-8 AM) offers better conditions. Stay hydrated throughout.",
            ActivityNote::Suitable => "💪 **For Exercise**: Conditions are suitable for outdoor exercise. Remember to warm up and stay hydrated!",
        }
    }
}

/// Structured fallback advice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceReport {
    /// Upstream failure context, shown first
    pub error: Option<String>,
    /// Selected concerns in priority order
    pub concerns: Vec<Concern>,
    pub activity_note: Option<ActivityNote>,
}

impl AdviceReport {
    /// Render the report as blank-line separated text
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(MAX_CONCERNS + 2);

        if let Some(error) = &self.error {
            lines.push(format!("{}\n", error));
        }

        if self.concerns.is_empty() {
            lines.push(CONDITIONS_NORMAL.to_string());
        } else {
            lines.extend(self.concerns.iter().map(|c| c.message.clone()));
        }

        if let Some(note) = self.activity_note {
            lines.push(format!("\n{}", note.message()));
        }

        lines.join("\n\n")
    }
}

/// Rule-based advice engine
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackEngine;

impl FallbackEngine {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate all rules and build the report
    pub fn assess(
        &self,
        question: &str,
        weather: &WeatherReading,
        pollution: &PollutionReading,
        error_msg: Option<&str>,
    ) -> AdviceReport {
        let mut concerns: Vec<Concern> = [
            Self::temperature_concern(weather.temperature_c),
            Some(Self::aqi_concern(pollution.aqi)),
            Self::pm25_concern(pollution.pm2_5),
            Self::humidity_concern(weather.humidity_pct),
            Self::wind_concern(weather.wind_speed_kmh),
        ]
        .into_iter()
        .flatten()
        .collect();

        concerns.sort_by_key(|c| c.category.priority());
        concerns.truncate(MAX_CONCERNS);

        let question = question.to_lowercase();
        let activity_note = EXERCISE_KEYWORDS
            .iter()
            .any(|word| question.contains(word))
            .then(|| ActivityNote::for_conditions(pollution.aqi, weather.temperature_c));

        debug!(
            "Fallback advice: [{}], activity note: {:?}",
            concerns
                .iter()
                .map(|c| c.category.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            activity_note
        );

        AdviceReport {
            error: error_msg.map(str::to_string),
            concerns,
            activity_note,
        }
    }

    /// Evaluate all rules and render the advice text
    pub fn generate(
        &self,
        question: &str,
        weather: &WeatherReading,
        pollution: &PollutionReading,
        error_msg: Option<&str>,
    ) -> String {
        self.assess(question, weather, pollution, error_msg).render()
    }

    fn temperature_concern(temp: f64) -> Option<Concern> {
        use ConcernCategory::Temperature;

        if temp > 35.0 {
            Some(Concern::new(Temperature, Severity::Critical, "🌡️ **Heat Warning**: Temperature is dangerously high. Risk of heat stroke and dehydration. Stay indoors during 11 AM - 4 PM, drink water every 30 minutes, and avoid strenuous activities."))
        } else if temp > 30.0 {
            Some(Concern::new(Temperature, Severity::Medium, "🌡️ **Hot Weather**: Stay well-hydrated (drink 3-4 liters of water), use SPF 30+ sunscreen, and schedule outdoor activities for early morning or evening."))
        } else if temp < 10.0 {
            Some(Concern::new(Temperature, Severity::High, "🌡️ **Cold Alert**: Bundle up in layers, cover extremities, and limit exposure to prevent hypothermia. Warm beverages recommended."))
        } else if temp < 15.0 {
            Some(Concern::new(Temperature, Severity::Low, "🌡️ **Cool Weather**: Light jacket recommended, especially for morning and evening hours."))
        } else {
            None
        }
    }

    // AQI always yields a concern, including the good-news brackets
    fn aqi_concern(aqi: f64) -> Concern {
        use ConcernCategory::Aqi;

        if aqi > 200.0 {
            Concern::new(Aqi, Severity::Critical, format!("🚨 **Unhealthy Air Quality** (AQI {:.0}): Avoid all outdoor activities. Keep windows closed, use air purifiers with HEPA filters, wear N95 masks if you must go outside. Particularly dangerous for children, elderly, and those with asthma/COPD.", aqi))
        } else if aqi > 150.0 {
            Concern::new(Aqi, Severity::High, format!("⚠️ **Unhealthy for Sensitive Groups** (AQI {:.0}): Children, elderly, pregnant women, and people with heart/lung conditions should stay indoors. Others should limit prolonged outdoor activities and consider wearing masks.", aqi))
        } else if aqi > 100.0 {
            Concern::new(Aqi, Severity::Medium, format!("⚠️ **Moderate Air Quality** (AQI {:.0}): Sensitive individuals should reduce prolonged outdoor exertion. General population can proceed with normal activities but monitor symptoms.", aqi))
        } else if aqi <= 50.0 {
            Concern::new(Aqi, Severity::Low, format!("✅ **Excellent Air Quality** (AQI {:.0}): Perfect conditions for all outdoor activities!", aqi))
        } else {
            Concern::new(Aqi, Severity::Low, format!("✅ **Good Air Quality** (AQI {:.0}): Safe for outdoor activities.", aqi))
        }
    }

    fn pm25_concern(pm25: f64) -> Option<Concern> {
        use ConcernCategory::Pm25;

        if pm25 > 75.0 {
            Some(Concern::new(Pm25, Severity::Critical, format!("😷 **Critical PM2.5 Levels** ({:.1} μg/m³): Fine particles can penetrate deep into lungs. N95/N99 masks essential if going outdoors. Use indoor air purifiers.", pm25)))
        } else if pm25 > 55.0 {
            Some(Concern::new(Pm25, Severity::High, format!("😷 **High PM2.5** ({:.1} μg/m³): Avoid outdoor exercise, wear masks outdoors, use air purifiers indoors.", pm25)))
        } else {
            None
        }
    }

    fn humidity_concern(humidity: f64) -> Option<Concern> {
        use ConcernCategory::Humidity;

        if humidity > 80.0 {
            Some(Concern::new(Humidity, Severity::Medium, format!("💧 **High Humidity** ({:.0}%): Muggy conditions increase heat stress. Stay in air-conditioned spaces, avoid heavy exercise, and stay hydrated.", humidity)))
        } else if humidity < 30.0 {
            Some(Concern::new(Humidity, Severity::Low, format!("💧 **Low Humidity** ({:.0}%): Dry air can irritate respiratory system. Drink extra water, use moisturizer, and consider a humidifier indoors.", humidity)))
        } else {
            None
        }
    }

    fn wind_concern(wind: f64) -> Option<Concern> {
        use ConcernCategory::Wind;

        if wind > 50.0 {
            Some(Concern::new(Wind, Severity::High, format!("💨 **Strong Winds** ({:.0} km/h): High wind warning. Secure loose objects, avoid parking under trees, and be cautious while driving high-profile vehicles.", wind)))
        } else if wind > 40.0 {
            Some(Concern::new(Wind, Severity::Low, format!("💨 **Breezy Conditions** ({:.0} km/h): Moderately strong winds. Secure outdoor items and be cautious with umbrellas.", wind)))
        } else {
            None
        }
    }
}

/// Generate rule-based advice text in one call
pub fn generate_fallback_advice(
    question: &str,
    weather: &WeatherReading,
    pollution: &PollutionReading,
    error_msg: Option<&str>,
) -> String {
    FallbackEngine::new().generate(question, weather, pollution, error_msg)
}
