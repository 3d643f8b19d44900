//! Weather and Pollution Readings
//!
//! Every metric is optional on the wire and defaults to 0. A missing metric
//! is therefore indistinguishable from a reading of exactly 0.

use serde::{Deserialize, Serialize};

/// Predicted weather for a city and date
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherReading {
    /// Mean temperature (°C)
    #[serde(alias = "Temperature (°C)")]
    pub temperature_c: f64,
    /// Relative humidity (%)
    #[serde(alias = "Humidity (%)")]
    pub humidity_pct: f64,
    /// Wind speed (km/h)
    #[serde(alias = "Wind Speed (km/h)")]
    pub wind_speed_kmh: f64,
    /// Mean sea-level pressure (hPa)
    #[serde(alias = "Pressure (hPa)")]
    pub pressure_hpa: f64,
}

impl WeatherReading {
    /// Set a metric by name, returns false for unknown names
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        let slot = match name {
            "temperature_c" | "Temperature (°C)" => &mut self.temperature_c,
            "humidity_pct" | "Humidity (%)" => &mut self.humidity_pct,
            "wind_speed_kmh" | "Wind Speed (km/h)" => &mut self.wind_speed_kmh,
            "pressure_hpa" | "Pressure (hPa)" => &mut self.pressure_hpa,
            _ => return false,
        };
        *slot = value;
        true
    }
}

impl<K: AsRef<str>> FromIterator<(K, f64)> for WeatherReading {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut reading = Self::default();
        for (name, value) in iter {
            reading.set(name.as_ref(), value);
        }
        reading
    }
}

/// Predicted air quality for a city and date
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollutionReading {
    #[serde(rename = "AQI")]
    pub aqi: f64,
    /// Fine particulate matter (μg/m³)
    #[serde(rename = "PM2.5")]
    pub pm2_5: f64,
    /// Coarse particulate matter (μg/m³)
    #[serde(rename = "PM10")]
    pub pm10: f64,
    #[serde(rename = "NO2")]
    pub no2: f64,
    #[serde(rename = "SO2")]
    pub so2: f64,
    /// Carbon monoxide (mg/m³)
    #[serde(rename = "CO")]
    pub co: f64,
    #[serde(rename = "O3")]
    pub o3: f64,
}

impl PollutionReading {
    /// Set a metric by its column name, returns false for unknown names
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        let slot = match name {
            "AQI" => &mut self.aqi,
            "PM2.5" => &mut self.pm2_5,
            "PM10" => &mut self.pm10,
            "NO2" => &mut self.no2,
            "SO2" => &mut self.so2,
            "CO" => &mut self.co,
            "O3" => &mut self.o3,
            _ => return false,
        };
        *slot = value;
        true
    }
}

impl<K: AsRef<str>> FromIterator<(K, f64)> for PollutionReading {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut reading = Self::default();
        for (name, value) in iter {
            reading.set(name.as_ref(), value);
        }
        reading
    }
}
