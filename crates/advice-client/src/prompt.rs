//! Prompt construction for the generative advisor

use advice_rules::{AqiCategory, PollutionReading, WeatherReading};

fn temperature_descriptor(temp: f64) -> &'static str {
    if temp > 35.0 {
        "very hot (heat stress risk)"
    } else if temp > 30.0 {
        "hot (stay hydrated)"
    } else if temp < 10.0 {
        "cold (risk of hypothermia)"
    } else if temp < 15.0 {
        "cool"
    } else {
        "comfortable"
    }
}

fn humidity_descriptor(humidity: f64) -> &'static str {
    if humidity > 70.0 {
        "high - feels sticky"
    } else if humidity > 40.0 {
        "moderate"
    } else {
        "low - dry air"
    }
}

fn wind_descriptor(wind: f64) -> &'static str {
    if wind > 20.0 {
        "breezy"
    } else {
        "calm"
    }
}

fn pm25_descriptor(pm25: f64) -> &'static str {
    if pm25 > 55.0 {
        "⚠️ HIGH"
    } else if pm25 <= 35.0 {
        "✓ acceptable"
    } else {
        "moderate"
    }
}

/// Build the advice prompt for a question and the predicted conditions
pub fn build_prompt(question: &str, weather: &WeatherReading, pollution: &PollutionReading) -> String {
    let aqi = AqiCategory::from_aqi(pollution.aqi);

    format!(
        r#"You are an environmental health specialist who advises people in India on how weather and air quality affect their plans. Be precise, practical and kind.

QUESTION:
"{question}"

WEATHER:
- Temperature: {temp}°C ({temp_desc})
- Humidity: {humidity}% ({humidity_desc})
- Wind Speed: {wind} km/h ({wind_desc})
- Pressure: {pressure} hPa

AIR QUALITY:
- AQI: {aqi_value} - {aqi_label} ({aqi_health})
- PM2.5: {pm25} μg/m³ ({pm25_desc})
- PM10: {pm10} μg/m³
- NO2: {no2} μg/m³
- SO2: {so2} μg/m³
- CO: {co} mg/m³
- O3: {o3} μg/m³

Answer in 4-6 sentences:
1. Give a clear YES, NO or MAYBE to the question.
2. Name the primary concern in the data (temperature, humidity, AQI or a specific pollutant).
3. Give specific, actionable advice.
4. Mention vulnerable groups that should take extra care.
5. Suggest practical alternatives if conditions are not ideal.
Use a conversational, empathetic tone.

ADVICE:"#,
        question = question,
        temp = weather.temperature_c,
        temp_desc = temperature_descriptor(weather.temperature_c),
        humidity = weather.humidity_pct,
        humidity_desc = humidity_descriptor(weather.humidity_pct),
        wind = weather.wind_speed_kmh,
        wind_desc = wind_descriptor(weather.wind_speed_kmh),
        pressure = weather.pressure_hpa,
        aqi_value = pollution.aqi,
        aqi_label = aqi.label(),
        aqi_health = aqi.health_statement(),
        pm25 = pollution.pm2_5,
        pm25_desc = pm25_descriptor(pollution.pm2_5),
        pm10 = pollution.pm10,
        no2 = pollution.no2,
        so2 = pollution.so2,
        co = pollution.co,
        o3 = pollution.o3,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptors() {
        assert_eq!(temperature_descriptor(36.0), "very hot (heat stress risk)");
        assert_eq!(temperature_descriptor(12.0), "cool");
        assert_eq!(temperature_descriptor(22.0), "comfortable");
        assert_eq!(humidity_descriptor(75.0), "high - feels sticky");
        assert_eq!(humidity_descriptor(30.0), "low - dry air");
        assert_eq!(wind_descriptor(25.0), "breezy");
        assert_eq!(pm25_descriptor(35.0), "✓ acceptable");
        assert_eq!(pm25_descriptor(45.0), "moderate");
        assert_eq!(pm25_descriptor(60.0), "⚠️ HIGH");
    }

    #[test]
    fn test_prompt_contents() {
        let weather = WeatherReading {
            temperature_c: 33.4,
            humidity_pct: 72.0,
            wind_speed_kmh: 8.0,
            pressure_hpa: 1006.5,
        };
        let pollution = PollutionReading {
            aqi: 162.0,
            pm2_5: 64.2,
            ..Default::default()
        };

        let prompt = build_prompt("Can I cycle to work?", &weather, &pollution);
        assert!(prompt.contains("\"Can I cycle to work?\""));
        assert!(prompt.contains("Temperature: 33.4°C (hot (stay hydrated))"));
        assert!(prompt.contains("AQI: 162 - Unhealthy (Everyone may begin to experience health effects)"));
        assert!(prompt.contains("PM2.5: 64.2 μg/m³ (⚠️ HIGH)"));
        assert!(prompt.contains("Pressure: 1006.5 hPa"));
    }
}
