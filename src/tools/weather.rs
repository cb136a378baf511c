//! Synthetic weather tool.

use async_trait::async_trait;
use rand::Rng;
use serde_json::{json, Value};

use super::Tool;

const CONDITIONS: [&str; 4] = ["sunny", "cloudy", "light rain", "overcast"];

/// Return a synthetic weather reading for a location.
pub struct GetWeather;

#[async_trait]
impl Tool for GetWeather {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get the current weather for a location."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "City or place name"
                },
                "units": {
                    "type": "string",
                    "enum": ["celsius", "fahrenheit"],
                    "default": "celsius"
                }
            },
            "required": ["location"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let location = args["location"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'location' argument"))?;

        let units = match args.get("units") {
            None | Some(Value::Null) => "celsius",
            Some(value) => match value.as_str() {
                Some(u @ ("celsius" | "fahrenheit")) => u,
                _ => anyhow::bail!("'units' must be \"celsius\" or \"fahrenheit\""),
            },
        };

        let mut rng = rand::thread_rng();
        let temp_c: i64 = rng.gen_range(10..=35);
        let temperature = if units == "celsius" {
            temp_c
        } else {
            // Truncating conversion, matching integer °F reporting
            temp_c * 9 / 5 + 32
        };

        Ok(json!({
            "location": location,
            "temperature": temperature,
            "units": units,
            "condition": CONDITIONS[rng.gen_range(0..CONDITIONS.len())],
            "humidity": rng.gen_range(40..=80i64),
            "wind_speed": rng.gen_range(5..=25i64),
            "success": true,
        }))
    }
}
