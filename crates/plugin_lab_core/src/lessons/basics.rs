//! Plain functions for first tests.

use serde_json::Value;

pub fn hello_world() -> &'static str {
    "Hello, WordPress Unit Testing!"
}

pub fn double_number(number: f64) -> f64 {
    number * 2.0
}

/// Element count of a JSON array; any other value counts as `0`.
pub fn count_array(value: &Value) -> usize {
    value.as_array().map_or(0, Vec::len)
}
