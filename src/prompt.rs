use serde_json::Number;

use crate::api::GiftRequest;

pub const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant that suggests Christmas gift ideas.";

/// Builds the user prompt for a gift request.
///
/// Returns an empty string when any of age, priceMin or priceMax is missing or
/// zero, or when gender or hobbies is blank. Hobbies are interpolated as-is.
pub fn generate_prompt(req: &GiftRequest) -> String {
    let (Some(price_min), Some(price_max), Some(age)) = (
        truthy(req.price_min.as_ref()),
        truthy(req.price_max.as_ref()),
        truthy(req.age.as_ref()),
    ) else {
        return String::new();
    };
    let (Some(gender), Some(hobbies)) = (
        non_blank(req.gender.as_deref()),
        non_blank(req.hobbies.as_deref()),
    ) else {
        return String::new();
    };

    format!(
        "Suggest 3 Christmas gift ideas between ${} and ${} for a {} year old {} that is into {}. \
         Format the response with clear headings and descriptions.",
        format_number(price_min),
        format_number(price_max),
        format_number(age),
        gender,
        hobbies,
    )
}

fn truthy(n: Option<&Number>) -> Option<&Number> {
    n.filter(|n| n.as_f64().is_some_and(|v| v != 0.0))
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// Integral floats print without a trailing `.0`, so `20.0` and `20` render
/// the same.
fn format_number(n: &Number) -> String {
    match n.as_f64() {
        Some(v) if n.is_f64() && v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        _ => n.to_string(),
    }
}
