//! # Eco-Exchange Valuation Engine
//!
//! Grades the device, estimates resale and scrap value, and produces three
//! partner trade-in offers. The prompt's "golden rule" (offers must read
//! 20-40% above scrap cash) is also enforced numerically after parsing;
//! see `enforce_golden_rule`.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::client::{ChatClient, ChatRequest};
use super::json::{str_field, strip_code_fences};
use super::prompts;
use crate::schemas::{DeviceContext, EcoValuation, TradeInOffer, ValuationSummary};

/// Generate the valuation, or `None` on any provider/parse failure.
/// `extra_notes` carries additional free-text signal (user description,
/// vision analysis) into the prompt.
pub async fn generate_eco_valuation(
    chat: &ChatClient,
    ctx: &DeviceContext,
    extra_notes: &str,
) -> Option<EcoValuation> {
    let reply = match chat
        .complete(ChatRequest {
            model: chat.model(),
            system: prompts::ECO_VALUATION,
            user: Value::String(build_user_prompt(ctx, extra_notes)),
            temperature: 0.6,
            max_tokens: 2048,
        })
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("Eco valuation generation failed: {:#}", e);
            return None;
        }
    };

    let mut valuation = parse_reply(&reply, &ctx.device)?;
    enforce_golden_rule(&mut valuation);
    tracing::info!(
        "Eco valuation: scrap=${}, {} offers",
        valuation.valuation_summary.estimated_scrap_cash_usd,
        valuation.trade_in_offers.len(),
    );
    Some(valuation)
}

fn build_user_prompt(ctx: &DeviceContext, extra_notes: &str) -> String {
    let cond_text = if ctx.conditions.is_empty() {
        "Fully working (old model)".to_string()
    } else {
        ctx.conditions.join(", ")
    };
    let ram = if ctx.ram_gb > 0 {
        format!("{}GB", ctx.ram_gb)
    } else {
        "Unknown".to_string()
    };
    let storage = if ctx.storage_gb > 0 {
        format!("{}GB", ctx.storage_gb)
    } else {
        "Unknown".to_string()
    };

    let mut prompt = format!(
        "Device: {}\nDevice Type: {}\nRAM: {}\nStorage: {}\nCondition: {}\n",
        ctx.device, ctx.device_type, ram, storage, cond_text,
    );
    let notes = extra_notes.trim();
    if !notes.is_empty() {
        prompt.push_str(&format!("Additional Details: {}\n", notes));
    }
    prompt.push_str(
        "\nCalculate the scrap cash value, estimated resale value, and generate 3 trade-in offers. \
         Remember the Golden Rule: partner offers must appear 20-40% more valuable than cash.",
    );
    prompt
}

/// Parse the reply into the typed valuation. The reply must be an object
/// with `valuation_summary` and `trade_in_offers`; anything else is a
/// generator failure.
pub(crate) fn parse_reply(reply: &str, fallback_device: &str) -> Option<EcoValuation> {
    let text = strip_code_fences(reply);
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Eco valuation reply was not valid JSON: {}", e);
            return None;
        }
    };

    let obj = value.as_object()?;
    if !obj.contains_key("valuation_summary") || !obj.contains_key("trade_in_offers") {
        tracing::warn!("Eco valuation reply missing required keys");
        return None;
    }

    let vs = &obj["valuation_summary"];
    let device_name = match str_field(vs, "device_name") {
        s if s.is_empty() => fallback_device.to_string(),
        s => s,
    };
    let condition_grade = match str_field(vs, "condition_grade") {
        s if s.is_empty() => "C".to_string(),
        s => s,
    };

    let offers = obj["trade_in_offers"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter(|o| o.is_object())
                .map(|o| TradeInOffer {
                    partner: match str_field(o, "partner") {
                        s if s.is_empty() => "Unknown".to_string(),
                        s => s,
                    },
                    offer_type: match str_field(o, "offer_type") {
                        s if s.is_empty() => "Discount Coupon".to_string(),
                        s => s,
                    },
                    headline: str_field(o, "headline"),
                    monetary_value_cap: str_field(o, "monetary_value_cap"),
                    coupon_url: str_field(o, "coupon_url"),
                    reasoning: str_field(o, "reasoning"),
                })
                .collect()
        })
        .unwrap_or_default();

    Some(EcoValuation {
        valuation_summary: ValuationSummary {
            device_name,
            condition_grade,
            estimated_resale_usd: num_field(vs, "estimated_resale_usd"),
            estimated_resale_inr: num_field(vs, "estimated_resale_inr"),
            estimated_scrap_cash_usd: num_field(vs, "estimated_scrap_cash_usd"),
            estimated_scrap_cash_inr: num_field(vs, "estimated_scrap_cash_inr"),
            eco_message: str_field(vs, "eco_message"),
        },
        trade_in_offers: offers,
    })
}

fn num_field(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(|v| v.as_f64()).unwrap_or(0.0)
}

/// Numeric check for the golden rule: a partner offer whose dollar figure
/// falls outside [1.2x, 1.4x] of scrap cash is rewritten to the clamped
/// value. Cash-transfer offers are exempt - the prompt prices those at or
/// below scrap on purpose. Non-numeric caps pass through untouched.
pub(crate) fn enforce_golden_rule(valuation: &mut EcoValuation) {
    let scrap = valuation.valuation_summary.estimated_scrap_cash_usd;
    if scrap <= 0.0 {
        return;
    }
    let lo = (scrap * 1.2).round();
    let hi = (scrap * 1.4).round();

    for offer in &mut valuation.trade_in_offers {
        if offer.offer_type == "Cash Transfer" {
            continue;
        }
        let Some(value) = extract_dollars(&offer.monetary_value_cap) else {
            continue;
        };
        if value < lo || value > hi {
            let clamped = value.clamp(lo, hi);
            tracing::debug!(
                "golden rule clamp: '{}' -> ${} (scrap ${})",
                offer.monetary_value_cap,
                clamped,
                scrap
            );
            offer.monetary_value_cap = format!("Up to ${} value", clamped as i64);
        }
    }
}

/// First number in a money string ("Up to $100 value" -> 100.0)
fn extract_dollars(text: &str) -> Option<f64> {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    let re = NUMBER.get_or_init(|| Regex::new(r"(\d+(?:\.\d+)?)").unwrap());
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"{
        "valuation_summary": {
            "device_name": "iPhone 11",
            "condition_grade": "C",
            "estimated_resale_usd": 120,
            "estimated_scrap_cash_usd": 50,
            "eco_message": "Recycling saves 35g of rare metals."
        },
        "trade_in_offers": [
            {"partner": "Gazelle", "offer_type": "Cash Transfer",
             "headline": "Instant Cash", "monetary_value_cap": "Up to $48 value",
             "coupon_url": "https://www.gazelle.com/", "reasoning": "Fast."},
            {"partner": "Best Buy", "offer_type": "Store Credit",
             "headline": "Upgrade Credit", "monetary_value_cap": "Up to $65 value",
             "coupon_url": "https://www.bestbuy.com/trade-in", "reasoning": "Good."},
            {"partner": "Amazon", "offer_type": "Discount Coupon",
             "headline": "20% Off", "monetary_value_cap": "Up to $150 value",
             "coupon_url": "https://www.amazon.com/l/9187220011", "reasoning": "Broad."}
        ]
    }"#;

    #[test]
    fn test_parse_reply() {
        let valuation = parse_reply(REPLY, "fallback").unwrap();
        assert_eq!(valuation.valuation_summary.device_name, "iPhone 11");
        assert_eq!(valuation.valuation_summary.estimated_scrap_cash_usd, 50.0);
        assert_eq!(valuation.trade_in_offers.len(), 3);
    }

    #[test]
    fn test_parse_requires_both_keys() {
        assert!(parse_reply(r#"{"valuation_summary": {}}"#, "x").is_none());
        assert!(parse_reply(r#"[1, 2, 3]"#, "x").is_none());
        assert!(parse_reply("not json", "x").is_none());
    }

    #[test]
    fn test_parse_fills_defaults() {
        let valuation = parse_reply(
            r#"{"valuation_summary": {}, "trade_in_offers": [{}]}"#,
            "Old Tablet",
        )
        .unwrap();
        assert_eq!(valuation.valuation_summary.device_name, "Old Tablet");
        assert_eq!(valuation.valuation_summary.condition_grade, "C");
        assert_eq!(valuation.trade_in_offers[0].partner, "Unknown");
        assert_eq!(valuation.trade_in_offers[0].offer_type, "Discount Coupon");
    }

    #[test]
    fn test_golden_rule_clamps_out_of_band_offers() {
        let mut valuation = parse_reply(REPLY, "x").unwrap();
        enforce_golden_rule(&mut valuation);

        // scrap=$50 -> band [$60, $70]
        // Cash offer exempt
        assert_eq!(valuation.trade_in_offers[0].monetary_value_cap, "Up to $48 value");
        // In band, untouched
        assert_eq!(valuation.trade_in_offers[1].monetary_value_cap, "Up to $65 value");
        // $150 is over 1.4x, clamped down
        assert_eq!(valuation.trade_in_offers[2].monetary_value_cap, "Up to $70 value");
    }

    #[test]
    fn test_golden_rule_ignores_non_numeric_caps() {
        let mut valuation = parse_reply(REPLY, "x").unwrap();
        valuation.trade_in_offers[2].monetary_value_cap = "A generous credit".to_string();
        enforce_golden_rule(&mut valuation);
        assert_eq!(valuation.trade_in_offers[2].monetary_value_cap, "A generous credit");
    }

    #[test]
    fn test_extract_dollars() {
        assert_eq!(extract_dollars("Up to $100 value"), Some(100.0));
        assert_eq!(extract_dollars("$42.50 cash"), Some(42.5));
        assert_eq!(extract_dollars("no number"), None);
    }
}
