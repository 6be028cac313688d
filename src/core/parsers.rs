//! Per-service response parsers.
//!
//! Every parser is total: a missing field, a wrong type or an undecodable
//! body yields a zero count.

use crate::domain::model::{ResponseBody, ServiceOutput};
use serde_json::Value;

/// Integer coercion for count-like JSON values.
pub fn as_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_i64().map(|i| i.max(0) as u64))
            .or_else(|| n.as_f64().map(|f| if f > 0.0 { f as u64 } else { 0 }))
            .unwrap_or(0),
        // 字串只取開頭的數字部分，例如 "15 shares"
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

fn count_at(value: &Value, pointer: &str) -> u64 {
    value.pointer(pointer).map(as_count).unwrap_or(0)
}

pub fn facebook(body: &ResponseBody) -> ServiceOutput {
    let count = body
        .json()
        .map(|json| count_at(&json, "/data/0/total_count"))
        .unwrap_or(0);
    ServiceOutput::Count(count)
}

/// Pinterest answers with JSONP (`receiveCount({...})`).
pub fn pinterest(body: &ResponseBody) -> ServiceOutput {
    let json = match body {
        ResponseBody::Json(value) => Some(value.clone()),
        // 去掉 JSONP 外層，只保留第一個 { 到最後一個 } 之間的內容
        ResponseBody::Text(text) => text
            .find('{')
            .zip(text.rfind('}'))
            .filter(|(start, end)| start < end)
            .and_then(|(start, end)| serde_json::from_str::<Value>(&text[start..=end]).ok()),
    };

    ServiceOutput::Count(json.map(|v| count_at(&v, "/count")).unwrap_or(0))
}

/// Shared by twitter and linkedin.
pub fn top_level_count(body: &ResponseBody) -> ServiceOutput {
    ServiceOutput::Count(body.json().map(|v| count_at(&v, "/count")).unwrap_or(0))
}

pub fn stumbleupon(body: &ResponseBody) -> ServiceOutput {
    ServiceOutput::Count(
        body.json()
            .map(|v| count_at(&v, "/result/views"))
            .unwrap_or(0),
    )
}

pub fn reddit(body: &ResponseBody) -> ServiceOutput {
    let Some(json) = body.json() else {
        return ServiceOutput::Count(0);
    };

    // 累加每則貼文的 ups，新版結構在 data.ups，舊版直接在 child 上
    let ups = json
        .pointer("/data/children")
        .and_then(Value::as_array)
        .map(|children| {
            children
                .iter()
                .filter_map(|child| child.pointer("/data/ups").or_else(|| child.get("ups")))
                .map(as_count)
                .fold(0u64, u64::saturating_add)
        })
        .unwrap_or(0);

    ServiceOutput::Count(ups)
}

/// One point per matching story plus its points and comments.
pub fn hackernews(body: &ResponseBody) -> ServiceOutput {
    let Some(json) = body.json() else {
        return ServiceOutput::Count(0);
    };

    // 每則結果本身算 1，再加上分數與留言數
    let score = json
        .get("results")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .map(|story| {
                    1u64.saturating_add(count_at(story, "/item/points"))
                        .saturating_add(count_at(story, "/item/num_comments"))
                })
                .fold(0u64, u64::saturating_add)
        })
        .unwrap_or(0);

    ServiceOutput::Count(score)
}

pub fn passthrough(body: &ResponseBody) -> ServiceOutput {
    ServiceOutput::Raw(body.clone())
}
