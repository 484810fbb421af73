//! KNET redirect parameters.

use serde::{Deserialize, Serialize};

/// Parameters KNET appends to the shopper's return URL.
///
/// Every field is kept exactly as received (after URL decoding).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KnetCallback {
    #[serde(rename = "paymentid", skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(rename = "trackid", skip_serializing_if = "Option::is_none")]
    pub track_id: Option<String>,
    #[serde(rename = "tranid", skip_serializing_if = "Option::is_none")]
    pub tran_id: Option<String>,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
    #[serde(rename = "postdate", skip_serializing_if = "Option::is_none")]
    pub post_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udf1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udf2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udf3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udf4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udf5: Option<String>,
}

impl KnetCallback {
    /// Parse a query string, with or without the leading `?`.
    ///
    /// Unknown keys are ignored without decoding their values. When a key
    /// repeats, the last value wins. Invalid UTF-8 in a kept value is
    /// replaced rather than rejected.
    pub fn parse(query: &str) -> Self {
        let mut callback = Self::default();
        let query = query.trim().trim_start_matches('?');

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if let Some(slot) = callback.slot(&decode(key)) {
                *slot = Some(decode(value));
            }
        }
        callback
    }

    fn slot(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "paymentid" => Some(&mut self.payment_id),
            "result" => Some(&mut self.result),
            "trackid" => Some(&mut self.track_id),
            "tranid" => Some(&mut self.tran_id),
            "ref" => Some(&mut self.reference),
            "auth" => Some(&mut self.auth),
            "postdate" => Some(&mut self.post_date),
            "udf1" => Some(&mut self.udf1),
            "udf2" => Some(&mut self.udf2),
            "udf3" => Some(&mut self.udf3),
            "udf4" => Some(&mut self.udf4),
            "udf5" => Some(&mut self.udf5),
            _ => None,
        }
    }

    /// Payment id, if present and not blank.
    pub fn payment_id(&self) -> Option<&str> {
        self.payment_id.as_deref().filter(|id| !id.trim().is_empty())
    }

    /// Whether the gateway itself reported a captured payment.
    ///
    /// Informational; only the verifier decides the outcome.
    pub fn reports_captured(&self) -> bool {
        self.result
            .as_deref()
            .map(|r| r.eq_ignore_ascii_case("CAPTURED"))
            .unwrap_or(false)
    }

    /// The recognized parameters as a JSON object keyed by their KNET
    /// names. Absent parameters are left out.
    pub fn to_params(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::Value::Object(Default::default()))
    }
}

fn decode(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}
