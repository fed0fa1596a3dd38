//! Quote record and the pair-keyed JSON envelope around it.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// A single exchange-rate reading as published by the provider.
///
/// Numeric values stay as the provider's strings; nothing is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub code: String,
    pub codein: String,
    pub name: String,
    pub high: String,
    pub low: String,
    #[serde(rename = "varBid")]
    pub var_bid: String,
    #[serde(rename = "pctChange")]
    pub pct_change: String,
    pub bid: String,
    pub ask: String,
    pub timestamp: String,
    pub create_date: String,
}

/// A quote nested under its currency-pair key, e.g. `{"USDBRL": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteEnvelope {
    pub pair: String,
    pub quote: Quote,
}

impl QuoteEnvelope {
    pub fn new(pair: impl Into<String>, quote: Quote) -> Self {
        Self {
            pair: pair.into(),
            quote,
        }
    }

    /// Decode a provider body. Fails as a unit: a malformed body, a missing
    /// pair key or any missing field yields an error and no quote.
    pub fn decode(body: &[u8], pair: &str) -> Result<Self, serde_json::Error> {
        let quote = take_pair(body, pair)?;
        Ok(Self::new(pair, Quote::deserialize(quote)?))
    }
}

impl Serialize for QuoteEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.pair, &self.quote)?;
        map.end()
    }
}

#[derive(Deserialize)]
struct BidOnly {
    bid: String,
}

/// Client-side view of the service response: only the bid is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidEnvelope {
    pub bid: String,
}

impl BidEnvelope {
    pub fn decode(body: &[u8], pair: &str) -> Result<Self, serde_json::Error> {
        let inner = take_pair(body, pair)?;
        let BidOnly { bid } = BidOnly::deserialize(inner)?;
        Ok(Self { bid })
    }
}

fn take_pair(body: &[u8], pair: &str) -> Result<Value, serde_json::Error> {
    let mut envelope: Map<String, Value> = serde_json::from_slice(body)?;
    envelope
        .remove(pair)
        .ok_or_else(|| serde_json::Error::custom(format!("missing envelope key `{pair}`")))
}
