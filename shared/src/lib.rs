use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Full per-user document exchanged with the server.
///
/// The client posts it as the `user_data` form field and the server hands the
/// same shape back on load. Field names are the camelCase keys the web
/// client uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(default, deserialize_with = "lenient::text")]
    pub login: String,
    /// Display string, the server decides its format
    #[serde(default, deserialize_with = "lenient::text")]
    pub last_visit: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub avatar: String,
    /// Units of USD per one rub
    #[serde(deserialize_with = "lenient::number")]
    pub usd: f64,
    /// Units of EUR per one rub
    #[serde(deserialize_with = "lenient::number")]
    pub eur: f64,
    #[serde(default = "default_currency", deserialize_with = "lenient::text")]
    pub checked_curr: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub last_curr: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub checked_percent: f64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub notes: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub free_money: f64,
    /// Sent as 0/1 on the wire
    #[serde(
        default,
        deserialize_with = "lenient::flag",
        serialize_with = "lenient::serialize_flag"
    )]
    pub deposit: bool,
    #[serde(
        default,
        deserialize_with = "lenient::flag",
        serialize_with = "lenient::serialize_flag"
    )]
    pub capitalization: bool,
    /// Annual deposit interest rate
    #[serde(default, deserialize_with = "lenient::number")]
    pub percent: f64,
    #[serde(default)]
    pub data: LedgerDocument,
}

fn default_currency() -> String {
    "rub".to_string()
}

/// The `data` member of the document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerDocument {
    #[serde(default)]
    pub incomes: ItemMap,
    #[serde(default)]
    pub expenses: ItemMap,
}

/// Single income or expense record as stored in the document.
///
/// Exactly one of `income_id` / `expense_id` is present, depending on which
/// collection the record lives in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDocument {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_id"
    )]
    pub income_id: Option<u32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_id"
    )]
    pub expense_id: Option<u32>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub icon: String,
    #[serde(deserialize_with = "lenient::text")]
    pub currency: String,
    #[serde(deserialize_with = "lenient::text")]
    pub period: String,
    /// Digit string, e.g. "1000" or "12.5"
    #[serde(default, deserialize_with = "lenient::text")]
    pub value: String,
}

impl ItemDocument {
    /// Whichever id field is present
    pub fn id(&self) -> Option<u32> {
        self.income_id.or(self.expense_id)
    }
}

/// `id -> item` mapping that keeps the order the entries appear in.
///
/// A plain JSON object is the normal encoding. An array of items is also
/// accepted because servers that encode an empty associative array emit `[]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemMap(pub Vec<(String, ItemDocument)>);

impl ItemMap {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, ItemDocument)> {
        self.0.iter()
    }
}

impl Serialize for ItemMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, item) in &self.0 {
            map.serialize_entry(key, item)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ItemMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ItemMapVisitor;

        impl<'de> Visitor<'de> for ItemMapVisitor {
            type Value = ItemMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of items keyed by id, an array of items, or null")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ItemMap, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, item)) = access.next_entry::<String, ItemDocument>()? {
                    entries.push((key, item));
                }
                Ok(ItemMap(entries))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<ItemMap, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(item) = access.next_element::<ItemDocument>()? {
                    let key = item
                        .id()
                        .map(|id| id.to_string())
                        .ok_or_else(|| de::Error::custom("array item without an id field"))?;
                    entries.push((key, item));
                }
                Ok(ItemMap(entries))
            }

            fn visit_unit<E: de::Error>(self) -> Result<ItemMap, E> {
                Ok(ItemMap::default())
            }

            fn visit_none<E: de::Error>(self) -> Result<ItemMap, E> {
                Ok(ItemMap::default())
            }
        }

        deserializer.deserialize_any(ItemMapVisitor)
    }
}

/// Form body of a save request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveForm {
    pub user_data: String,
}

/// Response after a document was stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub login: String,
    /// RFC 3339 timestamp
    pub saved_at: String,
    pub income_count: usize,
    pub expense_count: usize,
}

/// Range of the savings slider on the statistics page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub start: f64,
}

/// Monthly totals and savings allocation for one user, in the display currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub login: String,
    pub currency: String,
    pub income_total: f64,
    pub expense_total: f64,
    pub net: f64,
    pub allocation: f64,
    pub slider: SliderRange,
}

/// Serde helpers for the loosely typed values the web client produces.
///
/// Form widgets hand back strings for numbers and checkboxes end up as 0/1,
/// so every scalar is read through `serde_json::Value` first.
pub mod lenient {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(0.0),
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| D::Error::custom(format!("number out of range: {}", n))),
            Value::String(s) => {
                let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();
                if cleaned.is_empty() {
                    return Ok(0.0);
                }
                cleaned
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| D::Error::custom(format!("invalid number: {:?}", s)))
            }
            other => Err(D::Error::custom(format!("expected a number, got {}", other))),
        }
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(false),
            Value::Bool(b) => Ok(b),
            Value::Number(n) => Ok(n.as_f64().map(|v| v != 0.0).unwrap_or(false)),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "" | "0" | "false" => Ok(false),
                "1" | "true" => Ok(true),
                other => other
                    .parse::<f64>()
                    .map(|v| v != 0.0)
                    .map_err(|_| D::Error::custom(format!("invalid flag: {:?}", s))),
            },
            other => Err(D::Error::custom(format!("expected a flag, got {}", other))),
        }
    }

    pub fn serialize_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(D::Error::custom(format!("expected text, got {}", other))),
        }
    }

    pub fn optional_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::Number(n) => n
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid item id: {}", n))),
            Value::String(s) => s
                .trim()
                .parse::<u32>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid item id: {:?}", s))),
            other => Err(D::Error::custom(format!("expected an item id, got {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_document() -> serde_json::Value {
        json!({
            "login": "demo",
            "usd": 0.016,
            "eur": 0.014
        })
    }

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let doc: UserDocument = serde_json::from_value(minimal_document()).unwrap();

        assert_eq!(doc.login, "demo");
        assert_eq!(doc.checked_curr, "rub");
        assert_eq!(doc.notes, "");
        assert!(!doc.deposit);
        assert!(!doc.capitalization);
        assert!(doc.data.incomes.is_empty());
        assert!(doc.data.expenses.is_empty());
    }

    #[test]
    fn test_missing_rates_are_rejected() {
        let result = serde_json::from_value::<UserDocument>(json!({ "login": "demo" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_flags_accept_strings_numbers_and_booleans() {
        let mut raw = minimal_document();
        raw["deposit"] = json!("1");
        raw["capitalization"] = json!("0");
        let doc: UserDocument = serde_json::from_value(raw.clone()).unwrap();
        assert!(doc.deposit);
        assert!(!doc.capitalization);

        raw["deposit"] = json!(0);
        raw["capitalization"] = json!(true);
        let doc: UserDocument = serde_json::from_value(raw).unwrap();
        assert!(!doc.deposit);
        assert!(doc.capitalization);
    }

    #[test]
    fn test_flags_serialize_as_integers() {
        let mut doc: UserDocument = serde_json::from_value(minimal_document()).unwrap();
        doc.deposit = true;

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["deposit"], json!(1));
        assert_eq!(value["capitalization"], json!(0));
    }

    #[test]
    fn test_numbers_accept_formatted_strings() {
        let mut raw = minimal_document();
        raw["freeMoney"] = json!("12 500");
        raw["percent"] = json!("7.5");
        let doc: UserDocument = serde_json::from_value(raw).unwrap();

        assert_eq!(doc.free_money, 12500.0);
        assert_eq!(doc.percent, 7.5);
    }

    #[test]
    fn test_numbers_reject_non_finite_strings() {
        for bad in ["NaN", "inf", "-infinity"] {
            let mut raw = minimal_document();
            raw["freeMoney"] = json!(bad);
            assert!(serde_json::from_value::<UserDocument>(raw).is_err(), "{} was accepted", bad);
        }
    }

    #[test]
    fn test_item_map_keeps_document_order() {
        let mut raw = minimal_document();
        raw["data"] = json!({
            "incomes": {
                "3": { "income_id": 3, "title": "Bonus", "icon": "gift", "currency": "rub", "period": "year", "value": "5000" },
                "1": { "income_id": 1, "title": "Salary", "icon": "wallet", "currency": "doll", "period": "month", "value": "900" }
            }
        });
        let doc: UserDocument = serde_json::from_value(raw).unwrap();

        let keys: Vec<&str> = doc.data.incomes.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["3", "1"]);
        assert_eq!(doc.data.incomes.0[1].1.id(), Some(1));
        assert!(doc.data.expenses.is_empty());
    }

    #[test]
    fn test_item_map_accepts_empty_array_and_null() {
        let mut raw = minimal_document();
        raw["data"] = json!({ "incomes": [], "expenses": null });
        let doc: UserDocument = serde_json::from_value(raw).unwrap();

        assert!(doc.data.incomes.is_empty());
        assert!(doc.data.expenses.is_empty());
    }

    #[test]
    fn test_item_value_and_id_accept_numbers_or_strings() {
        let item: ItemDocument = serde_json::from_value(json!({
            "expense_id": "7",
            "title": "Rent",
            "icon": "house",
            "currency": "euro",
            "period": "month",
            "value": 300
        }))
        .unwrap();

        assert_eq!(item.id(), Some(7));
        assert_eq!(item.income_id, None);
        assert_eq!(item.value, "300");
    }

    #[test]
    fn test_item_serializes_only_its_own_id_field() {
        let item = ItemDocument {
            income_id: None,
            expense_id: Some(2),
            title: "Food".to_string(),
            icon: "cart".to_string(),
            currency: "rub".to_string(),
            period: "day".to_string(),
            value: "450".to_string(),
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["expense_id"], json!(2));
        assert!(value.get("income_id").is_none());
    }
}
