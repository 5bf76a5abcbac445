use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use sqlx::types::BigDecimal;

use crate::pkg::internal::adaptors::companies::spec::CompanyEntry;

/// NUMERIC decodes from postgres with base-10000 scale padding, so a
/// stored 0.2 arrives as "0.2000". Serialize the normalized value to
/// keep the wire format at "0.2".
fn decimal_string<S: Serializer>(
    value: &Option<BigDecimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) => serializer.serialize_some(&value.normalized()),
        None => serializer.serialize_none(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobEntry {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    #[serde(serialize_with = "decimal_string")]
    pub equity: Option<BigDecimal>,
    pub company_handle: String,
}

impl JobEntry {
    /// Strips the fetch-time scale padding from equity, so the value
    /// the adaptors hand out already reads "0.2", not "0.2000".
    pub fn normalized(mut self) -> Self {
        self.equity = self.equity.map(|e| e.normalized());
        self
    }
}

/// List row: the job joined with the name of its company, which is
/// null when the referenced company row is gone.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobWithCompany {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    #[serde(serialize_with = "decimal_string")]
    pub equity: Option<BigDecimal>,
    pub company_handle: String,
    pub company_name: Option<String>,
}

impl JobWithCompany {
    pub fn normalized(mut self) -> Self {
        self.equity = self.equity.map(|e| e.normalized());
        self
    }
}

/// Detail row: the flat company reference is replaced by the company
/// record itself. The key is omitted entirely when the company cannot
/// be resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    #[serde(serialize_with = "decimal_string")]
    pub equity: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyEntry>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use serde_json::{Value, json};

    use super::*;

    fn entry(equity: Option<BigDecimal>) -> JobEntry {
        JobEntry {
            id: 7,
            title: "J1".into(),
            salary: Some(100),
            equity,
            company_handle: "c1".into(),
        }
    }

    #[test]
    fn equity_serializes_without_scale_padding() {
        let job = entry(Some(BigDecimal::from_str("0.2000").unwrap()));
        let body = serde_json::to_value(&job).unwrap();
        assert_eq!(body["equity"], json!("0.2"));
    }

    #[test]
    fn normalized_cleans_the_raw_value_not_just_the_json() {
        let job = entry(Some(BigDecimal::from_str("0.2000").unwrap())).normalized();
        assert_eq!(job.equity.as_ref().map(|e| e.to_string()), Some("0.2".into()));

        let row = JobWithCompany {
            id: 7,
            title: "J1".into(),
            salary: Some(100),
            equity: Some(BigDecimal::from_str("0.1000").unwrap()),
            company_handle: "c1".into(),
            company_name: Some("C1".into()),
        }
        .normalized();
        assert_eq!(row.equity.as_ref().map(|e| e.to_string()), Some("0.1".into()));

        let bare = entry(None).normalized();
        assert_eq!(bare.equity, None);
    }

    #[test]
    fn absent_equity_serializes_as_null() {
        let body = serde_json::to_value(entry(None)).unwrap();
        assert_eq!(body["equity"], Value::Null);
    }

    #[test]
    fn listing_and_detail_rows_normalize_equity_too() {
        let row = JobWithCompany {
            id: 7,
            title: "J1".into(),
            salary: Some(100),
            equity: Some(BigDecimal::from_str("0.1000").unwrap()),
            company_handle: "c1".into(),
            company_name: Some("C1".into()),
        };
        assert_eq!(serde_json::to_value(&row).unwrap()["equity"], json!("0.1"));

        let details = JobDetails {
            id: 7,
            title: "J1".into(),
            salary: None,
            equity: Some(BigDecimal::from_str("1.0000").unwrap()),
            company: None,
        };
        assert_eq!(
            serde_json::to_value(&details).unwrap()["equity"],
            json!("1")
        );
    }
}
