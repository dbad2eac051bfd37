//! Wire format of the validation endpoint

use chrono::NaiveDate;
use cupom_core::{Money, ValidationDecision};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ValidationData>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationData {
    pub value: Money,
    pub store: String,
    /// `dd/mm/yyyy`, only on approval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_token: Option<String>,
}

/// What only an approval carries: the day it happened and an opaque token.
#[derive(Debug, Clone)]
pub struct ApprovalStamp {
    pub date: NaiveDate,
    pub token: String,
}

impl ApprovalStamp {
    pub fn now() -> Self {
        Self {
            date: chrono::Local::now().date_naive(),
            token: uuid::Uuid::new_v4().to_string(),
        }
    }
}

impl ValidationResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self { valid: false, message: message.into(), data: None }
    }

    /// Render a decision; `stamp` is only consulted for approvals.
    pub fn from_decision(
        decision: &ValidationDecision,
        minimum: Money,
        stamp: impl FnOnce() -> ApprovalStamp,
    ) -> Self {
        let (date, validation_token) = if decision.is_approved() {
            let stamp = stamp();
            (Some(stamp.date.format("%d/%m/%Y").to_string()), Some(stamp.token))
        } else {
            (None, None)
        };

        Self {
            valid: decision.is_approved(),
            message: decision.message(minimum),
            data: Some(ValidationData {
                value: decision.value(),
                store: decision.store_name().to_string(),
                date,
                validation_token,
            }),
        }
    }
}
