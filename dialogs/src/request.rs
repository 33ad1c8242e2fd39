//! The access request being collected and its request types.

use crate::prompt::Choice;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of access request. Serialized as the canonical choice value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestType {
    #[serde(rename = "Tracker")]
    AccessTracker,
    #[serde(rename = "Report")]
    AccessReport,
    #[serde(rename = "Tracker Status")]
    TrackerStatus,
    #[serde(rename = "Report Status")]
    ReportStatus,
    #[serde(rename = "Revalidation")]
    RequestRevalidation,
}

impl RequestType {
    pub const ALL: [RequestType; 5] = [
        RequestType::AccessTracker,
        RequestType::AccessReport,
        RequestType::TrackerStatus,
        RequestType::ReportStatus,
        RequestType::RequestRevalidation,
    ];

    /// Canonical choice value.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::AccessTracker => "Tracker",
            RequestType::AccessReport => "Report",
            RequestType::TrackerStatus => "Tracker Status",
            RequestType::ReportStatus => "Report Status",
            RequestType::RequestRevalidation => "Revalidation",
        }
    }

    /// Name of the NLU intent that selects this request type.
    pub fn intent_name(&self) -> &'static str {
        match self {
            RequestType::AccessTracker => "AccessTracker",
            RequestType::AccessReport => "AccessReport",
            RequestType::TrackerStatus => "TrackerStatus",
            RequestType::ReportStatus => "ReportStatus",
            RequestType::RequestRevalidation => "RequestRevalidation",
        }
    }

    pub fn from_intent(intent: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.intent_name() == intent)
    }

    /// Parses a canonical choice value (case-insensitive).
    pub fn from_value(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(value))
    }

    /// Acknowledgement sent once the request type is known.
    pub fn acknowledgement(&self) -> &'static str {
        match self {
            RequestType::AccessTracker => "Your access tracker request has been received.",
            RequestType::AccessReport => "Your access report request has been received.",
            RequestType::TrackerStatus => "Your tracker status request has been received.",
            RequestType::ReportStatus => "Your report status request has been received.",
            RequestType::RequestRevalidation => "Your revalidation request has been received.",
        }
    }
}

/// Choices offered by the request type prompt, in display order.
pub fn request_type_choices() -> Vec<Choice> {
    vec![
        Choice::new("Report", &["report", "access report"]),
        Choice::new("Tracker", &["tracker", "access tracker"]),
        Choice::new("Report Status", &["request report status", "report status"]),
        Choice::new("Tracker Status", &["tracker status", "request tracker status"]),
        Choice::new(
            "Revalidation",
            &["revalidation", "request revalidation", "access revalidation"],
        ),
    ]
}

/// Details collected by the access request dialog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequestContext {
    #[serde(default)]
    pub cust_project_id: Option<String>,
    #[serde(default)]
    pub request_type: Option<RequestType>,
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_type_wire_values() {
        assert_eq!(serde_json::to_value(RequestType::AccessTracker).unwrap(), json!("Tracker"));
        let parsed: RequestType = serde_json::from_value(json!("Tracker Status")).unwrap();
        assert_eq!(parsed, RequestType::TrackerStatus);
    }

    #[test]
    fn test_from_intent_and_value() {
        assert_eq!(
            RequestType::from_intent("RequestRevalidation"),
            Some(RequestType::RequestRevalidation)
        );
        assert_eq!(RequestType::from_intent("None"), None);
        assert_eq!(RequestType::from_value("report status"), Some(RequestType::ReportStatus));
        assert_eq!(RequestType::from_value("Weather"), None);
    }

    #[test]
    fn test_choices_cover_every_request_type() {
        let values: Vec<String> = request_type_choices().into_iter().map(|c| c.value).collect();
        for t in RequestType::ALL {
            assert!(values.iter().any(|v| v == t.as_str()), "{:?}", t);
        }
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&Value::Null)));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(is_truthy(Some(&json!("Tracker"))));
        assert!(is_truthy(Some(&json!({}))));
        assert!(is_truthy(Some(&json!(1))));
    }
}
