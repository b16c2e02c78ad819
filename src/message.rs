//! Messages exchanged with the plugin UI.
//!
//! Every inbound message is validated once, here, into typed values. Raw
//! style objects stay as JSON until the controller normalizes them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::apply::ChartReport;
use crate::chart::ChartData;
use crate::style::{ExtractedStyles, StyleOverrides, StyleSlot};
use crate::template::StyleTemplateItem;

/// Style sources attached to an apply request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleInput {
    /// Raw overrides, normalized by the controller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit: Option<Value>,
    /// Captures supplied by the host, used where the live scene has none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted: Option<ExtractedStyles>,
}

/// A chart document plus the styles to apply with it.
///
/// ```json
/// { "type": "bar", "values": [1, 2], "style": { "explicit": { "cellFill": "#FFFFFF" } } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    #[serde(flatten)]
    pub chart: ChartData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<Uuid>,
}

impl ApplyRequest {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// The request's explicit overrides, normalized.
    pub fn explicit(&self) -> StyleOverrides {
        self.style
            .as_ref()
            .and_then(|s| s.explicit.as_ref())
            .map(StyleOverrides::from_raw)
            .unwrap_or_default()
    }

    /// Captures supplied with the request, if any.
    pub fn extracted(&self) -> Option<&ExtractedStyles> {
        self.style.as_ref().and_then(|s| s.extracted.as_ref())
    }
}

/// Messages from the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Inbound {
    /// An [`ApplyRequest`] as typed by the user.
    ApplyJson { text: String },
    Apply { payload: ApplyRequest },
    /// Edit one slot of the draft. `null` clears the slot.
    UpdateDraft { slot: StyleSlot, style: Value },
    /// Save `payload`, or the current draft when absent.
    SaveTemplate {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
    RenameTemplate { id: Uuid, name: String },
    DeleteTemplate { id: Uuid },
    ListTemplates,
}

impl Inbound {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Messages to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Outbound {
    Log { ok: bool, message: String },
    Templates { items: Vec<StyleTemplateItem> },
}

impl Outbound {
    pub fn ok(message: impl Into<String>) -> Self {
        Outbound::Log {
            ok: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Outbound::Log {
            ok: false,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        match self {
            Outbound::Log { ok, .. } => *ok,
            Outbound::Templates { .. } => true,
        }
    }
}

/// The one-line notice shown after an apply.
pub fn apply_summary(report: &ChartReport) -> String {
    format!(
        "패딩 적용: {} · 대상 없음: {} · 잠김/오류: {}",
        report.applied, report.skipped, report.blocked
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartValues;
    use crate::style::ChartType;
    use serde_json::json;

    #[test]
    fn test_parse_inbound() {
        let msg = Inbound::parse(r#"{"type":"apply-json","text":"{}"}"#).unwrap();
        assert_eq!(msg, Inbound::ApplyJson { text: "{}".into() });

        let msg = Inbound::parse(
            r#"{"type":"update-draft","slot":"cellTop","style":{"thickness":3}}"#,
        )
        .unwrap();
        assert!(matches!(msg, Inbound::UpdateDraft { slot: StyleSlot::CellTop, .. }));

        let msg = Inbound::parse(r#"{"type":"list-templates"}"#).unwrap();
        assert_eq!(msg, Inbound::ListTemplates);

        assert!(Inbound::parse(r#"{"type":"launch"}"#).is_err());
    }

    #[test]
    fn test_apply_request_fields() {
        let request = ApplyRequest::parse(
            r##"{"type":"line","values":[[1,2]],"style":{"explicit":{"cellFill":"#000000"}}}"##,
        )
        .unwrap();
        assert_eq!(request.chart.chart_type, ChartType::Line);
        assert_eq!(request.chart.values, ChartValues::Nested(vec![vec![1.0, 2.0]]));
        assert_eq!(
            request.style.and_then(|s| s.explicit),
            Some(json!({ "cellFill": "#000000" }))
        );
        assert_eq!(request.template_id, None);
    }

    #[test]
    fn test_outbound_shape() {
        let value = serde_json::to_value(Outbound::ok("done")).unwrap();
        assert_eq!(value, json!({ "type": "log", "ok": true, "message": "done" }));
    }

    #[test]
    fn test_summary_text() {
        let report = ChartReport {
            applied: 3,
            skipped: 0,
            blocked: 1,
        };
        assert_eq!(apply_summary(&report), "패딩 적용: 3 · 대상 없음: 0 · 잠김/오류: 1");
    }
}
