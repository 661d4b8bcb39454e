//! Narrative summaries of a schedule.
//!
//! The core builds the hourly summary and the prompt, and parses the
//! reply. Producing the text is delegated to a NarrativeBackend that
//! lives outside the core.
//!
//! RULE: analyze_schedule() never fails. Transport errors, empty
//! replies and unparsable replies all degrade to a well-formed
//! fallback AnalysisResult.

use crate::{
    config::PlannerConfig,
    segment::{Segment, StaffingStatus},
    types::Headcount,
};
use serde::{Deserialize, Serialize};

pub const SYSTEM_INSTRUCTION: &str = "\
You review staffing plans for restaurants and retail stores. \
Point out where the plan wastes labor or risks poor service. \
Judge the plan by sales per labor hour, adherence to the role split and \
over- or under-staffing against the recommendation. \
Be brief, concrete and tie every point to the numbers you are given.";

const UNAVAILABLE_SUMMARY: &str = "The AI analyst is currently unavailable.";
const UNAVAILABLE_HINT: &str = "Check your connectivity or API configuration.";
const EMPTY_SUMMARY: &str = "No data returned from analysis.";
const UNPARSABLE_SUMMARY: &str = "Error processing the analysis result.";
const UNPARSABLE_HINT: &str = "Please refresh and try again.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    #[serde(rename = "keyInsights", default)]
    pub key_insights: Vec<String>,
}

impl AnalysisResult {
    pub fn unavailable() -> Self {
        Self {
            summary: UNAVAILABLE_SUMMARY.into(),
            key_insights: vec![UNAVAILABLE_HINT.into()],
        }
    }

    pub fn empty() -> Self {
        Self {
            summary: EMPTY_SUMMARY.into(),
            key_insights: Vec::new(),
        }
    }

    pub fn unparsable() -> Self {
        Self {
            summary: UNPARSABLE_SUMMARY.into(),
            key_insights: vec![UNPARSABLE_HINT.into()],
        }
    }
}

/// Produces free text for a prompt. `Ok(None)` means the backend
/// answered but had nothing to say.
pub trait NarrativeBackend {
    fn complete(&self, system: &str, prompt: &str) -> anyhow::Result<Option<String>>;
}

/// Totals for one hour group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourSummary {
    pub hour_label: String,
    pub sales: f64,
    pub scheduled_a: Headcount,
    pub scheduled_b: Headcount,
    pub recommended_a: Headcount,
    pub recommended_b: Headcount,
}

impl HourSummary {
    pub fn scheduled_total(&self) -> Headcount {
        self.scheduled_a.saturating_add(self.scheduled_b)
    }

    pub fn recommended_total(&self) -> Headcount {
        self.recommended_a.saturating_add(self.recommended_b)
    }

    /// Scheduled minus recommended people across the hour.
    pub fn headcount_gap(&self) -> i64 {
        self.scheduled_total() as i64 - self.recommended_total() as i64
    }

    pub fn status(&self) -> StaffingStatus {
        StaffingStatus::classify(self.scheduled_total(), self.recommended_total())
    }
}

/// Group segments by hour label, in the order hours first appear.
pub fn hourly_summary(segments: &[Segment]) -> Vec<HourSummary> {
    let mut hours: Vec<HourSummary> = Vec::new();
    for segment in segments {
        let idx = match hours.iter().position(|h| h.hour_label == segment.hour_label) {
            Some(idx) => idx,
            None => {
                hours.push(HourSummary {
                    hour_label: segment.hour_label.clone(),
                    sales: 0.0,
                    scheduled_a: 0,
                    scheduled_b: 0,
                    recommended_a: 0,
                    recommended_b: 0,
                });
                hours.len() - 1
            }
        };
        let hour = &mut hours[idx];
        hour.sales += segment.sales_forecast;
        hour.scheduled_a = hour.scheduled_a.saturating_add(segment.scheduled_a);
        hour.scheduled_b = hour.scheduled_b.saturating_add(segment.scheduled_b);
        hour.recommended_a = hour.recommended_a.saturating_add(segment.recommended_a);
        hour.recommended_b = hour.recommended_b.saturating_add(segment.recommended_b);
    }
    hours
}

pub fn build_prompt(summary: &[HourSummary], config: &PlannerConfig) -> String {
    let data = serde_json::to_string_pretty(summary).unwrap_or_else(|_| "[]".into());
    let (a, b) = (config.group_a_percentage, config.group_b_percentage);
    format!(
        "Review this hourly staffing summary against the operating targets.\n\
         \n\
         Targets:\n\
         - Productivity: ${target} in sales per person per 15 minutes.\n\
         - Role split: {a}% front of house (group A) / {b}% back of house (group B).\n\
         - Minimum floor: {floor} people in total.\n\
         \n\
         Hourly summary:\n\
         {data}\n\
         \n\
         Cover:\n\
         1. Hours where scheduled staff differs noticeably from recommended staff.\n\
         2. Whether the scheduled A/B ratio matches the {a}/{b} target.\n\
         3. Periods of overstaffing (low productivity) or understaffing (service risk).\n\
         \n\
         Reply with JSON only, in this shape:\n\
         {{\"summary\": \"two sentences on overall schedule quality\", \
         \"keyInsights\": [\"insight 1\", \"insight 2\", \"insight 3\"]}}\n",
        target = config.target_sales_per_person_per_15_min,
        floor = config.min_staff,
    )
}

/// Parse a backend reply, tolerating a surrounding Markdown code fence.
pub fn parse_reply(reply: Option<&str>) -> AnalysisResult {
    let text = match reply.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => return AnalysisResult::empty(),
    };
    let body = strip_code_fence(text);

    match serde_json::from_str::<AnalysisResult>(body) {
        Ok(result) if result.summary.trim().is_empty() => AnalysisResult::empty(),
        Ok(result) => result,
        Err(e) => {
            log::warn!("narrative reply was not valid JSON: {e}");
            AnalysisResult::unparsable()
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

pub fn analyze_schedule(
    backend: &dyn NarrativeBackend,
    segments: &[Segment],
    config: &PlannerConfig,
) -> AnalysisResult {
    let prompt = build_prompt(&hourly_summary(segments), config);
    match backend.complete(SYSTEM_INSTRUCTION, &prompt) {
        Ok(reply) => parse_reply(reply.as_deref()),
        Err(e) => {
            log::warn!("narrative backend failed: {e:#}");
            AnalysisResult::unavailable()
        }
    }
}
