//! Emergency classification for call transcripts.
//!
//! Two signals feed the verdict: a fixed keyword taxonomy scanned against
//! the transcript, and a hosted-model judgment of the free text. Either
//! alone is enough to flag an emergency.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::openai::{OpenAiClient, SemanticJudgment};
use crate::region::Region;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyType {
    Gas,
    NoHeat,
    NoAc,
    Water,
    Safety,
}

impl EmergencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmergencyType::Gas => "gas",
            EmergencyType::NoHeat => "no_heat",
            EmergencyType::NoAc => "no_ac",
            EmergencyType::Water => "water",
            EmergencyType::Safety => "safety",
        }
    }
}

impl std::fmt::Display for EmergencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trigger phrases by category. Order matters: when several categories
/// match, the first one in this table becomes the emergency type.
const EMERGENCY_KEYWORDS: &[(EmergencyType, &[&str])] = &[
    (
        EmergencyType::Gas,
        &["gas leak", "smell gas", "gas odor", "gas smell"],
    ),
    (
        EmergencyType::NoHeat,
        &[
            "no heat",
            "furnace out",
            "furnace not working",
            "heater broken",
            "freezing",
        ],
    ),
    (
        EmergencyType::NoAc,
        &[
            "no ac",
            "no air",
            "ac out",
            "air conditioning broken",
            "overheating",
        ],
    ),
    (
        EmergencyType::Water,
        &["water leak", "flooding", "water damage"],
    ),
    (
        EmergencyType::Safety,
        &["carbon monoxide", "smoke", "fire"],
    ),
];

/// Emergency categories weighted as especially urgent for a region.
pub fn priority_issues(region: Region) -> &'static [EmergencyType] {
    match region {
        Region::North => &[EmergencyType::NoHeat, EmergencyType::Gas, EmergencyType::Safety],
        Region::South => &[EmergencyType::NoAc, EmergencyType::Gas, EmergencyType::Safety],
    }
}

/// Final classifier output. Well-formed even when the semantic call failed.
#[derive(Debug, Clone, Serialize)]
pub struct EmergencyClassification {
    pub is_emergency: bool,
    pub emergency_type: Option<EmergencyType>,
    pub confidence: f32,
    pub reasoning: String,
    pub detected_keywords: Vec<String>,
}

#[derive(Debug, Default)]
pub struct KeywordScan {
    /// Every matched phrase, across all categories.
    pub detected_keywords: Vec<String>,
    /// First category in table order with at least one match.
    pub category: Option<EmergencyType>,
}

/// Case-insensitive substring scan of the transcript against the taxonomy.
pub fn scan_keywords(transcript: &str) -> KeywordScan {
    let lower = transcript.to_lowercase();
    let mut scan = KeywordScan::default();

    for (category, phrases) in EMERGENCY_KEYWORDS {
        for phrase in *phrases {
            if lower.contains(phrase) {
                scan.detected_keywords.push((*phrase).to_string());
                if scan.category.is_none() {
                    scan.category = Some(*category);
                }
            }
        }
    }

    scan
}

/// Merge keyword evidence with the semantic judgment.
///
/// Keyword match alone is sufficient, semantic alone is sufficient. The
/// keyword category wins over the semantic one; confidence comes from the
/// judgment and gets a +0.2 boost (capped at 1.0) when the resolved type
/// is a priority issue for the region.
pub fn combine(
    scan: KeywordScan,
    judgment: SemanticJudgment,
    region: Region,
) -> EmergencyClassification {
    let is_emergency = !scan.detected_keywords.is_empty() || judgment.is_emergency;
    let emergency_type = scan.category.or(judgment.emergency_type);

    let mut confidence = judgment.confidence;
    if let Some(kind) = emergency_type {
        if priority_issues(region).contains(&kind) {
            confidence = (confidence + 0.2).min(1.0);
        }
    }

    EmergencyClassification {
        is_emergency,
        emergency_type,
        confidence,
        reasoning: judgment.reasoning,
        detected_keywords: scan.detected_keywords,
    }
}

pub struct EmergencyClassifier {
    semantic: OpenAiClient,
}

impl EmergencyClassifier {
    pub fn new() -> Self {
        Self {
            semantic: OpenAiClient::new(),
        }
    }

    /// Classify a transcript. Never errors: a failed semantic call takes
    /// the degraded non-emergency branch, and keyword evidence still counts.
    pub async fn classify(&self, transcript: &str, region: Region) -> EmergencyClassification {
        let scan = scan_keywords(transcript);

        let judgment = match self.semantic.judge_transcript(transcript, region).await {
            Ok(judgment) => judgment,
            Err(e) => {
                warn!("Semantic judgment unavailable, degrading to non-emergency: {}", e);
                SemanticJudgment::failed()
            }
        };

        combine(scan, judgment, region)
    }
}

impl Default for EmergencyClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn judgment(is_emergency: bool, kind: Option<EmergencyType>, confidence: f32) -> SemanticJudgment {
        SemanticJudgment {
            is_emergency,
            emergency_type: kind,
            confidence,
            reasoning: "test".to_string(),
        }
    }

    #[test]
    fn keyword_scan_is_case_insensitive() {
        let scan = scan_keywords("I smell GAS in my kitchen");
        assert_eq!(scan.category, Some(EmergencyType::Gas));
        assert!(scan.detected_keywords.contains(&"smell gas".to_string()));
    }

    #[test]
    fn keyword_scan_empty_transcript_matches_nothing() {
        let scan = scan_keywords("");
        assert!(scan.detected_keywords.is_empty());
        assert_eq!(scan.category, None);
    }

    #[test]
    fn first_category_in_table_order_wins() {
        // Both no_heat and gas phrases present; gas sits first in the table.
        let scan = scan_keywords("there is a gas smell and we have no heat");
        assert_eq!(scan.category, Some(EmergencyType::Gas));
        // ...but keywords from the other category are still collected.
        assert!(scan.detected_keywords.contains(&"gas smell".to_string()));
        assert!(scan.detected_keywords.contains(&"no heat".to_string()));
    }

    #[test]
    fn multiple_phrases_within_one_category_are_all_collected() {
        let scan = scan_keywords("water leak everywhere, flooding in the basement");
        assert_eq!(scan.category, Some(EmergencyType::Water));
        assert_eq!(scan.detected_keywords.len(), 2);
    }

    #[test]
    fn keyword_match_alone_flags_emergency() {
        let scan = scan_keywords("my furnace out since last night");
        let result = combine(scan, judgment(false, None, 0.3), Region::South);
        assert!(result.is_emergency);
        assert_eq!(result.emergency_type, Some(EmergencyType::NoHeat));
    }

    #[test]
    fn semantic_verdict_alone_flags_emergency() {
        let scan = scan_keywords("the house is getting dangerously cold");
        let result = combine(
            scan,
            judgment(true, Some(EmergencyType::NoHeat), 0.8),
            Region::South,
        );
        assert!(result.is_emergency);
        // No keyword category, so the semantic one fills in.
        assert_eq!(result.emergency_type, Some(EmergencyType::NoHeat));
    }

    #[test]
    fn priority_issue_boost_is_capped_at_one() {
        let scan = scan_keywords("no heat in the house");
        let result = combine(scan, judgment(true, None, 0.9), Region::North);
        assert!((result.confidence - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn boost_applies_only_in_matching_region() {
        let scan = scan_keywords("no heat in the house");
        // no_heat is not a priority issue in the south.
        let south = combine(scan, judgment(true, None, 0.5), Region::South);
        assert!((south.confidence - 0.5).abs() < f32::EPSILON);

        let scan = scan_keywords("no heat in the house");
        let north = combine(scan, judgment(true, None, 0.5), Region::North);
        assert!((north.confidence - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn boost_uses_resolved_type_from_semantic_fallback() {
        // No keyword hit; semantic supplies a priority-issue category.
        let result = combine(
            KeywordScan::default(),
            judgment(true, Some(EmergencyType::NoAc), 0.6),
            Region::South,
        );
        assert!((result.confidence - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn degraded_judgment_yields_well_formed_non_emergency() {
        let result = combine(KeywordScan::default(), SemanticJudgment::failed(), Region::South);
        assert!(!result.is_emergency);
        assert_eq!(result.emergency_type, None);
        assert_eq!(result.confidence, 0.0);
        assert!(result.detected_keywords.is_empty());
    }

    #[test]
    fn keywords_still_count_when_judgment_degraded() {
        let scan = scan_keywords("I can smell gas near the stove");
        let result = combine(scan, SemanticJudgment::failed(), Region::North);
        assert!(result.is_emergency);
        assert_eq!(result.emergency_type, Some(EmergencyType::Gas));
        // Gas is a priority issue everywhere, so the zero confidence gets
        // the boost and nothing more.
        assert!((result.confidence - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn emergency_type_serializes_snake_case() {
        assert_eq!(EmergencyType::NoAc.to_string(), "no_ac");
        let parsed: EmergencyType = serde_json::from_str("\"no_heat\"").unwrap();
        assert_eq!(parsed, EmergencyType::NoHeat);
    }
}
