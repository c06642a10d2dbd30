//! Prompt construction for the extraction model

use serde::{Deserialize, Serialize};

use crate::validation::REQUIRED_FIELDS;

/// Instructions sent ahead of every claim
pub const SYSTEM_PROMPT: &str = "\
You are an insurance claims analyst. Extract structured information from the \
unstructured claim description that follows.

Extract these fields:
- loss_type: type of loss (Accident, Fire, Flood, Theft, Water Damage, Storm, Vandalism, ...)
- severity: one of Low, Medium, High, Critical
- affected_assets: what was damaged or affected, as specifically as possible
- estimated_loss: the monetary loss mentioned, with currency, or \"Not specified\"
- incident_date: when the incident happened, or \"Not specified\"
- location: where the incident happened, or \"Not specified\"
- confidence: your confidence in this extraction, one of Low, Medium, High
- extraction_explanation: a short justification that quotes, in single quotes, \
the words or phrases that drove the classification

Return ONLY a JSON object with exactly these field names. Do not add any other \
text, Markdown formatting or code fences.";

/// A worked example shown to the model before the real claim
#[derive(Debug, Clone, Copy)]
pub struct FewShotExample {
    pub input: &'static str,
    /// Field values in [`REQUIRED_FIELDS`] order
    pub output: [&'static str; 8],
}

impl FewShotExample {
    /// The expected output rendered as a JSON object
    pub fn output_json(&self) -> String {
        let lines: Vec<String> = REQUIRED_FIELDS
            .iter()
            .zip(self.output.iter())
            .map(|(key, value)| {
                let value = serde_json::Value::String((*value).to_string());
                format!("  \"{key}\": {value}")
            })
            .collect();
        format!("{{\n{}\n}}", lines.join(",\n"))
    }
}

pub const FEW_SHOT_EXAMPLES: [FewShotExample; 4] = [
    FewShotExample {
        input: "Customer reported minor accident on rear bumper, scratches only, no injuries, \
estimated cost ₹7,000. Incident happened yesterday at parking lot near office.",
        output: [
            "Accident",
            "Low",
            "Rear bumper (scratches)",
            "₹7,000",
            "Yesterday",
            "Parking lot near office",
            "High",
            "Classified as 'Accident' with 'Low' severity because of 'minor accident' and \
'scratches only'. No injuries, a clear cost estimate, place and time given.",
        ],
    },
    FewShotExample {
        input: "Vehicle submerged during flood, engine not starting, electrical damage suspected. \
Major repairs needed.",
        output: [
            "Flood",
            "Critical",
            "Vehicle engine, electrical system",
            "Not specified",
            "Not specified",
            "Not specified",
            "High",
            "Classified as 'Flood' because of 'submerged during flood'. Marked 'Critical' since \
the 'engine not starting' and 'electrical damage' point to extensive repairs.",
        ],
    },
    FewShotExample {
        input: "Fire reported in kitchen at 2:00 AM on Oct 15. Cabinets, microwave, and wall damaged. \
Customer estimates around $5000 damage. Fire department attended.",
        output: [
            "Fire",
            "High",
            "Kitchen cabinets, microwave, wall",
            "$5000",
            "Oct 15, 2:00 AM",
            "Kitchen",
            "High",
            "Classified as 'Fire' with 'High' severity: several items damaged and the \
'Fire department attended'. Date, time, location and cost are all stated.",
        ],
    },
    FewShotExample {
        input: "Customer called about water leakage from ceiling damaging furniture below. \
Not sure when it started, probably last week.",
        output: [
            "Water Damage",
            "Medium",
            "Furniture, ceiling",
            "Not specified",
            "Approximately last week",
            "Not specified",
            "Medium",
            "Classified as 'Water Damage' because of 'water leakage from ceiling'. Several items \
affected without critical damage. Confidence is 'Medium' as the start date is uncertain \
and no cost is given.",
        ],
    },
];

/// Full prompt for one claim: instructions, examples, then the claim itself
pub fn build_prompt(claim_text: &str) -> String {
    let mut prompt = String::from(SYSTEM_PROMPT);
    prompt.push_str("\n\n");

    for (i, example) in FEW_SHOT_EXAMPLES.iter().enumerate() {
        prompt.push_str(&format!(
            "EXAMPLE {}:\nInput: \"{}\"\n\nOutput:\n{}\n\n",
            i + 1,
            example.input,
            example.output_json()
        ));
    }

    prompt.push_str(&format!(
        "Now analyze this new claim:\n\nInput: \"{claim_text}\"\n\nOutput:"
    ));
    prompt
}

/// Sampling parameters sent with every request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            top_p: 0.8,
            top_k: 40,
            max_output_tokens: 1024,
        }
    }
}
