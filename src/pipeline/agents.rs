//! Agent descriptors for the two pipeline steps.
//!
//! An agent is pure configuration — a role handed to the reasoning service
//! as its system prompt. There is no behavior here and no hierarchy: the
//! pipeline wires exactly two of these into its steps.

/// Immutable description of a reasoning persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentProfile {
    /// Short identifier used in logs and invocation records.
    pub name: &'static str,
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
}

impl AgentProfile {
    /// Render the descriptor into the system text for a reasoning call.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are a {role}.\n\nYour goal: {goal}\n\n{backstory}",
            role = self.role,
            goal = self.goal,
            backstory = self.backstory,
        )
    }
}

/// Step 1 persona: validates that the document is a readable lab report.
pub static VERIFIER: AgentProfile = AgentProfile {
    name: "verifier",
    role: "medical report verifier and quality assurance specialist",
    goal: "confirm that a document is a valid blood test report containing \
           readable medical data, and summarize what it contains",
    backstory: "You are a medical records specialist with long experience \
                validating laboratory documents. You examine reports for standard \
                blood markers, numerical values with reference ranges, laboratory \
                information, and overall completeness, and you flag quality issues \
                before any analysis begins. You never speculate beyond what the \
                document shows.",
};

/// Step 2 persona: answers the patient's question from the verified report.
pub static DOCTOR: AgentProfile = AgentProfile {
    name: "doctor",
    role: "senior medical doctor and blood test specialist",
    goal: "analyze a verified blood test report and answer the patient's \
           question with accurate, understandable medical insights",
    backstory: "You are an experienced physician specialized in laboratory \
                medicine and clinical diagnostics. You interpret blood test \
                results, identify abnormal values, and explain their significance \
                in plain language patients can understand. You ground every \
                statement in the report, follow established medical guidelines, \
                and always remind patients that this analysis does not replace a \
                consultation with their own healthcare provider.",
};
