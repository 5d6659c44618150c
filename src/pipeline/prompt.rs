//! Instruction templates for the two pipeline steps.
//!
//! Templates are fixed; the only variable parts are the report text, the
//! patient query, and (for analysis) the verification summary, which is
//! passed through verbatim.

/// Character budget for report text interpolated into a prompt. Keeps the
/// combined prompt inside the model's context window for multi-page reports.
const REPORT_EXCERPT_CHARS: usize = 12_000;

/// Step 1 instruction: confirm the document is a readable lab report.
pub fn build_verification_prompt(report_text: &str) -> String {
    format!(
        "Verify that the following document is a valid blood test report with \
         readable medical data.\n\n\
         Check for:\n\
         1. Presence of standard blood test markers\n\
         2. Numerical values and reference ranges\n\
         3. Laboratory information and dates\n\
         4. Overall document completeness\n\n\
         <REPORT>\n{report}\n</REPORT>\n\n\
         Reply with a verification summary stating whether the document is a \
         valid blood test report, which test sections and markers it contains, \
         and any quality issues or limitations found.",
        report = excerpt(report_text),
    )
}

/// Step 2 instruction: answer the patient's query, grounded on the
/// verification summary from Step 1.
pub fn build_analysis_prompt(query: &str, report_text: &str, verification_summary: &str) -> String {
    format!(
        "Analyze the blood test report below to answer the patient's question: \
         '{query}'\n\n\
         A verification pass has already confirmed the document. Its findings:\n\
         <VERIFICATION_SUMMARY>\n{summary}\n</VERIFICATION_SUMMARY>\n\n\
         <REPORT>\n{report}\n</REPORT>\n\n\
         Provide:\n\
         1. A summary of the blood markers and their values\n\
         2. Identification of abnormal results with explanations\n\
         3. Health implications of the findings\n\
         4. Evidence-based recommendations for improvement\n\
         5. A clear answer to the patient's question\n\n\
         Use plain language suitable for patients, and note when a finding \
         should be discussed with a healthcare provider.",
        query = query,
        summary = verification_summary,
        report = excerpt(report_text),
    )
}

/// Truncate to the excerpt budget on a char boundary.
fn excerpt(text: &str) -> &str {
    if text.len() <= REPORT_EXCERPT_CHARS {
        return text;
    }
    let mut end = REPORT_EXCERPT_CHARS;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
