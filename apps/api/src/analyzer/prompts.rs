// Prompt constants for the resume analyzer. `{resume_text}` is replaced with
// the truncated extracted text before sending.

/// Skill extraction prompt. The response is parsed as a bare JSON array of
/// strings.
pub const SKILL_EXTRACTION_PROMPT: &str = r#"Extract a list of technical and soft skills from the following resume text.
Return ONLY a JSON list of strings.
Resume Text: {resume_text}"#;

/// ATS scoring prompt. The caller concatenates the digits of the response.
pub const ATS_SCORE_PROMPT: &str = r#"Analyze the following resume and provide an ATS readiness score out of 100 based on structure, keywords, and clarity.
Return ONLY the numeric score.
Resume Text: {resume_text}"#;
