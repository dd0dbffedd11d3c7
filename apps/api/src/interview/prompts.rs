// Prompt constants for the interview loop. Placeholders are replaced by the
// engine and evaluator before sending.

/// Remote question-generation prompt.
/// Replace: {role}, {context}, {question_number}, {task_instruction}, {history}
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"Role: {role}
Context: {context}
Question {question_number}
{task_instruction}
History: {history}

Instructions: Ask ONE clear question. No filler."#;

/// Answer evaluation prompt. The response must be a strict JSON object with
/// `feedback` and `rating` keys.
/// Replace: {question}, {answer}
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Role: Interview Coach & Mentor.
Question Asked: {question}
Candidate Answer: {answer}

Analyze the response.

Requirements:
1. Feedback: Provide specific areas of improvement based on the answer.
2. Resources: Suggest 1-2 SPECIFIC resources (Book names, Topics to Google, or specific techniques) to improve this skill.
3. Rating: Rate out of 10.

Output JSON Format ONLY:
{"feedback": "Your answer was... Improve by... Suggested Resources: 1. ... 2. ...", "rating": 7}"#;
