//! Fixed question bank — static configuration data, never mutated at runtime.
//!
//! Three language pools plus one behavioral pool. Pool selection for the
//! "Resume" context matches session skills against the keyword sets below.

pub const C_QUESTIONS: [&str; 5] = [
    "What is the difference between malloc() and calloc()?",
    "Explain pointers and pointer arithmetic with an example.",
    "What is the use of static keyword in C? Explain with scenarios.",
    "How does memory allocation work in C? What causes memory leaks?",
    "Write a C program to reverse a string without using library functions.",
];

pub const PYTHON_QUESTIONS: [&str; 5] = [
    "What is the difference between a list, tuple, and set in Python?",
    "Explain how Python manages memory and garbage collection.",
    "What are decorators in Python? Where are they used?",
    "Explain the difference between deep copy and shallow copy.",
    "Write a Python function to find the second largest number in a list.",
];

pub const JAVA_QUESTIONS: [&str; 5] = [
    "What is the difference between == and .equals() in Java?",
    "Explain OOP concepts used in Java with real examples.",
    "What is JVM, JRE, and JDK? How do they differ?",
    "What is exception handling? Difference between checked and unchecked exceptions.",
    "Write a Java program to check whether a string is a palindrome.",
];

pub const HR_QUESTIONS: [&str; 8] = [
    "Tell me about yourself.",
    "Why should we hire you?",
    "Why do you want to work for our company?",
    "Where do you see yourself in 5 years?",
    "How do you handle pressure or stress?",
    "Describe a challenge you faced and how you overcame it.",
    "Are you willing to relocate or work flexible hours?",
    "Do you have any questions for us?",
];

/// Scripted strengths question: asked exactly at behavioral turn index 2 and
/// excluded from the pool at every other index.
pub const STRENGTHS_QUESTION: &str = "What are your strengths?";

const C_SKILL_KEYWORDS: [&str; 3] = ["c", "c programming", "c language"];
const PYTHON_SKILL_KEYWORDS: [&str; 3] = ["python", "python3", "python programming"];
const JAVA_SKILL_KEYWORDS: [&str; 3] = ["java", "core java", "java programming"];

/// Unions the language pools whose keyword set matches any skill
/// (case-insensitive, whole-skill match). No match yields the union of all
/// three pools.
pub fn eligible_resume_pool(skills: &[String]) -> Vec<&'static str> {
    let skills_lower: Vec<String> = skills.iter().map(|s| s.to_lowercase()).collect();
    let matches =
        |keywords: &[&str]| keywords.iter().any(|k| skills_lower.iter().any(|s| s == k));

    let mut pool: Vec<&'static str> = Vec::new();
    if matches(&C_SKILL_KEYWORDS) {
        pool.extend_from_slice(&C_QUESTIONS);
    }
    if matches(&PYTHON_SKILL_KEYWORDS) {
        pool.extend_from_slice(&PYTHON_QUESTIONS);
    }
    if matches(&JAVA_SKILL_KEYWORDS) {
        pool.extend_from_slice(&JAVA_QUESTIONS);
    }

    if pool.is_empty() {
        pool.extend_from_slice(&C_QUESTIONS);
        pool.extend_from_slice(&PYTHON_QUESTIONS);
        pool.extend_from_slice(&JAVA_QUESTIONS);
    }
    pool
}
