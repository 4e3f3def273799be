//! Prompt construction
//!
//! Each function returns the full message list for one model call. System
//! instructions go in a system message; the conversation so far is replayed
//! with questions as assistant turns and answers as user turns.

use std::fmt::Write;

use rehearse_models::Message;

use super::Rubric;
use crate::session::Exchange;

fn interviewer_persona(role: &str, experience: &str) -> String {
    format!(
        "You are an AI interview coach specializing in {role} roles. \
         The candidate has {experience} of experience."
    )
}

pub fn first_question(role: &str, experience: &str) -> Vec<Message> {
    let system = format!(
        "{} Start the interview by asking a relevant first question. \
         Keep the question concise and professional. Do not include greetings \
         or conversational fillers, only the question itself.",
        interviewer_persona(role, experience)
    );
    vec![
        Message::system(system),
        Message::user(format!(
            "Candidate: {role}, Experience: {experience}. First question:"
        )),
    ]
}

pub fn next_question(role: &str, experience: &str, history: Vec<Message>) -> Vec<Message> {
    let system = format!(
        "{} Based on the conversation so far, ask a relevant and challenging next question. \
         Do not greet the candidate or comment on their previous answer. \
         Ask the next question directly.",
        interviewer_persona(role, experience)
    );
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(system));
    messages.extend(history);
    messages.push(Message::user("What is the next question?"));
    messages
}

pub fn evaluation(
    rubric: &Rubric,
    role: &str,
    experience: &str,
    question: &str,
    answer: &str,
) -> Vec<Message> {
    let system = format!(
        "You are an AI interview evaluator. Score technical answers on a 0-10 scale \
         using the standardized rubric (version {version}). Ground the evaluation only \
         in the literal answer text: do not assume intent, infer unstated details, or \
         mention technologies the candidate did not mention. If uncertain, lower the \
         confidence or the score.\n\n\
         Scoring rubric:\n{bands}\n\n\
         Validation rules:\n\
         - If the answer is 80% or more similar to the question, the score is 0.\n\
         - If the answer is irrelevant or off-topic, the score is 0.\n\
         - If the answer is a single short generic sentence, the score is 1.\n\n\
         Confidence levels:\n\
         - High: clearly relevant, technically correct and well structured, with two or \
           more specific technical concepts used correctly.\n\
         - Medium: mostly relevant and partially correct, with at least one valid concept.\n\
         - Low: vague, generic, off-topic, copied or very short.\n\
         Never report High confidence for an answer under 15 words.\n\n\
         Respond with valid JSON only, no markdown:\n\
         {{\"score\": <integer 0-10>, \"reason\": \"<at most 120 words>\", \
         \"confidence\": \"Low|Medium|High\", \
         \"red_flag\": \"<note if copied, generic or off-topic, else empty>\"}}",
        version = rubric.version(),
        bands = rubric.render(),
    );
    let input = format!(
        "Role: {role}\nExperience: {experience}\nQuestion: {question}\nCandidate's answer: {answer}"
    );
    vec![Message::system(system), Message::user(input)]
}

pub fn overall_feedback(
    role: &str,
    experience: &str,
    exchanges: &[Exchange<'_>],
    avg_score: f64,
) -> Vec<Message> {
    let mut transcript = String::new();
    let mut scores = String::new();
    for (i, ex) in exchanges.iter().enumerate() {
        let n = i + 1;
        let answer = ex.answer.text.trim();
        let _ = writeln!(transcript, "Q{n}: {}", ex.question.text);
        if answer.is_empty() {
            let _ = writeln!(transcript, "Answer: (no answer provided)");
        } else {
            let _ = writeln!(transcript, "Answer: {answer}");
        }
        let _ = writeln!(transcript, "Evaluator notes: {}\n", ex.verdict.reason);
        let _ = writeln!(scores, "- Q{n} Score: {}/10", ex.verdict.score);
    }

    let system = "You are an AI interview coach helping a candidate learn after a practice \
                  interview. Be supportive, educational and motivating, like a mentor rather \
                  than a hiring manager. Base the feedback strictly on the answers and notes \
                  provided. Do not invent strengths or weaknesses that are not present in the \
                  answers, and do not use language about hiring or rejection. If an answer was \
                  blank or invalid, mention it supportively and encourage a complete answer \
                  next time.";

    let request = format!(
        "Interview context:\nRole: {role}\nExperience: {experience}\n\n\
         Transcript:\n{transcript}\n\
         Write a markdown summary with these sections:\n\
         **Summary of Your Interview Performance**\n\
         **Your Strengths**\n\
         **Areas You Can Improve**\n\
         **What to Study Next**\n\
         **Final Score: {avg_score}/10**\n\
         **Recommended Next Steps**\n\n\
         **Per-Question Scores:**\n{scores}"
    );

    vec![Message::system(system), Message::user(request)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Answer, Confidence, Question, Verdict};
    use rehearse_models::Role;

    #[test]
    fn first_question_mentions_role_and_experience() {
        let messages = first_question("Frontend Developer", "2 years");
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.as_text().contains("Frontend Developer"));
        assert!(messages[1].content.as_text().contains("2 years"));
    }

    #[test]
    fn next_question_wraps_history() {
        let history = vec![Message::assistant("Q1"), Message::user("A1")];
        let messages = next_question("SRE", "Senior", history);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].content.as_text(), "Q1");
        assert_eq!(messages[2].content.as_text(), "A1");
        assert_eq!(messages[3].role, Role::User);
    }

    #[test]
    fn evaluation_embeds_rubric_and_input() {
        let messages = evaluation(
            &Rubric::v1(),
            "SRE",
            "Senior",
            "What is an SLO?",
            "A target for reliability.",
        );
        let system = messages[0].content.as_text();
        assert!(system.contains("version v1"));
        assert!(system.contains("- 10 (Excellent)"));
        let input = messages[1].content.as_text();
        assert!(input.contains("Question: What is an SLO?"));
        assert!(input.contains("Candidate's answer: A target for reliability."));
    }

    #[test]
    fn overall_feedback_lists_scores() {
        let question = Question::generated("What is a B-tree?");
        let answer = Answer::new("");
        let verdict = Verdict {
            score: 0,
            reason: "No answer.".into(),
            confidence: Confidence::Low,
            red_flag: "Empty answer.".into(),
        };
        let exchanges = vec![Exchange {
            question: &question,
            answer: &answer,
            verdict: &verdict,
        }];
        let messages = overall_feedback("DBA", "Mid", &exchanges, 0.0);
        let request = messages[1].content.as_text();
        assert!(request.contains("Q1: What is a B-tree?"));
        assert!(request.contains("(no answer provided)"));
        assert!(request.contains("- Q1 Score: 0/10"));
        assert!(request.contains("Final Score: 0/10"));
    }
}
