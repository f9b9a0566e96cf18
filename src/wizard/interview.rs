//! The business interview: one short conversation per question

use serde::Serialize;

use crate::agent::{prompts, Agent, QuestionTurn};
use crate::conversation::{run_loop, Console, InputPolicy, Opening};
use crate::error::Result;
use crate::llm::ChatModel;

/// An interview question
#[derive(Debug, Clone, Copy)]
pub struct Question {
    pub text: &'static str,
    pub required: bool,
}

impl Question {
    pub const fn required(text: &'static str) -> Self {
        Self {
            text,
            required: true,
        }
    }

    pub const fn optional(text: &'static str) -> Self {
        Self {
            text,
            required: false,
        }
    }
}

/// Questions asked about every business
pub const BASIC_QUESTIONS: &[Question] = &[
    Question::required("Me podrias describir tu negocio?"),
    Question::required("Que vendes? Como lo vendes?"),
    Question::required("Me podrias decir la ubicación/ubicaciones de tu negocio?"),
    Question::required("Qué es lo que hace tu negocio diferente?"),
    Question::required(
        "¿Que frases frecuentes usan tus clientes para referirse a tu negocio, tus producto/servicio?",
    ),
    Question::required("¿Cómo te conocen tus clientes?"),
    Question::required(
        "¿Con que frases saludas a tus clientes? ¿Cómo quieres que se presente el Agente IA a tus clientes?",
    ),
    Question::required("¿Con que frases te despides a tus clientes?"),
    Question::required("¿Cual quieres que sea el tono de conversación?"),
    Question::required("Cual es el proposito de crear al agente(Vender productos, agente)"),
];

/// A confirmed answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub question: String,
    pub answer: String,
}

/// Ask each question in turn. Skipped optional questions produce no answer.
pub fn ask_questions(
    model: &dyn ChatModel,
    console: &mut dyn Console,
    questions: &[Question],
) -> Result<Vec<Answer>> {
    let mut answers = Vec::with_capacity(questions.len());

    for question in questions {
        let mut agent: Agent<QuestionTurn> = Agent::new(model, prompts::interviewer(question.text));
        let policy = if question.required {
            InputPolicy::Required
        } else {
            InputPolicy::Optional
        };

        let outcome = run_loop(
            &mut agent,
            console,
            Opening::Prompt(question.text),
            policy,
            |turn: &QuestionTurn| turn.finished,
        )?;

        if let Some(turn) = outcome.into_response() {
            answers.push(Answer {
                question: question.text.to_string(),
                answer: turn.user_description,
            });
        }
    }

    Ok(answers)
}

/// `Q: ...\nA: ...` blocks separated by a blank line
pub fn format_answers(answers: &[Answer]) -> String {
    answers
        .iter()
        .map(|a| format!("Q: {}\nA: {}", a.question, a.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::ScriptedConsole;
    use crate::error::WizardError;
    use crate::llm::StructuredRequest;
    use serde_json::{json, Value};
    use std::cell::RefCell;

    struct Replies(RefCell<Vec<Value>>);

    impl ChatModel for Replies {
        fn complete(&self, request: StructuredRequest<'_>) -> Result<Value> {
            assert_eq!(request.schema_name, "question_response");
            let mut replies = self.0.borrow_mut();
            if replies.is_empty() {
                return Err(WizardError::protocol("no more replies"));
            }
            Ok(replies.remove(0))
        }
    }

    #[test]
    fn test_format_answers() {
        let answers = vec![
            Answer {
                question: "¿Qué vendes?".to_string(),
                answer: "Motos".to_string(),
            },
            Answer {
                question: "¿Dónde?".to_string(),
                answer: "Supía".to_string(),
            },
        ];
        assert_eq!(
            format_answers(&answers),
            "Q: ¿Qué vendes?\nA: Motos\n\nQ: ¿Dónde?\nA: Supía"
        );
        assert_eq!(format_answers(&[]), "");
    }

    #[test]
    fn test_basic_questions_are_all_required() {
        assert_eq!(BASIC_QUESTIONS.len(), 10);
        assert!(BASIC_QUESTIONS.iter().all(|q| q.required));
    }

    #[test]
    fn test_ask_questions_collects_confirmed_descriptions() {
        let model = Replies(RefCell::new(vec![
            json!({"user_description": "Concesionario Yamaha", "bot_response": "¿Correcto?", "finished": false}),
            json!({"user_description": "Concesionario Yamaha en Caldas", "bot_response": "Siguiente", "finished": true}),
            json!({"user_description": "Amigable", "bot_response": "Listo", "finished": true}),
        ]));
        let mut console = ScriptedConsole::new(["Concesionario", "y en Caldas, sí", "", "Amigable"]);
        let questions = [
            Question::required("¿Describe tu negocio?"),
            Question::optional("¿Algo más?"),
            Question::required("¿Tono?"),
        ];

        let answers = ask_questions(&model, &mut console, &questions).unwrap();

        assert_eq!(
            answers,
            vec![
                Answer {
                    question: "¿Describe tu negocio?".to_string(),
                    answer: "Concesionario Yamaha en Caldas".to_string(),
                },
                Answer {
                    question: "¿Tono?".to_string(),
                    answer: "Amigable".to_string(),
                },
            ]
        );
        assert!(console.shown().contains(&"¿Algo más?".to_string()));
    }
}
