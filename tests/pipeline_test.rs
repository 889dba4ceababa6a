use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

use quizdoc::generation::{GenerationError, TextGenerator};
use quizdoc::pipeline::QuizPipeline;
use quizdoc::prompt::{DEFAULT_QUESTIONS, QUESTION_TYPES, QuizRequest};
use quizdoc::{AnswerLabel, DocStyle, NoIllustrations, QuizError, RenderOptions, ValidationError};

const GENERATED_QUIZ: &str = "\
Dưới đây là đề trắc nghiệm:

Câu 1. [Mức độ: Biết] Hàm số nào là hàm số bậc nhất?
A. y = 2x + 1
B. y = x² + 1
C. y = 1/x
D. y = √x
→ Đáp án: A
Giải thích: có dạng y = ax + b với a ≠ 0.
---
Câu 2. [Mức độ: Hiểu] Đồ thị hàm số y = ax + b là một đường thẳng.
→ Đáp án: Đúng
---
Câu 3. [Mức độ: Hiểu] Hệ số góc của y = -3x + 2 là
[HÌNH MINH HỌA] Đồ thị y = -3x + 2
A. 2
B. -3
C. 3
D. -2
→ Đáp án: B
---";

/// Replays a fixed reply and records every prompt it receives
struct Scripted {
    model: &'static str,
    reply: Result<&'static str, GenerationError>,
    prompts: RefCell<Vec<String>>,
    calls: Cell<usize>,
}

impl Scripted {
    fn new(model: &'static str, reply: Result<&'static str, GenerationError>) -> Self {
        Self {
            model,
            reply,
            prompts: RefCell::new(Vec::new()),
            calls: Cell::new(0),
        }
    }
}

impl TextGenerator for Scripted {
    fn model(&self) -> &str {
        self.model
    }

    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.set(self.calls.get() + 1);
        self.prompts.borrow_mut().push(prompt.to_string());
        self.reply.clone().map(str::to_string)
    }
}

fn request() -> QuizRequest {
    QuizRequest {
        objectives: "Nhận biết và vẽ đồ thị hàm số bậc nhất".to_string(),
        source_text: "Hàm số bậc nhất là hàm số được cho bởi công thức y = ax + b, trong đó a, b là các số cho trước và a khác 0. ".repeat(3),
        level_tags: ["Biết", "Hiểu"].into_iter().map(String::from).collect(),
        question_type_tags: [QUESTION_TYPES[0], QUESTION_TYPES[1]]
            .into_iter()
            .map(String::from)
            .collect(),
        question_count: 3,
    }
}

fn pipeline<'a>(
    generator: &'a dyn TextGenerator,
    fallback: Option<&'a dyn TextGenerator>,
    options: &'a RenderOptions,
    style: &'a DocStyle,
) -> QuizPipeline<'a> {
    QuizPipeline {
        generator,
        fallback,
        illustrations: &NoIllustrations,
        options,
        style,
    }
}

#[test]
fn test_end_to_end_request() {
    let generator = Scripted::new("flash", Ok(GENERATED_QUIZ));
    let options = RenderOptions::default();
    let style = DocStyle::default();

    let output = pipeline(&generator, None, &options, &style)
        .run(&request())
        .unwrap();

    assert_eq!(output.raw_text, GENERATED_QUIZ);
    assert_eq!(output.questions.len(), 3);
    assert_eq!(
        output.questions[1].correct_label(),
        Some(AnswerLabel::True)
    );
    assert!(output.questions[2].has_illustration_marker());

    // Question 2 is true/false without options, so only 1 and 3 are emphasised
    assert_eq!(output.rendered.layout.emphasized_count(), 2);
    assert_eq!(
        output
            .rendered
            .preview
            .matches("class=\"option correct\"")
            .count(),
        2
    );
    assert!(output.rendered.preview.contains("illustration-placeholder"));
    assert!(output.rendered.document.starts_with(b"PK"));

    let prompts = generator.prompts.borrow();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Hãy tạo đúng 3 câu hỏi"));
    assert!(prompts[0].contains("Nhận biết và vẽ đồ thị hàm số bậc nhất"));
}

#[test]
fn test_invalid_request_never_reaches_generator() {
    let generator = Scripted::new("flash", Ok(GENERATED_QUIZ));
    let options = RenderOptions::default();
    let style = DocStyle::default();
    let pipeline = pipeline(&generator, None, &options, &style);

    let cases = [
        (
            QuizRequest {
                objectives: "   ".to_string(),
                ..request()
            },
            ValidationError::MissingObjectives,
        ),
        (
            QuizRequest {
                level_tags: BTreeSet::new(),
                ..request()
            },
            ValidationError::NoLevels,
        ),
        (
            QuizRequest {
                question_type_tags: BTreeSet::new(),
                ..request()
            },
            ValidationError::NoQuestionTypes,
        ),
        (
            QuizRequest {
                question_count: 0,
                ..request()
            },
            ValidationError::QuestionCount {
                got: 0,
                min: 1,
                max: 30,
            },
        ),
    ];

    for (bad_request, expected) in cases {
        match pipeline.run(&bad_request) {
            Err(QuizError::Validation(err)) => assert_eq!(err, expected),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    let short_source = QuizRequest {
        source_text: "Quá ngắn".to_string(),
        ..request()
    };
    assert!(matches!(
        pipeline.run(&short_source),
        Err(QuizError::Validation(ValidationError::MissingSource { .. }))
    ));

    assert_eq!(generator.calls.get(), 0);
}

#[test]
fn test_fallback_model_is_tried_once() {
    let primary = Scripted::new("flash", Err(GenerationError::Quota("429".to_string())));
    let fallback = Scripted::new("pro", Ok(GENERATED_QUIZ));
    let options = RenderOptions::default();
    let style = DocStyle::default();

    let output = pipeline(&primary, Some(&fallback), &options, &style)
        .run(&request())
        .unwrap();

    assert_eq!(output.questions.len(), 3);
    assert_eq!(primary.calls.get(), 1);
    assert_eq!(fallback.calls.get(), 1);
    assert_eq!(primary.prompts.borrow()[0], fallback.prompts.borrow()[0]);
}

#[test]
fn test_both_models_failing_is_a_generation_error() {
    let primary = Scripted::new("flash", Err(GenerationError::Network("reset".to_string())));
    let fallback = Scripted::new("pro", Ok(""));
    let options = RenderOptions::default();
    let style = DocStyle::default();

    let err = pipeline(&primary, Some(&fallback), &options, &style)
        .run(&request())
        .unwrap_err();

    match err {
        QuizError::Generation { model, message } => {
            assert_eq!(model, "pro");
            assert!(message.contains("reset"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fallback.calls.get(), 1);
}

#[test]
fn test_requests_are_independent() {
    let generator = Scripted::new("flash", Ok(GENERATED_QUIZ));
    let options = RenderOptions::default();
    let style = DocStyle::default();
    let pipeline = pipeline(&generator, None, &options, &style);

    let first = pipeline.run(&request()).unwrap();
    let second = pipeline
        .run(&QuizRequest {
            question_count: DEFAULT_QUESTIONS,
            ..request()
        })
        .unwrap();

    assert_eq!(first.questions, second.questions);
    assert_eq!(first.rendered.preview, second.rendered.preview);
    assert_eq!(generator.calls.get(), 2);
}
