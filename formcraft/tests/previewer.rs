//! Integration tests for the previewer

use formcraft::{
    FormComposer, ImageUri, Navigation, Notification, PreviewState, QuestionType,
    QuestionUpdate, SaveError, TestPicker, TestSubmitter,
};
use serde_json::json;

fn composed(header: bool) -> FormComposer {
    let mut composer = FormComposer::new();
    let id = composer.add_question(QuestionType::Grid);
    composer.update_question(id, QuestionUpdate::Text("Pick one".into()));
    composer.add_option(id);
    composer.update_option(id, 0, "Left").unwrap();
    if header {
        composer.pick_header_image(&TestPicker::new().with_image("file:///header.png"));
    }
    composer
}

#[test]
fn empty_questions_fail_validation_without_network() {
    let mut composer = FormComposer::new();
    composer.set_header_image(Some(ImageUri::new("file:///header.png")));
    let submitter = TestSubmitter::new();

    let result = composer.request_preview().save(&submitter);

    assert!(matches!(result, Err(SaveError::Validation(_))));
    assert_eq!(submitter.call_count(), 0);
    assert_eq!(
        Notification::from_result(&result).title,
        "Validation Error"
    );
}

#[test]
fn missing_header_fails_validation_without_network() {
    let submitter = TestSubmitter::new();

    let result = composed(false).request_preview().save(&submitter);

    assert!(matches!(result, Err(SaveError::Validation(_))));
    assert_eq!(submitter.call_count(), 0);
}

#[test]
fn empty_question_text_is_still_valid() {
    let mut composer = FormComposer::new();
    composer.add_question(QuestionType::Text);
    composer.set_header_image(Some(ImageUri::new("file:///header.png")));
    let submitter = TestSubmitter::new();

    assert!(composer.request_preview().save(&submitter).is_ok());
    assert_eq!(submitter.call_count(), 1);
}

#[test]
fn success_sends_exact_snapshot_and_navigates_back() {
    let composer = composed(true);
    let id = composer.questions()[0].id().get();
    let submitter = TestSubmitter::new().with_success(json!({ "id": 1 }));
    let mut previewer = composer.request_preview();

    let result = previewer.save(&submitter);

    assert_eq!(result.as_ref().unwrap().response, json!({ "id": 1 }));
    assert_eq!(Notification::from_result(&result), Notification::saved());
    assert_eq!(Navigation::after(&result), Navigation::Back);
    assert_eq!(previewer.state(), PreviewState::Saved);
    assert_eq!(
        submitter.submissions(),
        vec![json!({
            "questions": [{
                "id": id,
                "type": "Grid",
                "text": "Pick one",
                "options": ["Left"],
                "image": null,
            }],
            "headerImage": "file:///header.png",
        })]
    );
}

#[test]
fn rejection_surfaces_server_message_and_stays() {
    let submitter = TestSubmitter::new().with_rejection(400, Some("bad image url"));
    let mut previewer = composed(true).request_preview();

    let result = previewer.save(&submitter);

    let alert = Notification::from_result(&result);
    assert_eq!(alert.title, "Error");
    assert_eq!(alert.message, "bad image url");
    assert_eq!(Navigation::after(&result), Navigation::Stay);
    assert_eq!(previewer.state(), PreviewState::Failed);
}

#[test]
fn rejection_without_message_uses_fallback() {
    let submitter = TestSubmitter::new().with_rejection(500, None);

    let result = composed(true).request_preview().save(&submitter);

    assert_eq!(
        Notification::from_result(&result).message,
        "Failed to save form."
    );
}

#[test]
fn transport_failure_allows_identical_retry() {
    let submitter = TestSubmitter::new()
        .with_transport_failure("connection refused")
        .with_success(json!({ "id": 2 }));
    let mut previewer = composed(true).request_preview();

    let first = previewer.save(&submitter);
    assert_eq!(
        Notification::from_result(&first).message,
        "An error occurred while saving the form."
    );
    assert_eq!(Navigation::after(&first), Navigation::Stay);
    assert_eq!(previewer.state(), PreviewState::Failed);

    let second = previewer.save(&submitter);
    assert!(second.is_ok());

    let bodies = submitter.submissions();
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0], bodies[1]);
}
