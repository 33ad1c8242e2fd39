//! Tests for [`dialogs::AccessRequestDialog`] run through the dialog runtime.
//!
//! Covers: the full prompt scenario, skipping prompts for supplied fields, the five acknowledgements,
//! finalize truthiness, choice retries, and the help/cancel interruptions.

mod common;

use bot_core::{DialogTurnStatus, InputHint};
use common::{message_turn, RecordingAdapter};
use dialogs::access::{
    CANCEL_MESSAGE, HELP_MESSAGE, PROJECT_ID_PROMPT, REQUEST_TYPE_PROMPT, REQUEST_TYPE_RETRY,
    VERIFYING_MESSAGE,
};
use dialogs::{
    AccessRequestDialog, DialogInstance, DialogRuntime, DialogSet, DialogState, Prompt,
    RequestType, ACCESS_REQUEST_DIALOG_ID,
};
use serde_json::{json, Value};
use std::sync::Arc;

fn access_runtime() -> DialogRuntime {
    let dialogs = DialogSet::new(ACCESS_REQUEST_DIALOG_ID)
        .add(Arc::new(AccessRequestDialog::new()))
        .unwrap();
    DialogRuntime::new(dialogs).unwrap()
}

/// State with the access dialog already active at `step_index` and no pending prompt.
fn seeded_state(step_index: usize, options: Value) -> DialogState {
    let mut instance = DialogInstance::new(ACCESS_REQUEST_DIALOG_ID, options);
    instance.step_index = step_index;
    DialogState {
        stack: vec![instance],
    }
}

/// **Test: Empty context prompts for both fields and ends with the collected context.**
///
/// **Setup:** Access dialog as root, empty state, console channel.
///
/// **Action:** Turns "hi", "PRJ-42", "tracker".
///
/// **Expected:** Project id prompt, inline choice list, then acknowledgement plus verification;
/// the turn completes with `{cust_project_id:"PRJ-42", request_type:"Tracker"}`.
#[tokio::test]
async fn test_full_scenario_collects_context() {
    let runtime = access_runtime();
    let adapter = RecordingAdapter::new();
    let mut state = DialogState::default();

    let result = runtime
        .run_turn(&message_turn(&adapter, "hi", "console"), &mut state)
        .await
        .unwrap();
    assert_eq!(result.status, DialogTurnStatus::Waiting);
    let sent = adapter.take();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text(), PROJECT_ID_PROMPT);
    assert_eq!(sent[0].input_hint, Some(InputHint::ExpectingInput));

    let result = runtime
        .run_turn(&message_turn(&adapter, "PRJ-42", "console"), &mut state)
        .await
        .unwrap();
    assert_eq!(result.status, DialogTurnStatus::Waiting);
    assert_eq!(
        adapter.take_texts(),
        vec![format!(
            "{} (1) Report, (2) Tracker, (3) Report Status, (4) Tracker Status, or (5) Revalidation",
            REQUEST_TYPE_PROMPT
        )]
    );

    let result = runtime
        .run_turn(&message_turn(&adapter, "tracker", "console"), &mut state)
        .await
        .unwrap();
    assert_eq!(result.status, DialogTurnStatus::Complete);
    assert_eq!(
        adapter.take_texts(),
        vec![
            RequestType::AccessTracker.acknowledgement().to_string(),
            VERIFYING_MESSAGE.to_string()
        ]
    );
    assert_eq!(
        result.result,
        Some(json!({"cust_project_id": "PRJ-42", "request_type": "Tracker"}))
    );
    assert!(state.is_empty());
}

/// **Test: A supplied project id is passed through without prompting.**
#[tokio::test]
async fn test_project_id_present_skips_prompt() {
    let runtime = access_runtime();
    let adapter = RecordingAdapter::new();
    let mut state = seeded_state(0, json!({"cust_project_id": "PRJ-7"}));

    let result = runtime
        .run_turn(&message_turn(&adapter, "go", "console"), &mut state)
        .await
        .unwrap();

    assert_eq!(result.status, DialogTurnStatus::Waiting);
    let texts = adapter.take_texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with(REQUEST_TYPE_PROMPT));
    assert_eq!(state.stack[0].options["cust_project_id"], "PRJ-7");
    assert_eq!(state.stack[0].step_index, 1);
}

/// **Test: Every request type yields exactly its acknowledgement plus the verification message.**
#[tokio::test]
async fn test_each_request_type_acknowledged() {
    for request_type in RequestType::ALL {
        let runtime = access_runtime();
        let adapter = RecordingAdapter::new();
        let mut state = seeded_state(
            0,
            json!({"cust_project_id": "PRJ-1", "request_type": request_type.as_str()}),
        );

        let result = runtime
            .run_turn(&message_turn(&adapter, "go", "console"), &mut state)
            .await
            .unwrap();

        assert_eq!(result.status, DialogTurnStatus::Complete, "{:?}", request_type);
        assert_eq!(
            adapter.take_texts(),
            vec![
                request_type.acknowledgement().to_string(),
                VERIFYING_MESSAGE.to_string()
            ]
        );
        assert_eq!(
            result.result,
            Some(json!({"cust_project_id": "PRJ-1", "request_type": request_type.as_str()}))
        );
    }
}

/// **Test: An unrecognized request type sends only the verification message.**
///
/// **Setup:** Dialog resumed at the dispatch step with input "Weather".
///
/// **Expected:** Only the verification message; the value is truthy so the dialog still returns its context.
#[tokio::test]
async fn test_unrecognized_request_type_only_verifies() {
    let runtime = access_runtime();
    let adapter = RecordingAdapter::new();
    let mut state = seeded_state(2, json!({"cust_project_id": "PRJ-1"}));

    let result = runtime
        .run_turn(&message_turn(&adapter, "Weather", "console"), &mut state)
        .await
        .unwrap();

    assert_eq!(adapter.take_texts(), vec![VERIFYING_MESSAGE.to_string()]);
    assert_eq!(
        result.result,
        Some(json!({"cust_project_id": "PRJ-1", "request_type": null}))
    );
}

/// **Test: Finalize with a falsy result ends the dialog without a value.**
#[tokio::test]
async fn test_finalize_falsy_returns_nothing() {
    let runtime = access_runtime();
    let adapter = RecordingAdapter::new();
    let mut state = seeded_state(3, json!({"cust_project_id": "PRJ-1", "request_type": "Report"}));

    let result = runtime
        .run_turn(&message_turn(&adapter, "", "console"), &mut state)
        .await
        .unwrap();

    assert_eq!(result.status, DialogTurnStatus::Complete);
    assert_eq!(result.result, None);
    assert!(adapter.sent().is_empty());
}

/// **Test: Blank text at the project id prompt re-sends the prompt.**
#[tokio::test]
async fn test_blank_project_id_reprompts() {
    let runtime = access_runtime();
    let adapter = RecordingAdapter::new();
    let mut state = DialogState::default();
    runtime
        .run_turn(&message_turn(&adapter, "hi", "console"), &mut state)
        .await
        .unwrap();
    adapter.take();

    let result = runtime
        .run_turn(&message_turn(&adapter, "   ", "console"), &mut state)
        .await
        .unwrap();

    assert_eq!(result.status, DialogTurnStatus::Waiting);
    assert_eq!(adapter.take_texts(), vec![PROJECT_ID_PROMPT.to_string()]);
    assert_eq!(state.stack[0].step_index, 0);
}

/// **Test: Unknown choice re-prompts with the retry text; a number then selects by position.**
#[tokio::test]
async fn test_choice_retry_then_number() {
    let runtime = access_runtime();
    let adapter = RecordingAdapter::new();
    let mut state = seeded_state(0, json!({"cust_project_id": "PRJ-9"}));
    runtime
        .run_turn(&message_turn(&adapter, "go", "console"), &mut state)
        .await
        .unwrap();
    adapter.take();

    let result = runtime
        .run_turn(&message_turn(&adapter, "something else", "console"), &mut state)
        .await
        .unwrap();
    assert_eq!(result.status, DialogTurnStatus::Waiting);
    let texts = adapter.take_texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with(REQUEST_TYPE_RETRY));

    let result = runtime
        .run_turn(&message_turn(&adapter, "5", "console"), &mut state)
        .await
        .unwrap();
    assert_eq!(result.status, DialogTurnStatus::Complete);
    assert_eq!(
        result.result,
        Some(json!({"cust_project_id": "PRJ-9", "request_type": "Revalidation"}))
    );
}

/// **Test: Choice prompt on the emulator carries imBack suggested actions.**
#[tokio::test]
async fn test_choice_prompt_on_emulator_uses_suggested_actions() {
    let runtime = access_runtime();
    let adapter = RecordingAdapter::new();
    let mut state = seeded_state(0, json!({"cust_project_id": "PRJ-9"}));

    runtime
        .run_turn(&message_turn(&adapter, "go", "emulator"), &mut state)
        .await
        .unwrap();

    let sent = adapter.take();
    assert_eq!(sent[0].text(), REQUEST_TYPE_PROMPT);
    let actions = sent[0].suggested_actions.clone().unwrap().actions;
    let titles: Vec<&str> = actions.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Report", "Tracker", "Report Status", "Tracker Status", "Revalidation"]
    );
}

/// **Test: "help" at a prompt shows help and keeps the same prompt pending.**
#[tokio::test]
async fn test_help_keeps_waiting() {
    let runtime = access_runtime();
    let adapter = RecordingAdapter::new();
    let mut state = DialogState::default();
    runtime
        .run_turn(&message_turn(&adapter, "hi", "console"), &mut state)
        .await
        .unwrap();
    adapter.take();

    let result = runtime
        .run_turn(&message_turn(&adapter, " HELP ", "console"), &mut state)
        .await
        .unwrap();

    assert_eq!(result.status, DialogTurnStatus::Waiting);
    let sent = adapter.take();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text(), HELP_MESSAGE);
    assert_eq!(sent[0].input_hint, Some(InputHint::IgnoringInput));
    assert_eq!(
        state.stack[0].pending_prompt,
        Some(Prompt::text(PROJECT_ID_PROMPT))
    );

    runtime
        .run_turn(&message_turn(&adapter, "PRJ-5", "console"), &mut state)
        .await
        .unwrap();
    assert!(adapter.take_texts()[0].starts_with(REQUEST_TYPE_PROMPT));
}

/// **Test: "cancel" clears the dialog stack and reports Cancelled.**
#[tokio::test]
async fn test_cancel_clears_stack() {
    let runtime = access_runtime();
    let adapter = RecordingAdapter::new();
    let mut state = DialogState::default();
    runtime
        .run_turn(&message_turn(&adapter, "hi", "console"), &mut state)
        .await
        .unwrap();
    adapter.take();

    let result = runtime
        .run_turn(&message_turn(&adapter, "cancel", "console"), &mut state)
        .await
        .unwrap();

    assert_eq!(result.status, DialogTurnStatus::Cancelled);
    assert_eq!(adapter.take_texts(), vec![CANCEL_MESSAGE.to_string()]);
    assert!(state.is_empty());
}
