use crate::vm::{ERROR_MESSAGE, GuessIntent};

use super::test_harness::{ScriptedSource, setup_guesser_harness};

#[tokio::test(flavor = "current_thread")]
async fn shell_renders_title_and_source_link() {
    let mut harness = setup_guesser_harness(ScriptedSource::default(), &[0, 1]);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("that Cassette Beast?"), "missing title in {html}");
    assert!(html.contains("whos-that-cassette-beast"), "missing source link in {html}");
    assert!(!html.contains("Enter your guess"), "form shown before image loaded: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn loaded_image_shows_masked_frame_and_form() {
    let mut harness = setup_guesser_harness(ScriptedSource::default(), &[0, 1]);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("data:image/png;base64,"), "missing frame in {html}");
    assert!(html.contains("beast-image--hidden"), "frame not masked in {html}");
    assert!(html.contains("Enter your guess"), "missing input in {html}");
    assert!(html.contains("Guess"), "missing submit in {html}");
    assert!(!html.contains("Actual:"), "answer leaked in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn guess_reveals_answer_then_next_moves_on() {
    let mut harness = setup_guesser_harness(ScriptedSource::default(), &[0, 1, 0]);
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(GuessIntent::Edit("Candevil".into()));
    harness.dispatch(GuessIntent::Submit);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Actual: Springheel"), "missing answer in {html}");
    assert!(html.contains("Guess: Candevil"), "missing guess in {html}");
    assert!(html.contains("Next"), "missing next button in {html}");
    assert!(html.contains("beast-image"), "missing frame in {html}");
    assert!(!html.contains("beast-image--hidden"), "revealed frame still masked in {html}");

    harness.dispatch(GuessIntent::Next);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Enter your guess"), "expected a fresh round in {html}");
    assert!(html.contains("beast-image--hidden"), "new round not masked in {html}");
    assert!(!html.contains("Actual:"), "answer still shown in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn missing_current_image_shows_error() {
    let source = ScriptedSource::failing("/images/3/3c/Springheel.png", 404);
    let mut harness = setup_guesser_harness(source, &[0, 1]);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains(ERROR_MESSAGE), "missing error text in {html}");
    assert!(!html.contains("Enter your guess"), "form shown after error: {html}");
}
