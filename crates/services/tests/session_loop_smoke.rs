use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use beast_core::model::{Roster, RosterEntry};
use image::{ImageFormat, Rgba, RgbaImage};
use services::{
    AssetSource, Completion, FetchError, GuessLoopService, SequenceChooser, SessionPhase, Slot,
    fetch_image_route,
};

/// In-memory asset source: every route answers with a tiny PNG unless it has
/// been told to fail with a status.
#[derive(Default)]
struct FakeSource {
    failures: Mutex<HashMap<String, u16>>,
    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    fn fail(&self, image_path: &str, status: u16) {
        self.failures
            .lock()
            .unwrap()
            .insert(fetch_image_route(image_path), status);
    }

    fn heal(&self, image_path: &str) {
        self.failures.lock().unwrap().remove(&fetch_image_route(image_path));
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetSource for FakeSource {
    async fn fetch(&self, route: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.lock().unwrap().push(route.to_string());
        if let Some(status) = self.failures.lock().unwrap().get(route) {
            return Err(FetchError::HttpStatus(*status));
        }
        let mut bytes = Vec::new();
        RgbaImage::from_pixel(6, 3, Rgba([200, 40, 40, 255]))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        Ok(bytes)
    }
}

fn roster() -> Arc<Roster> {
    Arc::new(
        Roster::new(vec![
            RosterEntry::new("A", "/a.png"),
            RosterEntry::new("B", "/b.png"),
        ])
        .unwrap(),
    )
}

fn service(source: &Arc<FakeSource>, indices: &[usize]) -> GuessLoopService {
    let source: Arc<dyn AssetSource> = source.clone();
    GuessLoopService::new(source).with_chooser(Arc::new(SequenceChooser::new(indices.to_vec())))
}

#[tokio::test]
async fn pinned_guess_and_advance() {
    let source = Arc::new(FakeSource::default());
    let guess_loop = service(&source, &[0, 1, 0]);

    let (mut session, requests) = guess_loop.start_session(roster()).unwrap();
    guess_loop.settle(&mut session, requests).await;
    assert_eq!(session.phase(), SessionPhase::Guessing);
    assert_eq!(session.current().unwrap().name, "A");
    assert_eq!(session.next().unwrap().name, "B");

    session.submit_guess("B").unwrap();
    assert_eq!(session.phase(), SessionPhase::Revealed);
    assert_eq!(session.guess_text(), "B");

    let requests = session.advance().unwrap();
    assert_eq!(session.phase(), SessionPhase::Guessing);
    assert_eq!(session.current().unwrap().name, "B");
    assert!(session.next().is_none());
    assert_eq!(session.guess_text(), "");

    let completions = guess_loop.settle(&mut session, requests).await;
    assert!(matches!(completions[..], [Completion::Installed { slot: Slot::Next, .. }]));
    assert_eq!(session.next().unwrap().name, "A");
    assert_eq!(session.live_handles(), 2);
}

#[tokio::test]
async fn next_resolved_first_still_reaches_guessing() {
    let source = Arc::new(FakeSource::default());
    let guess_loop = service(&source, &[0, 1]);

    let (mut session, requests) = guess_loop.start_session(roster()).unwrap();
    let (current, next) = (&requests[0], &requests[1]);
    assert_eq!(current.slot(), Slot::Current);
    assert_eq!(next.slot(), Slot::Next);

    let outcome = guess_loop.resolve(next).await;
    let completion = session.complete(next.ticket, outcome);
    assert!(matches!(completion, Completion::Installed { slot: Slot::Next, .. }));
    assert_eq!(session.phase(), SessionPhase::Loading);
    assert_eq!(session.next().unwrap().name, "B");

    let outcome = guess_loop.resolve(current).await;
    session.complete(current.ticket, outcome);
    assert_eq!(session.phase(), SessionPhase::Guessing);
    assert_eq!(session.current().unwrap().name, "A");
    assert_eq!(session.next().unwrap().name, "B");
    assert_eq!(source.calls(), vec![fetch_image_route("/b.png"), fetch_image_route("/a.png")]);
}

#[tokio::test]
async fn current_not_found_errors_without_more_fetches() {
    let source = Arc::new(FakeSource::default());
    source.fail("/a.png", 404);
    let guess_loop = service(&source, &[0, 1]);

    let (mut session, requests) = guess_loop.start_session(roster()).unwrap();
    let current = requests[0].clone();
    let outcome = guess_loop.resolve(&current).await;
    assert_eq!(session.complete(current.ticket, outcome), Completion::Errored);
    assert_eq!(session.phase(), SessionPhase::Errored);

    let late = guess_loop.settle(&mut session, requests[1..].to_vec()).await;
    assert!(matches!(late[..], [Completion::Dropped(_)]));
    assert_eq!(session.phase(), SessionPhase::Errored);
    assert!(session.advance().is_err());
    assert_eq!(source.calls().len(), 2);
    assert_eq!(session.live_handles(), 0);
}

#[tokio::test]
async fn failed_prefetch_triggers_fresh_current_fetch() {
    let source = Arc::new(FakeSource::default());
    source.fail("/b.png", 500);
    let guess_loop = service(&source, &[0, 1, 1, 0]);

    let (mut session, requests) = guess_loop.start_session(roster()).unwrap();
    let completions = guess_loop.settle(&mut session, requests).await;
    assert_eq!(completions[1], Completion::NextDiscarded);
    assert_eq!(session.phase(), SessionPhase::Guessing);
    assert!(session.next().is_none());

    session.submit_guess("A").unwrap();
    source.heal("/b.png");
    let requests = session.advance().unwrap();
    assert_eq!(session.phase(), SessionPhase::Loading);
    assert_eq!(requests[0].slot(), Slot::Current);
    assert_eq!(requests[0].name, "B");

    guess_loop.settle(&mut session, requests).await;
    assert_eq!(session.phase(), SessionPhase::Guessing);
    assert_eq!(session.current().unwrap().name, "B");
    assert_eq!(session.next().unwrap().name, "A");
}

#[tokio::test]
async fn handles_are_released_across_many_rounds() {
    let source = Arc::new(FakeSource::default());
    let guess_loop = service(&source, &[0, 1]);

    let (mut session, requests) = guess_loop.start_session(roster()).unwrap();
    guess_loop.settle(&mut session, requests).await;
    for round in 0..20 {
        session.submit_guess(&format!("guess {round}")).unwrap();
        let requests = session.advance().unwrap();
        guess_loop.settle(&mut session, requests).await;
        assert_eq!(session.live_handles(), 2);
    }

    session.teardown();
    assert_eq!(session.live_handles(), 0);
}

#[tokio::test]
async fn teardown_suppresses_in_flight_advance_fetches() {
    let source = Arc::new(FakeSource::default());
    let guess_loop = service(&source, &[0, 1]);

    let (mut session, requests) = guess_loop.start_session(roster()).unwrap();
    guess_loop.settle(&mut session, requests).await;
    session.submit_guess("A").unwrap();
    let in_flight = session.advance().unwrap();

    session.teardown();
    let completions = guess_loop.settle(&mut session, in_flight).await;
    assert!(completions.iter().all(|c| matches!(c, Completion::Dropped(_))));
    assert_eq!(session.live_handles(), 0);
    assert_eq!(session.phase(), SessionPhase::Loading);
}
