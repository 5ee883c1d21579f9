use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use beast_core::model::{Roster, RosterEntry};
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::Router;
use image::{ImageFormat, Rgba, RgbaImage};
use services::{
    AssetSource, FetchError, GuessLoopService, SequenceChooser, fetch_image_route,
};

use crate::context::{UiApp, build_app_context};
use crate::routes::Route;
use crate::vm::GuessIntent;
use super::guesser::GuesserTestHandles;

/// Serves a small opaque PNG for every route except the ones told to fail.
#[derive(Default)]
pub struct ScriptedSource {
    failures: Mutex<HashMap<String, u16>>,
}

impl ScriptedSource {
    pub fn failing(image_path: &str, status: u16) -> Self {
        let source = Self::default();
        source
            .failures
            .lock()
            .unwrap()
            .insert(fetch_image_route(image_path), status);
        source
    }
}

#[async_trait]
impl AssetSource for ScriptedSource {
    async fn fetch(&self, route: &str) -> Result<Vec<u8>, FetchError> {
        if let Some(status) = self.failures.lock().unwrap().get(route) {
            return Err(FetchError::HttpStatus(*status));
        }
        let mut bytes = Vec::new();
        RgbaImage::from_pixel(8, 4, Rgba([90, 160, 220, 255]))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        Ok(bytes)
    }
}

struct TestApp {
    roster: Arc<Roster>,
    guess_loop: Arc<GuessLoopService>,
}

impl UiApp for TestApp {
    fn roster(&self) -> Arc<Roster> {
        Arc::clone(&self.roster)
    }

    fn guess_loop(&self) -> Arc<GuessLoopService> {
        Arc::clone(&self.guess_loop)
    }
}

#[derive(Props, Clone)]
struct HarnessProps {
    app: Arc<TestApp>,
    handles: GuesserTestHandles,
}

impl PartialEq for HarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn GuesserHarness(props: HarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { Router::<Route> {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub handles: GuesserTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Runs an intent through the registered dispatcher inside the dom's runtime.
    pub fn dispatch(&mut self, intent: GuessIntent) {
        let dispatch = self.handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
        drive_dom(&mut self.dom);
    }

    /// Drives until outstanding fetch tasks have had a chance to land.
    pub async fn settle(&mut self) {
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn two_beast_roster() -> Arc<Roster> {
    Arc::new(
        Roster::new(vec![
            RosterEntry::new("Springheel", "/images/3/3c/Springheel.png"),
            RosterEntry::new("Candevil", "/images/1/12/Candevil.png"),
        ])
        .unwrap(),
    )
}

pub fn setup_guesser_harness(source: ScriptedSource, indices: &[usize]) -> ViewHarness {
    let source: Arc<dyn AssetSource> = Arc::new(source);
    let guess_loop = GuessLoopService::new(source)
        .with_chooser(Arc::new(SequenceChooser::new(indices.to_vec())));
    let app = Arc::new(TestApp {
        roster: two_beast_roster(),
        guess_loop: Arc::new(guess_loop),
    });
    let handles = GuesserTestHandles::default();
    let dom = VirtualDom::new_with_props(
        GuesserHarness,
        HarnessProps {
            app,
            handles: handles.clone(),
        },
    );
    ViewHarness { dom, handles }
}
