use dioxus::prelude::*;
use tracing::{debug, warn};

use services::{FetchRequest, GuessSession, SessionPhase};

use crate::context::AppContext;
use crate::vm::{ERROR_MESSAGE, GuessIntent, GuessVm, apply_intent};
use super::beast_image::BeastImage;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[component]
pub fn GuesserView() -> Element {
    let ctx = use_context::<AppContext>();
    let guess_loop = ctx.guess_loop();

    let mut session = use_signal({
        let guess_loop = guess_loop.clone();
        let roster = ctx.roster();
        move || match guess_loop.new_session(roster) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(error = %err, "could not start guess session");
                None
            }
        }
    });

    // Each request resolves in its own task so current and next land independently.
    let run_fetches = use_callback(move |requests: Vec<FetchRequest>| {
        for request in requests {
            let guess_loop = guess_loop.clone();
            spawn(async move {
                let mut session = session;
                let outcome = guess_loop.resolve(&request).await;
                if let Some(active) = session.write().as_mut() {
                    let completion = active.complete(request.ticket, outcome);
                    debug!(?completion, slot = ?request.slot(), "fetch settled");
                }
            });
        }
    });

    use_hook(move || {
        let requests = session.write().as_mut().map(GuessSession::initialize);
        if let Some(requests) = requests {
            run_fetches.call(requests);
        }
    });

    use_drop(move || {
        if let Ok(mut session) = session.try_write() {
            if let Some(active) = session.as_mut() {
                active.teardown();
            }
        }
    });

    let dispatch_intent = use_callback(move |intent: GuessIntent| {
        let result = session
            .write()
            .as_mut()
            .map(|active| apply_intent(active, intent));
        match result {
            Some(Ok(requests)) => run_fetches.call(requests),
            Some(Err(err)) => debug!(error = %err, "intent ignored"),
            None => {}
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<GuesserTestHandles>() {
                handles.register(dispatch_intent);
            }
        }
    }

    let guard = session.read();
    let vm = guard.as_ref().map_or_else(GuessVm::failed, GuessVm::from_session);
    let current = guard.as_ref().and_then(|active| {
        let loaded = active.current()?;
        Some((loaded.name.clone(), loaded.handle, active.image(loaded.handle)?))
    });
    drop(guard);
    let hidden = vm.hidden();

    let body = match (vm.phase, current) {
        (SessionPhase::Errored, _) => rsx! {
            p { class: "guesser-error", "{ERROR_MESSAGE}" }
        },
        (SessionPhase::Loading, _) | (_, None) => rsx! {},
        (SessionPhase::Guessing, Some((_, handle, image))) => rsx! {
            BeastImage { handle, image, hidden }
            form {
                class: "guess-form",
                onsubmit: move |evt| {
                    evt.prevent_default();
                    dispatch_intent.call(GuessIntent::Submit);
                },
                input {
                    class: "guess-input",
                    value: "{vm.guess_text}",
                    placeholder: "Enter your guess",
                    required: true,
                    oninput: move |evt| dispatch_intent.call(GuessIntent::Edit(evt.value())),
                }
                input { class: "button", r#type: "submit", value: "Guess" }
            }
        },
        (SessionPhase::Revealed, Some((name, handle, image))) => {
            let actual = GuessVm::actual_label(&name);
            let guess = vm.guess_label();
            rsx! {
                BeastImage { handle, image, hidden }
                div {
                    p { "{actual}" }
                    p { "{guess}" }
                    div { class: "centered",
                        button {
                            class: "button",
                            onclick: move |_| dispatch_intent.call(GuessIntent::Next),
                            "Next"
                        }
                    }
                }
            }
        }
    };

    rsx! {
        div { class: "guesser", {body} }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct GuesserTestHandles {
    dispatch: Rc<RefCell<Option<Callback<GuessIntent>>>>,
}

#[cfg(test)]
impl GuesserTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<GuessIntent>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
    }

    pub(crate) fn dispatch(&self) -> Callback<GuessIntent> {
        (*self.dispatch.borrow()).expect("guesser dispatch registered")
    }
}
