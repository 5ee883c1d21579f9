use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use dioxus::document::eval;
use dioxus::prelude::*;
use serde::Deserialize;
use tracing::warn;

use beast_core::model::ImageHandle;
use beast_core::render::{Canvas, SourceImage};

use crate::context::AppContext;
use crate::vm::render_frame;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DisplayMetrics {
    device_pixel_ratio: f64,
}

/// Device pixel ratio of the webview, or 1.0 when it cannot be queried.
pub async fn device_pixel_ratio() -> f64 {
    eval("return { devicePixelRatio: window.devicePixelRatio };")
        .join::<DisplayMetrics>()
        .await
        .map_or(1.0, |metrics| metrics.device_pixel_ratio)
}

#[derive(Props, Clone)]
pub struct BeastImageProps {
    pub handle: ImageHandle,
    pub image: Arc<SourceImage>,
    pub hidden: bool,
}

// Handles are never reused, so they identify the pixels.
impl PartialEq for BeastImageProps {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle && self.hidden == other.hidden
    }
}

/// Draws a creature into a persistent canvas and shows the frame at the
/// viewport's logical size.
#[component]
pub fn BeastImage(props: BeastImageProps) -> Element {
    let ctx = use_context::<AppContext>();
    let viewport = ctx.viewport();
    let side = viewport.side;
    let canvas = use_hook(|| Rc::new(RefCell::new(Canvas::new(viewport))));
    let dpr = use_resource(device_pixel_ratio);
    let scale = dpr.value().read().as_ref().copied().unwrap_or(1.0);

    let frame = render_frame(&mut canvas.borrow_mut(), scale, &props.image, props.hidden);
    let class = if props.hidden {
        "beast-image beast-image--hidden"
    } else {
        "beast-image"
    };
    match frame {
        Ok(src) => rsx! {
            img {
                class,
                src,
                alt: "",
                width: "{side}",
                height: "{side}",
                style: "width: {side}px; height: {side}px;",
            }
        },
        Err(err) => {
            warn!(error = %err, handle = %props.handle, "failed to render frame");
            rsx! {
                div { class: "beast-image beast-image--empty" }
            }
        }
    }
}
