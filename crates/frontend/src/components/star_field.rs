//! Full-viewport star streak canvas

use crate::session::use_config;
use gloo::events::EventListener;
use rand::SeedableRng;
use rand::rngs::StdRng;
use secure_auth_core::starfield::{StarField, Streak, StreakColor, Surface, Viewport};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

/// Decorative background behind every page
#[function_component(StarFieldCanvas)]
pub fn star_field_canvas() -> Html {
    let config = use_config();
    let canvas_ref = use_node_ref();

    {
        let canvas_ref = canvas_ref.clone();
        use_effect_with(config.star_count, move |&count| {
            let animation = canvas_ref
                .cast::<HtmlCanvasElement>()
                .and_then(|canvas| Animation::start(canvas, count));

            move || drop(animation)
        });
    }

    html! {
        <canvas
            ref={canvas_ref}
            class="fixed inset-0 w-full h-full pointer-events-none z-0"
            aria-hidden="true"
        />
    }
}

struct CanvasSurface {
    context: CanvasRenderingContext2d,
}

impl Surface for CanvasSurface {
    fn clear(&mut self, viewport: Viewport) {
        self.context
            .clear_rect(0.0, 0.0, viewport.width, viewport.height);
    }

    fn stroke(&mut self, streak: Streak, color: StreakColor, opacity: f64) {
        let context = &self.context;
        context.set_global_alpha(opacity);
        context.set_stroke_style_str(color.css());
        context.set_line_width(1.0);
        context.begin_path();
        context.move_to(streak.from.0, streak.from.1);
        context.line_to(streak.to.0, streak.to.1);
        context.stroke();
    }
}

struct Scene {
    canvas: HtmlCanvasElement,
    surface: CanvasSurface,
    field: StarField<StdRng>,
}

impl Scene {
    /// Match the canvas backing store to the window
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn fit(&mut self) {
        let viewport = window_viewport();
        self.canvas.set_width(viewport.width as u32);
        self.canvas.set_height(viewport.height as u32);
        self.field.resize(viewport);
    }

    fn draw(&mut self) {
        self.field.step(&mut self.surface);
    }
}

/// A running animation. Dropping it cancels the pending frame and removes
/// the resize listener.
struct Animation {
    frame: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    _resize: EventListener,
}

impl Animation {
    fn start(canvas: HtmlCanvasElement, count: usize) -> Option<Self> {
        let Some(context) = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|context| context.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            tracing::warn!("Canvas 2d context unavailable, star field disabled");
            return None;
        };
        let window = web_sys::window()?;

        let field = StarField::with_count(window_viewport(), count, StdRng::seed_from_u64(seed()));
        let mut scene = Scene {
            canvas,
            surface: CanvasSurface { context },
            field,
        };
        scene.fit();
        let scene = Rc::new(RefCell::new(scene));

        let resize = {
            let scene = scene.clone();
            EventListener::new(&window, "resize", move |_| scene.borrow_mut().fit())
        };

        let frame = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        {
            let next = callback.clone();
            let frame = frame.clone();
            *callback.borrow_mut() = Some(Closure::new(move || {
                scene.borrow_mut().draw();
                if let Some(closure) = next.borrow().as_ref() {
                    frame.set(request_frame(closure));
                }
            }));
        }
        frame.set(callback.borrow().as_ref().and_then(request_frame));

        tracing::debug!(count, "Star field animation started");
        Some(Self {
            frame,
            callback,
            _resize: resize,
        })
    }
}

impl Drop for Animation {
    fn drop(&mut self) {
        if let (Some(window), Some(id)) = (web_sys::window(), self.frame.take()) {
            let _ = window.cancel_animation_frame(id);
        }
        // Breaks the closure's reference to itself
        self.callback.borrow_mut().take();
        tracing::debug!("Star field animation stopped");
    }
}

fn request_frame(closure: &Closure<dyn FnMut()>) -> Option<i32> {
    web_sys::window()?
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .ok()
}

fn window_viewport() -> Viewport {
    let Some(window) = web_sys::window() else {
        return Viewport::new(0.0, 0.0);
    };
    let dimension = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        value.ok().and_then(|value| value.as_f64()).unwrap_or(0.0)
    };
    Viewport::new(dimension(window.inner_width()), dimension(window.inner_height()))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn seed() -> u64 {
    let noise = (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64;
    noise ^ (js_sys::Date::now() as u64)
}
