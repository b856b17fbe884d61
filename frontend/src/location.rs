use std::rc::Rc;

use js_sys::{Object, Reflect};
use shared::{simulate::SIMULATED_INTERVAL, Sample, SimulatedWalk, SourceEvent};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

use crate::browser::{js_error, read_number, read_string};

const ENABLE_HIGH_ACCURACY: bool = true;
const POSITION_TIMEOUT_MS: u32 = 15_000;
const POSITION_MAXIMUM_AGE_MS: u32 = 10_000;

pub type EventHandler = Rc<dyn Fn(SourceEvent)>;

/// A feed of location events that can be started and stopped.
pub trait LocationSource {
    fn start(&mut self, handler: EventHandler) -> Result<(), String>;
    fn stop(&mut self);
}

/// Device position through `navigator.geolocation.watchPosition`.
#[derive(Default)]
pub struct GeolocationSource {
    watch: Option<GeoWatch>,
}

/// Live watch; clearing happens on drop.
struct GeoWatch {
    geolocation: web_sys::Geolocation,
    id: i32,
    _on_position: Closure<dyn FnMut(JsValue)>,
    _on_error: Closure<dyn FnMut(JsValue)>,
}

impl Drop for GeoWatch {
    fn drop(&mut self) {
        self.geolocation.clear_watch(self.id);
    }
}

impl LocationSource for GeolocationSource {
    fn start(&mut self, handler: EventHandler) -> Result<(), String> {
        self.stop();
        let geolocation = geolocation().ok_or_else(|| "Geolocation not supported.".to_string())?;

        let on_sample = Rc::clone(&handler);
        let on_position = Closure::<dyn FnMut(JsValue)>::new(move |position: JsValue| {
            match read_position(&position) {
                Ok(sample) => on_sample(SourceEvent::Sample(sample)),
                Err(err) => web_sys::console::warn_1(
                    &format!("[frontend] dropping location sample: {err}").into(),
                ),
            }
        });
        let on_error = Closure::<dyn FnMut(JsValue)>::new(move |error: JsValue| {
            let message =
                read_string(&error, "message").unwrap_or_else(|| "location unavailable".into());
            handler(SourceEvent::Error(message));
        });

        let id = geolocation
            .watch_position_with_error_callback_and_options(
                on_position.as_ref().unchecked_ref(),
                Some(on_error.as_ref().unchecked_ref()),
                &position_options(),
            )
            .map_err(js_error)?;

        self.watch = Some(GeoWatch {
            geolocation,
            id,
            _on_position: on_position,
            _on_error: on_error,
        });
        Ok(())
    }

    fn stop(&mut self) {
        self.watch = None;
    }
}

fn geolocation() -> Option<web_sys::Geolocation> {
    let navigator = web_sys::window()?.navigator();
    let value = Reflect::get(&navigator, &JsValue::from_str("geolocation")).ok()?;
    if value.is_undefined() || value.is_null() {
        None
    } else {
        Some(value.unchecked_into())
    }
}

fn position_options() -> web_sys::PositionOptions {
    let options = Object::new();
    let _ = Reflect::set(
        &options,
        &"enableHighAccuracy".into(),
        &JsValue::from_bool(ENABLE_HIGH_ACCURACY),
    );
    let _ = Reflect::set(&options, &"timeout".into(), &JsValue::from(POSITION_TIMEOUT_MS));
    let _ = Reflect::set(&options, &"maximumAge".into(), &JsValue::from(POSITION_MAXIMUM_AGE_MS));
    options.unchecked_into()
}

fn read_position(position: &JsValue) -> Result<Sample, String> {
    let coords = Reflect::get(position, &JsValue::from_str("coords")).map_err(js_error)?;
    let lat = read_number(&coords, "latitude").ok_or("position has no latitude")?;
    let lng = read_number(&coords, "longitude").ok_or("position has no longitude")?;
    let speed = read_number(&coords, "speed");
    Sample::from_raw(lat, lng, speed).map_err(|err| err.to_string())
}

/// Synthetic walk driven by `setInterval`, for testing without a GPS fix.
pub struct SimulatedSource {
    walk: SimulatedWalk,
    timer: Option<IntervalTimer>,
}

struct IntervalTimer {
    handle: i32,
    _tick: Closure<dyn FnMut()>,
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.handle);
        }
    }
}

impl SimulatedSource {
    pub fn new(walk: SimulatedWalk) -> Self {
        Self { walk, timer: None }
    }
}

impl LocationSource for SimulatedSource {
    fn start(&mut self, handler: EventHandler) -> Result<(), String> {
        self.stop();
        let window = web_sys::window().ok_or_else(|| "no browser window".to_string())?;

        let mut walk = self.walk.clone();
        let tick = Closure::<dyn FnMut()>::new(move || match walk.next() {
            Some(sample) => handler(SourceEvent::Sample(sample)),
            None => handler(SourceEvent::Ended),
        });
        let handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref(),
                SIMULATED_INTERVAL.as_millis() as i32,
            )
            .map_err(js_error)?;

        self.timer = Some(IntervalTimer { handle, _tick: tick });
        Ok(())
    }

    fn stop(&mut self) {
        self.timer = None;
    }
}

/// Simulated feed when built with `FRONTEND_MOCK_LOCATION=1` (or `true`).
pub fn use_simulated_location(flag: Option<&str>) -> bool {
    matches!(flag.map(str::trim), Some("1") | Some("true"))
}

pub fn new_source() -> Box<dyn LocationSource> {
    if use_simulated_location(option_env!("FRONTEND_MOCK_LOCATION")) {
        Box::new(SimulatedSource::new(SimulatedWalk::default()))
    } else {
        Box::<GeolocationSource>::default()
    }
}
