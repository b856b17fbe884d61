use seed::{prelude::*, virtual_dom::AtValue, *};
use shared::{
    display::{format_distance, format_speed},
    CanvasSize, NetworkStatus, Session, SourceEvent, EXPORT_FILE_NAME, INACTIVITY_POLL_INTERVAL,
    INACTIVITY_TIMEOUT, LAST_RUN_KEY,
};
use std::rc::Rc;
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::HtmlCanvasElement;

mod browser;
mod location;
mod network;

use location::{EventHandler, LocationSource};
use network::NetworkWatch;

const CANVAS_WIDTH: u32 = 400;
const CANVAS_HEIGHT: u32 = 400;
const CANVAS_PADDING: f64 = 20.0;
const INACTIVITY_ALERT: &str = "🚨 No movement detected! Notifying emergency contact.";

pub struct Model {
    session: Session,
    source: Option<Box<dyn LocationSource>>,
    _inactivity_timer: Option<StreamHandle>,
    network: NetworkStatus,
    _network_watch: Option<NetworkWatch>,
    canvas: ElRef<HtmlCanvasElement>,
    error: Option<String>,
}

impl Model {
    fn tracking(&self) -> bool {
        self.source.is_some()
    }
}

pub enum Msg {
    Start,
    Stop,
    Location(SourceEvent),
    InactivityTick,
    NetworkChanged(NetworkStatus),
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    let sender = orders.msg_sender();
    let (network, network_watch) =
        network::watch(move |status| sender(Some(Msg::NetworkChanged(status))));

    Model {
        session: Session::default(),
        source: None,
        _inactivity_timer: None,
        network,
        _network_watch: network_watch,
        canvas: ElRef::default(),
        error: None,
    }
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::Start => {
            if model.tracking() {
                return;
            }
            let sender = orders.msg_sender();
            let handler: EventHandler = Rc::new(move |event| sender(Some(Msg::Location(event))));

            let mut source = location::new_source();
            if let Err(err) = source.start(handler) {
                browser::alert(&err);
                model.error = Some(err);
                return;
            }

            model.session = Session::start(browser::now_ms());
            model.source = Some(source);
            model.error = None;
            model._inactivity_timer = Some(orders.stream_with_handle(streams::interval(
                INACTIVITY_POLL_INTERVAL.as_millis() as u32,
                || Msg::InactivityTick,
            )));
            redraw(model);
        }
        Msg::Stop => {
            let Some(mut source) = model.source.take() else {
                return;
            };
            source.stop();
            model._inactivity_timer = None;
            if let Err(err) = export_session(&model.session) {
                web_sys::console::error_1(&format!("[frontend] export failed: {err}").into());
                model.error = Some(err);
            }
        }
        Msg::Location(SourceEvent::Sample(sample)) => {
            if !model.tracking() {
                return;
            }
            web_sys::console::debug_1(
                &format!(
                    "[frontend] location update lat={:.6} lng={:.6}",
                    sample.point.lat(),
                    sample.point.lng()
                )
                .into(),
            );
            model.session.record(sample, browser::now_ms());
            redraw(model);
        }
        Msg::Location(SourceEvent::Error(message)) => {
            browser::alert(&format!("Error: {message}"));
        }
        Msg::Location(SourceEvent::Ended) => {
            orders.send_msg(Msg::Stop);
        }
        Msg::InactivityTick => {
            if model.tracking()
                && model.session.is_inactive(browser::now_ms(), INACTIVITY_TIMEOUT)
            {
                browser::alert(INACTIVITY_ALERT);
            }
        }
        Msg::NetworkChanged(status) => model.network = status,
    }
}

fn canvas_size(canvas: &HtmlCanvasElement) -> CanvasSize {
    CanvasSize {
        width: canvas.width() as f64,
        height: canvas.height() as f64,
        padding: CANVAS_PADDING,
    }
}

fn redraw(model: &Model) {
    let Some(canvas) = model.canvas.get() else {
        return;
    };
    let pixels = model.session.project(canvas_size(&canvas));
    if let Err(err) = browser::draw_path(&canvas, &pixels) {
        web_sys::console::error_1(&format!("[frontend] cannot draw route: {err}").into());
    }
}

/// Persist the route as the last run and hand it to the user as a download.
fn export_session(session: &Session) -> Result<(), String> {
    let json = session.to_json().map_err(|err| err.to_string())?;
    browser::store(LAST_RUN_KEY, &json)?;
    browser::download(EXPORT_FILE_NAME, &json)
}

pub fn view(model: &Model) -> Node<Msg> {
    div![
        C!["app-container"],
        h1!["Safe Runner"],
        view_controls(model),
        view_readings(model),
        canvas![
            C!["route-canvas"],
            el_ref(&model.canvas),
            attrs! {
                At::Width => CANVAS_WIDTH.to_string(),
                At::Height => CANVAS_HEIGHT.to_string(),
            },
        ],
        if let Some(error) = &model.error {
            p![C!["error"], error]
        } else {
            empty![]
        }
    ]
}

fn view_controls(model: &Model) -> Node<Msg> {
    div![
        C!["controls"],
        button![
            "▶️ Start",
            ev(Ev::Click, |_| Msg::Start),
            attrs! { At::Disabled => bool_attr(model.tracking()) },
        ],
        button![
            "⏹️ Stop",
            ev(Ev::Click, |_| Msg::Stop),
            attrs! { At::Disabled => bool_attr(!model.tracking()) },
        ],
    ]
}

fn view_readings(model: &Model) -> Node<Msg> {
    let reading = |label: &str, value: String, unit: &str| {
        div![
            C!["reading"],
            span![C!["label"], label],
            strong![value],
            span![C!["unit"], unit],
        ]
    };

    div![
        C!["readings"],
        reading("Distance", format_distance(model.session.total_distance_m()), "m"),
        reading("Speed", format_speed(model.session.last_speed_mps()), "m/s"),
        reading("Network", model.network.to_string(), ""),
    ]
}

fn bool_attr(value: bool) -> AtValue {
    if value {
        AtValue::Some("true".into())
    } else {
        AtValue::Ignored
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    App::start("app", init, update, view);
}
