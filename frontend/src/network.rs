use js_sys::Reflect;
use shared::NetworkStatus;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::EventTarget;

use crate::browser::read_string;

const CONNECTION_KEYS: [&str; 3] = ["connection", "mozConnection", "webkitConnection"];

/// `change` listener on the Network Information object, removed on drop.
pub struct NetworkWatch {
    target: EventTarget,
    on_change: Closure<dyn FnMut()>,
}

impl Drop for NetworkWatch {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback("change", self.on_change.as_ref().unchecked_ref());
    }
}

fn connection() -> Option<JsValue> {
    let navigator = web_sys::window()?.navigator();
    CONNECTION_KEYS.iter().find_map(|key| {
        Reflect::get(&navigator, &JsValue::from_str(key))
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null())
    })
}

fn status_of(connection: &JsValue) -> NetworkStatus {
    NetworkStatus::from_effective_type(read_string(connection, "effectiveType").as_deref())
}

/// Current status, plus a watch that reports every later change to `on_change`.
/// Browsers without the Network Information API report `Unavailable` and no watch.
pub fn watch(on_change: impl Fn(NetworkStatus) + 'static) -> (NetworkStatus, Option<NetworkWatch>) {
    let Some(connection) = connection() else {
        return (NetworkStatus::Unavailable, None);
    };
    let status = status_of(&connection);

    let source = connection.clone();
    let listener = Closure::<dyn FnMut()>::new(move || on_change(status_of(&source)));
    let target: EventTarget = connection.unchecked_into();
    if let Err(err) =
        target.add_event_listener_with_callback("change", listener.as_ref().unchecked_ref())
    {
        web_sys::console::error_1(&err);
        return (status, None);
    }

    (
        status,
        Some(NetworkWatch {
            target,
            on_change: listener,
        }),
    )
}
