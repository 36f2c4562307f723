//! Extension host interop.
//!
//! Every `chrome.*` call the panel and the background coordinator make goes through here. The
//! wasm32 build talks to the extension APIs through an inline JS shim; other targets get a shim
//! that reports the host as unavailable so the rest of the crate can be built and tested natively.

use crate::models::{BookmarkNode, MoveDestination, RuntimeMessage};

#[cfg(target_arch = "wasm32")]
mod imp {
    use super::*;
    use js_sys::Promise;
    use serde::de::DeserializeOwned;
    use serde::Serialize;
    use serde_wasm_bindgen::{from_value, Serializer};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    #[wasm_bindgen(inline_js = r#"
function hasChrome() {
  return typeof chrome !== 'undefined';
}

export function jsBookmarksAvailable() {
  return hasChrome() && !!chrome.bookmarks;
}

export async function jsBookmarksGetTree() {
  const tree = await chrome.bookmarks.getTree();
  return tree[0];
}

export async function jsBookmarksGet(id) {
  const found = await chrome.bookmarks.get(id);
  if (!found || !found[0]) {
    throw new Error("Can't find bookmark for id.");
  }
  return found[0];
}

export async function jsBookmarksMove(id, destination) {
  return await chrome.bookmarks.move(id, destination);
}

export async function jsBookmarksUpdateTitle(id, title) {
  return await chrome.bookmarks.update(id, { title });
}

export async function jsBookmarksRemove(id) {
  await chrome.bookmarks.remove(id);
  return null;
}

export async function jsBookmarksRemoveTree(id) {
  await chrome.bookmarks.removeTree(id);
  return null;
}

export function jsOnBookmarkEvent(cb) {
  chrome.bookmarks.onCreated.addListener(() => cb());
  chrome.bookmarks.onRemoved.addListener(() => cb());
  chrome.bookmarks.onChanged.addListener(() => cb());
  chrome.bookmarks.onMoved.addListener(() => cb());
}

export async function jsTabsCreate(url) {
  await chrome.tabs.create({ url });
  return null;
}

export function jsOnRuntimeMessage(cb) {
  if (!hasChrome() || !chrome.runtime || !chrome.runtime.onMessage) {
    return;
  }
  chrome.runtime.onMessage.addListener((message) => {
    cb(message);
  });
}

export async function jsSendRuntimeMessage(message) {
  await chrome.runtime.sendMessage(message);
  return null;
}

export async function jsOpenPanelOnActionClick() {
  await chrome.sidePanel.setPanelBehavior({ openPanelOnActionClick: true });
  return null;
}
"#)]
    extern "C" {
        #[wasm_bindgen(js_name = jsBookmarksAvailable)]
        fn js_bookmarks_available() -> bool;
        #[wasm_bindgen(js_name = jsBookmarksGetTree)]
        fn js_bookmarks_get_tree() -> Promise;
        #[wasm_bindgen(js_name = jsBookmarksGet)]
        fn js_bookmarks_get(id: &str) -> Promise;
        #[wasm_bindgen(js_name = jsBookmarksMove)]
        fn js_bookmarks_move(id: &str, destination: JsValue) -> Promise;
        #[wasm_bindgen(js_name = jsBookmarksUpdateTitle)]
        fn js_bookmarks_update_title(id: &str, title: &str) -> Promise;
        #[wasm_bindgen(js_name = jsBookmarksRemove)]
        fn js_bookmarks_remove(id: &str) -> Promise;
        #[wasm_bindgen(js_name = jsBookmarksRemoveTree)]
        fn js_bookmarks_remove_tree(id: &str) -> Promise;
        #[wasm_bindgen(js_name = jsOnBookmarkEvent)]
        fn js_on_bookmark_event(cb: &Closure<dyn FnMut()>);

        #[wasm_bindgen(js_name = jsTabsCreate)]
        fn js_tabs_create(url: &str) -> Promise;

        #[wasm_bindgen(js_name = jsOnRuntimeMessage)]
        fn js_on_runtime_message(cb: &Closure<dyn FnMut(JsValue)>);
        #[wasm_bindgen(js_name = jsSendRuntimeMessage)]
        fn js_send_runtime_message(message: JsValue) -> Promise;

        #[wasm_bindgen(js_name = jsOpenPanelOnActionClick)]
        fn js_open_panel_on_action_click() -> Promise;
    }

    async fn await_promise(promise: Promise) -> Result<JsValue, String> {
        JsFuture::from(promise).await.map_err(js_error_to_string)
    }

    fn js_error_to_string(err: JsValue) -> String {
        if let Some(e) = err.dyn_ref::<js_sys::Error>() {
            return String::from(e.message());
        }
        err.as_string().unwrap_or_else(|| format!("{err:?}"))
    }

    async fn promise_to_json<T: DeserializeOwned>(promise: Promise) -> Result<T, String> {
        let value = await_promise(promise).await?;
        from_value(value).map_err(|e| format!("decode: {e}"))
    }

    fn to_js<T: Serialize>(value: &T) -> Result<JsValue, String> {
        value
            .serialize(&Serializer::json_compatible())
            .map_err(|e| format!("encode: {e}"))
    }

    pub fn bookmarks_available() -> bool {
        js_bookmarks_available()
    }

    pub async fn get_tree() -> Result<BookmarkNode, String> {
        promise_to_json(js_bookmarks_get_tree()).await
    }

    pub async fn get_node(id: &str) -> Result<BookmarkNode, String> {
        promise_to_json(js_bookmarks_get(id)).await
    }

    pub async fn move_node(id: &str, destination: &MoveDestination) -> Result<BookmarkNode, String> {
        let destination = to_js(destination)?;
        promise_to_json(js_bookmarks_move(id, destination)).await
    }

    pub async fn update_title(id: &str, title: &str) -> Result<BookmarkNode, String> {
        promise_to_json(js_bookmarks_update_title(id, title)).await
    }

    pub async fn remove(id: &str) -> Result<(), String> {
        let _ = await_promise(js_bookmarks_remove(id)).await?;
        Ok(())
    }

    pub async fn remove_tree(id: &str) -> Result<(), String> {
        let _ = await_promise(js_bookmarks_remove_tree(id)).await?;
        Ok(())
    }

    pub fn on_bookmark_event(mut handler: impl FnMut() + 'static) {
        let cb = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        js_on_bookmark_event(&cb);
        // Listeners live as long as the extension context.
        cb.forget();
    }

    pub async fn open_tab(url: &str) -> Result<(), String> {
        let _ = await_promise(js_tabs_create(url)).await?;
        Ok(())
    }

    pub fn on_runtime_message(mut handler: impl FnMut(RuntimeMessage) + 'static) {
        let cb = Closure::wrap(Box::new(move |raw: JsValue| {
            // Messages from other extension parts may have any shape.
            if let Ok(message) = from_value::<RuntimeMessage>(raw) {
                handler(message);
            }
        }) as Box<dyn FnMut(JsValue)>);
        js_on_runtime_message(&cb);
        cb.forget();
    }

    pub async fn send_runtime_message(message: &RuntimeMessage) -> Result<(), String> {
        let message = to_js(message)?;
        let _ = await_promise(js_send_runtime_message(message)).await?;
        Ok(())
    }

    pub async fn open_panel_on_action_click() -> Result<(), String> {
        let _ = await_promise(js_open_panel_on_action_click()).await?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[allow(dead_code)]
mod imp {
    use super::*;

    fn unsupported() -> String {
        "extension APIs are only available when compiled for wasm32".to_string()
    }

    pub fn bookmarks_available() -> bool {
        false
    }

    pub async fn get_tree() -> Result<BookmarkNode, String> {
        Err(unsupported())
    }

    pub async fn get_node(_id: &str) -> Result<BookmarkNode, String> {
        Err(unsupported())
    }

    pub async fn move_node(
        _id: &str,
        _destination: &MoveDestination,
    ) -> Result<BookmarkNode, String> {
        Err(unsupported())
    }

    pub async fn update_title(_id: &str, _title: &str) -> Result<BookmarkNode, String> {
        Err(unsupported())
    }

    pub async fn remove(_id: &str) -> Result<(), String> {
        Err(unsupported())
    }

    pub async fn remove_tree(_id: &str) -> Result<(), String> {
        Err(unsupported())
    }

    pub fn on_bookmark_event(_handler: impl FnMut() + 'static) {}

    pub async fn open_tab(_url: &str) -> Result<(), String> {
        Err(unsupported())
    }

    pub fn on_runtime_message(_handler: impl FnMut(RuntimeMessage) + 'static) {}

    pub async fn send_runtime_message(_message: &RuntimeMessage) -> Result<(), String> {
        Err(unsupported())
    }

    pub async fn open_panel_on_action_click() -> Result<(), String> {
        Err(unsupported())
    }
}

pub(crate) use imp::*;
