use crate::objects::JsError;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlAnchorElement, HtmlInputElement, HtmlSelectElement};

pub fn get_input_element_from_event(ev: &Event) -> Result<HtmlInputElement, JsError> {
    let target = ev.target().ok_or("could not get target object")?;

    target
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| JsError::from("error casting target to input element"))
}

pub fn get_select_element_from_event(ev: &Event) -> Result<HtmlSelectElement, JsError> {
    let target = ev.target().ok_or("could not get target object")?;

    target
        .dyn_into::<HtmlSelectElement>()
        .map_err(|_| JsError::from("error casting target to select element"))
}

pub fn location_href() -> Result<String, JsError> {
    Ok(web_sys::window()
        .ok_or("could not obtain window")?
        .location()
        .href()?)
}

/// Starts a browser download of `url` by clicking a temporary anchor.
pub fn trigger_file_download(url: &str, file_name: &str) -> Result<(), JsError> {
    let document = web_sys::window()
        .ok_or("could not obtain window")?
        .document()
        .ok_or("could not obtain document")?;
    let body = document.body().ok_or("could not obtain document body")?;
    let anchor = document
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| JsError::from("error casting element to anchor"))?;

    anchor.set_href(url);
    anchor.set_download(file_name);
    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;

    Ok(())
}
