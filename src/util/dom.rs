//! Browser binding: DOM control, click wiring and the wasm entry point.
//!
//! Widgets mounted here live for the lifetime of the page, so their click
//! closures are leaked with `Closure::forget`.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::config::WidgetConfig;
use crate::control::LikeControl;
use crate::net::browser::BrowserLikeApi;
use crate::net::types::LikeError;
use crate::widget::LikeToggleWidget;

pub type DomLikeWidget = LikeToggleWidget<DomControl, BrowserLikeApi>;

/// A like button element.
pub struct DomControl {
    element: web_sys::Element,
    id_attribute: String,
}

impl DomControl {
    #[must_use]
    pub fn new(element: web_sys::Element, id_attribute: &str) -> Self {
        Self { element, id_attribute: id_attribute.to_owned() }
    }
}

impl LikeControl for DomControl {
    fn item_id(&self) -> Option<String> {
        self.element.get_attribute(&self.id_attribute)
    }

    fn set_label(&self, label: &str) {
        self.element.set_text_content(Some(label));
    }

    fn add_class(&self, class: &str) {
        if let Err(e) = self.element.class_list().add_1(class) {
            log::warn!("like button: add class {class} failed: {e:?}");
        }
    }

    fn remove_class(&self, class: &str) {
        if let Err(e) = self.element.class_list().remove_1(class) {
            log::warn!("like button: remove class {class} failed: {e:?}");
        }
    }

    fn set_busy(&self, busy: bool) {
        let result = if busy {
            self.element.set_attribute("disabled", "")
        } else {
            self.element.remove_attribute("disabled")
        };
        if let Err(e) = result {
            log::warn!("like button: toggle disabled failed: {e:?}");
        }
    }
}

fn document(selector: &str) -> Result<web_sys::Document, LikeError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| LikeError::MissingControl { selector: selector.to_owned() })
}

/// Mount a widget on the first element matching `config.selector`.
///
/// # Errors
///
/// Returns [`LikeError::MissingControl`] if no element matches.
pub fn mount(config: &WidgetConfig) -> Result<Rc<DomLikeWidget>, LikeError> {
    let missing = || LikeError::MissingControl { selector: config.selector.clone() };
    let element = document(&config.selector)?
        .query_selector(&config.selector)
        .map_err(|_| missing())?
        .ok_or_else(missing)?;
    Ok(mount_element(element, config))
}

/// Mount one independent widget per element matching `config.selector`.
///
/// # Errors
///
/// Returns [`LikeError::MissingControl`] if the selector cannot be evaluated.
pub fn mount_all(config: &WidgetConfig) -> Result<Vec<Rc<DomLikeWidget>>, LikeError> {
    let nodes = document(&config.selector)?
        .query_selector_all(&config.selector)
        .map_err(|_| LikeError::MissingControl { selector: config.selector.clone() })?;
    let widgets = (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_ref::<web_sys::Element>().cloned())
        .map(|element| mount_element(element, config))
        .collect();
    Ok(widgets)
}

fn mount_element(element: web_sys::Element, config: &WidgetConfig) -> Rc<DomLikeWidget> {
    let control = DomControl::new(element.clone(), &config.id_attribute);
    let api = BrowserLikeApi::new(config.api.clone());
    let widget = Rc::new(LikeToggleWidget::from_config(control, api, config));

    let on_click_widget = widget.clone();
    let on_click = Closure::wrap(Box::new(move |_e: web_sys::Event| {
        let widget = on_click_widget.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = widget.handle_like_click().await {
                log::debug!("like click ended with {}", e.error_code());
            }
        });
    }) as Box<dyn FnMut(web_sys::Event)>);
    if let Err(e) = element.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref()) {
        log::warn!("like button: click listener not attached: {e:?}");
    }
    on_click.forget();

    let start_widget = widget.clone();
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = start_widget.start().await {
            log::debug!("like button start ended with {}", e.error_code());
        }
    });

    widget
}

/// Page entry point: console logging, then every `.like-button` on the page.
#[wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("logger already initialized");
    }

    match mount_all(&WidgetConfig::default()) {
        Ok(widgets) => log::info!("mounted {} like button(s)", widgets.len()),
        Err(e) => log::warn!("like buttons not mounted: {e}"),
    }
}
