use futures::channel::mpsc;
use futures::StreamExt;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use storechat_core::{
    ChatController, ChatSession, KeyValueStore, Labels, MemoryStore, Status, Surface, ViewOp,
    WidgetConfig,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

use crate::api::GlooChatApi;
use crate::dom;
use crate::markdown;
use crate::storage::LocalStorageStore;
use crate::timer::GlooScheduler;

const MESSAGES_ID: &str = "messages";
const INPUT_ID: &str = "user-input";
const STATUS_ID: &str = "status-text";
const CONTAINER_ID: &str = "chat-container";
const SEND_BUTTON_ID: &str = "send-button";
const CLEAR_BUTTON_ID: &str = "clear-button";
const TYPING_ID: &str = "typing-bubble";
const TOAST_ID: &str = "toast-notification";

const TYPING_COLOR: &str = "#25d366";

type Controller = ChatController<Box<dyn KeyValueStore>, GlooScheduler, GlooChatApi, DomSurface>;

thread_local! {
    static WIDGET: RefCell<Option<ChatWidget>> = const { RefCell::new(None) };
}

/// Run `f` against the mounted widget, if any
pub fn with_widget<F: FnOnce(&ChatWidget)>(f: F) {
    let widget = WIDGET.with(|slot| slot.borrow().clone());
    match widget {
        Some(widget) => f(&widget),
        None => log::warn!("Chat widget is not mounted"),
    }
}

/// Send the input box's content through the mounted widget
pub fn send_from_input() {
    with_widget(|widget| widget.send_from_input());
}

/// The chat widget mounted on the page. Cheap to clone.
#[derive(Clone)]
pub struct ChatWidget {
    controller: Rc<Controller>,
}

impl ChatWidget {
    pub fn mount(config: WidgetConfig) -> Result<(), JsValue> {
        let document = crate::document()?;

        let store: Box<dyn KeyValueStore> = match LocalStorageStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{}; history will not survive a reload", e);
                Box::new(MemoryStore::new())
            }
        };

        let (expired_tx, mut expired_rx) = mpsc::unbounded();
        let session = ChatSession::new(store, GlooScheduler::new(expired_tx), &config);
        let surface = DomSurface::new(document.clone(), &config)?;
        let api = GlooChatApi::new(config.endpoint.clone());

        let widget = ChatWidget {
            controller: Rc::new(ChatController::new(session, api, surface)),
        };
        widget.controller.load();

        // Undo countdowns report back here
        let controller = widget.controller.clone();
        wasm_bindgen_futures::spawn_local(async move {
            while let Some(token) = expired_rx.next().await {
                controller.expire(token);
            }
        });

        widget.setup_listeners(&document)?;

        WIDGET.with(|slot| *slot.borrow_mut() = Some(widget));
        Ok(())
    }

    fn setup_listeners(&self, document: &Document) -> Result<(), JsValue> {
        let input = dom::get_element_by_id(document, INPUT_ID)?;
        let widget = self.clone();
        dom::add_enter_listener(&input, move || widget.send_from_input())?;

        if let Some(button) = document.get_element_by_id(SEND_BUTTON_ID) {
            let widget = self.clone();
            dom::add_click_listener(&button, move || widget.send_from_input())?;
        }

        if let Some(button) = document.get_element_by_id(CLEAR_BUTTON_ID) {
            let widget = self.clone();
            dom::add_click_listener(&button, move || widget.clear())?;
        }

        Ok(())
    }

    pub fn send_from_input(&self) {
        let text = self.controller.surface().input.value();
        let controller = self.controller.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let outcome = controller.send(&text).await;
            log::debug!("Send finished: {:?}", outcome);
        });
    }

    pub fn clear(&self) {
        self.controller.clear();
    }

    pub fn undo(&self) {
        self.controller.undo();
    }
}

/// Applies view operations to the page
pub struct DomSurface {
    document: Document,
    messages: Element,
    container: Element,
    input: HtmlInputElement,
    status: Option<HtmlElement>,
    labels: Labels,
    render_markdown: bool,
    toast_fade: Duration,
    // Shared by every undo button this surface creates
    on_undo: Closure<dyn FnMut()>,
}

impl DomSurface {
    pub fn new(document: Document, config: &WidgetConfig) -> Result<Self, JsValue> {
        Ok(Self {
            messages: dom::get_element_by_id(&document, MESSAGES_ID)?,
            container: dom::get_element_by_id(&document, CONTAINER_ID)?,
            input: dom::get_input_by_id(&document, INPUT_ID)?,
            status: dom::get_html_element_by_id(&document, STATUS_ID).ok(),
            labels: config.labels.clone(),
            render_markdown: config.render_markdown,
            toast_fade: config.toast_fade(),
            on_undo: Closure::wrap(Box::new(crate::undo_clear) as Box<dyn FnMut()>),
            document,
        })
    }

    fn try_apply(&self, op: &ViewOp) -> Result<(), JsValue> {
        match op {
            ViewOp::ClearMessages => dom::clear_element(&self.messages),
            ViewOp::AppendBubble { kind, text } => {
                let bubble =
                    dom::create_element_with_class(&self.document, "div", kind.css_class())?;
                bubble.set_inner_html(&markdown::render_bubble_content(
                    *kind,
                    text,
                    self.render_markdown,
                ));
                self.messages.append_child(&bubble)?;
            }
            ViewOp::ShowTyping => self.show_typing()?,
            ViewOp::HideTyping => dom::remove_element_by_id(&self.document, TYPING_ID),
            ViewOp::SetStatus(status) => self.set_status(*status),
            ViewOp::ClearInput => self.input.set_value(""),
            ViewOp::ShowUndoToast => self.show_undo_toast()?,
            ViewOp::DismissUndoToast => self.dismiss_undo_toast()?,
            ViewOp::RemoveUndoToast => dom::remove_element_by_id(&self.document, TOAST_ID),
            ViewOp::ScrollToBottom => dom::scroll_to_bottom(&self.messages),
        }
        Ok(())
    }

    fn show_typing(&self) -> Result<(), JsValue> {
        if self.document.get_element_by_id(TYPING_ID).is_some() {
            return Ok(());
        }

        let typing = dom::create_element_with_class(&self.document, "div", "typing-indicator")?;
        typing.set_id(TYPING_ID);
        typing.set_inner_html("<span></span><span></span><span></span>");
        self.messages.append_child(&typing)?;
        Ok(())
    }

    fn set_status(&self, status: Status) {
        let Some(element) = &self.status else {
            return;
        };

        let (text, color) = match status {
            Status::Online => (&self.labels.online, ""),
            Status::Typing => (&self.labels.typing, TYPING_COLOR),
        };
        element.set_inner_text(text);
        let _ = element.style().set_property("color", color);
    }

    fn show_undo_toast(&self) -> Result<(), JsValue> {
        dom::remove_element_by_id(&self.document, TOAST_ID);

        let toast = dom::create_element_with_class(&self.document, "div", "toast-notification")?;
        toast.set_id(TOAST_ID);

        let notice = self.document.create_element("span")?;
        notice.set_text_content(Some(&self.labels.undo_notice));
        toast.append_child(&notice)?;

        let button = dom::create_element_with_class(&self.document, "button", "undo-btn")?
            .dyn_into::<HtmlElement>()?;
        button.set_text_content(Some(&self.labels.undo_button));
        button.set_onclick(Some(self.on_undo.as_ref().unchecked_ref()));
        toast.append_child(&button)?;

        self.container.append_child(&toast)?;
        Ok(())
    }

    fn dismiss_undo_toast(&self) -> Result<(), JsValue> {
        let Some(toast) = self.document.get_element_by_id(TOAST_ID) else {
            return Ok(());
        };
        let toast = toast.dyn_into::<HtmlElement>()?;

        let fade_secs = self.toast_fade.as_secs_f64();
        let style = toast.style();
        style.set_property("transition", &format!("opacity {}s", fade_secs))?;
        style.set_property("opacity", "0")?;

        let fade_ms = u32::try_from(self.toast_fade.as_millis()).unwrap_or(u32::MAX);
        wasm_bindgen_futures::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(fade_ms).await;
            // A newer toast has its own element, this one is already detached then
            toast.remove();
        });
        Ok(())
    }
}

impl Surface for DomSurface {
    fn apply(&self, op: &ViewOp) {
        if let Err(e) = self.try_apply(op) {
            log::error!("Failed to apply {:?}: {:?}", op, e);
        }
    }
}
