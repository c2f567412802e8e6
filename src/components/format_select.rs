use web_sys::Event;
use yew::{html, Callback, Component, Properties};
use yew_agent::{Dispatched, Dispatcher};

use crate::{
    agents::notifier,
    objects::{FormatOption, JsError},
    utils,
};

/// Drop-down over the formats of one kind (video or audio).
pub struct FormatSelect {
    notifier: Dispatcher<notifier::Notifier>,
}

#[derive(Properties, Clone, PartialEq)]
pub struct Props {
    pub label: String,
    pub formats: Vec<FormatOption>,
    pub selected: Option<String>,
    pub onchange: Callback<String>,
}

pub enum Message {
    OnChange(Event),
}

impl FormatSelect {
    fn process_update(&mut self, ctx: &yew::Context<Self>, msg: Message) -> Result<bool, JsError> {
        match msg {
            Message::OnChange(event) => {
                let select = utils::get_select_element_from_event(&event)?;

                ctx.props().onchange.emit(select.value());
                Ok(false)
            }
        }
    }
}

impl Component for FormatSelect {
    type Message = Message;
    type Properties = Props;

    fn create(_ctx: &yew::Context<Self>) -> Self {
        Self {
            notifier: notifier::Notifier::dispatcher(),
        }
    }

    fn view(&self, ctx: &yew::Context<Self>) -> yew::Html {
        let props = ctx.props();

        html! {
            <div class="field">
                <label class="label">{props.label.clone()}</label>
                <div class="control">
                    <div class="select is-fullwidth">
                        <select onchange={ctx.link().callback(Message::OnChange)}>
                            {match props.formats.is_empty() {
                                true => html! { <option value="">{"No formats available"}</option> },
                                false => props.formats.iter().map(|format| {
                                    let selected = props.selected.as_deref() == Some(format.format_id.as_str());

                                    html! {
                                        <option value={format.format_id.clone()} selected={selected}>{format.label()}</option>
                                    }
                                }).collect::<yew::Html>(),
                            }}
                        </select>
                    </div>
                </div>
            </div>
        }
    }

    fn update(&mut self, ctx: &yew::Context<Self>, msg: Self::Message) -> bool {
        match self.process_update(ctx, msg) {
            Ok(should_render) => should_render,
            Err(e) => {
                self.notifier.send(notifier::Request::NotifyError(e));
                false
            }
        }
    }
}
