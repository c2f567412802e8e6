use web_sys::Event;
use yew::{html, Callback, Component, Properties};
use yew_agent::{Dispatched, Dispatcher};

use crate::{agents::notifier, controller::PlaylistChoice, objects::JsError, utils};

pub struct PlaylistSelect {
    notifier: Dispatcher<notifier::Notifier>,
}

#[derive(Properties, Clone, PartialEq)]
pub struct Props {
    pub choices: Vec<PlaylistChoice>,
    pub ontoggle: Callback<(usize, bool)>,
    pub onselectall: Callback<bool>,
}

pub enum Message {
    Toggle(usize, Event),
    SelectAll(bool),
}

impl PlaylistSelect {
    fn process_update(&mut self, ctx: &yew::Context<Self>, msg: Message) -> Result<bool, JsError> {
        match msg {
            Message::Toggle(index, event) => {
                let checkbox = utils::get_input_element_from_event(&event)?;

                ctx.props().ontoggle.emit((index, checkbox.checked()));
            }
            Message::SelectAll(checked) => ctx.props().onselectall.emit(checked),
        }

        Ok(false)
    }
}

impl Component for PlaylistSelect {
    type Message = Message;
    type Properties = Props;

    fn create(_ctx: &yew::Context<Self>) -> Self {
        Self {
            notifier: notifier::Notifier::dispatcher(),
        }
    }

    fn view(&self, ctx: &yew::Context<Self>) -> yew::Html {
        html! {
            <div class="box">
                <div class="level">
                    <div class="level-left">
                        <p class="level-item has-text-weight-semibold">{"Playlist items"}</p>
                    </div>
                    <div class="level-right buttons">
                        <button class="button is-small" onclick={ctx.link().callback(|_| Message::SelectAll(true))}>{"Select all"}</button>
                        <button class="button is-small" onclick={ctx.link().callback(|_| Message::SelectAll(false))}>{"Deselect all"}</button>
                    </div>
                </div>
                { for ctx.props().choices.iter().enumerate().map(|(index, choice)| {
                    html! {
                        <div class="playlist-item">
                            <label class="checkbox">
                                <input type="checkbox" checked={choice.checked} disabled={choice.entry.selection_key().is_none()} onchange={ctx.link().callback(move |e| Message::Toggle(index, e))}/>
                                {" "}{choice.entry.label(index)}
                            </label>
                        </div>
                    }
                })}
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
