use crate::agents::notifier::{self, Notifier, NotificationSeverity};
use yew::prelude::*;
use yew_agent::{Bridge, Bridged};

/// Shows the oldest pending notification until it is dismissed.
pub struct Notification {
    notifier: Box<dyn Bridge<Notifier>>,
    current_notification: Option<notifier::Notification>,
}

pub enum Message {
    NotifierResponse(notifier::Response),
    Dismiss,
}

fn severity_style(severity: &NotificationSeverity) -> (&'static str, &'static str) {
    match severity {
        NotificationSeverity::Error => ("is-danger", "Error"),
        NotificationSeverity::Info => ("is-info", "Information"),
    }
}

impl Component for Notification {
    type Message = Message;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            notifier: Notifier::bridge(ctx.link().callback(Message::NotifierResponse)),
            current_notification: None,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Message::NotifierResponse(notifier::Response::Notification(notification)) => {
                let changed = self.current_notification != notification;

                self.current_notification = notification;
                changed
            }
            Message::Dismiss => {
                self.notifier.send(notifier::Request::Dismiss);
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        match &self.current_notification {
            Some(notification) => {
                let (color, heading) = severity_style(&notification.severity);

                html! {
                    <article class={classes!("message", color)}>
                        <div class="message-header">
                            <p>{heading}</p>
                            <button class="delete" aria-label="delete" onclick={ctx.link().callback(|_| Message::Dismiss)}></button>
                        </div>
                        <div class="message-body">
                            {notification.text.clone()}
                        </div>
                    </article>
                }
            }
            None => html! {},
        }
    }
}
