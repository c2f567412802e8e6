use super::{downloader::Downloader, notification::Notification};
use crate::{
    agents::notifier,
    objects::{ClientConfig, JsError},
    utils,
};
use yew::{prelude::*, Component};
use yew_agent::{Dispatched, Dispatcher};

pub struct Top {
    config: ClientConfig,
    _notifier: Dispatcher<notifier::Notifier>,
}

fn load_config() -> Result<ClientConfig, JsError> {
    let href = utils::location_href()?;

    ClientConfig::from_location(&href).map_err(|e| JsError::from(e.to_string()))
}

fn fallback_notice(err: &JsError) -> notifier::Notification {
    notifier::Notification {
        text: format!(
            "Could not read the page settings ({}). Using the default settings.",
            err
        ),
        severity: notifier::NotificationSeverity::Info,
    }
}

impl Component for Top {
    type Message = ();
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let mut notifier = notifier::Notifier::dispatcher();
        let config = match load_config() {
            Ok(config) => config,
            Err(e) => {
                notifier.send(notifier::Request::Notify(fallback_notice(&e)));
                ClientConfig::default()
            }
        };

        Self {
            config,
            _notifier: notifier,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, _msg: Self::Message) -> bool {
        false
    }

    fn view(&self, _ctx: &Context<Self>) -> yew::Html {
        html! {
            <div class="container">
                <Notification/>
                <Downloader config={self.config.clone()}/>
            </div>
        }
    }
}
