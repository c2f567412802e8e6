use crate::objects::{FetchError, JobHandle, JsError, ProgressSnapshot};
use std::collections::HashSet;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use yew::Callback;
use yew_agent::{Agent, AgentLink, Bridge, Bridged, Context, Dispatched, Dispatcher, HandlerId};

use super::{
    fetcher::{self},
    notifier::{self},
};

#[derive(Debug)]
pub enum Request {
    /// Polls `progress_url` every `interval_ms`, replacing any running loop.
    Start {
        job: JobHandle,
        progress_url: String,
        interval_ms: u32,
    },
    Stop,
}

#[derive(Debug)]
pub enum Response {
    Tick(JobHandle, Result<ProgressSnapshot, FetchError>),
}

pub enum Message {
    Interval,
    FetcherMessage(fetcher::Response),
}

pub struct Poller {
    link: AgentLink<Self>,
    subscribers: HashSet<HandlerId>,
    fetcher: Box<dyn Bridge<fetcher::Fetcher>>,
    notifier: Dispatcher<notifier::Notifier>,
    task: Option<PollTask>,
}

struct PollTask {
    job: JobHandle,
    progress_url: String,
    _interval: Interval,
}

/// Browser interval, cleared when dropped.
struct Interval {
    handle: i32,
    _closure: Closure<dyn Fn()>,
}

impl Interval {
    fn start(callback: Callback<()>, period_ms: u32) -> Result<Self, JsError> {
        let closure = Closure::wrap(Box::new(move || callback.emit(())) as Box<dyn Fn()>);
        let handle = web_sys::window()
            .ok_or("could not obtain window")?
            .set_interval_with_callback_and_timeout_and_arguments(
                closure.as_ref().unchecked_ref(),
                period_ms as i32,
                &js_sys::Array::new(),
            )?;

        Ok(Self {
            handle,
            _closure: closure,
        })
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.handle);
        }
    }
}

impl Poller {
    fn process_handle_input(&mut self, msg: Request) -> Result<(), JsError> {
        match msg {
            Request::Start {
                job,
                progress_url,
                interval_ms,
            } => {
                self.task = None;

                let interval =
                    Interval::start(self.link.callback(|_| Message::Interval), interval_ms)?;

                log::debug!("poller: watching job {} every {} ms", job, interval_ms);
                self.task = Some(PollTask {
                    job,
                    progress_url,
                    _interval: interval,
                });
            }
            Request::Stop => {
                if let Some(task) = self.task.take() {
                    log::debug!("poller: stopped watching job {}", task.job);
                }
            }
        }

        Ok(())
    }

    fn process_update(&mut self, msg: Message) {
        match msg {
            Message::Interval => {
                if let Some(task) = &self.task {
                    self.fetcher.send(fetcher::Request::Progress(
                        task.progress_url.clone(),
                        task.job.clone(),
                    ));
                }
            }
            Message::FetcherMessage(fetcher::Response::Progress(job, res)) => {
                match &self.task {
                    Some(task) if task.job == job => {
                        for subscriber in &self.subscribers {
                            if subscriber.is_respondable() {
                                self.link.respond(
                                    *subscriber,
                                    Response::Tick(job.clone(), res.clone()),
                                );
                            }
                        }
                    }
                    _ => log::debug!("poller: dropping progress of job {}", job),
                }
            }
            Message::FetcherMessage(_) => {}
        }
    }
}

impl Agent for Poller {
    type Reach = Context<Self>;
    type Message = Message;
    type Input = Request;
    type Output = Response;

    fn create(link: AgentLink<Self>) -> Self {
        let callback_fetcher = link.callback(Message::FetcherMessage);

        Self {
            link,
            subscribers: HashSet::new(),
            fetcher: fetcher::Fetcher::bridge(callback_fetcher),
            notifier: notifier::Notifier::dispatcher(),
            task: None,
        }
    }

    fn update(&mut self, msg: Self::Message) {
        self.process_update(msg);
    }

    fn handle_input(&mut self, msg: Self::Input, _id: HandlerId) {
        match self.process_handle_input(msg) {
            Ok(()) => {}
            Err(e) => self.notifier.send(notifier::Request::NotifyError(e)),
        }
    }

    fn connected(&mut self, id: HandlerId) {
        self.subscribers.insert(id);
    }

    fn disconnected(&mut self, id: HandlerId) {
        self.subscribers.remove(&id);
    }
}
